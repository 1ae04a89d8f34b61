use std::time::Duration;

use crate::domain::{Coordinate, LocationError, LocationProvider};

// Where a resolved coordinate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionSource {
    Device,
    Fallback(LocationError),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPosition {
    pub coordinate: Coordinate,
    pub source: PositionSource,
}

impl ResolvedPosition {
    pub fn is_degraded(&self) -> bool {
        matches!(self.source, PositionSource::Fallback(_))
    }
}

// Ask the platform for the caller's position. Denial, missing capability, or a
// lookup that outlives `timeout` all degrade to `Coordinate::FALLBACK`.
pub async fn resolve_position<P>(provider: &P, timeout: Duration) -> ResolvedPosition
where
    P: LocationProvider + ?Sized,
{
    let outcome = match tokio::time::timeout(timeout, provider.current_position()).await {
        Ok(result) => result,
        Err(_) => Err(LocationError::Timeout),
    };

    match outcome {
        Ok(coordinate) => ResolvedPosition {
            coordinate,
            source: PositionSource::Device,
        },
        Err(reason) => {
            tracing::warn!(%reason, "falling back to default coordinate.");
            ResolvedPosition {
                coordinate: Coordinate::FALLBACK,
                source: PositionSource::Fallback(reason),
            }
        }
    }
}
