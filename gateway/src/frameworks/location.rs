use async_trait::async_trait;

use crate::domain::{Coordinate, LocationError, LocationProvider};

// Location capability backed by a configured device position.
#[derive(Debug, Clone, Copy)]
pub struct StaticLocation(pub Coordinate);

#[async_trait]
impl LocationProvider for StaticLocation {
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        Ok(self.0)
    }
}

// Stand-in for platforms with no location capability at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

#[async_trait]
impl LocationProvider for NoLocation {
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        Err(LocationError::Unavailable)
    }
}

// Pick the provider matching the configured device position.
pub fn provider_for(device: Option<Coordinate>) -> Box<dyn LocationProvider> {
    match device {
        Some(coordinate) => Box::new(StaticLocation(coordinate)),
        None => Box::new(NoLocation),
    }
}
