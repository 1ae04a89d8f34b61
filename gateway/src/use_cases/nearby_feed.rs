use std::time::Duration;

use crate::domain::{GatewayError, LocationProvider, Report, ReportService, ReportType};
use crate::use_cases::geolocation::{ResolvedPosition, resolve_position};

pub const DEFAULT_RADIUS_METERS: f64 = 50_000.0;
pub const DEFAULT_FEED_LIMIT: usize = 6;
pub const DEFAULT_LOCATE_TIMEOUT: Duration = Duration::from_secs(10);

// Reports around the caller plus the position they were searched from.
#[derive(Debug, Clone)]
pub struct NearbyFeed {
    pub origin: ResolvedPosition,
    pub reports: Vec<Report>,
}

// Nearby-feed use case with injected dependencies.
pub struct NearbyFeedUseCase<L, R> {
    pub locator: L,
    pub reports: R,
    pub radius_in_meters: f64,
    pub limit: usize,
    pub locate_timeout: Duration,
}

impl<L, R> NearbyFeedUseCase<L, R>
where
    L: LocationProvider,
    R: ReportService,
{
    pub fn new(locator: L, reports: R) -> Self {
        Self {
            locator,
            reports,
            radius_in_meters: DEFAULT_RADIUS_METERS,
            limit: DEFAULT_FEED_LIMIT,
            locate_timeout: DEFAULT_LOCATE_TIMEOUT,
        }
    }

    #[tracing::instrument(name = "nearby_feed", skip(self))]
    pub async fn execute(
        &self,
        report_type: Option<ReportType>,
    ) -> Result<NearbyFeed, GatewayError> {
        let origin = resolve_position(&self.locator, self.locate_timeout).await;

        let mut reports = self
            .reports
            .nearby_reports(origin.coordinate, Some(self.radius_in_meters), report_type)
            .await?;
        reports.truncate(self.limit);

        tracing::info!(
            count = reports.len(),
            degraded = origin.is_degraded(),
            "nearby feed loaded."
        );
        Ok(NearbyFeed { origin, reports })
    }
}
