use async_trait::async_trait;

use crate::domain::entities::{
    Coordinate, Credentials, MessageResponse, Report, ReportDraft, ReportPage, ReportStatus,
    ReportType, SessionPayload, SignupRequest, StoredSession, User,
};
use crate::domain::errors::{GatewayError, LocationError, StorageError};
use crate::domain::queries::ListReportsQuery;

// Port for the client-local session record (token + cached profile).
// Implementations must write and clear both halves as a unit.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<StoredSession>, StorageError>;
    fn save(&self, session: &StoredSession) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

// Destinations the gateway can ask the UI layer to switch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
        }
    }
}

// Port for the UI layer's navigation. Fire-and-forget; the gateway never waits on it.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

// Port for the platform location capability.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_position(&self) -> Result<Coordinate, LocationError>;
}

#[async_trait]
impl<T> LocationProvider for Box<T>
where
    T: LocationProvider + ?Sized,
{
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        (**self).current_position().await
    }
}

// Callers depend on these traits, not on the reqwest client.
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, credentials: Credentials) -> Result<SessionPayload, GatewayError>;
    async fn register(&self, signup: SignupRequest) -> Result<MessageResponse, GatewayError>;
    fn logout(&self) -> Result<(), GatewayError>;
    fn current_user(&self) -> Result<Option<User>, GatewayError>;
}

#[async_trait]
pub trait ReportService: Send + Sync {
    async fn create_report(&self, draft: ReportDraft) -> Result<Report, GatewayError>;
    async fn list_reports(&self, query: ListReportsQuery) -> Result<ReportPage, GatewayError>;
    async fn report_by_id(&self, id: &str) -> Result<Report, GatewayError>;
    async fn my_reports(&self) -> Result<Vec<Report>, GatewayError>;
    async fn nearby_reports(
        &self,
        origin: Coordinate,
        radius_in_meters: Option<f64>,
        report_type: Option<ReportType>,
    ) -> Result<Vec<Report>, GatewayError>;
    async fn update_report_status(
        &self,
        id: &str,
        status: ReportStatus,
    ) -> Result<MessageResponse, GatewayError>;
}
