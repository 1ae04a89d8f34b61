pub mod entities;
pub mod errors;
pub mod ports;
pub mod queries;

// Re-export the domain boundary types and ports.
pub use entities::{
    Coordinate, Credentials, ItemDetails, Location, MessageResponse, PersonDetails, Report,
    ReportDraft, ReportPage, ReportStatus, ReportType, Role, SessionPayload, SignupRequest,
    StoredSession, User,
};
pub use errors::{ErrorBody, GatewayError, LocationError, StorageError};
pub use queries::{ListReportsQuery, SortDirection};
pub use ports::{AuthService, LocationProvider, Navigator, ReportService, Route, SessionStore};
