use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use url::Url;

use crate::domain::{
    AuthService, Coordinate, Credentials, GatewayError, ListReportsQuery, MessageResponse,
    Navigator, Report, ReportDraft, ReportPage, ReportService, ReportStatus, ReportType,
    SessionPayload, SessionStore, SignupRequest, StoredSession, User,
};
use crate::interface_adapters::pipeline::{InboundResponse, OutboundRequest, Pipeline};
use crate::interface_adapters::protocol::{list_reports_params, nearby_params, status_params};

// Thin wrapper around reqwest for the reports backend. Every call goes through
// the interception pipeline; the session store is only written by login, logout
// and the 401 response step.
#[derive(Clone)]
pub struct GatewayClient {
    http: Client,
    base_url: Url,
    session: Arc<dyn SessionStore>,
    pipeline: Pipeline,
}

impl GatewayClient {
    pub fn new(
        base_url: &str,
        session: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, GatewayError> {
        let pipeline = Pipeline::session_aware(session.clone(), navigator);
        Self::with_pipeline(base_url, session, pipeline)
    }

    // Build with a caller-assembled pipeline, e.g. to add extra steps.
    pub fn with_pipeline(
        base_url: &str,
        session: Arc<dyn SessionStore>,
        pipeline: Pipeline,
    ) -> Result<Self, GatewayError> {
        let base_url = Url::parse(base_url)
            .map_err(|err| GatewayError::InvalidBaseUrl(format!("{base_url}: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::InvalidBaseUrl(base_url.to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let http = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|err| GatewayError::Transport(Box::new(err)))?;

        Ok(Self {
            http,
            base_url,
            session,
            pipeline,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> Result<bool, GatewayError> {
        Ok(self.session.load()?.is_some())
    }

    fn endpoint(&self, request: &OutboundRequest) -> Result<Url, GatewayError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(&request.segments);
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        Ok(url)
    }

    // Run the request through the pipeline, send it, and hand back the raw body
    // of a successful response.
    async fn dispatch(&self, request: OutboundRequest) -> Result<Vec<u8>, GatewayError> {
        let request = self.pipeline.prepare(request)?;
        let url = self.endpoint(&request)?;

        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .headers(request.headers.clone());
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| GatewayError::Transport(Box::new(err)))?;
        let status = response.status();
        let (body, read_error) = match response.bytes().await {
            Ok(bytes) => (bytes.to_vec(), None),
            Err(err) => (Vec::new(), Some(err)),
        };

        // Response steps run as soon as the status is known, even if the body
        // could not be read.
        let inbound = InboundResponse { status, body };
        self.pipeline.observe(&request, &inbound);
        match read_error {
            Some(err) if status != StatusCode::UNAUTHORIZED => {
                Err(GatewayError::Transport(Box::new(err)))
            }
            _ => inbound.into_result(),
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: OutboundRequest,
    ) -> Result<T, GatewayError> {
        let body = self.dispatch(request).await?;
        serde_json::from_slice(&body).map_err(GatewayError::MalformedResponse)
    }
}

#[async_trait]
impl AuthService for GatewayClient {
    #[tracing::instrument(name = "login", skip_all, fields(username = %credentials.username))]
    async fn login(&self, credentials: Credentials) -> Result<SessionPayload, GatewayError> {
        let request =
            OutboundRequest::new(Method::POST, &["auth", "signin"]).with_json(&credentials)?;
        let payload: SessionPayload = self.execute(request).await?;

        // Replace whatever session was there; only one credential exists at a time.
        self.session.save(&StoredSession {
            token: payload.token.clone(),
            user: payload.profile(),
        })?;
        tracing::info!(user_id = %payload.id, "session stored.");

        Ok(payload)
    }

    #[tracing::instrument(name = "register", skip_all, fields(username = %signup.username))]
    async fn register(&self, signup: SignupRequest) -> Result<MessageResponse, GatewayError> {
        let request = OutboundRequest::new(Method::POST, &["auth", "signup"]).with_json(&signup)?;
        self.execute(request).await
    }

    fn logout(&self) -> Result<(), GatewayError> {
        self.session.clear()?;
        tracing::info!("session cleared on logout.");
        Ok(())
    }

    fn current_user(&self) -> Result<Option<User>, GatewayError> {
        Ok(self.session.load()?.map(|session| session.user))
    }
}

#[async_trait]
impl ReportService for GatewayClient {
    #[tracing::instrument(name = "create_report", skip_all, fields(report_type = %draft.report_type))]
    async fn create_report(&self, draft: ReportDraft) -> Result<Report, GatewayError> {
        let request = OutboundRequest::new(Method::POST, &["reports"]).with_json(&draft)?;
        self.execute(request).await
    }

    #[tracing::instrument(name = "list_reports", skip_all)]
    async fn list_reports(&self, query: ListReportsQuery) -> Result<ReportPage, GatewayError> {
        let request =
            OutboundRequest::new(Method::GET, &["reports"]).with_query(list_reports_params(&query));
        self.execute(request).await
    }

    #[tracing::instrument(name = "report_by_id", skip(self))]
    async fn report_by_id(&self, id: &str) -> Result<Report, GatewayError> {
        self.execute(OutboundRequest::new(Method::GET, &["reports", id]))
            .await
    }

    #[tracing::instrument(name = "my_reports", skip_all)]
    async fn my_reports(&self) -> Result<Vec<Report>, GatewayError> {
        self.execute(OutboundRequest::new(Method::GET, &["reports", "my-reports"]))
            .await
    }

    #[tracing::instrument(name = "nearby_reports", skip(self))]
    async fn nearby_reports(
        &self,
        origin: Coordinate,
        radius_in_meters: Option<f64>,
        report_type: Option<ReportType>,
    ) -> Result<Vec<Report>, GatewayError> {
        let request = OutboundRequest::new(Method::GET, &["reports", "nearby"])
            .with_query(nearby_params(origin, radius_in_meters, report_type));
        self.execute(request).await
    }

    #[tracing::instrument(name = "update_report_status", skip(self))]
    async fn update_report_status(
        &self,
        id: &str,
        status: ReportStatus,
    ) -> Result<MessageResponse, GatewayError> {
        let request = OutboundRequest::new(Method::PUT, &["reports", id, "status"])
            .with_query(status_params(status));
        self.execute(request).await
    }
}
