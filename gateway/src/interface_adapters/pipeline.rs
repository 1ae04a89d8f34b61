use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::domain::{ErrorBody, GatewayError, Navigator, Route, SessionStore};
use crate::interface_adapters::protocol::QueryPairs;

// Description of one backend call before it hits the wire.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    // Path segments relative to the base URL; each one is percent-encoded on its own.
    pub segments: Vec<String>,
    pub query: QueryPairs,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl OutboundRequest {
    pub fn new(method: Method, segments: &[&str]) -> Self {
        Self {
            method,
            segments: segments.iter().map(|segment| segment.to_string()).collect(),
            query: QueryPairs::new(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, query: QueryPairs) -> Self {
        self.query = query;
        self
    }

    pub fn with_json<T: Serialize>(mut self, body: &T) -> Result<Self, GatewayError> {
        self.body = Some(serde_json::to_value(body).map_err(GatewayError::Encode)?);
        Ok(self)
    }

    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

// Response as seen by the pipeline: status plus the fully buffered body.
#[derive(Debug, Clone)]
pub struct InboundResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl InboundResponse {
    // Split a response into its payload or the matching gateway error.
    pub fn into_result(self) -> Result<Vec<u8>, GatewayError> {
        if self.status.is_success() {
            return Ok(self.body);
        }

        let body = ErrorBody::from_bytes(&self.body);
        let status = self.status.as_u16();
        if self.status == StatusCode::UNAUTHORIZED {
            return Err(GatewayError::AuthRejected { status, body });
        }
        Err(GatewayError::Backend { status, body })
    }
}

// A transformation applied to every request before it is sent.
pub trait RequestStep: Send + Sync {
    fn name(&self) -> &'static str;
    fn apply(&self, request: &mut OutboundRequest) -> Result<(), GatewayError>;
}

// An observer run on every response. Steps may cause side effects but never
// alter the response or swallow it.
pub trait ResponseStep: Send + Sync {
    fn name(&self) -> &'static str;
    fn observe(&self, request: &OutboundRequest, response: &InboundResponse);
}

// Ordered interception chain wrapped around each gateway call.
#[derive(Clone, Default)]
pub struct Pipeline {
    request_steps: Vec<Arc<dyn RequestStep>>,
    response_steps: Vec<Arc<dyn ResponseStep>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    // Standard chain: bearer attachment out, session reset on 401 in, tracing last.
    pub fn session_aware(store: Arc<dyn SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self::new()
            .with_request_step(BearerAuth::new(store.clone()))
            .with_response_step(ResetSessionOnUnauthorized::new(store, navigator))
            .with_response_step(TraceResponse)
    }

    pub fn with_request_step(mut self, step: impl RequestStep + 'static) -> Self {
        self.request_steps.push(Arc::new(step));
        self
    }

    pub fn with_response_step(mut self, step: impl ResponseStep + 'static) -> Self {
        self.response_steps.push(Arc::new(step));
        self
    }

    pub fn request_step_names(&self) -> Vec<&'static str> {
        self.request_steps.iter().map(|step| step.name()).collect()
    }

    pub fn response_step_names(&self) -> Vec<&'static str> {
        self.response_steps.iter().map(|step| step.name()).collect()
    }

    // Run every request step in order; the first failure rejects the request.
    pub fn prepare(&self, mut request: OutboundRequest) -> Result<OutboundRequest, GatewayError> {
        for step in &self.request_steps {
            step.apply(&mut request).inspect_err(|error| {
                tracing::warn!(step = step.name(), %error, "request step rejected request");
            })?;
        }
        Ok(request)
    }

    pub fn observe(&self, request: &OutboundRequest, response: &InboundResponse) {
        for step in &self.response_steps {
            step.observe(request, response);
        }
    }
}

// Attaches `Authorization: Bearer <token>` whenever a session is stored.
pub struct BearerAuth {
    store: Arc<dyn SessionStore>,
}

impl BearerAuth {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }
}

impl RequestStep for BearerAuth {
    fn name(&self) -> &'static str {
        "bearer_auth"
    }

    fn apply(&self, request: &mut OutboundRequest) -> Result<(), GatewayError> {
        let Some(session) = self.store.load()? else {
            request.headers.remove(AUTHORIZATION);
            return Ok(());
        };

        let mut value = HeaderValue::from_str(&format!("Bearer {}", session.token))
            .map_err(|_| GatewayError::InvalidToken)?;
        value.set_sensitive(true);
        request.headers.insert(AUTHORIZATION, value);
        Ok(())
    }
}

// On 401: drop the stored session and send the UI to the login route.
pub struct ResetSessionOnUnauthorized {
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl ResetSessionOnUnauthorized {
    pub fn new(store: Arc<dyn SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { store, navigator }
    }
}

impl ResponseStep for ResetSessionOnUnauthorized {
    fn name(&self) -> &'static str {
        "reset_session_on_unauthorized"
    }

    fn observe(&self, request: &OutboundRequest, response: &InboundResponse) {
        if response.status != StatusCode::UNAUTHORIZED {
            return;
        }

        tracing::info!(path = %request.path(), "backend rejected credentials; clearing session.");
        // A failed clear must not block the redirect; the caller still gets the 401.
        if let Err(error) = self.store.clear() {
            tracing::error!(%error, "failed to clear session after 401.");
        }
        self.navigator.navigate(Route::Login);
    }
}

pub struct TraceResponse;

impl ResponseStep for TraceResponse {
    fn name(&self) -> &'static str {
        "trace_response"
    }

    fn observe(&self, request: &OutboundRequest, response: &InboundResponse) {
        if response.status.is_success() {
            tracing::debug!(
                method = %request.method,
                path = %request.path(),
                status = response.status.as_u16(),
                "backend call succeeded."
            );
        } else {
            tracing::warn!(
                method = %request.method,
                path = %request.path(),
                status = response.status.as_u16(),
                "backend call failed."
            );
        }
    }
}
