// Mock reports backend for integration tests: a small axum app on an ephemeral
// port that records every request it sees.
#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Path, Query, Request, State},
    http::{
        HeaderMap, HeaderName, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use lostfound_gateway::GatewayClient;
use lostfound_gateway::domain::{Navigator, Route, SessionStore};
use lostfound_gateway::frameworks::storage::MemorySessionStore;
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

pub const USERNAME: &str = "pilot";
pub const PASSWORD: &str = "hunter2";
pub const ISSUED_TOKEN: &str = "token-pilot";
pub const GARBLED_REPORT_ID: &str = "garbled";

// One request as the backend saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
}

impl RecordedRequest {
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        url::form_urlencoded::parse(self.query.as_deref().unwrap_or("").as_bytes())
            .into_owned()
            .collect()
    }
}

#[derive(Default)]
struct Inner {
    requests: Vec<RecordedRequest>,
    reports: HashMap<String, Value>,
    valid_tokens: HashSet<String>,
}

#[derive(Clone)]
pub struct MockBackend {
    pub base_url: String,
    inner: Arc<Mutex<Inner>>,
}

impl MockBackend {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.lock().expect("backend mutex poisoned").requests.clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests()
            .last()
            .cloned()
            .expect("backend should have received a request")
    }

    // Invalidate every issued token, as if the server-side sessions expired.
    pub fn revoke_all_tokens(&self) {
        self.inner
            .lock()
            .expect("backend mutex poisoned")
            .valid_tokens
            .clear();
    }

    pub fn accept_token(&self, token: &str) {
        self.inner
            .lock()
            .expect("backend mutex poisoned")
            .valid_tokens
            .insert(token.to_string());
    }

    fn is_authorized(&self, headers: &HeaderMap) -> bool {
        let Some(token) = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
        else {
            return false;
        };
        self.inner
            .lock()
            .expect("backend mutex poisoned")
            .valid_tokens
            .contains(token)
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().expect("routes mutex poisoned").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().expect("routes mutex poisoned").push(route);
    }
}

// Gateway wired to the mock backend with in-memory session state.
pub struct Harness {
    pub backend: MockBackend,
    pub gateway: GatewayClient,
    pub store: Arc<MemorySessionStore>,
    pub navigator: Arc<RecordingNavigator>,
}

pub async fn harness() -> Harness {
    let backend = spawn_backend().await;
    let store = Arc::new(MemorySessionStore::new());
    let navigator = Arc::new(RecordingNavigator::default());
    let gateway = GatewayClient::new(&backend.base_url, store.clone(), navigator.clone())
        .expect("gateway should build");
    Harness {
        backend,
        gateway,
        store,
        navigator,
    }
}

impl Harness {
    pub fn stored_token(&self) -> Option<String> {
        self.store
            .load()
            .expect("memory store load should not fail")
            .map(|session| session.token)
    }
}

// Raw server that answers every request with `status_line`, announces a
// 200-byte body, sends a few bytes of it and hangs up. Returns the base URL.
pub async fn spawn_truncating_server(status_line: &'static str) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(async move {
                let mut seen = Vec::new();
                let mut buf = [0u8; 1024];
                while !seen.windows(4).any(|window| window == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => seen.extend_from_slice(&buf[..n]),
                    }
                }
                let head = format!(
                    "HTTP/1.1 {status_line}\r\n\
                     content-type: application/json\r\n\
                     content-length: 200\r\n\r\n{{\"mess"
                );
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{addr}/api")
}

pub async fn spawn_backend() -> MockBackend {
    // Bind to an ephemeral port to avoid collisions with local services.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");

    let backend = MockBackend {
        base_url: format!("http://{addr}/api"),
        inner: Arc::new(Mutex::new(Inner::default())),
    };

    let api = Router::new()
        .route("/auth/signin", post(signin))
        .route("/auth/signup", post(signup))
        .route("/reports", post(create_report).get(list_reports))
        .route("/reports/my-reports", get(my_reports))
        .route("/reports/nearby", get(nearby_reports))
        .route("/reports/{id}", get(report_by_id))
        .route("/reports/{id}/status", put(update_status));
    let app = Router::new()
        .nest("/api", api)
        .layer(middleware::from_fn_with_state(backend.clone(), record))
        .with_state(backend.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock backend failed");
    });

    backend
}

async fn record(State(backend): State<MockBackend>, request: Request, next: Next) -> Response {
    let recorded = {
        let header = |name: HeaderName| {
            request
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };
        RecordedRequest {
            method: request.method().to_string(),
            path: request.uri().path().to_string(),
            query: request.uri().query().map(str::to_string),
            authorization: header(AUTHORIZATION),
            content_type: header(CONTENT_TYPE),
        }
    };
    backend
        .inner
        .lock()
        .expect("backend mutex poisoned")
        .requests
        .push(recorded);
    next.run(request).await
}

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

fn unauthorized() -> Response {
    message(
        StatusCode::UNAUTHORIZED,
        "Full authentication is required to access this resource",
    )
}

async fn signin(State(backend): State<MockBackend>, Json(body): Json<Value>) -> Response {
    if body["username"] != USERNAME || body["password"] != PASSWORD {
        return message(StatusCode::UNAUTHORIZED, "Bad credentials");
    }
    backend.accept_token(ISSUED_TOKEN);
    Json(json!({
        "token": ISSUED_TOKEN,
        "type": "Bearer",
        "id": "u-1",
        "username": USERNAME,
        "email": "pilot@example.com",
        "firstName": "Ada",
        "lastName": "Park",
        "roles": ["USER"]
    }))
    .into_response()
}

async fn signup(Json(body): Json<Value>) -> Response {
    if body["username"] == "taken" {
        return message(StatusCode::BAD_REQUEST, "Error: Username is already taken!");
    }
    message(StatusCode::OK, "User registered successfully!")
}

async fn create_report(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Json(mut draft): Json<Value>,
) -> Response {
    if !backend.is_authorized(&headers) {
        return unauthorized();
    }
    let id = uuid::Uuid::new_v4().to_string();
    draft["id"] = json!(id);
    draft["status"] = json!("ACTIVE");
    draft["createdAt"] = json!("2026-10-19T08:00:00");
    draft["updatedAt"] = json!("2026-10-19T08:00:00");
    draft["reporter"] = json!({ "id": "u-1", "username": USERNAME });
    draft["aiAnalysis"] = json!({ "confidenceScore": null });
    backend
        .inner
        .lock()
        .expect("backend mutex poisoned")
        .reports
        .insert(id, draft.clone());
    Json(draft).into_response()
}

async fn list_reports(
    State(backend): State<MockBackend>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let size: usize = params
        .get("size")
        .and_then(|value| value.parse().ok())
        .unwrap_or(10);
    let page: usize = params
        .get("page")
        .and_then(|value| value.parse().ok())
        .unwrap_or(0);
    let all: Vec<Value> = backend
        .inner
        .lock()
        .expect("backend mutex poisoned")
        .reports
        .values()
        .cloned()
        .collect();
    let total = all.len();
    let content: Vec<Value> = all.into_iter().skip(page * size).take(size).collect();
    Json(json!({
        "content": content,
        "totalElements": total,
        "totalPages": total.div_ceil(size.max(1)),
        "number": page,
        "size": size
    }))
    .into_response()
}

async fn report_by_id(State(backend): State<MockBackend>, Path(id): Path<String>) -> Response {
    if id == GARBLED_REPORT_ID {
        // A 200 whose body is not a report.
        return Json(json!({})).into_response();
    }
    let report = backend
        .inner
        .lock()
        .expect("backend mutex poisoned")
        .reports
        .get(&id)
        .cloned();
    match report {
        Some(report) => Json(report).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn my_reports(State(backend): State<MockBackend>, headers: HeaderMap) -> Response {
    if !backend.is_authorized(&headers) {
        return unauthorized();
    }
    let mine: Vec<Value> = backend
        .inner
        .lock()
        .expect("backend mutex poisoned")
        .reports
        .values()
        .cloned()
        .collect();
    Json(mine).into_response()
}

async fn nearby_reports(State(backend): State<MockBackend>) -> Response {
    let all: Vec<Value> = backend
        .inner
        .lock()
        .expect("backend mutex poisoned")
        .reports
        .values()
        .cloned()
        .collect();
    Json(all).into_response()
}

async fn update_status(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if !backend.is_authorized(&headers) {
        return unauthorized();
    }
    let Some(status) = params.get("status") else {
        return message(StatusCode::BAD_REQUEST, "status is required");
    };
    let mut inner = backend.inner.lock().expect("backend mutex poisoned");
    let Some(report) = inner.reports.get_mut(&id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    report["status"] = json!(status);
    message(StatusCode::OK, "Report status updated successfully")
}
