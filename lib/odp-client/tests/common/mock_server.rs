use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get, post};
use axum::{Form, Json, Router};
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use tracing::info;

pub const ACCESS_TOKEN: &str = "mock-access-token";

/// Behavior switches of the mock.
#[derive(Debug, Clone, Default)]
pub struct MockOptions {
    /// Answer every grant with `invalid_client`.
    pub reject_grant: bool,
    /// Delay before answering a grant.
    pub token_delay: Duration,
    /// Answer every grant with this status and an HTML page.
    pub grant_failure_status: Option<u16>,
    /// `expires_in` of granted tokens (default: 3600).
    pub expires_in: Option<u64>,
}

/// What the mock has seen so far.
#[derive(Debug, Default)]
pub struct MockState {
    options: MockOptions,
    token_requests: AtomicUsize,
    api_requests: AtomicUsize,
    last_grant_form: Mutex<Option<HashMap<String, String>>>,
    last_grant_authorization: Mutex<Option<String>>,
}

/// In-process mock of the OAuth2 server and of both ODP APIs.
///
/// - `POST /oauth2/token`: client-credentials grant
/// - `/public/...`, `/admin/...`: catalogue API, requires the mock bearer token
pub struct MockOdp {
    base_url: String,
    state: Arc<MockState>,
    handle: JoinHandle<()>,
}

impl MockOdp {
    pub async fn start(options: MockOptions) -> Self {
        let state = Arc::new(MockState {
            options,
            ..MockState::default()
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock server");
        let addr = listener.local_addr().expect("local address");
        let app = router(Arc::clone(&state));
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock server");
        });
        info!(%addr, "mock ODP started");

        Self {
            base_url: format!("http://{addr}"),
            state,
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub fn token_requests(&self) -> usize {
        self.state.token_requests.load(Ordering::SeqCst)
    }

    pub fn api_requests(&self) -> usize {
        self.state.api_requests.load(Ordering::SeqCst)
    }

    pub fn last_grant_form(&self) -> Option<HashMap<String, String>> {
        self.state
            .last_grant_form
            .lock()
            .expect("lock grant form")
            .clone()
    }

    pub fn last_grant_authorization(&self) -> Option<String> {
        self.state
            .last_grant_authorization
            .lock()
            .expect("lock grant authorization")
            .clone()
    }
}

impl Drop for MockOdp {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn router(state: Arc<MockState>) -> Router {
    let public = Router::new()
        .route("/echo", any(echo))
        .route("/status/{code}", get(json_status))
        .route("/status-text/{code}", get(text_status))
        .route("/slow", get(slow))
        .route("/empty", get(empty))
        .route("/html", get(html))
        .route("/project/", get(list_projects).post(echo))
        .route("/{institution}/metadata/", get(list_metadata).post(echo))
        .route("/{institution}/metadata/{record_id}", get(get_metadata))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            require_bearer,
        ));

    let admin = Router::new()
        .route("/institution/", get(list_institutions).post(echo))
        .route("/echo", any(echo))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            require_bearer,
        ));

    Router::new()
        .route("/oauth2/token", post(token))
        .nest("/public", public)
        .nest("/admin", admin)
        .with_state(state)
}

async fn token(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    state.token_requests.fetch_add(1, Ordering::SeqCst);
    if !state.options.token_delay.is_zero() {
        tokio::time::sleep(state.options.token_delay).await;
    }

    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string);
    *state
        .last_grant_authorization
        .lock()
        .expect("lock grant authorization") = authorization;
    *state.last_grant_form.lock().expect("lock grant form") = Some(form.clone());

    if let Some(code) = state.options.grant_failure_status {
        let page = format!("<html>status {code}</html>");
        return (status(code), [(header::CONTENT_TYPE, "text/html")], page).into_response();
    }

    if state.options.reject_grant {
        let body = json!({
            "error": "invalid_client",
            "error_description": "Client authentication failed",
        });
        return (StatusCode::UNAUTHORIZED, Json(body)).into_response();
    }

    let mut body = json!({
        "access_token": ACCESS_TOKEN,
        "token_type": "bearer",
        "expires_in": state.options.expires_in.unwrap_or(3600),
    });
    if let Some(scope) = form.get("scope") {
        body["scope"] = json!(scope);
    }
    Json(body).into_response()
}

async fn require_bearer(
    State(state): State<Arc<MockState>>,
    request: Request,
    next: Next,
) -> Response {
    state.api_requests.fetch_add(1, Ordering::SeqCst);

    let expected = format!("Bearer {ACCESS_TOKEN}");
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .is_some_and(|value| value.as_bytes() == expected.as_bytes());
    if !authorized {
        let body = json!({"detail": "missing or invalid bearer token"});
        return (StatusCode::UNAUTHORIZED, Json(body)).into_response();
    }

    next.run(request).await
}

async fn echo(
    method: axum::http::Method,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    body: String,
) -> Json<Value> {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string)
    };
    let body = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&body).unwrap_or(Value::String(body))
    };

    Json(json!({
        "method": method.as_str(),
        "accept": header_value(header::ACCEPT),
        "content_type": header_value(header::CONTENT_TYPE),
        "query": query,
        "body": body,
    }))
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).expect("valid status code")
}

async fn json_status(Path(code): Path<u16>) -> Response {
    let body = json!({"detail": format!("status {code}")});
    (status(code), Json(body)).into_response()
}

async fn text_status(Path(code): Path<u16>) -> Response {
    (status(code), format!("plain status {code}")).into_response()
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(json!({}))
}

async fn empty() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn html() -> Response {
    (
        [(header::CONTENT_TYPE, "text/html")],
        "<html><body>maintenance</body></html>",
    )
        .into_response()
}

async fn list_projects() -> Json<Value> {
    Json(json!([{"key": "sadco", "name": "SADCO", "description": null}]))
}

async fn list_institutions() -> Json<Value> {
    Json(json!([{"key": "saeon", "name": "SAEON", "parent_key": null}]))
}

async fn list_metadata(
    Path(_institution): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let number = |name: &str| {
        query
            .get(name)
            .and_then(|value| value.parse::<u64>().ok())
    };
    Json(json!({
        "id": "x1",
        "offset": number("offset"),
        "limit": number("limit"),
    }))
}

async fn get_metadata(Path((institution, record_id)): Path<(String, String)>) -> Response {
    if record_id == "missing" {
        let body = json!({"detail": "not found"});
        return (StatusCode::NOT_FOUND, Json(body)).into_response();
    }
    Json(json!({"id": record_id, "institution_key": institution})).into_response()
}
