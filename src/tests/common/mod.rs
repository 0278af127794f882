// tests/common/mod.rs
pub use axum::Router;
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Json;
use reqwest::Client;
use serde_json::Value;

use crate::config::settings::{ServerConfig, TimeoutsConfig, TokenConfig};
use crate::config::types::ServiceConfig;
use crate::config::upstream::{Credentials, PaymentMeansConfig, UpstreamConfig};
use crate::server::server::{router, AppState};
use crate::utils::constants::DEFAULT_API_PREFIX;

pub const OPERATIONS_PATH: &str = "/api/rest/onlinesales/v1/cgaOnlineSales";

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

/// Address nobody listens on.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind failed");
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn upstream_config(base_url: &str) -> UpstreamConfig {
    UpstreamConfig {
        base_url: base_url.trim_end_matches('/').to_string(),
        auth_path: "/auth/login".to_string(),
        api_prefix: DEFAULT_API_PREFIX.to_string(),
        credentials: Credentials {
            username: "agent".to_string(),
            password: "secret".to_string(),
        },
    }
}

pub fn gateway_config(upstream_base: &str, payment_means_base: Option<String>) -> ServiceConfig {
    ServiceConfig {
        server: ServerConfig::default(),
        logging: None,
        api_key: None,
        upstream: upstream_config(upstream_base),
        token: TokenConfig::default(),
        timeouts: TimeoutsConfig {
            connect_seconds: 2.0,
            read_seconds: 5.0,
            write_seconds: 5.0,
            pool_seconds: 2.0,
        },
        payment_means: PaymentMeansConfig {
            base_url: payment_means_base,
            ..Default::default()
        },
    }
}

/// Serve the full gateway router in front of the given config.
pub async fn spawn_gateway(config: &ServiceConfig) -> (JoinHandle<()>, String, AppState) {
    let state = AppState::from_config(config).expect("app state");
    let (handle, addr) = spawn_axum(router(state.clone())).await;
    (handle, format!("http://{}", addr), state)
}

pub fn json_reply(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

/// One request seen by the mock upstream, login calls excluded.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

impl Recorded {
    /// Operation name for calls under the subscription API prefix.
    pub fn operation(&self) -> Option<&str> {
        self.path.strip_prefix(OPERATIONS_PATH)?.strip_prefix('/')
    }
}

type Responder = dyn Fn(&Recorded) -> Response + Send + Sync;

/// Stateful upstream: `/auth/login` issues `token-1`, `token-2`, ... and
/// every other path is recorded and answered by `responder`.
#[derive(Clone)]
pub struct MockUpstream {
    logins: Arc<AtomicUsize>,
    login_status: StatusCode,
    login_delay: Duration,
    requests: Arc<Mutex<Vec<Recorded>>>,
    responder: Arc<Responder>,
}

impl MockUpstream {
    pub fn new(responder: impl Fn(&Recorded) -> Response + Send + Sync + 'static) -> Self {
        Self {
            logins: Arc::new(AtomicUsize::new(0)),
            login_status: StatusCode::OK,
            login_delay: Duration::ZERO,
            requests: Arc::new(Mutex::new(Vec::new())),
            responder: Arc::new(responder),
        }
    }

    /// Answers every call with `200 {"ok": true}`.
    pub fn ok() -> Self {
        Self::new(|_| json_reply(StatusCode::OK, json!({"ok": true})))
    }

    pub fn with_login_delay(mut self, delay: Duration) -> Self {
        self.login_delay = delay;
        self
    }

    pub fn with_login_status(mut self, status: StatusCode) -> Self {
        self.login_status = status;
        self
    }

    pub async fn spawn(&self) -> (JoinHandle<()>, String) {
        let app = Router::new()
            .route("/auth/login", post(mock_login))
            .fallback(mock_record)
            .with_state(self.clone());
        let (handle, addr) = spawn_axum(app).await;
        (handle, format!("http://{}", addr))
    }

    pub fn logins(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_for(&self, operation: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.operation() == Some(operation))
            .collect()
    }
}

async fn mock_login(State(mock): State<MockUpstream>, Json(body): Json<Value>) -> Response {
    assert_eq!(body["userName"], "agent");
    assert_eq!(body["password"], "secret");

    let n = mock.logins.fetch_add(1, Ordering::SeqCst) + 1;
    if !mock.login_delay.is_zero() {
        tokio::time::sleep(mock.login_delay).await;
    }
    if mock.login_status != StatusCode::OK {
        return json_reply(mock.login_status, json!({"error": "denied"}));
    }
    json_reply(StatusCode::OK, json!({"token": format!("token-{}", n)}))
}

async fn mock_record(
    State(mock): State<MockUpstream>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let recorded = Recorded {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_owned),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
        body: serde_json::from_slice(&body).ok(),
    };
    mock.requests.lock().unwrap().push(recorded.clone());
    (mock.responder)(&recorded)
}
