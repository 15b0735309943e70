//! Test server harness for E2E testing
//!
//! Provides `TestAccountServer` for spawning real account service instances
//! in tests.

use account_service::config::Config;
use account_service::observability::metrics::init_metrics_recorder;
use account_service::routes::{self, AppState};
use account_service::services::AuthClient;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sqlx::PgPool;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use tokio::task::JoinHandle;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Global metrics handle shared across all test servers in a process.
static TEST_METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn metrics_handle() -> PrometheusHandle {
    TEST_METRICS_HANDLE
        .get_or_init(|| {
            init_metrics_recorder()
                .unwrap_or_else(|_| PrometheusBuilder::new().build_recorder().handle())
        })
        .clone()
}

/// Bearer credential the mock authentication service maps to `username`.
pub fn bearer_for(username: &str) -> String {
    format!("Bearer test-token-{username}")
}

/// Test harness for spawning the account service in E2E tests.
///
/// # Example
/// ```rust,ignore
/// #[sqlx::test(migrations = "../../migrations")]
/// async fn test_admin_reads_any_account(pool: PgPool) -> Result<()> {
///     seed_account(&pool, 2, "admin", ADMIN_ROLE).await?;
///     let server = TestAccountServer::spawn(pool).await?;
///     server.identify("admin").await;
///
///     let response = reqwest::Client::new()
///         .get(format!("{}/accounts/2", server.url()))
///         .header("Authorization", bearer_for("admin"))
///         .send()
///         .await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestAccountServer {
    addr: SocketAddr,
    pool: PgPool,
    config: Config,
    auth_server: MockServer,
    _handle: JoinHandle<()>,
}

impl TestAccountServer {
    /// Spawn a new test server instance with isolated database.
    ///
    /// The server will:
    /// - Bind to a random available port (127.0.0.1:0)
    /// - Point its authentication client at a fresh wiremock server
    /// - Start the HTTP server in the background
    pub async fn spawn(pool: PgPool) -> Result<Self, anyhow::Error> {
        Self::spawn_with(pool, HashMap::new()).await
    }

    /// Spawn with extra configuration variables (e.g. `CORS_ALLOWED_ORIGIN`).
    pub async fn spawn_with(
        pool: PgPool,
        extra_vars: HashMap<String, String>,
    ) -> Result<Self, anyhow::Error> {
        let auth_server = MockServer::start().await;

        let mut vars = HashMap::from([
            (
                "DATABASE_URL".to_string(),
                "postgresql://test/test".to_string(),
            ),
            ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
            ("AUTH_SERVICE_URL".to_string(), auth_server.uri()),
            ("AUTH_REQUEST_TIMEOUT_SECONDS".to_string(), "2".to_string()),
        ]);
        vars.extend(extra_vars);

        let config = Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;

        let auth_client = AuthClient::new(
            config.auth_service_url.clone(),
            config.auth_request_timeout_seconds,
        )
        .map_err(|e| anyhow::anyhow!("Failed to create auth client: {}", e))?;

        let state = Arc::new(AppState {
            pool: pool.clone(),
            config: config.clone(),
            auth_client: Arc::new(auth_client),
        });

        // Build routes using account-service's real route builder
        let app = routes::build_routes(state, metrics_handle());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            pool,
            config,
            auth_server,
            _handle: handle,
        })
    }

    /// Make the mock authentication service answer [`bearer_for`]`(username)`
    /// with an account payload carrying `username`.
    pub async fn identify(&self, username: &str) {
        Mock::given(method("GET"))
            .and(path("/getSecurityAccount"))
            .and(header("Authorization", bearer_for(username).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "accountNumber": 0,
                "username": username,
                "email": format!("{username}@example.com"),
            })))
            .mount(&self.auth_server)
            .await;
    }

    /// Make the mock authentication service answer every request with
    /// `status` and an empty body.
    pub async fn auth_responds_with(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path("/getSecurityAccount"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.auth_server)
            .await;
    }

    /// Number of requests the mock authentication service has received.
    pub async fn auth_request_count(&self) -> usize {
        self.auth_server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }

    /// Get reference to the database pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get reference to the server configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Drop for TestAccountServer {
    fn drop(&mut self) {
        self._handle.abort();
    }
}
