#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use tokenprint_api::auth::password::hash_password;
use tokenprint_api::auth::session::SESSION_COOKIE;
use tokenprint_api::config::ServerConfig;
use tokenprint_api::router::build_app_router;
use tokenprint_api::state::AppState;
use tokenprint_core::printing::{PrintCommand, PrintOutcome};
use tokenprint_db::models::admin_user::CreateAdminUser;
use tokenprint_db::repositories::AdminUserRepo;
use tokenprint_db::DbPool;

pub const ADMIN_USERNAME: &str = "kiosk-admin";
pub const ADMIN_PASSWORD: &str = "correct-horse-battery";

const BOUNDARY: &str = "tokenprint-test-boundary";

/// Print command double that records every path it is asked to print.
#[derive(Default)]
pub struct RecordingPrinter {
    fail: AtomicBool,
    delay_ms: AtomicU64,
    calls: Mutex<Vec<PathBuf>>,
}

impl RecordingPrinter {
    /// Make subsequent prints fail like a jammed printer.
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Make each print take `delay`, like a real spooler handing off a file.
    pub fn set_delay(&self, delay: Duration) {
        self.delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().expect("printer lock").clone()
    }
}

#[async_trait]
impl PrintCommand for RecordingPrinter {
    async fn print(&self, path: &Path) -> PrintOutcome {
        self.calls
            .lock()
            .expect("printer lock")
            .push(path.to_path_buf());
        let delay_ms = self.delay_ms.load(Ordering::SeqCst);
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            PrintOutcome::Failed {
                exit_code: Some(1),
                detail: "lp: printer is out of paper".into(),
            }
        } else {
            PrintOutcome::Printed
        }
    }
}

/// A fully wired application backed by a temporary database and a
/// temporary upload directory.
pub struct TestApp {
    pub router: Router,
    pub pool: DbPool,
    pub printer: Arc<RecordingPrinter>,
    pub config: ServerConfig,
    /// Held so the upload directory outlives the test.
    pub upload_dir: TempDir,
    /// Holds the database file for file-backed apps.
    pub data_dir: Option<TempDir>,
}

/// Build a test `ServerConfig` with payment required and no simulation.
pub fn test_config(upload_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        upload_dir: upload_dir.to_path_buf(),
        max_upload_bytes: 1024 * 1024,
        token_ttl_secs: 3600,
        payment_required: true,
        simulate_payment: false,
        print_command: "lp".to_string(),
        printer_name: None,
        session_ttl_hours: 12,
        cookie_secure: false,
        request_timeout_secs: 30,
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Build the app after letting the caller adjust the configuration.
pub async fn spawn_app_with(configure: impl FnOnce(&mut ServerConfig)) -> TestApp {
    let pool = tokenprint_db::create_memory_pool()
        .await
        .expect("memory pool");
    build_test_app(pool, None, configure).await
}

/// Build the app on a WAL database file with a multi-connection pool, so
/// concurrent requests really run against separate connections.
pub async fn spawn_file_backed_app() -> TestApp {
    let data_dir = tempfile::tempdir().expect("tempdir");
    let url = format!("sqlite://{}", data_dir.path().join("tokenprint.db").display());
    let pool = tokenprint_db::create_pool(&url).await.expect("file pool");
    build_test_app(pool, Some(data_dir), |config| config.database_url = url).await
}

async fn build_test_app(
    pool: DbPool,
    data_dir: Option<TempDir>,
    configure: impl FnOnce(&mut ServerConfig),
) -> TestApp {
    let upload_dir = tempfile::tempdir().expect("tempdir");
    let mut config = test_config(upload_dir.path());
    configure(&mut config);

    tokenprint_db::run_migrations(&pool)
        .await
        .expect("migrations");

    let printer = Arc::new(RecordingPrinter::default());
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        printer: printer.clone(),
    };

    TestApp {
        router: build_app_router(state),
        pool,
        printer,
        config,
        upload_dir,
        data_dir,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.expect("request failed")
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_with_cookie(app: &Router, uri: &str, cookie: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header(COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_empty(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_bytes(
    app: &Router,
    uri: &str,
    content_type: &str,
    body: Vec<u8>,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

/// POST an urlencoded form, optionally with a session cookie.
pub async fn post_form(
    app: &Router,
    uri: &str,
    form: &str,
    cookie: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    send(app, builder.body(Body::from(form.to_string())).unwrap()).await
}

/// Encode a multipart upload with a `file` part and an optional `paid` part.
pub fn multipart_body(
    filename: &str,
    content_type: &str,
    data: &[u8],
    paid: Option<&str>,
) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(b"\r\n");
    if let Some(paid) = paid {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"paid\"\r\n\r\n{paid}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// POST /api/v1/uploads with a single file.
pub async fn upload(
    app: &Router,
    filename: &str,
    content_type: &str,
    data: &[u8],
    paid: Option<&str>,
) -> Response<Body> {
    post_bytes(
        app,
        "/api/v1/uploads",
        &format!("multipart/form-data; boundary={BOUNDARY}"),
        multipart_body(filename, content_type, data, paid),
    )
    .await
}

/// Upload a small PDF and return `(token, qr_png)`.
pub async fn upload_pdf(app: &Router, filename: &str, paid: bool) -> (String, Vec<u8>) {
    let response = upload(
        app,
        filename,
        "application/pdf",
        b"%PDF-1.4 test document",
        paid.then_some("true"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let token = response
        .headers()
        .get("x-job-token")
        .expect("x-job-token header")
        .to_str()
        .unwrap()
        .to_string();
    (token, body_bytes(response).await)
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("body is JSON")
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).expect("body is UTF-8")
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(LOCATION)
        .expect("Location header")
        .to_str()
        .unwrap()
}

/// The `name=value` pair of the session cookie set by a response, if any.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .find(|pair| pair.starts_with(&format!("{SESSION_COOKIE}=")))
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Admin helpers
// ---------------------------------------------------------------------------

pub async fn create_admin(pool: &DbPool) {
    AdminUserRepo::create(
        pool,
        &CreateAdminUser {
            username: ADMIN_USERNAME.to_string(),
            password_hash: hash_password(ADMIN_PASSWORD).expect("hashing should succeed"),
        },
    )
    .await
    .expect("admin creation should succeed");
}

/// Create the admin, log in, and return the cookie to send back.
pub async fn login_admin(app: &TestApp) -> String {
    create_admin(&app.pool).await;
    let response = post_form(
        &app.router,
        "/admin/login",
        &format!("username={ADMIN_USERNAME}&password={ADMIN_PASSWORD}"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    session_cookie(&response).expect("login sets the session cookie")
}
