// Shared test helpers: an in-process HTTP server standing in for the
// destination a step would hit during a real build.
//
// Routes mirror the behaviors the step has to handle: plain success, a
// failure status, a redirect hop, header echo, and a POST body echo.

use std::time::Duration;

use axum::body::Bytes;
use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

async fn ok() -> &'static str {
    "OK"
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "404")
}

async fn echo_header(headers: HeaderMap) -> String {
    headers
        .get("X-Test")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn echo_body(body: Bytes) -> String {
    format!("OK:{}", String::from_utf8_lossy(&body))
}

/// Redirects to /hops/{n-1} until n reaches zero.
async fn hops(Path(n): Path<usize>) -> Response {
    if n > 0 {
        Redirect::temporary(&format!("/hops/{}", n - 1)).into_response()
    } else {
        "Final".into_response()
    }
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_secs(5)).await;
    "too late"
}

/// Starts the test server and returns its base URL (no trailing slash).
#[allow(dead_code)] // Used by other test files
pub async fn start_test_server() -> String {
    let app = Router::new()
        .route("/", get(ok))
        .route("/path", get(ok).post(echo_body))
        .route("/404", get(not_found))
        .route(
            "/redirect",
            get(|| async { Redirect::temporary("/redirected-path") }),
        )
        .route("/redirected-path", get(ok))
        .route("/header", get(echo_header))
        .route("/hops/{n}", get(hops))
        .route("/slow", get(slow));

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get address");

    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Server failed to start");
    });

    format!("http://{addr}")
}

/// Returns a URL pointing at a port nothing is listening on.
#[allow(dead_code)] // Used by other test files
pub async fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get address");
    drop(listener);
    format!("http://{addr}")
}
