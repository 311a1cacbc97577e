use std::{collections::BTreeMap, net::SocketAddr, time::Duration};

use axum::{
    extract::{Path, RawQuery},
    http::{header, HeaderMap, Method, StatusCode},
    response::IntoResponse,
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// What `/anything` and `/delay/{secs}` send back.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    /// Raw query string as received, still percent-encoded.
    #[serde(default)]
    pub query: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub json: Option<serde_json::Value>,
}

pub fn app() -> Router {
    Router::new()
        .route("/anything", any(anything))
        .route("/anything/{*rest}", any(anything))
        .route("/status/{code}", any(status))
        .route("/delay/{secs}", any(delay))
        .route("/json", get(json))
        .route("/html", get(html))
        .route("/bytes/{n}", get(bytes))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Start the server on a random local port in a background thread and return
/// its address.
pub fn spawn() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind mock server");
    let addr = std_listener.local_addr().expect("mock server address");
    std_listener
        .set_nonblocking(true)
        .expect("non-blocking listener");

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("mock server runtime");
        rt.block_on(async {
            let listener = TcpListener::from_std(std_listener)?;
            run(listener).await
        })
    });
    addr
}

async fn anything(
    method: Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: String,
) -> Json<Echo> {
    Json(Echo {
        query,
        ..echo(method, headers, body)
    })
}

async fn status(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST)
}

async fn delay(
    Path(secs): Path<u64>,
    method: Method,
    headers: HeaderMap,
    body: String,
) -> Json<Echo> {
    tokio::time::sleep(Duration::from_secs(secs.min(10))).await;
    Json(echo(method, headers, body))
}

async fn json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        r#"{"slideshow":{"author":"Zoë","title":"Sample Slide Show","slides":[{"title":"Wake up"},{"title":"Overview"}]}}"#,
    )
}

async fn html() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        "<html><body><h1>{\"not\": \"json\"}</h1></body></html>",
    )
}

/// `n` bytes of plain text, capped at 64 MiB.
async fn bytes(Path(n): Path<usize>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain")],
        "a".repeat(n.min(64 * 1024 * 1024)),
    )
}

fn echo(method: Method, headers: HeaderMap, body: String) -> Echo {
    let headers = headers
        .iter()
        .map(|(k, v)| {
            (
                k.as_str().to_string(),
                String::from_utf8_lossy(v.as_bytes()).into_owned(),
            )
        })
        .collect();
    let json = serde_json::from_str(&body).ok();
    Echo {
        method: method.to_string(),
        query: None,
        headers,
        body,
        json,
    }
}
