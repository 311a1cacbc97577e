use tokio::net::TcpListener;

/// Serves the httpbin-style endpoints locally so the `Localhost` template
/// has something to talk to.
#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    println!("mock server on http://{addr} (/anything, /status/{{code}}, /delay/{{secs}}, /json, /html)");
    mock_server::run(listener).await
}
