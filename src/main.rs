use boardroom_chess::api::router::create_router;
use boardroom_chess::api::state::AppState;
use boardroom_chess::config::AppConfig;

#[tokio::main]
async fn main() {
    // `--health-check`: query a running instance and exit with its verdict.
    if std::env::args().any(|a| a == "--health-check") {
        match health_check().await {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("boardroom-chess is not healthy: {e}");
                std::process::exit(1);
            }
        }
    }

    // RUST_LOG overrides the default filter.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "boardroom_chess=info,tower_http=info".into()),
        )
        .init();

    let config = AppConfig::from_env();
    let bind_addr = config.bind_addr();
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %bind_addr,
        max_games = config.max_games,
        "boardroom-chess starting"
    );

    let app = create_router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app).await.expect("Server error");
}

/// Ask the local instance for `/health` over a bare TCP connection.
///
/// Uses the same `PORT` as the server, so the check needs no HTTP client.
async fn health_check() -> Result<(), Box<dyn std::error::Error>> {
    let port = AppConfig::from_env().port;
    let mut stream = tokio::net::TcpStream::connect(format!("127.0.0.1:{port}")).await?;
    let request =
        format!("GET /health HTTP/1.1\r\nHost: 127.0.0.1:{port}\r\nConnection: close\r\n\r\n");
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    stream.write_all(request.as_bytes()).await?;
    let mut buf = vec![0u8; 1024];
    let n = stream.read(&mut buf).await?;
    let response = String::from_utf8_lossy(&buf[..n]);
    if response.starts_with("HTTP/1.1 200") {
        Ok(())
    } else {
        Err(format!(
            "Unexpected response: {}",
            response.lines().next().unwrap_or("")
        )
        .into())
    }
}
