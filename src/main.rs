use netchess::config::AppConfig;
use netchess::server;

#[tokio::main]
async fn main() {
    // Initialize tracing (structured logging).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "netchess=info".into()),
        )
        .init();

    let config = AppConfig::from_env();

    tracing::info!(
        "netchess v{} starting on {}",
        env!("CARGO_PKG_VERSION"),
        config.bind_addr()
    );

    server::run(config).await.expect("Server error");
}
