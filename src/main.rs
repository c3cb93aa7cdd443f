use letterdesk::{build_router, config, state};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "letterdesk=info,tower_http=info".into()),
        )
        .init();

    let config = Arc::new(config::Config::from_env()?);
    let state = Arc::new(state::AppState::new(config.clone())?);
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Letterdesk listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
