use std::sync::Arc;

use yt_carousel::{build_router, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yt_carousel=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env();
    let port = config.port;
    let state = Arc::new(AppState::new(config));
    let router = build_router(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port, "yt-carousel server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Release the browser before exiting
    state.renderer.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to install ctrl-c handler");
    }
    tracing::info!("shutting down");
}
