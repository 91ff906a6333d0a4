use axum::Router;
use chrono::Datelike;
use reparagym_web::{build_state, create_router, init_tracing, WebConfig, WebError, WebResult};

#[tokio::main]
async fn main() -> WebResult<()> {
    let config = WebConfig::from_env()?;
    init_tracing(config.log_format)?;

    let site = config.site(chrono::Utc::now().year());
    let state = build_state(&config, site)?;
    let cache = state.cache.clone();
    let gc = cache.spawn_gc(config.gc_interval);

    let app: Router = create_router(state, &config);

    let addr = config.socket_addr();
    tracing::info!(
        %addr,
        store = %config.store.base_url,
        stale_time_ms = config.query.stale_time.as_millis() as u64,
        gc_time_ms = config.query.gc_time.as_millis() as u64,
        "Starting Reparagym storefront"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| WebError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| WebError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    gc.shutdown().await;
    cache.clear();
    Ok(())
}
