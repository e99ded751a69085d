use std::{net::SocketAddr, sync::Arc};

use pmdash::{
    dashboard_router, init_logging, log_app_bind, log_app_start, log_source_selected,
    logging_config_from_env, MarketDataSource, MockMarketDataSource,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logging_cfg = logging_config_from_env();
    init_logging(&logging_cfg)?;
    log_app_start(&logging_cfg);

    let addr: SocketAddr = std::env::var("PMDASH_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
        .parse()?;

    let source: Arc<dyn MarketDataSource> = Arc::new(MockMarketDataSource);
    log_source_selected("mock", Some("stub_backend"));

    let app = dashboard_router(source);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    log_app_bind(bound_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
