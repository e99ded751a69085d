//! Polymarket dashboard core crate.
//!
//! Implemented scope:
//! - market metrics schema and the mock data record
//! - magnitude normalization and bar geometry for the visualizations
//! - analyze service with its JSON endpoint
//! - server-rendered dashboard page and form flow

mod analyze;
mod dashboard;
mod metrics;
mod normalize;
mod observability;
mod source;

pub use analyze::{analyze_router, run_analysis, AnalyzeError, AnalyzeResponse};
pub use dashboard::{
    build_dashboard_model, dashboard_router, render_dashboard_html, DashboardModel, ViewPhase,
    ViewState,
};
pub use metrics::{mock_market_metrics, MarketMetrics, MetricValue, MOCK_DATA_MESSAGE};
pub use normalize::{
    bar_width_pct, format_pct, history_bar_height_pct, normalize_magnitude, probability_width_pct,
    strength_scale_max, MAX_PCT, MIN_BAR_WIDTH_PCT, MIN_HISTORY_BAR_PCT,
};
pub use observability::{
    init_logging, log_app_bind, log_app_start, log_source_selected, logging_config_from_env,
    LogFormat, LoggingConfig, LoggingInitError,
};
pub use source::{MarketDataSource, MockMarketDataSource, SourceError};
