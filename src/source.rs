//! Market data source seam between the analyze service and whatever
//! eventually computes real metrics.

use thiserror::Error;

use crate::metrics::{mock_market_metrics, MarketMetrics};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("market data retrieval failed: {0}")]
    Retrieval(String),
}

/// Resolves a market URL into a metrics record.
///
/// The rest of the stack depends only on this trait. The shipped
/// implementation is a stub, so the endpoint and the view can be exercised
/// end to end before any real retrieval or metric computation exists; a
/// real implementation would resolve the URL to a market and return the
/// same record shape, mapping its failures into [`SourceError`] instead of
/// falling back to mock data.
pub trait MarketDataSource: Send + Sync + 'static {
    fn fetch_metrics(&self, market_url: &str) -> Result<MarketMetrics, SourceError>;
}

/// Stub source: ignores the URL content and returns the fixed mock record.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockMarketDataSource;

impl MarketDataSource for MockMarketDataSource {
    fn fetch_metrics(&self, _market_url: &str) -> Result<MarketMetrics, SourceError> {
        Ok(mock_market_metrics())
    }
}
