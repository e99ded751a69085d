//! Market metrics record shared by the analyze endpoint and the dashboard view.

use serde::{Deserialize, Serialize};

/// Advisory note attached to every stubbed analyze response.
pub const MOCK_DATA_MESSAGE: &str =
    "This is a mock response. Integrate with your backend for real data.";

/// A metric scalar as it arrives on the wire: a plain number, or
/// numeric-looking text such as `"12,345"` or `"$0.03"`.
///
/// Anything that is neither a JSON number nor a JSON string is rejected at
/// the boundary. Display robustness for the text variant lives in
/// [`crate::normalize`], not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
}

impl Default for MetricValue {
    fn default() -> Self {
        MetricValue::Number(0.0)
    }
}

impl MetricValue {
    /// Raw label text for the value as the upstream sent it.
    pub fn display_text(&self) -> String {
        match self {
            MetricValue::Number(n) => n.to_string(),
            MetricValue::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Number(value)
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        MetricValue::Text(value.to_string())
    }
}

/// One market's metrics for a single request/response cycle.
///
/// Magnitude fields are not guaranteed finite or non-negative by the
/// producer; the view normalizes them defensively before rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketMetrics {
    #[serde(default)]
    pub liquidity: MetricValue,
    #[serde(default)]
    pub volume: MetricValue,
    #[serde(default)]
    pub implied_probability: f64,
    #[serde(default)]
    pub spread: MetricValue,
    #[serde(default)]
    pub time_to_resolution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historical_prices: Option<Vec<f64>>,
}

/// The fixed record returned by the stub source for every URL.
pub fn mock_market_metrics() -> MarketMetrics {
    MarketMetrics {
        liquidity: MetricValue::Number(12345.0),
        volume: MetricValue::Number(67890.0),
        implied_probability: 0.42,
        spread: MetricValue::Number(0.03),
        time_to_resolution: "3 days".to_string(),
        historical_prices: Some(vec![0.4, 0.41, 0.42, 0.43]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_record_matches_stub_contract() {
        let metrics = mock_market_metrics();

        assert_eq!(metrics.liquidity, MetricValue::Number(12345.0));
        assert_eq!(metrics.volume, MetricValue::Number(67890.0));
        assert_eq!(metrics.implied_probability, 0.42);
        assert_eq!(metrics.spread, MetricValue::Number(0.03));
        assert_eq!(metrics.time_to_resolution, "3 days");
        assert_eq!(
            metrics.historical_prices,
            Some(vec![0.4, 0.41, 0.42, 0.43])
        );
    }

    #[test]
    fn metric_value_accepts_numbers_and_text_only() {
        let number: MetricValue = serde_json::from_str("12345").unwrap();
        assert_eq!(number, MetricValue::Number(12345.0));

        let text: MetricValue = serde_json::from_str("\"$12,345\"").unwrap();
        assert_eq!(text, MetricValue::Text("$12,345".to_string()));

        assert!(serde_json::from_str::<MetricValue>("true").is_err());
        assert!(serde_json::from_str::<MetricValue>("[1]").is_err());
    }

    #[test]
    fn wire_names_are_camel_case() {
        let json = serde_json::to_value(mock_market_metrics()).unwrap();

        assert!(json.get("impliedProbability").is_some());
        assert!(json.get("timeToResolution").is_some());
        assert!(json.get("historicalPrices").is_some());
        assert!(json.get("implied_probability").is_none());
    }

    #[test]
    fn missing_fields_default_instead_of_failing() {
        let metrics: MarketMetrics = serde_json::from_str("{}").unwrap();

        assert_eq!(metrics.liquidity, MetricValue::Number(0.0));
        assert_eq!(metrics.volume, MetricValue::Number(0.0));
        assert_eq!(metrics.implied_probability, 0.0);
        assert_eq!(metrics.time_to_resolution, "");
        assert_eq!(metrics.historical_prices, None);
    }

    #[test]
    fn heterogeneous_payload_deserializes() {
        let metrics: MarketMetrics = serde_json::from_str(
            r#"{
                "liquidity": "1,200,000",
                "volume": 67890,
                "impliedProbability": 0.42,
                "spread": "$0.03",
                "timeToResolution": "3 days",
                "historicalPrices": []
            }"#,
        )
        .unwrap();

        assert_eq!(metrics.liquidity, MetricValue::Text("1,200,000".to_string()));
        assert_eq!(metrics.volume, MetricValue::Number(67890.0));
        assert_eq!(metrics.historical_prices, Some(vec![]));
    }

    #[test]
    fn display_text_keeps_upstream_formatting() {
        assert_eq!(MetricValue::Number(12345.0).display_text(), "12345");
        assert_eq!(MetricValue::Number(0.03).display_text(), "0.03");
        assert_eq!(MetricValue::from("$12,345").display_text(), "$12,345");
    }
}
