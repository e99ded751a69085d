//! Dashboard view: request state machine, display model, and HTML routes.

use std::sync::{Arc, RwLock};

use axum::{
    extract::{Form, State},
    response::{Html, IntoResponse},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::analyze::{analyze_router, run_analysis};
use crate::metrics::MarketMetrics;
use crate::normalize::{
    bar_width_pct, format_pct, history_bar_height_pct, normalize_magnitude,
    probability_width_pct, strength_scale_max,
};
use crate::source::MarketDataSource;

/// Width applied to the strength and probability bars before any analysis
/// has run, so the idle layout still reads as a chart.
const IDLE_BAR_WIDTH: &str = "22%";

/// Flat placeholder bars shown while no price history exists.
const PLACEHOLDER_HISTORY_BARS: usize = 7;
const PLACEHOLDER_HISTORY_HEIGHT: &str = "18%";

/// Shown when a failure carries no message of its own.
const FALLBACK_ERROR_MESSAGE: &str = "Failed to analyze market";

const METRIC_DOCS: [(&str, &str); 10] = [
    ("Liquidity", "Indicates how easily you can enter/exit positions."),
    ("Volume", "Shows recent trading activity and market interest."),
    (
        "Implied Probability",
        "The market's consensus on the event outcome.",
    ),
    (
        "Spread",
        "The difference between buy and sell prices, reflecting market efficiency.",
    ),
    ("Time to Resolution", "How soon the market will resolve."),
    ("Historical Price Trends", "Past price movements for context."),
    (
        "Trade Signals",
        "Automated or manual indicators suggesting buy/sell/hold actions.",
    ),
    (
        "Kelly Fraction",
        "Optimal bet size based on edge and odds, for maximizing long-term growth.",
    ),
    (
        "Volatility",
        "Measures price fluctuations and risk in the market.",
    ),
    (
        "Degen Risk",
        "Subjective risk score for highly speculative or volatile markets.",
    ),
];

/// Discrete request lifecycle for the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewPhase {
    Idle,
    Loading,
    Success(MarketMetrics),
    Failed(String),
}

/// The view's entire state: the submitted URL plus the current phase.
/// There is exactly one of these per server; each transition replaces the
/// previous phase wholesale instead of merging into it.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub url: String,
    pub phase: ViewPhase,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            url: String::new(),
            phase: ViewPhase::Idle,
        }
    }

    /// Starts a request: clears any previous error and metrics and raises
    /// the loading flag. Returns false (and changes nothing) while another
    /// request is in flight.
    pub fn begin(&mut self, url: impl Into<String>) -> bool {
        if matches!(self.phase, ViewPhase::Loading) {
            return false;
        }
        self.url = url.into();
        self.phase = ViewPhase::Loading;
        true
    }

    /// Lands a finished request. The metrics slot is fully replaced on
    /// success; on failure it stays unset and the message is kept for
    /// display, substituting a fallback when the message is empty.
    pub fn complete(&mut self, outcome: Result<MarketMetrics, String>) {
        self.phase = match outcome {
            Ok(metrics) => ViewPhase::Success(metrics),
            Err(message) if message.is_empty() => {
                ViewPhase::Failed(FALLBACK_ERROR_MESSAGE.to_string())
            }
            Err(message) => ViewPhase::Failed(message),
        };
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, ViewPhase::Loading)
    }

    pub fn metrics(&self) -> Option<&MarketMetrics> {
        match &self.phase {
            ViewPhase::Success(metrics) => Some(metrics),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            ViewPhase::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Display-ready values derived from the view state: everything the page
/// needs, already normalized, clamped, and formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardModel {
    pub url: String,
    pub analyzing: bool,
    pub error: Option<String>,
    pub has_metrics: bool,
    pub liquidity_label: String,
    pub liquidity_width: String,
    pub volume_label: String,
    pub volume_width: String,
    pub probability_label: String,
    pub probability_width: String,
    pub spread_label: String,
    pub time_to_resolution_label: String,
    pub trade_signal_label: String,
    pub risk_label: String,
    pub history_bar_heights: Vec<String>,
}

pub fn build_dashboard_model(state: &ViewState) -> DashboardModel {
    let metrics = state.metrics();

    let (liquidity_width, volume_width) = match metrics {
        Some(m) => {
            let liquidity = normalize_magnitude(&m.liquidity);
            let volume = normalize_magnitude(&m.volume);
            let scale = strength_scale_max(&[liquidity, volume]);
            (
                css_pct(bar_width_pct(liquidity, scale)),
                css_pct(bar_width_pct(volume, scale)),
            )
        }
        None => (IDLE_BAR_WIDTH.to_string(), IDLE_BAR_WIDTH.to_string()),
    };

    let probability_width = match metrics {
        Some(m) => css_pct(probability_width_pct(m.implied_probability)),
        None => IDLE_BAR_WIDTH.to_string(),
    };

    let history_bar_heights = match metrics.and_then(|m| m.historical_prices.as_deref()) {
        Some(points) if !points.is_empty() => points
            .iter()
            .map(|point| css_pct(history_bar_height_pct(*point)))
            .collect(),
        _ => vec![PLACEHOLDER_HISTORY_HEIGHT.to_string(); PLACEHOLDER_HISTORY_BARS],
    };

    DashboardModel {
        url: state.url.clone(),
        analyzing: state.is_loading(),
        error: state.error().map(str::to_string),
        has_metrics: metrics.is_some(),
        liquidity_label: label_or_dashes(metrics.map(|m| m.liquidity.display_text())),
        liquidity_width,
        volume_label: label_or_dashes(metrics.map(|m| m.volume.display_text())),
        volume_width,
        probability_label: label_or_dashes(
            metrics.map(|m| format!("{:.2}%", m.implied_probability * 100.0)),
        ),
        probability_width,
        spread_label: label_or_dashes(metrics.map(|m| m.spread.display_text())),
        time_to_resolution_label: label_or_dashes(
            metrics.map(|m| m.time_to_resolution.clone()),
        ),
        trade_signal_label: if metrics.is_some() { "Active" } else { "Pending" }.to_string(),
        risk_label: if metrics.is_some() { "Medium" } else { "--" }.to_string(),
        history_bar_heights,
    }
}

pub fn render_dashboard_html(model: &DashboardModel) -> String {
    let generated_at = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();

    let mut out = String::new();
    out.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    out.push_str("<title>Polymarket Dashboard</title>\n");
    out.push_str("<style>:root{--bg:#f4f4f5;--card:#ffffff;--ink:#18181b;--muted:#71717a;--line:#e4e4e7;--well:#fafafa;--track:#e4e4e7;--fill:#18181b;--err:#ef4444}*{box-sizing:border-box}body{margin:0;color:var(--ink);font-family:\"Segoe UI\",\"Helvetica Neue\",Arial,sans-serif;background:linear-gradient(180deg,var(--bg),#ffffff);min-height:100vh}.shell{max-width:1100px;margin:0 auto;padding:28px 16px 36px;display:flex;flex-direction:column;gap:18px}.card{background:var(--card);border:1px solid var(--line);border-radius:14px;padding:18px 20px;box-shadow:0 8px 22px rgba(24,24,27,.06)}.hero h1{margin:0;font-size:1.9rem}.hero p{margin:8px 0 0;color:var(--muted)}.hero-meta{margin-top:10px;font-size:.8rem;color:var(--muted)}.form-card label{display:block;font-size:.85rem;font-weight:600;margin-bottom:6px}.analyze-form{display:flex;gap:8px;flex-wrap:wrap}.analyze-form input{flex:1;min-width:240px;border:1px solid var(--line);border-radius:9px;padding:10px 12px;font-size:.95rem}.analyze-form button{border:none;border-radius:9px;background:var(--fill);color:#fff;font-weight:600;padding:10px 18px;cursor:pointer}.analyze-form button:disabled,.analyze-form input:disabled{opacity:.6;cursor:not-allowed}.error-line{margin-top:10px;color:var(--err);font-size:.85rem}h2{margin:0 0 12px;font-size:1.15rem}.viz-grid{display:grid;grid-template-columns:repeat(auto-fit,minmax(320px,1fr));gap:14px}.panel{border:1px solid var(--line);border-radius:12px;padding:14px;background:var(--well)}.panel-title{font-size:.72rem;text-transform:uppercase;letter-spacing:.05em;color:var(--muted);margin-bottom:10px}.history-chart{display:flex;align-items:flex-end;gap:4px;height:160px;border:1px solid var(--line);border-radius:9px;padding:10px;background:var(--card)}.history-bar{flex:1;border-radius:4px 4px 0 0;background:#a1a1aa}.strength-row{margin-bottom:12px}.strength-head{display:flex;justify-content:space-between;font-size:.8rem;color:var(--muted);margin-bottom:5px}.track{height:8px;border-radius:999px;background:var(--track)}.fill{height:8px;border-radius:999px;background:var(--fill)}.tiles{display:grid;grid-template-columns:repeat(auto-fit,minmax(140px,1fr));gap:10px;background:var(--card)}.tile{border:1px solid var(--line);border-radius:9px;padding:12px;text-align:center;background:var(--well)}.tile-label{font-size:.68rem;text-transform:uppercase;letter-spacing:.05em;color:var(--muted)}.tile-value{margin-top:5px;font-size:1.05rem;font-weight:600}.docs ul{margin:0;padding-left:20px;font-size:.88rem;color:#3f3f46}.docs li{margin-bottom:4px}.disclaimer{font-size:.75rem;color:var(--muted)}</style>\n");
    out.push_str("</head><body><main class=\"shell\">\n");

    out.push_str("<section class=\"card hero\"><h1>Polymarket Dashboard</h1>");
    out.push_str(
        "<p>Analyze Polymarket markets and visualize key metrics to help inform your decisions.</p>",
    );
    out.push_str(&format!(
        "<div class=\"hero-meta\">Generated: {}</div>",
        escape_html(&generated_at)
    ));
    out.push_str("</section>\n");

    out.push_str("<section class=\"card form-card\">");
    out.push_str("<label for=\"market-url\">Polymarket URL</label>");
    out.push_str("<form class=\"analyze-form\" method=\"post\" action=\"/analyze\">");
    out.push_str(&format!(
        "<input id=\"market-url\" name=\"url\" type=\"url\" placeholder=\"https://polymarket.com/market/...\" value=\"{}\"{}>",
        escape_html(&model.url),
        disabled_attr(model.analyzing)
    ));
    out.push_str(&format!(
        "<button type=\"submit\"{}>{}</button>",
        disabled_attr(model.analyzing),
        if model.analyzing { "Analyzing..." } else { "Analyze" }
    ));
    out.push_str("</form>");
    if let Some(error) = &model.error {
        out.push_str(&format!(
            "<div class=\"error-line\">{}</div>",
            escape_html(error)
        ));
    }
    out.push_str("</section>\n");

    out.push_str("<section class=\"card\"><h2>Market Visualizations</h2><div class=\"viz-grid\">\n");

    out.push_str("<div class=\"panel\"><div class=\"panel-title\">Historical Price Trend</div><div class=\"history-chart\">");
    for height in &model.history_bar_heights {
        out.push_str(&format!(
            "<div class=\"history-bar\" style=\"height:{}\"></div>",
            escape_html(height)
        ));
    }
    out.push_str("</div></div>\n");

    out.push_str("<div class=\"panel\"><div class=\"panel-title\">Market Strength Mix</div>");
    push_strength_row(&mut out, "Liquidity", &model.liquidity_label, &model.liquidity_width);
    push_strength_row(&mut out, "Volume", &model.volume_label, &model.volume_width);
    push_strength_row(
        &mut out,
        "Implied Probability",
        &model.probability_label,
        &model.probability_width,
    );
    out.push_str("</div>\n");

    out.push_str("<div class=\"panel tiles\">");
    push_stat_tile(&mut out, "Spread", &model.spread_label);
    push_stat_tile(&mut out, "Time to Resolution", &model.time_to_resolution_label);
    push_stat_tile(&mut out, "Trade Signal", &model.trade_signal_label);
    push_stat_tile(&mut out, "Degen Risk", &model.risk_label);
    out.push_str("</div>\n");

    out.push_str("</div></section>\n");

    out.push_str("<section class=\"card docs\"><h2>Metrics Documentation</h2><ul>");
    for (term, explanation) in METRIC_DOCS {
        out.push_str(&format!(
            "<li><b>{}:</b> {}</li>",
            escape_html(term),
            escape_html(explanation)
        ));
    }
    out.push_str("</ul></section>\n");

    out.push_str("<footer class=\"card disclaimer\"><strong>Disclaimer:</strong> This dashboard is for informational purposes only and does not constitute financial advice. You are solely responsible for any decisions and outcomes based on the information provided.</footer>");
    out.push_str("</main></body></html>\n");
    out
}

fn push_strength_row(out: &mut String, label: &str, value: &str, width: &str) {
    out.push_str(&format!(
        "<div class=\"strength-row\"><div class=\"strength-head\"><span>{}</span><span>{}</span></div><div class=\"track\"><div class=\"fill\" style=\"width:{}\"></div></div></div>",
        escape_html(label),
        escape_html(value),
        escape_html(width)
    ));
}

fn push_stat_tile(out: &mut String, label: &str, value: &str) {
    out.push_str(&format!(
        "<div class=\"tile\"><div class=\"tile-label\">{}</div><div class=\"tile-value\">{}</div></div>",
        escape_html(label),
        escape_html(value)
    ));
}

fn css_pct(value: f64) -> String {
    format!("{}%", format_pct(value))
}

fn label_or_dashes(value: Option<String>) -> String {
    value.unwrap_or_else(|| "--".to_string())
}

fn disabled_attr(disabled: bool) -> &'static str {
    if disabled {
        " disabled"
    } else {
        ""
    }
}

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[derive(Clone)]
struct DashboardAppState {
    source: Arc<dyn MarketDataSource>,
    view: Arc<RwLock<ViewState>>,
}

/// Builds the full application router: dashboard page, form submission,
/// and the JSON analyze endpoint.
pub fn dashboard_router(source: Arc<dyn MarketDataSource>) -> Router {
    let state = DashboardAppState {
        source: Arc::clone(&source),
        view: Arc::new(RwLock::new(ViewState::new())),
    };

    Router::new()
        .route("/", get(get_dashboard))
        .route("/analyze", post(post_analyze_form))
        .with_state(state)
        .merge(analyze_router(source))
}

#[derive(Debug, Deserialize)]
struct AnalyzeForm {
    #[serde(default)]
    url: String,
}

async fn get_dashboard(State(state): State<DashboardAppState>) -> impl IntoResponse {
    info!(
        component = "dashboard_server",
        event = "http.dashboard.request"
    );

    let model = {
        let view = state.view.read().expect("view lock should not be poisoned");
        build_dashboard_model(&view)
    };
    Html(render_dashboard_html(&model))
}

async fn post_analyze_form(
    State(state): State<DashboardAppState>,
    Form(form): Form<AnalyzeForm>,
) -> impl IntoResponse {
    info!(
        component = "dashboard_server",
        event = "view.analyze.submit",
        url = %form.url
    );

    let accepted = {
        let mut view = state.view.write().expect("view lock should not be poisoned");
        view.begin(form.url.clone())
    };

    if accepted {
        let outcome = run_analysis(state.source.as_ref(), Some(form.url.as_str()))
            .map(|response| response.metrics)
            .map_err(|err| err.to_string());

        let mut view = state.view.write().expect("view lock should not be poisoned");
        view.complete(outcome);
    } else {
        info!(
            component = "dashboard_server",
            event = "view.analyze.rejected_in_flight"
        );
    }

    let model = {
        let view = state.view.read().expect("view lock should not be poisoned");
        build_dashboard_model(&view)
    };
    Html(render_dashboard_html(&model))
}
