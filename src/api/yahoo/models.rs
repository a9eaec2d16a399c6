use serde::Deserialize;
use thiserror::Error;

/// Top-level body of the v8 chart endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    pub chart: ChartEnvelope,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartEnvelope {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ProviderError>,
}

/// Error object the provider embeds in the chart body
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderError {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
    /// Absent when the requested range holds no bars
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub symbol: String,
    pub currency: Option<String>,
    #[serde(rename = "gmtoffset", default)]
    pub gmt_offset: i32,
    pub exchange_timezone_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<Quote>,
}

/// Unadjusted bar values, one entry per timestamp
#[derive(Debug, Clone, Deserialize)]
pub struct Quote {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

/// What to ask the provider for
#[derive(Debug, Clone)]
pub struct HistoryRequest {
    pub symbol: String,
    /// Provider range token, e.g. `1y` or `max`
    pub range: String,
    /// Bar size, e.g. `1d`
    pub interval: String,
}

/// Errors raised while talking to the data provider
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// 404 Not Found
    #[error("Not Found: {0}")]
    NotFound(String),
    /// 429 Too Many Requests
    #[error("Rate Limited: {0}")]
    RateLimited(String),
    /// 5xx Server Error
    #[error("Server Error ({0}): {1}")]
    ServerError(u16, String),
    /// Other HTTP errors
    #[error("HTTP Error ({0}): {1}")]
    Http(u16, String),
    /// Error object reported inside the chart body
    #[error("Provider Error: {code} - {description}")]
    Provider { code: String, description: String },
    /// Chart body carried no result
    #[error("No data in response")]
    NoData,
    /// Network/request error
    #[error("Request Error: {0}")]
    Request(String),
    /// Deserialization error
    #[error("Deserialization Error: {0}")]
    Deserialization(String),
}
