use std::time::Duration;

use chrono::{TimeZone, Utc};
use reqwest::Client as HttpClient;
use reqwest::StatusCode;
use tracing::{debug, info, warn};

use super::models::{ApiError, ChartResponse, HistoryRequest};
use crate::models::{PriceHistory, PricePoint};
use crate::utils::truncate_body;

/// Yahoo Finance chart API client
pub struct YahooClient {
    http_client: HttpClient,
    base_url: String,
}

impl YahooClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://query1.finance.yahoo.com";

    // The chart endpoint rejects requests without a browser-like agent
    const USER_AGENT: &'static str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36";

    /// Create a client against `base_url`, normally [`Self::DEFAULT_BASE_URL`]
    pub fn with_base_url(base_url: String, timeout: Duration) -> Result<Self, ApiError> {
        let http_client = HttpClient::builder()
            .user_agent(Self::USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Request(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET /v8/finance/chart/{symbol}
    ///
    /// Downloads unadjusted closing prices for the requested range and
    /// interval. Bars without a close are dropped.
    pub async fn fetch_history(&self, request: &HistoryRequest) -> Result<PriceHistory, ApiError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, request.symbol);
        info!(
            "Fetching {} history (range={}, interval={})",
            request.symbol, request.range, request.interval
        );

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("interval", request.interval.as_str()),
                ("range", request.range.as_str()),
                ("includePrePost", "false"),
                ("events", "div,split"),
            ])
            .send()
            .await
            .map_err(|e| ApiError::Request(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Request(format!("Failed to read response body: {}", e)))?;
        debug!("Chart endpoint answered {} with {} bytes", status, body.len());

        if !status.is_success() {
            return Err(classify_error(status, &body));
        }

        parse_chart_response(&body)
    }
}

/// Map a non-success response to an error
///
/// The provider usually explains failures in the chart body, so that is
/// preferred over the bare status code.
pub fn classify_error(status: StatusCode, body: &str) -> ApiError {
    if let Ok(parsed) = serde_json::from_str::<ChartResponse>(body) {
        if let Some(err) = parsed.chart.error {
            return ApiError::Provider {
                code: err.code,
                description: err.description,
            };
        }
    }

    let status_code = status.as_u16();
    let body = truncate_body(body, 200);
    match status_code {
        404 => ApiError::NotFound(body),
        429 => {
            warn!("Rate limited by data provider");
            ApiError::RateLimited(body)
        }
        500..=599 => {
            warn!("Server error {}: {}", status_code, body);
            ApiError::ServerError(status_code, body)
        }
        _ => ApiError::Http(status_code, body),
    }
}

/// Turn a chart body into a price history
pub fn parse_chart_response(body: &str) -> Result<PriceHistory, ApiError> {
    let response: ChartResponse = serde_json::from_str(body)
        .map_err(|e| ApiError::Deserialization(format!("Failed to parse response: {}", e)))?;

    if let Some(err) = response.chart.error {
        return Err(ApiError::Provider {
            code: err.code,
            description: err.description,
        });
    }

    let result = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or(ApiError::NoData)?;

    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();

    let mut skipped = 0usize;
    let mut points = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let close = closes.get(i).copied().flatten();
        match (Utc.timestamp_opt(ts, 0).single(), close) {
            (Some(timestamp), Some(price)) if price.is_finite() => {
                points.push(PricePoint::new(timestamp, price));
            }
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!("Skipped {} bars without a usable close", skipped);
    }
    if let Some(tz) = &result.meta.exchange_timezone_name {
        debug!("{} trades in {}", result.meta.symbol, tz);
    }

    Ok(PriceHistory::new(result.meta.symbol, points)
        .with_currency(result.meta.currency)
        .with_utc_offset(result.meta.gmt_offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "chart": {
            "result": [{
                "meta": {
                    "currency": "USD",
                    "symbol": "^GSPC",
                    "exchangeTimezoneName": "America/New_York",
                    "gmtoffset": -18000
                },
                "timestamp": [1704292200, 1704205800, 1704378600],
                "indicators": {
                    "quote": [{
                        "open": [4725.07, 4745.2, null],
                        "close": [4704.81, 4742.83, null],
                        "volume": [3950760000, 3743050000, null]
                    }],
                    "adjclose": [{"adjclose": [4704.81, 4742.83, null]}]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_parse_sample_chart() {
        let history = parse_chart_response(SAMPLE).expect("sample should parse");

        assert_eq!(history.symbol, "^GSPC");
        assert_eq!(history.currency.as_deref(), Some("USD"));
        assert_eq!(history.utc_offset_secs, -18000);
        // null close is dropped, remaining points sorted ascending
        assert_eq!(history.len(), 2);
        assert_eq!(history.points()[0].price, 4742.83);
        assert_eq!(history.points()[1].price, 4704.81);
    }

    #[test]
    fn test_parse_provider_error() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;

        match parse_chart_response(body) {
            Err(ApiError::Provider { code, description }) => {
                assert_eq!(code, "Not Found");
                assert!(description.contains("delisted"));
            }
            other => panic!("expected provider error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_missing_result() {
        let body = r#"{"chart":{"result":[],"error":null}}"#;
        assert!(matches!(parse_chart_response(body), Err(ApiError::NoData)));
    }

    #[test]
    fn test_parse_result_without_timestamps() {
        let body = r#"{"chart":{"result":[{"meta":{"symbol":"^GSPC"},"indicators":{"quote":[{}]}}],"error":null}}"#;
        let history = parse_chart_response(body).expect("empty range should parse");
        assert!(history.is_empty());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            parse_chart_response("<html>oops</html>"),
            Err(ApiError::Deserialization(_))
        ));
    }

    #[test]
    fn test_classify_error_prefers_provider_body() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found"}}}"#;
        assert!(matches!(
            classify_error(StatusCode::NOT_FOUND, body),
            ApiError::Provider { .. }
        ));
    }

    #[test]
    fn test_classify_error_by_status() {
        assert!(matches!(
            classify_error(StatusCode::NOT_FOUND, "missing"),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            classify_error(StatusCode::TOO_MANY_REQUESTS, "slow down"),
            ApiError::RateLimited(_)
        ));
        assert!(matches!(
            classify_error(StatusCode::BAD_GATEWAY, ""),
            ApiError::ServerError(502, _)
        ));
        assert!(matches!(
            classify_error(StatusCode::UNAUTHORIZED, "no"),
            ApiError::Http(401, _)
        ));
    }

    // Requires network access
    #[tokio::test]
    #[ignore]
    async fn test_fetch_live_history() {
        let client = YahooClient::with_base_url(
            YahooClient::DEFAULT_BASE_URL.to_string(),
            Duration::from_secs(30),
        )
        .unwrap();
        let request = HistoryRequest {
            symbol: "^GSPC".to_string(),
            range: "1mo".to_string(),
            interval: "1d".to_string(),
        };
        let history = client.fetch_history(&request).await.unwrap();
        assert!(!history.is_empty());
    }
}
