use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::api::yahoo::{HistoryRequest, YahooClient};
use crate::services::animation_service::AnimationOptions;
use crate::utils::AppError;

/// Runtime settings, read from the environment (and `.env`)
#[derive(Debug, Clone)]
pub struct Config {
    pub symbol: String,
    pub display_name: String,
    pub range: String,
    pub interval: String,
    pub base_url: String,
    pub output_path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub frame_delay_ms: u32,
    pub max_frames: usize,
    pub hold_frames: usize,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| -> String {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let config = Config {
            symbol: text("INDEX_SYMBOL", "^GSPC"),
            display_name: text("INDEX_NAME", "S&P 500"),
            range: text("HISTORY_RANGE", "max"),
            interval: text("HISTORY_INTERVAL", "1d"),
            base_url: text("YAHOO_BASE_URL", YahooClient::DEFAULT_BASE_URL),
            output_path: PathBuf::from(text("OUTPUT_PATH", "index_animation.gif")),
            width: number(&lookup, "CHART_WIDTH", 1200)?,
            height: number(&lookup, "CHART_HEIGHT", 600)?,
            frame_delay_ms: number(&lookup, "FRAME_DELAY_MS", 20)?,
            max_frames: number(&lookup, "MAX_FRAMES", 300)?,
            hold_frames: number(&lookup, "HOLD_FRAMES", 50)?,
            request_timeout: Duration::from_secs(number(&lookup, "REQUEST_TIMEOUT_SECS", 30)?),
        };

        if config.width < 200 || config.height < 150 {
            return Err(AppError::Config(format!(
                "Chart size {}x{} is too small (minimum 200x150)",
                config.width, config.height
            )));
        }

        Ok(config)
    }

    pub fn history_request(&self) -> HistoryRequest {
        HistoryRequest {
            symbol: self.symbol.clone(),
            range: self.range.clone(),
            interval: self.interval.clone(),
        }
    }

    pub fn animation_options(&self) -> AnimationOptions {
        AnimationOptions {
            title: format!(
                "{} Closing Prices ({})",
                self.display_name,
                describe_range(&self.range)
            ),
            output_path: self.output_path.clone(),
            width: self.width,
            height: self.height,
            frame_delay_ms: self.frame_delay_ms,
            max_frames: self.max_frames,
            hold_frames: self.hold_frames,
        }
    }
}

fn number<T, F>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.trim().to_string()) {
        Some(raw) if !raw.is_empty() => raw
            .parse()
            .map_err(|_| AppError::Config(format!("{} must be a non-negative integer, got '{}'", key, raw))),
        _ => Ok(default),
    }
}

/// Human wording for a provider range token
pub fn describe_range(range: &str) -> String {
    match range {
        "max" => "all available history".to_string(),
        "ytd" => "year to date".to_string(),
        other => format!("last {}", other),
    }
}
