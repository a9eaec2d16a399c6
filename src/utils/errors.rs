use thiserror::Error;

use crate::api::yahoo::ApiError;

/// Top-level failure for a run
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Data provider error: {0}")]
    Api(#[from] ApiError),
    #[error("Could not load {0} history from the data provider")]
    EmptyHistory(String),
    #[error("Render error: {0}")]
    Render(String),
}

/// Shorten a provider error body so it fits on one log line
///
/// Bodies longer than `max_len` characters are cut and suffixed with `...`.
/// Newlines are flattened to spaces.
pub fn truncate_body(body: &str, max_len: usize) -> String {
    let flat: String = body
        .trim()
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();

    if flat.chars().count() <= max_len {
        flat
    } else {
        let cut: String = flat.chars().take(max_len).collect();
        format!("{}...", cut)
    }
}
