use tracing::info;

use crate::api::yahoo::{HistoryRequest, YahooClient};
use crate::models::PriceHistory;
use crate::utils::AppError;

/// Download the closing-price history for the requested symbol
pub async fn load_history(
    client: &YahooClient,
    request: &HistoryRequest,
) -> Result<PriceHistory, AppError> {
    let history = client.fetch_history(request).await?;
    let history = ensure_not_empty(history, &request.symbol)?;

    if let (Some(first), Some(last)) = (history.first(), history.last()) {
        info!(
            "Loaded {} closes for {} ({}) from {} to {}",
            history.len(),
            history.symbol,
            history.currency.as_deref().unwrap_or("unknown currency"),
            history.local_date(first),
            history.local_date(last)
        );
    }

    Ok(history)
}

/// An empty download is treated as a failed load
pub fn ensure_not_empty(history: PriceHistory, symbol: &str) -> Result<PriceHistory, AppError> {
    if history.is_empty() {
        return Err(AppError::EmptyHistory(symbol.to_string()));
    }
    Ok(history)
}
