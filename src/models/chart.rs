//! Price history models

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

/// A single closing price on the chart
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

impl PricePoint {
    pub fn new(timestamp: DateTime<Utc>, price: f64) -> Self {
        Self { timestamp, price }
    }
}

/// Closing prices for one symbol, ordered by timestamp ascending
#[derive(Debug, Clone)]
pub struct PriceHistory {
    pub symbol: String,
    pub currency: Option<String>,
    /// Exchange offset from UTC in seconds, used for calendar dates
    pub utc_offset_secs: i32,
    points: Vec<PricePoint>,
}

impl PriceHistory {
    /// Build a history, sorting the points by timestamp
    ///
    /// Duplicate timestamps and gaps are kept as given.
    pub fn new(symbol: impl Into<String>, mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.timestamp);
        Self {
            symbol: symbol.into(),
            currency: None,
            utc_offset_secs: 0,
            points,
        }
    }

    pub fn with_currency(mut self, currency: Option<String>) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_utc_offset(mut self, utc_offset_secs: i32) -> Self {
        self.utc_offset_secs = utc_offset_secs;
        self
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Lowest and highest closing price
    pub fn price_bounds(&self) -> Option<(f64, f64)> {
        if self.points.is_empty() {
            return None;
        }
        let min = self.points.iter().map(|p| p.price).fold(f64::INFINITY, f64::min);
        let max = self.points.iter().map(|p| p.price).fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }

    /// First and last timestamp
    pub fn time_bounds(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => Some((first.timestamp, last.timestamp)),
            _ => None,
        }
    }

    /// Calendar date of a point at the exchange
    pub fn local_date(&self, point: &PricePoint) -> NaiveDate {
        match FixedOffset::east_opt(self.utc_offset_secs) {
            Some(offset) => point.timestamp.with_timezone(&offset).date_naive(),
            None => point.timestamp.date_naive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn point(secs: i64, price: f64) -> PricePoint {
        PricePoint::new(Utc.timestamp_opt(secs, 0).unwrap(), price)
    }

    #[test]
    fn test_history_is_sorted_ascending() {
        let history = PriceHistory::new(
            "^GSPC",
            vec![point(300, 3.0), point(100, 1.0), point(200, 2.0)],
        );

        let prices: Vec<f64> = history.points().iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![1.0, 2.0, 3.0]);
        assert!(history
            .points()
            .windows(2)
            .all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn test_duplicates_are_kept() {
        let history = PriceHistory::new("^GSPC", vec![point(100, 1.0), point(100, 1.5)]);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_bounds() {
        let history = PriceHistory::new(
            "^GSPC",
            vec![point(100, 17.66), point(500, 4800.0), point(300, 12.2)],
        );

        assert_eq!(history.price_bounds(), Some((12.2, 4800.0)));
        let (start, end) = history.time_bounds().unwrap();
        assert_eq!(start.timestamp(), 100);
        assert_eq!(end.timestamp(), 500);
    }

    #[test]
    fn test_empty_history_has_no_bounds() {
        let history = PriceHistory::new("^GSPC", Vec::new());
        assert!(history.is_empty());
        assert_eq!(history.price_bounds(), None);
        assert_eq!(history.time_bounds(), None);
    }

    #[test]
    fn test_local_date_uses_exchange_offset() {
        // 2024-01-02 02:00 UTC is still 2024-01-01 in New York
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 2, 0, 0).unwrap();
        let history = PriceHistory::new("^GSPC", vec![PricePoint::new(ts, 4700.0)])
            .with_utc_offset(-5 * 3600);

        let date = history.local_date(&history.points()[0]);
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }
}
