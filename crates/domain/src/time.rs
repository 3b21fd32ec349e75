//! Time and timestamp helpers.
//!
//! Usage accounting buckets elapsed time into UTC calendar days.

use chrono::{DateTime, NaiveDate, Utc};

/// UTC timestamp used for `last_updated`, alert times, tracker clocks, etc.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Return the current UTC calendar day.
#[must_use]
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Format a day bucket the way ledger rows and API payloads expect it
/// (`YYYY-MM-DD`).
#[must_use]
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_return_current_utc_time() {
        let before = Utc::now();
        let ts = now();
        let after = Utc::now();
        assert!(ts >= before);
        assert!(ts <= after);
    }

    #[test]
    fn should_format_date_key_with_zero_padding() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(date_key(date), "2026-03-07");
    }
}
