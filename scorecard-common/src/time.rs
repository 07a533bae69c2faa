//! Clock abstraction
//!
//! Every place the ingestion pipeline needs "now" (period defaulting,
//! created_at stamps) goes through a `Clock` handle injected at
//! construction, so behavior is deterministic under test.

use chrono::{DateTime, Datelike, Utc};

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Current UTC timestamp
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar year
    fn current_year(&self) -> i32 {
        self.now().year()
    }

    /// Full English name of the current month ("January".."December")
    fn current_month_name(&self) -> String {
        crate::normalize::MONTH_NAMES[self.now().month0() as usize].to_string()
    }
}

/// Production clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a fixed instant, for tests
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn system_clock_returns_valid_timestamp() {
        let timestamp = SystemClock.now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(timestamp.timestamp() > 946_684_800);
    }

    #[test]
    fn fixed_clock_reports_pinned_period() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap());
        assert_eq!(clock.current_year(), 2024);
        assert_eq!(clock.current_month_name(), "March");
    }
}
