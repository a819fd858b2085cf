//! Post-donation cooldown arithmetic.
//!
//! Donation history is the source of truth: a donor may donate again once
//! `cooldown_days` have passed since their latest recorded donation.

use chrono::{Days, NaiveDate};
use serde::Serialize;

/// Default cooldown between donations, in days.
pub const DEFAULT_COOLDOWN_DAYS: u32 = 90;

/// Cooldown rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cooldown {
    days: u32,
}

impl Default for Cooldown {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN_DAYS)
    }
}

impl Cooldown {
    /// Create a cooldown rule of `days` days.
    #[must_use]
    pub const fn new(days: u32) -> Self {
        Self { days }
    }

    /// Length of the cooldown in days.
    #[must_use]
    pub const fn days(self) -> u32 {
        self.days
    }

    /// First date a donor who last donated on `last` may donate again.
    #[must_use]
    pub fn next_eligible_after(self, last: NaiveDate) -> NaiveDate {
        last.checked_add_days(Days::new(u64::from(self.days)))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Next date the donor may donate; `today` when there is no prior donation.
    #[must_use]
    pub fn next_eligible_date(self, last: Option<NaiveDate>, today: NaiveDate) -> NaiveDate {
        last.map_or(today, |d| self.next_eligible_after(d))
    }

    /// Returns whether the donor may donate on `today`.
    #[must_use]
    pub fn can_donate_on(self, last: Option<NaiveDate>, today: NaiveDate) -> bool {
        last.is_none_or(|d| today >= self.next_eligible_after(d))
    }

    /// Bundle the derived values for one donor.
    #[must_use]
    pub fn summarize(
        self,
        last: Option<NaiveDate>,
        total_donations: u64,
        today: NaiveDate,
    ) -> EligibilitySummary {
        EligibilitySummary {
            last_donation_date: last,
            next_eligible_date: self.next_eligible_date(last, today),
            can_donate_today: self.can_donate_on(last, today),
            total_donations,
        }
    }
}

/// Donation-history view of a donor's eligibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilitySummary {
    /// Most recent donation, if any.
    pub last_donation_date: Option<NaiveDate>,
    /// First day the donor may donate again.
    pub next_eligible_date: NaiveDate,
    /// Whether the cooldown has elapsed.
    pub can_donate_today: bool,
    /// Number of recorded donations.
    pub total_donations: u64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn test_no_history_can_donate() {
        let rule = Cooldown::default();

        assert!(rule.can_donate_on(None, today()));
        assert_eq!(rule.next_eligible_date(None, today()), today());
    }

    #[test]
    fn test_ninety_day_boundary() {
        let rule = Cooldown::default();

        let exactly = today() - Days::new(90);
        assert!(rule.can_donate_on(Some(exactly), today()));

        let one_short = today() - Days::new(89);
        assert!(!rule.can_donate_on(Some(one_short), today()));
        assert_eq!(
            rule.next_eligible_date(Some(one_short), today()),
            today() + Days::new(1)
        );
    }

    #[test]
    fn test_custom_length() {
        let rule = Cooldown::new(56);
        let last = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        assert_eq!(
            rule.next_eligible_after(last),
            NaiveDate::from_ymd_opt(2025, 2, 26).unwrap()
        );
    }

    #[test]
    fn test_summarize() {
        let rule = Cooldown::default();
        let last = today() - Days::new(30);

        let summary = rule.summarize(Some(last), 3, today());

        assert_eq!(summary.last_donation_date, Some(last));
        assert_eq!(summary.next_eligible_date, today() + Days::new(60));
        assert!(!summary.can_donate_today);
        assert_eq!(summary.total_donations, 3);
    }
}
