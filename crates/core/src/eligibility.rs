//! Donor eligibility evaluation.

use std::fmt;

use bloodlink_db::entities::{AvailabilityStatus, donor_profile};
use chrono::NaiveDate;

/// First rule a donor profile fails on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ineligibility {
    /// Donor marked themselves temporarily unavailable.
    Unavailable,
    /// Donor is unavailable until the given date.
    UnavailableUntil(NaiveDate),
    /// Donor is still within the post-donation cooldown.
    CoolingDown(NaiveDate),
}

impl fmt::Display for Ineligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => f.write_str("temporarily unavailable"),
            Self::UnavailableUntil(date) => write!(f, "unavailable until {date}"),
            Self::CoolingDown(date) => write!(f, "next eligible on {date}"),
        }
    }
}

/// Returns why `profile` cannot donate on `today`, or `None` if it can.
///
/// Dates are inclusive: a donor whose `unavailable_until` or
/// `next_eligible_donation_date` equals `today` is eligible.
#[must_use]
pub fn ineligibility_reason(
    profile: &donor_profile::Model,
    today: NaiveDate,
) -> Option<Ineligibility> {
    if profile.availability_status != AvailabilityStatus::Available {
        return Some(Ineligibility::Unavailable);
    }
    if let Some(until) = profile.unavailable_until.filter(|d| *d > today) {
        return Some(Ineligibility::UnavailableUntil(until));
    }
    if let Some(next) = profile.next_eligible_donation_date.filter(|d| *d > today) {
        return Some(Ineligibility::CoolingDown(next));
    }
    None
}

/// Returns whether `profile` may be matched on `today`.
#[must_use]
pub fn is_eligible(profile: &donor_profile::Model, today: NaiveDate) -> bool {
    ineligibility_reason(profile, today).is_none()
}
