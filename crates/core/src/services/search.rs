//! Donor search.
//!
//! Store queries narrow by blood type, availability and location; the
//! date-based eligibility rules are applied afterwards against today.

use std::collections::HashSet;

use bloodlink_common::AppResult;
use bloodlink_db::{
    entities::{BloodType, donor_profile},
    repositories::DonorProfileRepository,
};
use serde::Serialize;
use tracing::debug;

use crate::compatibility::compatible_donor_types;
use crate::eligibility::is_eligible;
use crate::services::donation_history::today;

/// Eligible donor count for one blood type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodTypeCount {
    pub blood_type: BloodType,
    pub count: u64,
}

/// Eligible donors per blood type at a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorSummary {
    pub location: String,
    pub counts: Vec<BloodTypeCount>,
    pub total: u64,
}

/// Search service.
#[derive(Clone)]
pub struct SearchService {
    profile_repo: DonorProfileRepository,
}

impl SearchService {
    /// Create a new search service.
    #[must_use]
    pub const fn new(profile_repo: DonorProfileRepository) -> Self {
        Self { profile_repo }
    }

    /// Eligible donors of exactly `blood_type`, optionally at a city or pincode.
    pub async fn search_donors(
        &self,
        blood_type: BloodType,
        location: Option<&str>,
    ) -> AppResult<Vec<donor_profile::Model>> {
        let candidates = self
            .profile_repo
            .find_available(blood_type, normalize_location(location))
            .await?;
        Ok(eligible_today(candidates))
    }

    /// Eligible donors whose blood can be given to a `recipient`.
    ///
    /// Results are grouped by donor type in table order, recipient's own
    /// type first; a donor appears once.
    pub async fn search_compatible_donors(
        &self,
        recipient: BloodType,
        location: Option<&str>,
    ) -> AppResult<Vec<donor_profile::Model>> {
        let location = normalize_location(location);
        let mut seen = HashSet::new();
        let mut donors = Vec::new();

        for &donor_type in compatible_donor_types(recipient) {
            let candidates = self.profile_repo.find_available(donor_type, location).await?;
            donors.extend(
                eligible_today(candidates)
                    .into_iter()
                    .filter(|p| seen.insert(p.user_id.clone())),
            );
        }

        debug!(recipient = %recipient, found = donors.len(), "Compatible donor search");
        Ok(donors)
    }

    /// Eligible donors of `blood_type` in `city`, ignoring case.
    pub async fn search_by_city(
        &self,
        blood_type: BloodType,
        city: &str,
    ) -> AppResult<Vec<donor_profile::Model>> {
        let candidates = self
            .profile_repo
            .find_available_by_city(blood_type, city.trim())
            .await?;
        Ok(eligible_today(candidates))
    }

    /// Eligible donors of `blood_type` at `pincode`.
    pub async fn search_by_pincode(
        &self,
        blood_type: BloodType,
        pincode: &str,
    ) -> AppResult<Vec<donor_profile::Model>> {
        let candidates = self
            .profile_repo
            .find_available_by_pincode(blood_type, pincode.trim())
            .await?;
        Ok(eligible_today(candidates))
    }

    /// Number of donors `search_donors` would return.
    pub async fn available_donor_count(
        &self,
        blood_type: BloodType,
        location: Option<&str>,
    ) -> AppResult<u64> {
        let donors = self.search_donors(blood_type, location).await?;
        Ok(donors.len() as u64)
    }

    /// Eligible donor counts for every blood type at a location.
    pub async fn donor_summary(&self, location: Option<&str>) -> AppResult<DonorSummary> {
        let location = normalize_location(location);
        let mut counts = Vec::with_capacity(BloodType::ALL.len());

        for blood_type in BloodType::ALL {
            let count = self.available_donor_count(blood_type, location).await?;
            counts.push(BloodTypeCount { blood_type, count });
        }

        Ok(DonorSummary {
            location: location.unwrap_or("All locations").to_string(),
            total: counts.iter().map(|c| c.count).sum(),
            counts,
        })
    }
}

fn normalize_location(location: Option<&str>) -> Option<&str> {
    location.map(str::trim).filter(|l| !l.is_empty())
}

fn eligible_today(candidates: Vec<donor_profile::Model>) -> Vec<donor_profile::Model> {
    let today = today();
    candidates
        .into_iter()
        .filter(|p| is_eligible(p, today))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bloodlink_db::entities::AvailabilityStatus;
    use chrono::{Days, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_profile(user_id: &str, blood_type: BloodType) -> donor_profile::Model {
        donor_profile::Model {
            user_id: user_id.to_string(),
            blood_type,
            city: "Pune".to_string(),
            pincode: "411001".to_string(),
            availability_status: AvailabilityStatus::Available,
            status_reason: None,
            unavailable_until: None,
            next_eligible_donation_date: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn service(db: MockDatabase) -> SearchService {
        SearchService::new(DonorProfileRepository::new(Arc::new(db.into_connection())))
    }

    #[test]
    fn test_normalize_location() {
        assert_eq!(normalize_location(Some("  Pune ")), Some("Pune"));
        assert_eq!(normalize_location(Some("   ")), None);
        assert_eq!(normalize_location(None), None);
    }

    #[tokio::test]
    async fn test_search_donors_filters_cooling_donors() {
        let mut cooling = create_test_profile("d2", BloodType::ONegative);
        cooling.next_eligible_donation_date = Some(today() + Days::new(1));

        let service = service(MockDatabase::new(DatabaseBackend::Postgres).append_query_results([
            vec![create_test_profile("d1", BloodType::ONegative), cooling],
        ]));

        let donors = service
            .search_donors(BloodType::ONegative, Some("Pune"))
            .await
            .unwrap();

        assert_eq!(donors.len(), 1);
        assert_eq!(donors[0].user_id, "d1");
    }

    #[tokio::test]
    async fn test_search_compatible_donors_for_a_negative() {
        // A- accepts A- then O-
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![create_test_profile("d1", BloodType::ANegative)]])
                .append_query_results([vec![
                    create_test_profile("d2", BloodType::ONegative),
                    create_test_profile("d1", BloodType::ANegative),
                ]]),
        );

        let donors = service
            .search_compatible_donors(BloodType::ANegative, None)
            .await
            .unwrap();

        let ids: Vec<_> = donors.iter().map(|p| p.user_id.as_str()).collect();
        assert_eq!(ids, vec!["d1", "d2"]);
    }

    #[tokio::test]
    async fn test_search_by_city_skips_unavailable_until_future() {
        let mut away = create_test_profile("d1", BloodType::BPositive);
        away.unavailable_until = Some(today() + Days::new(3));

        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([vec![away]]),
        );

        let donors = service
            .search_by_city(BloodType::BPositive, "pune")
            .await
            .unwrap();

        assert!(donors.is_empty());
    }

    #[tokio::test]
    async fn test_donor_summary() {
        let mut db = MockDatabase::new(DatabaseBackend::Postgres);
        for blood_type in BloodType::ALL {
            let rows = if blood_type == BloodType::OPositive {
                vec![
                    create_test_profile("d1", blood_type),
                    create_test_profile("d2", blood_type),
                ]
            } else {
                Vec::new()
            };
            db = db.append_query_results([rows]);
        }

        let summary = service(db).donor_summary(None).await.unwrap();

        assert_eq!(summary.location, "All locations");
        assert_eq!(summary.total, 2);
        assert_eq!(summary.counts.len(), 8);
        assert!(
            summary
                .counts
                .iter()
                .any(|c| c.blood_type == BloodType::OPositive && c.count == 2)
        );
    }
}
