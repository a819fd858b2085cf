//! Donation lifecycle tracking.

use std::sync::Arc;

use bloodlink_common::{AppError, AppResult, IdGenerator, MatchingConfig};
use bloodlink_db::{
    entities::donation_history,
    repositories::{
        DonationHistoryRepository, DonationRequestRepository, DonorProfileRepository,
        UserRepository,
    },
};
use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, DatabaseConnection, Set};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::lifecycle::{Cooldown, EligibilitySummary};

/// Input for recording a donation.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecordDonationInput {
    pub donation_date: NaiveDate,

    #[validate(length(min = 1, max = 256))]
    pub location: String,

    #[validate(length(max = 2048))]
    pub notes: Option<String>,

    pub requester_id: Option<String>,

    pub request_id: Option<String>,
}

/// Donation history service.
///
/// History rows are the authoritative cooldown source. Every append refreshes
/// the cached `next_eligible_donation_date` on the donor's profile in the same
/// transaction.
#[derive(Clone)]
pub struct DonationHistoryService {
    db: Arc<DatabaseConnection>,
    history_repo: DonationHistoryRepository,
    user_repo: UserRepository,
    request_repo: DonationRequestRepository,
    profile_repo: DonorProfileRepository,
    id_gen: IdGenerator,
    cooldown: Cooldown,
}

impl DonationHistoryService {
    /// Create a new donation history service.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>, config: &MatchingConfig) -> Self {
        Self {
            history_repo: DonationHistoryRepository::new(Arc::clone(&db)),
            user_repo: UserRepository::new(Arc::clone(&db)),
            request_repo: DonationRequestRepository::new(Arc::clone(&db)),
            profile_repo: DonorProfileRepository::new(Arc::clone(&db)),
            db,
            id_gen: IdGenerator::new(),
            cooldown: Cooldown::new(config.cooldown_days),
        }
    }

    /// The cooldown rule in force.
    #[must_use]
    pub const fn cooldown(&self) -> Cooldown {
        self.cooldown
    }

    /// Record a donation made outside the request flow.
    pub async fn record_donation(
        &self,
        donor_id: &str,
        input: RecordDonationInput,
    ) -> AppResult<donation_history::Model> {
        input.validate()?;

        let donor = self.user_repo.get_by_id(donor_id).await?;
        if !donor.is_donor() {
            return Err(AppError::NotDonor(donor_id.to_string()));
        }
        if let Some(requester_id) = &input.requester_id {
            let requester = self.user_repo.get_by_id(requester_id).await?;
            if !requester.is_requester() {
                return Err(AppError::NotRequester(requester_id.to_string()));
            }
        }
        if let Some(request_id) = &input.request_id {
            self.request_repo.get_by_id(request_id).await?;
        }

        let location = input.location.trim().to_string();
        if location.is_empty() {
            return Err(AppError::Validation(
                "Location must not be blank".to_string(),
            ));
        }

        let txn = bloodlink_db::begin(&self.db).await?;

        let record = self
            .append_in(
                &txn,
                donation_history::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    donor_id: Set(donor_id.to_string()),
                    donation_date: Set(input.donation_date),
                    requester_id: Set(input.requester_id),
                    request_id: Set(input.request_id),
                    location: Set(location),
                    notes: Set(input.notes.filter(|n| !n.trim().is_empty())),
                    created_at: Set(chrono::Utc::now().into()),
                },
            )
            .await?;

        bloodlink_db::commit(txn).await?;

        info!(donor_id = %donor_id, date = %record.donation_date, "Recorded donation");
        Ok(record)
    }

    /// Append a history row on `conn` and refresh the donor's cooldown cache.
    ///
    /// Returns the new row. The cache is set from the latest donation on file,
    /// so back-dated records never shorten an existing cooldown.
    pub(crate) async fn append_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: donation_history::ActiveModel,
    ) -> AppResult<donation_history::Model> {
        let record = self.history_repo.create_in(conn, model).await?;

        let latest = self
            .history_repo
            .find_latest_by_donor_in(conn, &record.donor_id)
            .await?
            .map_or(record.donation_date, |h| h.donation_date);
        let next = self.cooldown.next_eligible_after(latest);

        self.profile_repo
            .set_next_eligible_date_in(conn, &record.donor_id, next)
            .await?;

        Ok(record)
    }

    /// A donor's donations, most recent first.
    pub async fn donor_history(&self, donor_id: &str) -> AppResult<Vec<donation_history::Model>> {
        self.history_repo.find_by_donor(donor_id).await
    }

    /// A donor's most recent donation.
    pub async fn last_donation(
        &self,
        donor_id: &str,
    ) -> AppResult<Option<donation_history::Model>> {
        self.history_repo.find_latest_by_donor(donor_id).await
    }

    /// Whether the donor's cooldown has elapsed today.
    pub async fn can_donate_today(&self, donor_id: &str) -> AppResult<bool> {
        let last = self.last_donation_date(donor_id).await?;
        Ok(self.cooldown.can_donate_on(last, today()))
    }

    /// First day the donor may donate; today if they never have.
    pub async fn next_eligible_date(&self, donor_id: &str) -> AppResult<NaiveDate> {
        let last = self.last_donation_date(donor_id).await?;
        Ok(self.cooldown.next_eligible_date(last, today()))
    }

    /// Number of donations the donor has made.
    pub async fn total_donations(&self, donor_id: &str) -> AppResult<u64> {
        self.history_repo.count_by_donor(donor_id).await
    }

    /// Last donation, next eligible date, today's eligibility and total.
    pub async fn eligibility_summary(&self, donor_id: &str) -> AppResult<EligibilitySummary> {
        let last = self.last_donation_date(donor_id).await?;
        let total = self.history_repo.count_by_donor(donor_id).await?;
        Ok(self.cooldown.summarize(last, total, today()))
    }

    async fn last_donation_date(&self, donor_id: &str) -> AppResult<Option<NaiveDate>> {
        Ok(self
            .history_repo
            .find_latest_by_donor(donor_id)
            .await?
            .map(|h| h.donation_date))
    }
}

/// Today's date in UTC.
pub(crate) fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}
