//! Donation history repository.

use std::sync::Arc;

use crate::entities::{DonationHistory, donation_history};
use bloodlink_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

/// Donation history repository. Rows are only ever inserted.
#[derive(Clone)]
pub struct DonationHistoryRepository {
    db: Arc<DatabaseConnection>,
}

impl DonationHistoryRepository {
    /// Create a new donation history repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Append a history row.
    pub async fn create_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: donation_history::ActiveModel,
    ) -> AppResult<donation_history::Model> {
        model
            .insert(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// A donor's history, most recent donation first.
    pub async fn find_by_donor(&self, donor_id: &str) -> AppResult<Vec<donation_history::Model>> {
        DonationHistory::find()
            .filter(donation_history::Column::DonorId.eq(donor_id))
            .order_by_desc(donation_history::Column::DonationDate)
            .order_by_desc(donation_history::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// The donor's most recent donation by donation date.
    pub async fn find_latest_by_donor(
        &self,
        donor_id: &str,
    ) -> AppResult<Option<donation_history::Model>> {
        self.find_latest_by_donor_in(self.db.as_ref(), donor_id)
            .await
    }

    /// [`Self::find_latest_by_donor`] on an explicit connection.
    pub async fn find_latest_by_donor_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        donor_id: &str,
    ) -> AppResult<Option<donation_history::Model>> {
        DonationHistory::find()
            .filter(donation_history::Column::DonorId.eq(donor_id))
            .order_by_desc(donation_history::Column::DonationDate)
            .order_by_desc(donation_history::Column::CreatedAt)
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Number of donations a donor has made.
    pub async fn count_by_donor(&self, donor_id: &str) -> AppResult<u64> {
        DonationHistory::find()
            .filter(donation_history::Column::DonorId.eq(donor_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
