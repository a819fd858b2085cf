//! Request/donor mapping repository.

use std::sync::Arc;

use crate::entities::{RequestDonorMapping, request_donor_mapping};
use bloodlink_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};

/// Request/donor mapping repository for database operations.
#[derive(Clone)]
pub struct RequestDonorMappingRepository {
    db: Arc<DatabaseConnection>,
}

impl RequestDonorMappingRepository {
    /// Create a new mapping repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the mapping for a (request, donor) pair.
    pub async fn find_by_request_and_donor(
        &self,
        request_id: &str,
        donor_id: &str,
    ) -> AppResult<Option<request_donor_mapping::Model>> {
        self.find_by_request_and_donor_in(self.db.as_ref(), request_id, donor_id)
            .await
    }

    /// [`Self::find_by_request_and_donor`] on an explicit connection.
    pub async fn find_by_request_and_donor_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        request_id: &str,
        donor_id: &str,
    ) -> AppResult<Option<request_donor_mapping::Model>> {
        RequestDonorMapping::find()
            .filter(request_donor_mapping::Column::RequestId.eq(request_id))
            .filter(request_donor_mapping::Column::DonorId.eq(donor_id))
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a mapping.
    pub async fn create_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: request_donor_mapping::ActiveModel,
    ) -> AppResult<request_donor_mapping::Model> {
        model
            .insert(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a batch of mappings. Returns the number of rows inserted.
    pub async fn create_many_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        models: Vec<request_donor_mapping::ActiveModel>,
    ) -> AppResult<u64> {
        if models.is_empty() {
            return Ok(0);
        }

        RequestDonorMapping::insert_many(models)
            .exec_without_returning(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a mapping.
    pub async fn update_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: request_donor_mapping::ActiveModel,
    ) -> AppResult<request_donor_mapping::Model> {
        model
            .update(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All mappings for a request, oldest first.
    pub async fn find_by_request(
        &self,
        request_id: &str,
    ) -> AppResult<Vec<request_donor_mapping::Model>> {
        RequestDonorMapping::find()
            .filter(request_donor_mapping::Column::RequestId.eq(request_id))
            .order_by_asc(request_donor_mapping::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All mappings for a donor, newest first.
    pub async fn find_by_donor(
        &self,
        donor_id: &str,
    ) -> AppResult<Vec<request_donor_mapping::Model>> {
        RequestDonorMapping::find()
            .filter(request_donor_mapping::Column::DonorId.eq(donor_id))
            .order_by_desc(request_donor_mapping::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
