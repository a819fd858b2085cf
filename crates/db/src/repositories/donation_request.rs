//! Donation request repository.

use std::sync::Arc;

use crate::entities::{DonationRequest, RequestStatus, donation_request};
use bloodlink_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};

/// Donation request repository for database operations.
#[derive(Clone)]
pub struct DonationRequestRepository {
    db: Arc<DatabaseConnection>,
}

impl DonationRequestRepository {
    /// Create a new donation request repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a request by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<donation_request::Model>> {
        self.find_by_id_in(self.db.as_ref(), id).await
    }

    /// [`Self::find_by_id`] on an explicit connection.
    pub async fn find_by_id_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
    ) -> AppResult<Option<donation_request::Model>> {
        DonationRequest::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a request by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<donation_request::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("donation request", id))
    }

    /// [`Self::get_by_id`] on an explicit connection.
    pub async fn get_by_id_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
    ) -> AppResult<donation_request::Model> {
        self.find_by_id_in(conn, id)
            .await?
            .ok_or_else(|| AppError::not_found("donation request", id))
    }

    /// Find requests by IDs, newest first.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<donation_request::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        DonationRequest::find()
            .filter(donation_request::Column::Id.is_in(ids.to_vec()))
            .order_by_desc(donation_request::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a request.
    pub async fn create_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: donation_request::ActiveModel,
    ) -> AppResult<donation_request::Model> {
        model
            .insert(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a request.
    pub async fn update_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: donation_request::ActiveModel,
    ) -> AppResult<donation_request::Model> {
        model
            .update(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All requests raised by a requester, newest first.
    pub async fn find_by_requester(
        &self,
        requester_id: &str,
    ) -> AppResult<Vec<donation_request::Model>> {
        DonationRequest::find()
            .filter(donation_request::Column::RequesterId.eq(requester_id))
            .order_by_desc(donation_request::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// A requester's requests that are no longer active, newest first.
    pub async fn find_closed_by_requester(
        &self,
        requester_id: &str,
    ) -> AppResult<Vec<donation_request::Model>> {
        DonationRequest::find()
            .filter(donation_request::Column::RequesterId.eq(requester_id))
            .filter(donation_request::Column::Status.ne(RequestStatus::Active))
            .order_by_desc(donation_request::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All requests in a given status, newest first.
    pub async fn find_by_status(
        &self,
        status: RequestStatus,
    ) -> AppResult<Vec<donation_request::Model>> {
        DonationRequest::find()
            .filter(donation_request::Column::Status.eq(status))
            .order_by_desc(donation_request::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
