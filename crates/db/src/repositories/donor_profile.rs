//! Donor profile repository.

use std::sync::Arc;

use crate::entities::{AvailabilityStatus, BloodType, DonorProfile, donor_profile};
use bloodlink_common::{AppError, AppResult};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Select,
    sea_query::{Expr, Func},
};

/// Donor profile repository for database operations.
#[derive(Clone)]
pub struct DonorProfileRepository {
    db: Arc<DatabaseConnection>,
}

impl DonorProfileRepository {
    /// Create a new donor profile repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a profile by its owner's user ID.
    pub async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<donor_profile::Model>> {
        DonorProfile::find_by_id(user_id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a profile by its owner's user ID on `conn`.
    pub async fn find_by_user_id_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
    ) -> AppResult<Option<donor_profile::Model>> {
        DonorProfile::find_by_id(user_id)
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a profile by user ID, returning an error if not found.
    pub async fn get_by_user_id(&self, user_id: &str) -> AppResult<donor_profile::Model> {
        self.find_by_user_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("donor profile", user_id))
    }

    /// Create a new profile.
    pub async fn create(
        &self,
        model: donor_profile::ActiveModel,
    ) -> AppResult<donor_profile::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a profile.
    pub async fn update(
        &self,
        model: donor_profile::ActiveModel,
    ) -> AppResult<donor_profile::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Overwrite the cached next-eligible date for a donor.
    ///
    /// Returns the number of rows touched: zero when the donor has no profile.
    pub async fn set_next_eligible_date_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        date: NaiveDate,
    ) -> AppResult<u64> {
        let result = DonorProfile::update_many()
            .col_expr(
                donor_profile::Column::NextEligibleDonationDate,
                Expr::value(Some(date)),
            )
            .col_expr(
                donor_profile::Column::UpdatedAt,
                Expr::current_timestamp().into(),
            )
            .filter(donor_profile::Column::UserId.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Find available donors of one blood type, optionally restricted to a location.
    ///
    /// `location` is compared exactly against both city and postal code.
    /// Eligibility dates are not checked here.
    pub async fn find_available(
        &self,
        blood_type: BloodType,
        location: Option<&str>,
    ) -> AppResult<Vec<donor_profile::Model>> {
        self.find_available_in(self.db.as_ref(), blood_type, location)
            .await
    }

    /// [`Self::find_available`] on an explicit connection.
    pub async fn find_available_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        blood_type: BloodType,
        location: Option<&str>,
    ) -> AppResult<Vec<donor_profile::Model>> {
        Self::available_query(blood_type, location)
            .order_by_asc(donor_profile::Column::UserId)
            .all(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find available donors of one blood type in a city, ignoring case.
    pub async fn find_available_by_city(
        &self,
        blood_type: BloodType,
        city: &str,
    ) -> AppResult<Vec<donor_profile::Model>> {
        DonorProfile::find()
            .filter(donor_profile::Column::BloodType.eq(blood_type))
            .filter(donor_profile::Column::AvailabilityStatus.eq(AvailabilityStatus::Available))
            .filter(
                Expr::expr(Func::lower(Expr::col(donor_profile::Column::City)))
                    .eq(city.to_lowercase()),
            )
            .order_by_asc(donor_profile::Column::UserId)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find available donors of one blood type at a postal code.
    pub async fn find_available_by_pincode(
        &self,
        blood_type: BloodType,
        pincode: &str,
    ) -> AppResult<Vec<donor_profile::Model>> {
        DonorProfile::find()
            .filter(donor_profile::Column::BloodType.eq(blood_type))
            .filter(donor_profile::Column::AvailabilityStatus.eq(AvailabilityStatus::Available))
            .filter(donor_profile::Column::Pincode.eq(pincode))
            .order_by_asc(donor_profile::Column::UserId)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    fn available_query(blood_type: BloodType, location: Option<&str>) -> Select<DonorProfile> {
        let query = DonorProfile::find()
            .filter(donor_profile::Column::BloodType.eq(blood_type))
            .filter(donor_profile::Column::AvailabilityStatus.eq(AvailabilityStatus::Available));

        match location {
            Some(loc) => query.filter(
                Condition::any()
                    .add(donor_profile::Column::City.eq(loc))
                    .add(donor_profile::Column::Pincode.eq(loc)),
            ),
            None => query,
        }
    }
}
