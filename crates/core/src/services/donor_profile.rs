//! Donor profile service.

use bloodlink_common::{AppError, AppResult, MatchingConfig};
use bloodlink_db::{
    entities::{AvailabilityStatus, BloodType, donor_profile},
    repositories::{DonationHistoryRepository, DonorProfileRepository, UserRepository},
};
use chrono::NaiveDate;
use sea_orm::Set;
use serde::Deserialize;
use tracing::info;
use validator::{Validate, ValidationError};

use crate::lifecycle::Cooldown;

/// Input for creating a donor profile.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDonorProfileInput {
    pub blood_type: BloodType,

    #[validate(length(min = 1, max = 128))]
    pub city: String,

    #[validate(custom(function = validate_pincode))]
    pub pincode: String,

    pub availability_status: Option<AvailabilityStatus>,
}

/// Input for editing a donor profile. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateDonorProfileInput {
    pub blood_type: Option<BloodType>,

    #[validate(length(min = 1, max = 128))]
    pub city: Option<String>,

    #[validate(custom(function = validate_pincode))]
    pub pincode: Option<String>,
}

/// Input for changing a donor's availability.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAvailabilityInput {
    pub status: AvailabilityStatus,

    #[validate(length(max = 512))]
    pub reason: Option<String>,

    pub unavailable_until: Option<NaiveDate>,
}

/// Indian postal codes: six digits, no leading zero.
fn validate_pincode(pincode: &str) -> Result<(), ValidationError> {
    let bytes = pincode.as_bytes();
    if bytes.len() == 6 && bytes[0] != b'0' && bytes.iter().all(u8::is_ascii_digit) {
        Ok(())
    } else {
        Err(ValidationError::new("pincode").with_message("Pincode must be 6 digits".into()))
    }
}

/// Donor profile service.
#[derive(Clone)]
pub struct DonorProfileService {
    profile_repo: DonorProfileRepository,
    user_repo: UserRepository,
    history_repo: DonationHistoryRepository,
    cooldown: Cooldown,
}

impl DonorProfileService {
    /// Create a new donor profile service.
    #[must_use]
    pub const fn new(
        profile_repo: DonorProfileRepository,
        user_repo: UserRepository,
        history_repo: DonationHistoryRepository,
        config: &MatchingConfig,
    ) -> Self {
        Self {
            profile_repo,
            user_repo,
            history_repo,
            cooldown: Cooldown::new(config.cooldown_days),
        }
    }

    /// Create the profile for a donor.
    ///
    /// The cooldown cache is seeded from any donations recorded before the
    /// profile existed.
    pub async fn create_profile(
        &self,
        user_id: &str,
        input: CreateDonorProfileInput,
    ) -> AppResult<donor_profile::Model> {
        input.validate()?;

        let user = self.user_repo.get_by_id(user_id).await?;
        if !user.is_donor() {
            return Err(AppError::NotDonor(user_id.to_string()));
        }

        if self.profile_repo.find_by_user_id(user_id).await?.is_some() {
            return Err(AppError::AlreadyExists(
                "Donor profile already exists".to_string(),
            ));
        }

        let city = non_blank(&input.city, "City")?;
        let next_eligible = self
            .history_repo
            .find_latest_by_donor(user_id)
            .await?
            .map(|h| self.cooldown.next_eligible_after(h.donation_date));
        let now = chrono::Utc::now();

        let model = donor_profile::ActiveModel {
            user_id: Set(user_id.to_string()),
            blood_type: Set(input.blood_type),
            city: Set(city),
            pincode: Set(input.pincode),
            availability_status: Set(input
                .availability_status
                .unwrap_or(AvailabilityStatus::Available)),
            status_reason: Set(None),
            unavailable_until: Set(None),
            next_eligible_donation_date: Set(next_eligible),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let profile = self.profile_repo.create(model).await?;
        info!(user_id = %user_id, blood_type = %profile.blood_type, "Created donor profile");
        Ok(profile)
    }

    /// Get a donor's profile.
    pub async fn get_profile(&self, user_id: &str) -> AppResult<donor_profile::Model> {
        self.profile_repo.get_by_user_id(user_id).await
    }

    /// Edit blood type or location.
    pub async fn update_profile(
        &self,
        user_id: &str,
        input: UpdateDonorProfileInput,
    ) -> AppResult<donor_profile::Model> {
        input.validate()?;

        let profile = self.profile_repo.get_by_user_id(user_id).await?;
        let mut active: donor_profile::ActiveModel = profile.into();

        if let Some(blood_type) = input.blood_type {
            active.blood_type = Set(blood_type);
        }
        if let Some(city) = input.city {
            active.city = Set(non_blank(&city, "City")?);
        }
        if let Some(pincode) = input.pincode {
            active.pincode = Set(pincode);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        self.profile_repo.update(active).await
    }

    /// Set a donor's availability, reason and optional return date.
    pub async fn update_availability(
        &self,
        user_id: &str,
        input: UpdateAvailabilityInput,
    ) -> AppResult<donor_profile::Model> {
        input.validate()?;

        let profile = self.profile_repo.get_by_user_id(user_id).await?;
        let mut active: donor_profile::ActiveModel = profile.into();

        active.availability_status = Set(input.status);
        active.status_reason = Set(input.reason.filter(|r| !r.trim().is_empty()));
        active.unavailable_until = Set(input.unavailable_until);
        active.updated_at = Set(chrono::Utc::now().into());

        let profile = self.profile_repo.update(active).await?;
        info!(user_id = %user_id, status = ?profile.availability_status, "Updated availability");
        Ok(profile)
    }

    /// Donors of one type marked available, regardless of dates or location.
    pub async fn available_donors(
        &self,
        blood_type: BloodType,
    ) -> AppResult<Vec<donor_profile::Model>> {
        self.profile_repo.find_available(blood_type, None).await
    }
}

fn non_blank(value: &str, field: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} must not be blank")));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bloodlink_db::entities::{UserRole, donation_history, user};
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_user(role: UserRole) -> user::Model {
        user::Model {
            id: "d1".to_string(),
            name: "Dev".to_string(),
            contact_number: "9876543210".to_string(),
            email: None,
            password_hash: "x".to_string(),
            role,
            token: "tok".to_string(),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn create_test_profile() -> donor_profile::Model {
        donor_profile::Model {
            user_id: "d1".to_string(),
            blood_type: BloodType::BPositive,
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

    fn create_input() -> CreateDonorProfileInput {
        CreateDonorProfileInput {
            blood_type: BloodType::BPositive,
            city: " Pune ".to_string(),
            pincode: "411001".to_string(),
            availability_status: None,
        }
    }

    fn service(db: MockDatabase) -> DonorProfileService {
        let conn = Arc::new(db.into_connection());
        DonorProfileService::new(
            DonorProfileRepository::new(Arc::clone(&conn)),
            UserRepository::new(Arc::clone(&conn)),
            DonationHistoryRepository::new(conn),
            &MatchingConfig::default(),
        )
    }

    #[test]
    fn test_pincode_validation() {
        assert!(validate_pincode("411001").is_ok());
        assert!(validate_pincode("011001").is_err());
        assert!(validate_pincode("41100").is_err());
        assert!(validate_pincode("41100a").is_err());
    }

    #[tokio::test]
    async fn test_create_profile_requires_donor() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user(UserRole::Requester)]]),
        );

        let result = service.create_profile("d1", create_input()).await;

        assert!(matches!(result, Err(AppError::NotDonor(_))));
    }

    #[tokio::test]
    async fn test_create_profile_already_exists() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user(UserRole::Donor)]])
                .append_query_results([[create_test_profile()]]),
        );

        let result = service.create_profile("d1", create_input()).await;

        assert!(matches!(result, Err(AppError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_create_profile() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user(UserRole::Donor)]])
                .append_query_results([Vec::<donor_profile::Model>::new()])
                .append_query_results([Vec::<donation_history::Model>::new()])
                .append_query_results([[create_test_profile()]]),
        );

        let profile = service.create_profile("d1", create_input()).await.unwrap();

        assert_eq!(profile.blood_type, BloodType::BPositive);
        assert_eq!(profile.availability_status, AvailabilityStatus::Available);
    }

    #[tokio::test]
    async fn test_create_profile_rejects_bad_pincode() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres));
        let mut input = create_input();
        input.pincode = "12".to_string();

        let result = service.create_profile("d1", input).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_availability() {
        let mut updated = create_test_profile();
        updated.availability_status = AvailabilityStatus::TemporarilyUnavailable;
        updated.status_reason = Some("Travelling".to_string());

        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_profile()]])
                .append_query_results([[updated]]),
        );

        let profile = service
            .update_availability(
                "d1",
                UpdateAvailabilityInput {
                    status: AvailabilityStatus::TemporarilyUnavailable,
                    reason: Some("Travelling".to_string()),
                    unavailable_until: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(
            profile.availability_status,
            AvailabilityStatus::TemporarilyUnavailable
        );
    }
}
