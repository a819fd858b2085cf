//! Donation request service: request lifecycle and donor matching.

use std::sync::Arc;

use bloodlink_common::{AppError, AppResult, IdGenerator, MatchingConfig};
use bloodlink_db::{
    entities::{
        BloodType, MappingStatus, RequestStatus, Urgency, donation_history, donation_request,
        request_donor_mapping,
    },
    repositories::{
        DonationRequestRepository, DonorProfileRepository, NotificationRepository,
        RequestDonorMappingRepository, UserRepository,
    },
};
use sea_orm::{DatabaseConnection, Set};
use serde::Deserialize;
use tracing::{info, warn};
use validator::Validate;

use crate::matching::{
    NotificationDraft, ensure_mapping_transition, ensure_request_transition, plan_matches,
};
use crate::services::donation_history::{DonationHistoryService, today};
use crate::services::notification::NotificationService;

/// Input for creating a donation request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDonationRequestInput {
    pub blood_type_needed: BloodType,

    /// City name or postal code
    #[validate(length(min = 1, max = 128))]
    pub location: String,

    #[validate(length(min = 1, max = 256))]
    pub hospital_name: String,

    pub urgency: Urgency,

    #[validate(length(min = 1, max = 2048))]
    pub message: String,
}

/// A newly created request and the donors it reached.
#[derive(Debug, Clone)]
pub struct CreatedRequest {
    pub request: donation_request::Model,
    pub matched_donor_ids: Vec<String>,
}

/// Outcome of fulfilling a request.
#[derive(Debug, Clone)]
pub struct Fulfillment {
    pub request: donation_request::Model,
    pub donation: donation_history::Model,
    pub next_eligible_date: chrono::NaiveDate,
}

/// Donation request service.
#[derive(Clone)]
pub struct DonationRequestService {
    db: Arc<DatabaseConnection>,
    request_repo: DonationRequestRepository,
    mapping_repo: RequestDonorMappingRepository,
    profile_repo: DonorProfileRepository,
    user_repo: UserRepository,
    history: DonationHistoryService,
    notifier: NotificationService,
    id_gen: IdGenerator,
    config: MatchingConfig,
}

impl DonationRequestService {
    /// Create a new donation request service.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>, config: MatchingConfig) -> Self {
        Self {
            request_repo: DonationRequestRepository::new(Arc::clone(&db)),
            mapping_repo: RequestDonorMappingRepository::new(Arc::clone(&db)),
            profile_repo: DonorProfileRepository::new(Arc::clone(&db)),
            user_repo: UserRepository::new(Arc::clone(&db)),
            history: DonationHistoryService::new(Arc::clone(&db), &config),
            notifier: NotificationService::new(NotificationRepository::new(Arc::clone(&db))),
            db,
            id_gen: IdGenerator::new(),
            config,
        }
    }

    /// Raise a request and match it to donors.
    ///
    /// Every available donor of the needed type whose city or postal code
    /// equals the request location, and who is eligible today, gets one
    /// `PENDING` mapping and one `REQUEST_RECEIVED` notification. The request,
    /// mappings and notifications commit together.
    pub async fn create_donation_request(
        &self,
        requester_id: &str,
        input: CreateDonationRequestInput,
    ) -> AppResult<CreatedRequest> {
        input.validate()?;
        let location = required(&input.location, "Location")?;
        let hospital_name = required(&input.hospital_name, "Hospital name")?;
        let message = required(&input.message, "Message")?;

        let requester = self.user_repo.get_by_id(requester_id).await?;
        if !requester.is_requester() {
            return Err(AppError::NotRequester(requester_id.to_string()));
        }

        let now = chrono::Utc::now();
        let txn = bloodlink_db::begin(&self.db).await?;

        let request = self
            .request_repo
            .create_in(
                &txn,
                donation_request::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    requester_id: Set(requester_id.to_string()),
                    blood_type_needed: Set(input.blood_type_needed),
                    location: Set(location),
                    hospital_name: Set(hospital_name),
                    urgency: Set(input.urgency),
                    message: Set(message),
                    status: Set(RequestStatus::Active),
                    created_at: Set(now.into()),
                    updated_at: Set(now.into()),
                },
            )
            .await?;

        let candidates = self
            .profile_repo
            .find_available_in(&txn, request.blood_type_needed, Some(&request.location))
            .await?;
        let plan = plan_matches(
            &request,
            &requester.name,
            &candidates,
            today(),
            self.config.apply_eligibility_on_create,
        );

        let mappings = plan
            .donor_ids
            .iter()
            .map(|donor_id| request_donor_mapping::ActiveModel {
                id: Set(self.id_gen.generate()),
                request_id: Set(request.id.clone()),
                donor_id: Set(donor_id.clone()),
                status: Set(MappingStatus::Pending),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            })
            .collect();
        self.mapping_repo.create_many_in(&txn, mappings).await?;
        self.notifier.apply_in(&txn, plan.notifications).await?;

        bloodlink_db::commit(txn).await?;

        info!(
            request_id = %request.id,
            blood_type = %request.blood_type_needed,
            candidates = candidates.len(),
            matched = plan.donor_ids.len(),
            "Created donation request"
        );

        Ok(CreatedRequest {
            request,
            matched_donor_ids: plan.donor_ids,
        })
    }

    /// Record a donor's answer to an active request and tell the requester.
    ///
    /// Repeated answers overwrite the previous one; there is at most one
    /// mapping per (request, donor).
    pub async fn respond_to_request(
        &self,
        donor_id: &str,
        request_id: &str,
        status: MappingStatus,
    ) -> AppResult<request_donor_mapping::Model> {
        if !status.is_response() {
            return Err(AppError::Validation(
                "Response must be ACCEPTED or DECLINED".to_string(),
            ));
        }

        let donor = self.user_repo.get_by_id(donor_id).await?;
        if !donor.is_donor() {
            return Err(AppError::NotDonor(donor_id.to_string()));
        }

        let txn = bloodlink_db::begin(&self.db).await?;

        let request = self.request_repo.get_by_id_in(&txn, request_id).await?;
        if request.status != RequestStatus::Active {
            warn!(request_id = %request_id, status = request.status.as_str(), "Response to closed request");
            return Err(AppError::Conflict(format!(
                "Request is {}",
                request.status.as_str()
            )));
        }

        let now = chrono::Utc::now();
        let existing = self
            .mapping_repo
            .find_by_request_and_donor_in(&txn, request_id, donor_id)
            .await?;

        let mapping = match existing {
            Some(mapping) => {
                ensure_mapping_transition(mapping.status, status)?;
                let mut active: request_donor_mapping::ActiveModel = mapping.into();
                active.status = Set(status);
                active.updated_at = Set(now.into());
                self.mapping_repo.update_in(&txn, active).await?
            }
            None => {
                self.mapping_repo
                    .create_in(
                        &txn,
                        request_donor_mapping::ActiveModel {
                            id: Set(self.id_gen.generate()),
                            request_id: Set(request_id.to_string()),
                            donor_id: Set(donor_id.to_string()),
                            status: Set(status),
                            created_at: Set(now.into()),
                            updated_at: Set(now.into()),
                        },
                    )
                    .await?
            }
        };

        let drafts =
            NotificationDraft::donor_responded(&request.requester_id, request_id, &donor.name, status);
        self.notifier
            .apply_in(&txn, drafts.into_iter().collect())
            .await?;

        bloodlink_db::commit(txn).await?;

        info!(request_id = %request_id, donor_id = %donor_id, status = status.as_str(), "Donor responded");
        Ok(mapping)
    }

    /// Close a request as fulfilled by `donor_id`.
    ///
    /// Appends a history row dated today at the request location, refreshes
    /// the donor's cooldown cache and thanks the donor, all in one transaction.
    /// The donor must have a profile to carry the new cooldown.
    pub async fn fulfill_request(
        &self,
        request_id: &str,
        donor_id: &str,
    ) -> AppResult<Fulfillment> {
        let donor = self.user_repo.get_by_id(donor_id).await?;
        if !donor.is_donor() {
            return Err(AppError::NotDonor(donor_id.to_string()));
        }

        let txn = bloodlink_db::begin(&self.db).await?;

        let request = self.request_repo.get_by_id_in(&txn, request_id).await?;
        ensure_request_transition(request.status, RequestStatus::Fulfilled)?;

        if self.config.require_accepted_mapping_on_fulfill {
            let accepted = self
                .mapping_repo
                .find_by_request_and_donor_in(&txn, request_id, donor_id)
                .await?
                .is_some_and(|m| m.status == MappingStatus::Accepted);
            if !accepted {
                return Err(AppError::Conflict(
                    "Donor has not accepted this request".to_string(),
                ));
            }
        }

        if self
            .profile_repo
            .find_by_user_id_in(&txn, donor_id)
            .await?
            .is_none()
        {
            return Err(AppError::not_found("donor profile", donor_id));
        }

        let now = chrono::Utc::now();
        let donated_on = now.date_naive();
        let requester_id = request.requester_id.clone();
        let location = request.location.clone();

        let mut active: donation_request::ActiveModel = request.into();
        active.status = Set(RequestStatus::Fulfilled);
        active.updated_at = Set(now.into());
        let request = self.request_repo.update_in(&txn, active).await?;

        let donation = self
            .history
            .append_in(
                &txn,
                donation_history::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    donor_id: Set(donor_id.to_string()),
                    donation_date: Set(donated_on),
                    requester_id: Set(Some(requester_id)),
                    request_id: Set(Some(request_id.to_string())),
                    location: Set(location),
                    notes: Set(None),
                    created_at: Set(now.into()),
                },
            )
            .await?;

        let next_eligible = self.history.cooldown().next_eligible_after(donated_on);
        let draft = NotificationDraft::donation_logged(donor_id, request_id, next_eligible);
        self.notifier.apply_in(&txn, vec![draft]).await?;

        bloodlink_db::commit(txn).await?;

        info!(request_id = %request_id, donor_id = %donor_id, %next_eligible, "Request fulfilled");
        Ok(Fulfillment {
            request,
            donation,
            next_eligible_date: next_eligible,
        })
    }

    /// Move a request to `status` if the lifecycle allows it.
    ///
    /// This only changes the status; use [`Self::fulfill_request`] to log the
    /// donation that fulfilled a request.
    pub async fn update_request_status(
        &self,
        request_id: &str,
        status: RequestStatus,
    ) -> AppResult<donation_request::Model> {
        let txn = bloodlink_db::begin(&self.db).await?;

        let request = self.request_repo.get_by_id_in(&txn, request_id).await?;
        if let Err(e) = ensure_request_transition(request.status, status) {
            warn!(request_id = %request_id, error = %e, "Rejected status change");
            return Err(e);
        }

        let mut active: donation_request::ActiveModel = request.into();
        active.status = Set(status);
        active.updated_at = Set(chrono::Utc::now().into());
        let request = self.request_repo.update_in(&txn, active).await?;

        bloodlink_db::commit(txn).await?;

        info!(request_id = %request_id, status = status.as_str(), "Request status changed");
        Ok(request)
    }

    /// Mark an active request as expired.
    pub async fn expire_request(&self, request_id: &str) -> AppResult<donation_request::Model> {
        self.update_request_status(request_id, RequestStatus::Expired)
            .await
    }

    /// Get a request by ID.
    pub async fn get_request(&self, request_id: &str) -> AppResult<donation_request::Model> {
        self.request_repo.get_by_id(request_id).await
    }

    /// All of a requester's requests, newest first.
    pub async fn requester_requests(
        &self,
        requester_id: &str,
    ) -> AppResult<Vec<donation_request::Model>> {
        self.request_repo.find_by_requester(requester_id).await
    }

    /// A requester's fulfilled and expired requests, newest first.
    pub async fn request_history(
        &self,
        requester_id: &str,
    ) -> AppResult<Vec<donation_request::Model>> {
        self.request_repo.find_closed_by_requester(requester_id).await
    }

    /// All active requests, newest first.
    pub async fn active_requests(&self) -> AppResult<Vec<donation_request::Model>> {
        self.request_repo.find_by_status(RequestStatus::Active).await
    }

    /// Requests a donor was matched to or responded to, newest first.
    pub async fn donor_requests(&self, donor_id: &str) -> AppResult<Vec<donation_request::Model>> {
        let request_ids: Vec<String> = self
            .mapping_repo
            .find_by_donor(donor_id)
            .await?
            .into_iter()
            .map(|m| m.request_id)
            .collect();
        self.request_repo.find_by_ids(&request_ids).await
    }

    /// Donor mappings for one of the requester's requests.
    pub async fn request_responses(
        &self,
        requester_id: &str,
        request_id: &str,
    ) -> AppResult<Vec<request_donor_mapping::Model>> {
        let request = self.request_repo.get_by_id(request_id).await?;
        if request.requester_id != requester_id {
            return Err(AppError::Forbidden(
                "Request belongs to another requester".to_string(),
            ));
        }
        self.mapping_repo.find_by_request(request_id).await
    }
}

fn required(value: &str, field: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} must not be blank")));
    }
    Ok(trimmed.to_string())
}
