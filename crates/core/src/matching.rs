//! Request matching.
//!
//! [`plan_matches`] decides which donors a new request reaches and what each of
//! them is told. It performs no I/O; the donation request service persists the
//! resulting plan in one transaction.

use std::collections::HashSet;

use bloodlink_common::{AppError, AppResult};
use bloodlink_db::entities::{
    AvailabilityStatus, BloodType, MappingStatus, NotificationType, RequestStatus,
    donation_request, donor_profile,
};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::eligibility::ineligibility_reason;

/// A notification to be written by the notifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDraft {
    /// Recipient.
    pub user_id: String,
    /// Notification type.
    pub notification_type: NotificationType,
    /// Request the notification is about.
    pub related_id: Option<String>,
    /// Human-readable text.
    pub message: String,
}

impl NotificationDraft {
    /// Tell a matched donor about a new request.
    #[must_use]
    pub fn request_received(
        donor_id: &str,
        request_id: &str,
        blood_type: BloodType,
        requester_name: &str,
        hospital_name: &str,
    ) -> Self {
        Self {
            user_id: donor_id.to_string(),
            notification_type: NotificationType::RequestReceived,
            related_id: Some(request_id.to_string()),
            message: format!(
                "New {blood_type} blood donation request from {requester_name} at {hospital_name}"
            ),
        }
    }

    /// Tell a requester how a donor responded.
    ///
    /// Returns `None` unless `status` is a response (accepted or declined).
    #[must_use]
    pub fn donor_responded(
        requester_id: &str,
        request_id: &str,
        donor_name: &str,
        status: MappingStatus,
    ) -> Option<Self> {
        let notification_type = match status {
            MappingStatus::Accepted => NotificationType::RequestAccepted,
            MappingStatus::Declined => NotificationType::RequestDeclined,
            MappingStatus::Pending => return None,
        };
        Some(Self {
            user_id: requester_id.to_string(),
            notification_type,
            related_id: Some(request_id.to_string()),
            message: format!(
                "Donor {donor_name} has {} your blood donation request",
                status.as_str().to_lowercase()
            ),
        })
    }

    /// Thank a donor and tell them when they may donate again.
    #[must_use]
    pub fn donation_logged(donor_id: &str, request_id: &str, next_eligible: NaiveDate) -> Self {
        Self {
            user_id: donor_id.to_string(),
            notification_type: NotificationType::DonationLogged,
            related_id: Some(request_id.to_string()),
            message: format!(
                "Thank you for your donation! You'll be eligible to donate again after {next_eligible}"
            ),
        }
    }
}

/// Donors to map to a request and the notifications to send them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchPlan {
    /// Donors receiving a `PENDING` mapping, in candidate order.
    pub donor_ids: Vec<String>,
    /// One `REQUEST_RECEIVED` draft per entry of `donor_ids`.
    pub notifications: Vec<NotificationDraft>,
}

impl MatchPlan {
    /// Number of matched donors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.donor_ids.len()
    }

    /// Returns whether nobody was matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.donor_ids.is_empty()
    }
}

/// Returns whether `profile` is a candidate for `request` by type, availability and place.
///
/// Location matches exactly on either city or postal code.
#[must_use]
pub fn matches_request(profile: &donor_profile::Model, request: &donation_request::Model) -> bool {
    let location = request.location.trim();
    profile.blood_type == request.blood_type_needed
        && profile.availability_status == AvailabilityStatus::Available
        && (profile.city == location || profile.pincode == location)
}

/// Decide which `candidates` a new `request` reaches.
///
/// Candidates that do not match the request, duplicates, and (when
/// `apply_eligibility` is set) donors ineligible on `today` are skipped.
#[must_use]
pub fn plan_matches(
    request: &donation_request::Model,
    requester_name: &str,
    candidates: &[donor_profile::Model],
    today: NaiveDate,
    apply_eligibility: bool,
) -> MatchPlan {
    let mut seen = HashSet::new();
    let mut plan = MatchPlan::default();

    for profile in candidates {
        if !matches_request(profile, request) || !seen.insert(profile.user_id.as_str()) {
            continue;
        }
        if apply_eligibility {
            if let Some(reason) = ineligibility_reason(profile, today) {
                debug!(donor_id = %profile.user_id, %reason, "Skipping ineligible donor");
                continue;
            }
        }

        plan.donor_ids.push(profile.user_id.clone());
        plan.notifications.push(NotificationDraft::request_received(
            &profile.user_id,
            &request.id,
            request.blood_type_needed,
            requester_name,
            &request.hospital_name,
        ));
    }

    plan
}

/// Reject request status changes outside the lifecycle.
pub fn ensure_request_transition(from: RequestStatus, to: RequestStatus) -> AppResult<()> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(AppError::InvalidTransition {
            kind: "request",
            from: from.as_str().to_string(),
            to: to.as_str().to_string(),
        })
    }
}

/// Reject mapping status changes outside the response rules.
pub fn ensure_mapping_transition(from: MappingStatus, to: MappingStatus) -> AppResult<()> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(AppError::InvalidTransition {
            kind: "mapping",
            from: from.as_str().to_string(),
            to: to.as_str().to_string(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bloodlink_db::entities::Urgency;
    use chrono::{Days, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn request(blood_type: BloodType, location: &str) -> donation_request::Model {
        donation_request::Model {
            id: "req1".to_string(),
            requester_id: "r1".to_string(),
            blood_type_needed: blood_type,
            location: location.to_string(),
            hospital_name: "Ruby Hall".to_string(),
            urgency: Urgency::High,
            message: "Surgery".to_string(),
            status: RequestStatus::Active,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn donor(id: &str, blood_type: BloodType, city: &str, pincode: &str) -> donor_profile::Model {
        donor_profile::Model {
            user_id: id.to_string(),
            blood_type,
            city: city.to_string(),
            pincode: pincode.to_string(),
            availability_status: AvailabilityStatus::Available,
            status_reason: None,
            unavailable_until: None,
            next_eligible_donation_date: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_single_matching_donor() {
        let req = request(BloodType::ONegative, "Pune");
        let candidates = [donor("d1", BloodType::ONegative, "Pune", "411001")];

        let plan = plan_matches(&req, "Asha", &candidates, today(), true);

        assert_eq!(plan.donor_ids, vec!["d1".to_string()]);
        assert_eq!(plan.notifications.len(), 1);
        let draft = &plan.notifications[0];
        assert_eq!(draft.user_id, "d1");
        assert_eq!(draft.notification_type, NotificationType::RequestReceived);
        assert_eq!(draft.related_id.as_deref(), Some("req1"));
        assert_eq!(
            draft.message,
            "New O- blood donation request from Asha at Ruby Hall"
        );
    }

    #[test]
    fn test_one_draft_per_mapping() {
        let req = request(BloodType::APositive, "411001");
        let candidates = [
            donor("d1", BloodType::APositive, "Pune", "411001"),
            donor("d2", BloodType::APositive, "Hadapsar", "411001"),
            donor("d1", BloodType::APositive, "Pune", "411001"),
            donor("d3", BloodType::ANegative, "Pune", "411001"),
            donor("d4", BloodType::APositive, "Mumbai", "400001"),
        ];

        let plan = plan_matches(&req, "Asha", &candidates, today(), true);

        assert_eq!(plan.donor_ids, vec!["d1".to_string(), "d2".to_string()]);
        assert_eq!(plan.notifications.len(), plan.len());
        for (id, draft) in plan.donor_ids.iter().zip(&plan.notifications) {
            assert_eq!(&draft.user_id, id);
        }
    }

    #[test]
    fn test_location_is_exact() {
        let req = request(BloodType::BPositive, "pune");
        let candidates = [donor("d1", BloodType::BPositive, "Pune", "411001")];

        let plan = plan_matches(&req, "Asha", &candidates, today(), true);

        assert!(plan.is_empty());
    }

    #[test]
    fn test_eligibility_filter_toggle() {
        let req = request(BloodType::ONegative, "Pune");
        let mut cooling = donor("d1", BloodType::ONegative, "Pune", "411001");
        cooling.next_eligible_donation_date = Some(today() + Days::new(10));
        let candidates = [cooling];

        assert!(plan_matches(&req, "Asha", &candidates, today(), true).is_empty());
        assert_eq!(
            plan_matches(&req, "Asha", &candidates, today(), false).len(),
            1
        );
    }

    #[test]
    fn test_unavailable_never_matches() {
        let req = request(BloodType::ONegative, "Pune");
        let mut away = donor("d1", BloodType::ONegative, "Pune", "411001");
        away.availability_status = AvailabilityStatus::TemporarilyUnavailable;

        assert!(plan_matches(&req, "Asha", &[away], today(), false).is_empty());
    }

    #[test]
    fn test_response_drafts() {
        let accepted =
            NotificationDraft::donor_responded("r1", "req1", "Dev", MappingStatus::Accepted)
                .unwrap();
        let declined =
            NotificationDraft::donor_responded("r1", "req1", "Dev", MappingStatus::Declined)
                .unwrap();

        assert_eq!(accepted.notification_type, NotificationType::RequestAccepted);
        assert_eq!(
            accepted.message,
            "Donor Dev has accepted your blood donation request"
        );
        assert_eq!(declined.notification_type, NotificationType::RequestDeclined);
        assert_eq!(
            declined.message,
            "Donor Dev has declined your blood donation request"
        );
    }

    #[test]
    fn test_pending_is_not_a_response_draft() {
        assert!(
            NotificationDraft::donor_responded("r1", "req1", "Dev", MappingStatus::Pending)
                .is_none()
        );
    }

    #[test]
    fn test_donation_logged_draft() {
        let next = NaiveDate::from_ymd_opt(2025, 9, 13).unwrap();
        let draft = NotificationDraft::donation_logged("d1", "req1", next);

        assert_eq!(draft.notification_type, NotificationType::DonationLogged);
        assert_eq!(
            draft.message,
            "Thank you for your donation! You'll be eligible to donate again after 2025-09-13"
        );
    }

    #[test]
    fn test_transitions() {
        assert!(ensure_request_transition(RequestStatus::Active, RequestStatus::Expired).is_ok());
        let err = ensure_request_transition(RequestStatus::Expired, RequestStatus::Active)
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_TRANSITION");

        assert!(
            ensure_mapping_transition(MappingStatus::Accepted, MappingStatus::Declined).is_ok()
        );
        assert!(
            ensure_mapping_transition(MappingStatus::Declined, MappingStatus::Pending).is_err()
        );
    }
}
