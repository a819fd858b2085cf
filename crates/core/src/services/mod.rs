//! Application services.

#![allow(missing_docs)]

pub mod account;
pub mod donation_history;
pub mod donation_request;
pub mod donor_profile;
pub mod notification;
pub mod search;

#[cfg(test)]
mod testing;

pub use account::{AccountService, AuthSession, RegisterInput, UpdateContactInput};
pub use donation_history::{DonationHistoryService, RecordDonationInput};
pub use donation_request::{
    CreateDonationRequestInput, CreatedRequest, DonationRequestService, Fulfillment,
};
pub use donor_profile::{
    CreateDonorProfileInput, DonorProfileService, UpdateAvailabilityInput,
    UpdateDonorProfileInput,
};
pub use notification::{NotificationService, NotificationSummary};
pub use search::{BloodTypeCount, DonorSummary, SearchService};
