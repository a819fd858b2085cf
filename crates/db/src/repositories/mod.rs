//! Repositories over the database entities.
//!
//! Methods suffixed `_in` take an explicit connection so callers can run them
//! inside a transaction.

mod donation_history;
mod donation_request;
mod donor_profile;
mod notification;
mod request_donor_mapping;
mod user;

pub use donation_history::DonationHistoryRepository;
pub use donation_request::DonationRequestRepository;
pub use donor_profile::DonorProfileRepository;
pub use notification::NotificationRepository;
pub use request_donor_mapping::RequestDonorMappingRepository;
pub use user::UserRepository;
