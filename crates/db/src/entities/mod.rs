//! Database entities.

pub mod donation_history;
pub mod donation_request;
pub mod donor_profile;
pub mod notification;
pub mod request_donor_mapping;
pub mod user;

pub use donation_history::Entity as DonationHistory;
pub use donation_request::Entity as DonationRequest;
pub use donor_profile::Entity as DonorProfile;
pub use notification::Entity as Notification;
pub use request_donor_mapping::Entity as RequestDonorMapping;
pub use user::Entity as User;

pub use donation_request::{RequestStatus, Urgency};
pub use donor_profile::{AvailabilityStatus, BloodType, ParseBloodTypeError};
pub use notification::NotificationType;
pub use request_donor_mapping::MappingStatus;
pub use user::UserRole;
