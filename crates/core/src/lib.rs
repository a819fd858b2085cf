//! Core domain logic for bloodlink.
//!
//! The top-level modules are pure rules over entity models. `services`
//! wires them to the repositories.

pub mod compatibility;
pub mod eligibility;
pub mod lifecycle;
pub mod matching;
pub mod services;

pub use compatibility::{can_donate_to, compatible_donor_types, compatible_recipient_types};
pub use eligibility::{Ineligibility, ineligibility_reason, is_eligible};
pub use lifecycle::{Cooldown, DEFAULT_COOLDOWN_DAYS, EligibilitySummary};
pub use matching::{MatchPlan, NotificationDraft, plan_matches};
pub use services::*;
