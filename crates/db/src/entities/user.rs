//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role a user registered with. Fixed at registration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[sea_orm(string_value = "DONOR")]
    Donor,
    #[sea_orm(string_value = "REQUESTER")]
    Requester,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    /// Ten-digit contact number, used as the login handle
    #[sea_orm(unique)]
    pub contact_number: String,

    #[sea_orm(unique, nullable)]
    pub email: Option<String>,

    /// Argon2 PHC string
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub role: UserRole,

    /// Opaque bearer token
    #[sea_orm(unique)]
    #[serde(skip_serializing)]
    pub token: String,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::donor_profile::Entity")]
    DonorProfile,

    #[sea_orm(has_many = "super::donation_request::Entity")]
    DonationRequests,

    #[sea_orm(has_many = "super::notification::Entity")]
    Notifications,
}

impl Related<super::donor_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DonorProfile.def()
    }
}

impl Related<super::donation_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DonationRequests.def()
    }
}

impl Related<super::notification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notifications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Returns whether this user registered as a donor.
    #[must_use]
    pub fn is_donor(&self) -> bool {
        self.role == UserRole::Donor
    }

    /// Returns whether this user registered as a requester.
    #[must_use]
    pub fn is_requester(&self) -> bool {
        self.role == UserRole::Requester
    }
}
