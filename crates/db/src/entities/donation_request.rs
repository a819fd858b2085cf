//! Donation request entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::donor_profile::BloodType;

/// How soon the requester needs blood.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Urgency {
    #[sea_orm(string_value = "HIGH")]
    High,
    #[sea_orm(string_value = "MEDIUM")]
    Medium,
    #[sea_orm(string_value = "LOW")]
    Low,
}

/// Request lifecycle state.
///
/// `Active` is the only state with outgoing transitions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "FULFILLED")]
    Fulfilled,
    #[sea_orm(string_value = "EXPIRED")]
    Expired,
}

impl RequestStatus {
    /// Returns whether moving from `self` to `next` is legal.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Active, Self::Fulfilled | Self::Expired)
        )
    }

    /// Stored name (`ACTIVE`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Fulfilled => "FULFILLED",
            Self::Expired => "EXPIRED",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "donation_request")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub requester_id: String,

    pub blood_type_needed: BloodType,

    /// City name or postal code, matched exactly against donor profiles
    pub location: String,

    pub hospital_name: String,

    pub urgency: Urgency,

    #[sea_orm(column_type = "Text")]
    pub message: String,

    pub status: RequestStatus,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::RequesterId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Requester,

    #[sea_orm(has_many = "super::request_donor_mapping::Entity")]
    Mappings,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Requester.def()
    }
}

impl Related<super::request_donor_mapping::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Mappings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_active_has_exits() {
        use RequestStatus::{Active, Expired, Fulfilled};

        assert!(Active.can_transition_to(Fulfilled));
        assert!(Active.can_transition_to(Expired));
        assert!(!Active.can_transition_to(Active));
        assert!(!Fulfilled.can_transition_to(Active));
        assert!(!Fulfilled.can_transition_to(Expired));
        assert!(!Expired.can_transition_to(Active));
        assert!(!Expired.can_transition_to(Fulfilled));
    }
}
