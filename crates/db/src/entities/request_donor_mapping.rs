//! Request/donor mapping entity.
//!
//! Records one donor's response to one request. Unique on `(request_id, donor_id)`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Donor response state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MappingStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "ACCEPTED")]
    Accepted,
    #[sea_orm(string_value = "DECLINED")]
    Declined,
}

impl MappingStatus {
    /// Returns whether moving from `self` to `next` is legal.
    ///
    /// A donor may change their mind, but nothing moves back to `Pending`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!((self, next), (_, Self::Accepted | Self::Declined))
    }

    /// Returns whether this is a donor response rather than the initial state.
    #[must_use]
    pub const fn is_response(self) -> bool {
        matches!(self, Self::Accepted | Self::Declined)
    }

    /// Stored name (`PENDING`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::Declined => "DECLINED",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "request_donor_mapping")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub request_id: String,

    pub donor_id: String,

    pub status: MappingStatus,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::donation_request::Entity",
        from = "Column::RequestId",
        to = "super::donation_request::Column::Id",
        on_delete = "Cascade"
    )]
    Request,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::DonorId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Donor,
}

impl Related<super::donation_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Request.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_returns_to_pending() {
        use MappingStatus::{Accepted, Declined, Pending};

        assert!(Pending.can_transition_to(Accepted));
        assert!(Pending.can_transition_to(Declined));
        assert!(Accepted.can_transition_to(Declined));
        assert!(Declined.can_transition_to(Accepted));
        assert!(!Accepted.can_transition_to(Pending));
        assert!(!Pending.can_transition_to(Pending));
    }
}
