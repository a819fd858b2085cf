//! Donor profile entity.
//!
//! One row per donor user, keyed by the user's ID.

use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// ABO/Rh blood type.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BloodType {
    #[sea_orm(string_value = "A_POSITIVE")]
    APositive,
    #[sea_orm(string_value = "A_NEGATIVE")]
    ANegative,
    #[sea_orm(string_value = "B_POSITIVE")]
    BPositive,
    #[sea_orm(string_value = "B_NEGATIVE")]
    BNegative,
    #[sea_orm(string_value = "AB_POSITIVE")]
    AbPositive,
    #[sea_orm(string_value = "AB_NEGATIVE")]
    AbNegative,
    #[sea_orm(string_value = "O_POSITIVE")]
    OPositive,
    #[sea_orm(string_value = "O_NEGATIVE")]
    ONegative,
}

impl BloodType {
    /// All eight blood types.
    pub const ALL: [Self; 8] = [
        Self::APositive,
        Self::ANegative,
        Self::BPositive,
        Self::BNegative,
        Self::AbPositive,
        Self::AbNegative,
        Self::OPositive,
        Self::ONegative,
    ];

    /// Short clinical notation (`A+`, `AB-`, ...).
    #[must_use]
    pub const fn display(self) -> &'static str {
        match self {
            Self::APositive => "A+",
            Self::ANegative => "A-",
            Self::BPositive => "B+",
            Self::BNegative => "B-",
            Self::AbPositive => "AB+",
            Self::AbNegative => "AB-",
            Self::OPositive => "O+",
            Self::ONegative => "O-",
        }
    }

    /// Enum-name notation as stored (`A_POSITIVE`, ...).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::APositive => "A_POSITIVE",
            Self::ANegative => "A_NEGATIVE",
            Self::BPositive => "B_POSITIVE",
            Self::BNegative => "B_NEGATIVE",
            Self::AbPositive => "AB_POSITIVE",
            Self::AbNegative => "AB_NEGATIVE",
            Self::OPositive => "O_POSITIVE",
            Self::ONegative => "O_NEGATIVE",
        }
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display())
    }
}

/// Error returned when a string is not a recognised blood type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown blood type: {0}")]
pub struct ParseBloodTypeError(pub String);

impl FromStr for BloodType {
    type Err = ParseBloodTypeError;

    /// Accepts both `AB-` and `ab_negative` forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_uppercase();
        // U+2212 minus shows up in pasted clinical text
        let needle = needle.replace('\u{2212}', "-");
        Self::ALL
            .into_iter()
            .find(|t| t.display() == needle || t.name() == needle)
            .ok_or_else(|| ParseBloodTypeError(s.to_string()))
    }
}

/// Whether a donor is willing to be matched.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilityStatus {
    #[sea_orm(string_value = "AVAILABLE")]
    Available,
    #[sea_orm(string_value = "TEMPORARILY_UNAVAILABLE")]
    TemporarilyUnavailable,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "donor_profile")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,

    pub blood_type: BloodType,

    pub city: String,

    /// Six-digit postal code
    pub pincode: String,

    pub availability_status: AvailabilityStatus,

    #[sea_orm(nullable)]
    pub status_reason: Option<String>,

    /// Donor is unavailable through the day before this date
    #[sea_orm(nullable)]
    pub unavailable_until: Option<Date>,

    /// Cached from donation history; refreshed whenever history is appended
    #[sea_orm(nullable)]
    pub next_eligible_donation_date: Option<Date>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
