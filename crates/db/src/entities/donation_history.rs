//! Donation history entity.
//!
//! Rows are append-only.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "donation_history")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub donor_id: String,

    pub donation_date: Date,

    #[sea_orm(nullable)]
    pub requester_id: Option<String>,

    #[sea_orm(nullable)]
    pub request_id: Option<String>,

    pub location: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::DonorId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Donor,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::RequesterId",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    Requester,

    #[sea_orm(
        belongs_to = "super::donation_request::Entity",
        from = "Column::RequestId",
        to = "super::donation_request::Column::Id",
        on_delete = "SetNull"
    )]
    Request,
}

impl ActiveModelBehavior for ActiveModel {}
