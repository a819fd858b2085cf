//! Create donation request table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DonationRequest::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DonationRequest::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DonationRequest::RequesterId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DonationRequest::BloodTypeNeeded)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(DonationRequest::Location).string_len(128).not_null())
                    .col(
                        ColumnDef::new(DonationRequest::HospitalName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(ColumnDef::new(DonationRequest::Urgency).string_len(16).not_null())
                    .col(ColumnDef::new(DonationRequest::Message).text().not_null())
                    .col(
                        ColumnDef::new(DonationRequest::Status)
                            .string_len(16)
                            .not_null()
                            .default("ACTIVE"),
                    )
                    .col(
                        ColumnDef::new(DonationRequest::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(DonationRequest::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_donation_request_requester")
                            .from(DonationRequest::Table, DonationRequest::RequesterId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (requester_id, created_at) for a requester's listing
        manager
            .create_index(
                Index::create()
                    .name("idx_donation_request_requester_created")
                    .table(DonationRequest::Table)
                    .col(DonationRequest::RequesterId)
                    .col(DonationRequest::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_donation_request_status")
                    .table(DonationRequest::Table)
                    .col(DonationRequest::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DonationRequest::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum DonationRequest {
    Table,
    Id,
    RequesterId,
    BloodTypeNeeded,
    Location,
    HospitalName,
    Urgency,
    Message,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
