//! Create donation history table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DonationHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DonationHistory::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DonationHistory::DonorId).string_len(32).not_null())
                    .col(ColumnDef::new(DonationHistory::DonationDate).date().not_null())
                    .col(ColumnDef::new(DonationHistory::RequesterId).string_len(32))
                    .col(ColumnDef::new(DonationHistory::RequestId).string_len(32))
                    .col(ColumnDef::new(DonationHistory::Location).string_len(256).not_null())
                    .col(ColumnDef::new(DonationHistory::Notes).text())
                    .col(
                        ColumnDef::new(DonationHistory::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_donation_history_donor")
                            .from(DonationHistory::Table, DonationHistory::DonorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_donation_history_requester")
                            .from(DonationHistory::Table, DonationHistory::RequesterId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_donation_history_request")
                            .from(DonationHistory::Table, DonationHistory::RequestId)
                            .to(DonationRequest::Table, DonationRequest::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (donor_id, donation_date) for last-donation lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_donation_history_donor_date")
                    .table(DonationHistory::Table)
                    .col(DonationHistory::DonorId)
                    .col(DonationHistory::DonationDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DonationHistory::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum DonationHistory {
    Table,
    Id,
    DonorId,
    DonationDate,
    RequesterId,
    RequestId,
    Location,
    Notes,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum DonationRequest {
    Table,
    Id,
}
