//! Create request/donor mapping table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RequestDonorMapping::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RequestDonorMapping::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RequestDonorMapping::RequestId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RequestDonorMapping::DonorId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RequestDonorMapping::Status)
                            .string_len(16)
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(
                        ColumnDef::new(RequestDonorMapping::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(RequestDonorMapping::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_request_donor_mapping_request")
                            .from(RequestDonorMapping::Table, RequestDonorMapping::RequestId)
                            .to(DonationRequest::Table, DonationRequest::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_request_donor_mapping_donor")
                            .from(RequestDonorMapping::Table, RequestDonorMapping::DonorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique: one response per donor per request
        manager
            .create_index(
                Index::create()
                    .name("idx_request_donor_mapping_request_donor")
                    .table(RequestDonorMapping::Table)
                    .col(RequestDonorMapping::RequestId)
                    .col(RequestDonorMapping::DonorId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_request_donor_mapping_donor")
                    .table(RequestDonorMapping::Table)
                    .col(RequestDonorMapping::DonorId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RequestDonorMapping::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum RequestDonorMapping {
    Table,
    Id,
    RequestId,
    DonorId,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum DonationRequest {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
