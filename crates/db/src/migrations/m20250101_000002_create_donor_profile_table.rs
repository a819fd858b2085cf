//! Create donor profile table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DonorProfile::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DonorProfile::UserId)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DonorProfile::BloodType).string_len(16).not_null())
                    .col(ColumnDef::new(DonorProfile::City).string_len(128).not_null())
                    .col(ColumnDef::new(DonorProfile::Pincode).string_len(6).not_null())
                    .col(
                        ColumnDef::new(DonorProfile::AvailabilityStatus)
                            .string_len(32)
                            .not_null()
                            .default("AVAILABLE"),
                    )
                    .col(ColumnDef::new(DonorProfile::StatusReason).string_len(512))
                    .col(ColumnDef::new(DonorProfile::UnavailableUntil).date())
                    .col(ColumnDef::new(DonorProfile::NextEligibleDonationDate).date())
                    .col(
                        ColumnDef::new(DonorProfile::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(DonorProfile::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_donor_profile_user")
                            .from(DonorProfile::Table, DonorProfile::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (blood_type, availability_status) for matching and search
        manager
            .create_index(
                Index::create()
                    .name("idx_donor_profile_blood_type_availability")
                    .table(DonorProfile::Table)
                    .col(DonorProfile::BloodType)
                    .col(DonorProfile::AvailabilityStatus)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_donor_profile_city")
                    .table(DonorProfile::Table)
                    .col(DonorProfile::City)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_donor_profile_pincode")
                    .table(DonorProfile::Table)
                    .col(DonorProfile::Pincode)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DonorProfile::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum DonorProfile {
    Table,
    UserId,
    BloodType,
    City,
    Pincode,
    AvailabilityStatus,
    StatusReason,
    UnavailableUntil,
    NextEligibleDonationDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
