//! Migration: Create guest_requests table.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GuestRequests::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GuestRequests::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(GuestRequests::ResidentUserId).uuid().not_null())
                    .col(ColumnDef::new(GuestRequests::GuestFullName).string().not_null())
                    .col(ColumnDef::new(GuestRequests::PlateNumber).string_len(16).not_null())
                    .col(
                        ColumnDef::new(GuestRequests::ValidFrom)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GuestRequests::ValidTo)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GuestRequests::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(GuestRequests::CreatedBy).uuid().null())
                    .col(ColumnDef::new(GuestRequests::UpdatedBy).uuid().null())
                    .col(
                        ColumnDef::new(GuestRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(GuestRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(GuestRequests::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_guest_requests_resident_user_id")
                            .from(GuestRequests::Table, GuestRequests::ResidentUserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_guest_requests_resident_user_id")
                    .table(GuestRequests::Table)
                    .col(GuestRequests::ResidentUserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_guest_requests_deleted_at")
                    .table(GuestRequests::Table)
                    .col(GuestRequests::DeletedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GuestRequests::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum GuestRequests {
    Table,
    Id,
    ResidentUserId,
    GuestFullName,
    PlateNumber,
    ValidFrom,
    ValidTo,
    Status,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
