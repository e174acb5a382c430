//! Migration: Create passes table.

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
                    .table(Passes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Passes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Passes::OwnerUserId).uuid().not_null())
                    .col(ColumnDef::new(Passes::PlateNumber).string_len(16).not_null())
                    .col(ColumnDef::new(Passes::VehicleBrand).string().null())
                    .col(ColumnDef::new(Passes::VehicleColor).string().null())
                    .col(ColumnDef::new(Passes::Status).string().not_null().default("active"))
                    .col(ColumnDef::new(Passes::CreatedBy).uuid().null())
                    .col(ColumnDef::new(Passes::UpdatedBy).uuid().null())
                    .col(
                        ColumnDef::new(Passes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Passes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Passes::DeletedAt).timestamp_with_time_zone().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_passes_owner_user_id")
                            .from(Passes::Table, Passes::OwnerUserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_passes_owner_user_id")
                    .table(Passes::Table)
                    .col(Passes::OwnerUserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_passes_plate_number")
                    .table(Passes::Table)
                    .col(Passes::PlateNumber)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_passes_deleted_at")
                    .table(Passes::Table)
                    .col(Passes::DeletedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Passes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Passes {
    Table,
    Id,
    OwnerUserId,
    PlateNumber,
    VehicleBrand,
    VehicleColor,
    Status,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
