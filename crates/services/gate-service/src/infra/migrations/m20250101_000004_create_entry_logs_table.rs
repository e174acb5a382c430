//! Migration: Create entry_logs table.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_users_table::Users;
use super::m20250101_000002_create_passes_table::Passes;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EntryLogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(EntryLogs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(EntryLogs::PassId).uuid().not_null())
                    .col(ColumnDef::new(EntryLogs::GuardUserId).uuid().not_null())
                    .col(ColumnDef::new(EntryLogs::Action).string_len(8).not_null())
                    .col(ColumnDef::new(EntryLogs::Comment).text().null())
                    .col(
                        ColumnDef::new(EntryLogs::ActionAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_entry_logs_pass_id")
                            .from(EntryLogs::Table, EntryLogs::PassId)
                            .to(Passes::Table, Passes::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_entry_logs_guard_user_id")
                            .from(EntryLogs::Table, EntryLogs::GuardUserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_entry_logs_pass_id_action_at")
                    .table(EntryLogs::Table)
                    .col(EntryLogs::PassId)
                    .col(EntryLogs::ActionAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EntryLogs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum EntryLogs {
    Table,
    Id,
    PassId,
    GuardUserId,
    Action,
    Comment,
    ActionAt,
}
