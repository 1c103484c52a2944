//! Create action table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Action::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Action::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Action::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Action::Verb).string_len(256).not_null())
                    .col(ColumnDef::new(Action::TargetType).string_len(16))
                    .col(ColumnDef::new(Action::TargetId).string_len(32))
                    .col(
                        ColumnDef::new(Action::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_action_user")
                            .from(Action::Table, Action::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id (for excluding/filtering by actor)
        manager
            .create_index(
                Index::create()
                    .name("idx_action_user_id")
                    .table(Action::Table)
                    .col(Action::UserId)
                    .to_owned(),
            )
            .await?;

        // Index: created_at (feed is read newest-first)
        manager
            .create_index(
                Index::create()
                    .name("idx_action_created_at")
                    .table(Action::Table)
                    .col(Action::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Action::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Action {
    Table,
    Id,
    UserId,
    Verb,
    TargetType,
    TargetId,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
