//! Create contact table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Contact::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Contact::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Contact::UserFromId).string_len(32).not_null())
                    .col(ColumnDef::new(Contact::UserToId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Contact::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contact_user_from")
                            .from(Contact::Table, Contact::UserFromId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contact_user_to")
                            .from(Contact::Table, Contact::UserToId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (user_from_id, user_to_id) - prevent duplicate follows
        manager
            .create_index(
                Index::create()
                    .name("idx_contact_from_to")
                    .table(Contact::Table)
                    .col(Contact::UserFromId)
                    .col(Contact::UserToId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: user_to_id (for listing followers)
        manager
            .create_index(
                Index::create()
                    .name("idx_contact_user_to_id")
                    .table(Contact::Table)
                    .col(Contact::UserToId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Contact::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Contact {
    Table,
    Id,
    UserFromId,
    UserToId,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
