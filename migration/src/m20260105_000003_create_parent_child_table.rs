use sea_orm_migration::{prelude::*, schema::*};

use super::m20260105_000001_create_user_table::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ParentChild::Table)
                    .if_not_exists()
                    .col(pk_auto(ParentChild::Id))
                    .col(integer(ParentChild::ParentId))
                    .col(integer(ParentChild::StudentId))
                    .col(
                        timestamp_with_time_zone(ParentChild::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_parent_child_parent_id")
                            .from(ParentChild::Table, ParentChild::ParentId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_parent_child_student_id")
                            .from(ParentChild::Table, ParentChild::StudentId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_parent_child_unique")
                    .table(ParentChild::Table)
                    .col(ParentChild::ParentId)
                    .col(ParentChild::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ParentChild::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ParentChild {
    Table,
    Id,
    ParentId,
    StudentId,
    CreatedAt,
}
