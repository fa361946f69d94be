use sea_orm_migration::{prelude::*, schema::*};

use super::{m20260105_000001_create_user_table::User, m20260106_000012_create_event_table::Event};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EventStudent::Table)
                    .if_not_exists()
                    .col(pk_auto(EventStudent::Id))
                    .col(integer(EventStudent::EventId))
                    .col(integer(EventStudent::UserId))
                    .col(
                        timestamp_with_time_zone(EventStudent::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_student_event_id")
                            .from(EventStudent::Table, EventStudent::EventId)
                            .to(Event::Table, Event::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_student_user_id")
                            .from(EventStudent::Table, EventStudent::UserId)
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
                    .name("idx_event_student_unique")
                    .table(EventStudent::Table)
                    .col(EventStudent::EventId)
                    .col(EventStudent::UserId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EventStudent::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum EventStudent {
    Table,
    Id,
    EventId,
    UserId,
    CreatedAt,
}
