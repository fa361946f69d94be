use sea_orm_migration::{prelude::*, schema::*};

use super::{m20260105_000001_create_user_table::User, m20260105_000004_create_course_table::Course};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AiInteraction::Table)
                    .if_not_exists()
                    .col(pk_auto(AiInteraction::Id))
                    .col(integer(AiInteraction::UserId))
                    .col(integer_null(AiInteraction::CourseId))
                    .col(text(AiInteraction::Query))
                    .col(text(AiInteraction::Response))
                    .col(integer_null(AiInteraction::Rating))
                    .col(
                        timestamp_with_time_zone(AiInteraction::Timestamp)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ai_interaction_user_id")
                            .from(AiInteraction::Table, AiInteraction::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ai_interaction_course_id")
                            .from(AiInteraction::Table, AiInteraction::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AiInteraction::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum AiInteraction {
    Table,
    Id,
    UserId,
    CourseId,
    Query,
    Response,
    Rating,
    Timestamp,
}
