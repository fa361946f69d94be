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
                    .table(Achievement::Table)
                    .if_not_exists()
                    .col(pk_auto(Achievement::Id))
                    .col(integer(Achievement::UserId))
                    .col(string(Achievement::Title))
                    .col(text(Achievement::Description))
                    .col(string(Achievement::AchievementType))
                    .col(integer(Achievement::Points).default(0))
                    .col(integer_null(Achievement::CourseId))
                    .col(string(Achievement::Icon).default(""))
                    .col(
                        timestamp_with_time_zone(Achievement::DateEarned)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(Achievement::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_achievement_user_id")
                            .from(Achievement::Table, Achievement::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_achievement_course_id")
                            .from(Achievement::Table, Achievement::CourseId)
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
            .drop_table(Table::drop().table(Achievement::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Achievement {
    Table,
    Id,
    UserId,
    Title,
    Description,
    AchievementType,
    Points,
    CourseId,
    Icon,
    DateEarned,
    CreatedAt,
}
