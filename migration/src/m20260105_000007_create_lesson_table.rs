use sea_orm_migration::{prelude::*, schema::*};

use super::m20260105_000004_create_course_table::Course;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Lesson::Table)
                    .if_not_exists()
                    .col(pk_auto(Lesson::Id))
                    .col(integer(Lesson::CourseId))
                    .col(string(Lesson::Title))
                    .col(text(Lesson::Description))
                    .col(text(Lesson::Content))
                    .col(string_null(Lesson::VideoUrl))
                    .col(integer(Lesson::Duration))
                    .col(json(Lesson::Resources))
                    .col(integer(Lesson::OrderIndex).default(0))
                    .col(boolean(Lesson::IsPublished).default(false))
                    .col(
                        timestamp_with_time_zone(Lesson::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(Lesson::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lesson_course_id")
                            .from(Lesson::Table, Lesson::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_lesson_course_order")
                    .table(Lesson::Table)
                    .col(Lesson::CourseId)
                    .col(Lesson::OrderIndex)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Lesson::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Lesson {
    Table,
    Id,
    CourseId,
    Title,
    Description,
    Content,
    VideoUrl,
    Duration,
    Resources,
    OrderIndex,
    QuizId,
    IsPublished,
    CreatedAt,
    UpdatedAt,
}
