use sea_orm_migration::{prelude::*, schema::*};

use super::{
    m20260105_000001_create_user_table::User, m20260105_000004_create_course_table::Course,
    m20260105_000007_create_lesson_table::Lesson,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Quiz::Table)
                    .if_not_exists()
                    .col(pk_auto(Quiz::Id))
                    .col(integer(Quiz::CourseId))
                    .col(integer_null(Quiz::LessonId))
                    .col(integer(Quiz::InstructorId))
                    .col(string(Quiz::Title))
                    .col(text_null(Quiz::Description))
                    .col(integer(Quiz::Duration).default(60))
                    .col(integer(Quiz::TotalMarks))
                    .col(integer(Quiz::PassingPercentage).default(60))
                    .col(boolean(Quiz::IsPublished).default(false))
                    .col(
                        timestamp_with_time_zone(Quiz::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(Quiz::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_quiz_course_id")
                            .from(Quiz::Table, Quiz::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_quiz_lesson_id")
                            .from(Quiz::Table, Quiz::LessonId)
                            .to(Lesson::Table, Lesson::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_quiz_instructor_id")
                            .from(Quiz::Table, Quiz::InstructorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Quiz::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Quiz {
    Table,
    Id,
    CourseId,
    LessonId,
    InstructorId,
    Title,
    Description,
    Duration,
    TotalMarks,
    PassingPercentage,
    IsPublished,
    CreatedAt,
    UpdatedAt,
}
