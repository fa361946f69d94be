use sea_orm_migration::{prelude::*, schema::*};

use super::{
    m20260105_000007_create_lesson_table::Lesson,
    m20260106_000016_create_user_course_table::UserCourse,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserCourseLesson::Table)
                    .if_not_exists()
                    .col(pk_auto(UserCourseLesson::Id))
                    .col(integer(UserCourseLesson::UserCourseId))
                    .col(integer(UserCourseLesson::LessonId))
                    .col(
                        timestamp_with_time_zone(UserCourseLesson::CompletedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_course_lesson_user_course_id")
                            .from(UserCourseLesson::Table, UserCourseLesson::UserCourseId)
                            .to(UserCourse::Table, UserCourse::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_course_lesson_lesson_id")
                            .from(UserCourseLesson::Table, UserCourseLesson::LessonId)
                            .to(Lesson::Table, Lesson::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_course_lesson_unique")
                    .table(UserCourseLesson::Table)
                    .col(UserCourseLesson::UserCourseId)
                    .col(UserCourseLesson::LessonId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserCourseLesson::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum UserCourseLesson {
    Table,
    Id,
    UserCourseId,
    LessonId,
    CompletedAt,
}
