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
                    .table(CourseStudent::Table)
                    .if_not_exists()
                    .col(pk_auto(CourseStudent::Id))
                    .col(integer(CourseStudent::CourseId))
                    .col(integer(CourseStudent::UserId))
                    .col(
                        timestamp_with_time_zone(CourseStudent::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_student_course_id")
                            .from(CourseStudent::Table, CourseStudent::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_student_user_id")
                            .from(CourseStudent::Table, CourseStudent::UserId)
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
                    .name("idx_course_student_unique")
                    .table(CourseStudent::Table)
                    .col(CourseStudent::CourseId)
                    .col(CourseStudent::UserId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CourseStudent::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum CourseStudent {
    Table,
    Id,
    CourseId,
    UserId,
    CreatedAt,
}
