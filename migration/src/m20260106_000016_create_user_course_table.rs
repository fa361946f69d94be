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
                    .table(UserCourse::Table)
                    .if_not_exists()
                    .col(pk_auto(UserCourse::Id))
                    .col(integer(UserCourse::UserId))
                    .col(integer(UserCourse::CourseId))
                    .col(double(UserCourse::HoursSpent).default(0.0))
                    .col(integer(UserCourse::CompletionPercentage).default(0))
                    .col(
                        timestamp_with_time_zone(UserCourse::EnrollmentDate)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(timestamp_with_time_zone_null(UserCourse::CertificateDownloadedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_course_user_id")
                            .from(UserCourse::Table, UserCourse::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_course_course_id")
                            .from(UserCourse::Table, UserCourse::CourseId)
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
                    .name("idx_user_course_unique")
                    .table(UserCourse::Table)
                    .col(UserCourse::UserId)
                    .col(UserCourse::CourseId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserCourse::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum UserCourse {
    Table,
    Id,
    UserId,
    CourseId,
    HoursSpent,
    CompletionPercentage,
    EnrollmentDate,
    CertificateDownloadedAt,
}
