use sea_orm_migration::{prelude::*, schema::*};

use super::{
    m20260105_000001_create_user_table::User, m20260105_000004_create_course_table::Course,
    m20260106_000014_create_payment_table::Payment,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Enrollment::Table)
                    .if_not_exists()
                    .col(pk_auto(Enrollment::Id))
                    .col(integer(Enrollment::StudentId))
                    .col(integer(Enrollment::CourseId))
                    .col(string(Enrollment::Status).default("pending"))
                    .col(integer_null(Enrollment::PaymentId))
                    .col(
                        timestamp_with_time_zone(Enrollment::EnrolledAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(double(Enrollment::ProgressPercentage).default(0.0))
                    .col(boolean(Enrollment::Completed).default(false))
                    .col(double(Enrollment::WatchHours).default(0.0))
                    .col(timestamp_with_time_zone_null(Enrollment::LastAccessed))
                    .col(string_null(Enrollment::Grade))
                    .col(text_null(Enrollment::Feedback))
                    .col(timestamp_with_time_zone_null(Enrollment::CertificateDownloadedAt))
                    .col(
                        timestamp_with_time_zone(Enrollment::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(Enrollment::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollment_student_id")
                            .from(Enrollment::Table, Enrollment::StudentId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollment_course_id")
                            .from(Enrollment::Table, Enrollment::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollment_payment_id")
                            .from(Enrollment::Table, Enrollment::PaymentId)
                            .to(Payment::Table, Payment::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_enrollment_student_course")
                    .table(Enrollment::Table)
                    .col(Enrollment::StudentId)
                    .col(Enrollment::CourseId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Enrollment::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Enrollment {
    Table,
    Id,
    StudentId,
    CourseId,
    Status,
    PaymentId,
    EnrolledAt,
    ProgressPercentage,
    Completed,
    WatchHours,
    LastAccessed,
    Grade,
    Feedback,
    CertificateDownloadedAt,
    CreatedAt,
    UpdatedAt,
}
