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
                    .table(CourseReview::Table)
                    .if_not_exists()
                    .col(pk_auto(CourseReview::Id))
                    .col(integer(CourseReview::CourseId))
                    .col(integer(CourseReview::UserId))
                    .col(integer(CourseReview::Rating))
                    .col(text_null(CourseReview::Comment))
                    .col(
                        timestamp_with_time_zone(CourseReview::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_review_course_id")
                            .from(CourseReview::Table, CourseReview::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_review_user_id")
                            .from(CourseReview::Table, CourseReview::UserId)
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
                    .name("idx_course_review_unique")
                    .table(CourseReview::Table)
                    .col(CourseReview::CourseId)
                    .col(CourseReview::UserId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CourseReview::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum CourseReview {
    Table,
    Id,
    CourseId,
    UserId,
    Rating,
    Comment,
    CreatedAt,
}
