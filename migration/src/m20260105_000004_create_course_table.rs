use sea_orm_migration::{prelude::*, schema::*};

use super::m20260105_000001_create_user_table::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Course::Table)
                    .if_not_exists()
                    .col(pk_auto(Course::Id))
                    .col(string(Course::Title))
                    .col(text(Course::Description))
                    .col(integer(Course::InstructorId))
                    .col(string(Course::Thumbnail).default(""))
                    .col(double(Course::Price))
                    .col(string(Course::Duration))
                    .col(string(Course::Level).default("Beginner"))
                    .col(string(Course::Category))
                    .col(double(Course::Rating).default(0.0))
                    .col(boolean(Course::IsPublished).default(false))
                    .col(
                        timestamp_with_time_zone(Course::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(Course::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_instructor_id")
                            .from(Course::Table, Course::InstructorId)
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
            .drop_table(Table::drop().table(Course::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Course {
    Table,
    Id,
    Title,
    Description,
    InstructorId,
    Thumbnail,
    Price,
    Duration,
    Level,
    Category,
    Rating,
    IsPublished,
    CreatedAt,
    UpdatedAt,
}
