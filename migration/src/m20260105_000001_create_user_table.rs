use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(pk_auto(User::Id))
                    .col(string(User::FullName))
                    .col(string_uniq(User::Email))
                    .col(string(User::PasswordHash))
                    .col(string(User::Role).default("student"))
                    .col(string(User::Status).default("active"))
                    .col(string_null(User::Phone))
                    .col(text_null(User::Bio))
                    .col(string_null(User::Location))
                    .col(string_null(User::Avatar))
                    .col(json_null(User::Address))
                    .col(integer(User::StreakDays).default(0))
                    .col(timestamp_with_time_zone_null(User::LastLoginDate))
                    .col(double(User::TotalHoursLearned).default(0.0))
                    .col(integer(User::WeeklyAttended).default(0))
                    .col(double(User::WeeklyStudyHours).default(0.0))
                    .col(integer(User::WeeklyUpcoming).default(0))
                    .col(
                        timestamp_with_time_zone(User::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(User::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum User {
    Table,
    Id,
    FullName,
    Email,
    PasswordHash,
    Role,
    Status,
    Phone,
    Bio,
    Location,
    Avatar,
    Address,
    StreakDays,
    LastLoginDate,
    TotalHoursLearned,
    WeeklyAttended,
    WeeklyStudyHours,
    WeeklyUpcoming,
    CreatedAt,
    UpdatedAt,
}
