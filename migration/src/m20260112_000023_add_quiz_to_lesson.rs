use sea_orm_migration::{prelude::*, schema::*};

use super::m20260105_000007_create_lesson_table::Lesson;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Lesson::Table)
                    .add_column(integer_null(Lesson::QuizId))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Lesson::Table)
                    .drop_column(Lesson::QuizId)
                    .to_owned(),
            )
            .await
    }
}
