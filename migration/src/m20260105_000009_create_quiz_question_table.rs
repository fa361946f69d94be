use sea_orm_migration::{prelude::*, schema::*};

use super::m20260105_000008_create_quiz_table::Quiz;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(QuizQuestion::Table)
                    .if_not_exists()
                    .col(pk_auto(QuizQuestion::Id))
                    .col(integer(QuizQuestion::QuizId))
                    .col(integer(QuizQuestion::Position))
                    .col(text(QuizQuestion::Question))
                    .col(json(QuizQuestion::Options))
                    .col(text_null(QuizQuestion::Explanation))
                    .col(integer(QuizQuestion::Marks).default(1))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_quiz_question_quiz_id")
                            .from(QuizQuestion::Table, QuizQuestion::QuizId)
                            .to(Quiz::Table, Quiz::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(QuizQuestion::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum QuizQuestion {
    Table,
    Id,
    QuizId,
    Position,
    Question,
    Options,
    Explanation,
    Marks,
}
