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
                    .table(FeatureFlag::Table)
                    .if_not_exists()
                    .col(pk_auto(FeatureFlag::Id))
                    .col(string_uniq(FeatureFlag::Key))
                    .col(json(FeatureFlag::Value))
                    .col(string_null(FeatureFlag::Description))
                    .col(integer_null(FeatureFlag::UpdatedBy))
                    .col(
                        timestamp_with_time_zone(FeatureFlag::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(FeatureFlag::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feature_flag_updated_by")
                            .from(FeatureFlag::Table, FeatureFlag::UpdatedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FeatureFlag::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum FeatureFlag {
    Table,
    Id,
    Key,
    Value,
    Description,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}
