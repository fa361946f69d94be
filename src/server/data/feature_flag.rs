//! Feature flag repository.
//!
//! Flags are keyed by a unique string and hold an arbitrary JSON value. Reading an
//! unknown key creates it with `false`.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, SqlErr,
};
use serde_json::Value;

use crate::server::model::flag::FeatureFlag;

pub struct FeatureFlagRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> FeatureFlagRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_key(&self, key: &str) -> Result<Option<FeatureFlag>, DbErr> {
        let entity = entity::prelude::FeatureFlag::find()
            .filter(entity::feature_flag::Column::Key.eq(key))
            .one(self.db)
            .await?;

        Ok(entity.map(FeatureFlag::from_entity))
    }

    /// Returns the flag, creating it with value `false` when missing.
    ///
    /// A concurrent reader may insert the same key first; the unique violation is
    /// answered with that row.
    pub async fn get_or_create(&self, key: &str) -> Result<FeatureFlag, DbErr> {
        if let Some(flag) = self.find_by_key(key).await? {
            return Ok(flag);
        }

        let now = Utc::now();
        let inserted = entity::feature_flag::ActiveModel {
            key: ActiveValue::Set(key.to_string()),
            value: ActiveValue::Set(Value::Bool(false)),
            description: ActiveValue::Set(None),
            updated_by: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await;

        match inserted {
            Ok(entity) => Ok(FeatureFlag::from_entity(entity)),
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                self.find_by_key(key).await?.ok_or(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Sets a flag's value, creating the flag when missing.
    ///
    /// # Arguments
    /// - `key` - Flag key
    /// - `value` - New JSON value
    /// - `updated_by` - Admin performing the write
    ///
    /// # Returns
    /// - `Ok(FeatureFlag)` - The flag as stored
    /// - `Err(DbErr)` - Database error
    pub async fn upsert(
        &self,
        key: &str,
        value: Value,
        updated_by: i32,
    ) -> Result<FeatureFlag, DbErr> {
        let now = Utc::now();

        let existing = entity::prelude::FeatureFlag::find()
            .filter(entity::feature_flag::Column::Key.eq(key))
            .one(self.db)
            .await?;

        let entity = match existing {
            Some(flag) => {
                let mut active = flag.into_active_model();
                active.value = ActiveValue::Set(value);
                active.updated_by = ActiveValue::Set(Some(updated_by));
                active.updated_at = ActiveValue::Set(now);
                active.update(self.db).await?
            }
            None => {
                entity::feature_flag::ActiveModel {
                    key: ActiveValue::Set(key.to_string()),
                    value: ActiveValue::Set(value),
                    description: ActiveValue::Set(None),
                    updated_by: ActiveValue::Set(Some(updated_by)),
                    created_at: ActiveValue::Set(now),
                    updated_at: ActiveValue::Set(now),
                    ..Default::default()
                }
                .insert(self.db)
                .await?
            }
        };

        Ok(FeatureFlag::from_entity(entity))
    }

    /// Every flag ordered by key.
    pub async fn list(&self) -> Result<Vec<FeatureFlag>, DbErr> {
        let flags = entity::prelude::FeatureFlag::find()
            .order_by_asc(entity::feature_flag::Column::Key)
            .all(self.db)
            .await?;

        Ok(flags.into_iter().map(FeatureFlag::from_entity).collect())
    }
}
