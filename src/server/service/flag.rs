use sea_orm::DatabaseConnection;
use serde_json::Value;

use crate::server::{
    data::feature_flag::FeatureFlagRepository, error::AppError, model::flag::FeatureFlag,
};

pub struct FeatureFlagService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> FeatureFlagService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Reads a flag, creating it with value `false` when unknown.
    pub async fn get(&self, key: &str) -> Result<FeatureFlag, AppError> {
        Ok(FeatureFlagRepository::new(self.db).get_or_create(key).await?)
    }

    pub async fn list(&self) -> Result<Vec<FeatureFlag>, AppError> {
        Ok(FeatureFlagRepository::new(self.db).list().await?)
    }

    /// Writes a flag value on behalf of an admin, creating the flag if needed.
    pub async fn set(
        &self,
        key: &str,
        value: Value,
        admin_id: i32,
    ) -> Result<FeatureFlag, AppError> {
        let flag = FeatureFlagRepository::new(self.db)
            .upsert(key, value, admin_id)
            .await?;

        tracing::info!(
            "Feature flag '{}' set to {} by user {}",
            flag.key,
            flag.value,
            admin_id
        );

        Ok(flag)
    }
}
