use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::model::flag::{FeatureFlagDto, FeatureFlagValueDto};

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureFlag {
    pub id: i32,
    pub key: String,
    pub value: Value,
    pub description: Option<String>,
    pub updated_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FeatureFlag {
    pub fn from_entity(entity: entity::feature_flag::Model) -> Self {
        Self {
            id: entity.id,
            key: entity.key,
            value: entity.value,
            description: entity.description,
            updated_by: entity.updated_by,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }

    pub fn into_value_dto(self) -> FeatureFlagValueDto {
        FeatureFlagValueDto {
            key: self.key,
            value: self.value,
        }
    }

    pub fn into_dto(self) -> FeatureFlagDto {
        FeatureFlagDto {
            id: self.id,
            key: self.key,
            value: self.value,
            description: self.description,
            updated_by: self.updated_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
