use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Public view of a flag: just its key and value.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeatureFlagValueDto {
    pub key: String,
    #[schema(value_type = Object)]
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFlagDto {
    #[serde(rename = "_id")]
    pub id: i32,
    pub key: String,
    #[schema(value_type = Object)]
    pub value: serde_json::Value,
    pub description: Option<String>,
    pub updated_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SetFeatureFlagDto {
    #[serde(default)]
    #[schema(value_type = Object)]
    pub value: serde_json::Value,
}
