use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::api::CourseRefDto;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatRequestDto {
    pub message: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatReplyDto {
    pub reply: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AiQueryDto {
    pub course_id: Option<i32>,
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AiInteractionDto {
    #[serde(rename = "_id")]
    pub id: i32,
    pub user_id: i32,
    pub course_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<CourseRefDto>,
    pub query: String,
    pub response: String,
    pub rating: Option<i32>,
    pub timestamp: DateTime<Utc>,
}
