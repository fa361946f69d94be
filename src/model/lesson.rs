use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::api::CourseRefDto;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonDto {
    #[serde(rename = "_id")]
    pub id: i32,
    pub course_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<CourseRefDto>,
    pub title: String,
    pub description: String,
    pub content: String,
    pub video_url: Option<String>,
    pub duration: i32,
    #[schema(value_type = Object)]
    pub resources: serde_json::Value,
    pub order: i32,
    pub quiz_id: Option<i32>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLessonDto {
    pub course_id: Option<i32>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    pub video_url: Option<String>,
    pub duration: Option<i32>,
    pub order: Option<i32>,
    #[schema(value_type = Option<Object>)]
    pub resources: Option<serde_json::Value>,
    pub quiz_id: Option<i32>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLessonDto {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub video_url: Option<String>,
    pub duration: Option<i32>,
    pub order: Option<i32>,
    #[schema(value_type = Option<Object>)]
    pub resources: Option<serde_json::Value>,
    pub quiz_id: Option<i32>,
    pub is_published: Option<bool>,
}
