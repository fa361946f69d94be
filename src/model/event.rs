use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::api::{CourseRefDto, UserSummaryDto};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventDto {
    #[serde(rename = "_id")]
    pub id: i32,
    pub title: String,
    pub instructor: Option<UserSummaryDto>,
    #[serde(rename = "type")]
    pub event_type: String,
    pub date: DateTime<Utc>,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub max_students: i32,
    pub enrolled_students: Vec<i32>,
    pub status: String,
    pub course: Option<CourseRefDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventDto {
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub location: String,
    pub max_students: Option<i32>,
    pub course: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventDto {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub location: Option<String>,
    pub max_students: Option<i32>,
    pub status: Option<String>,
    pub course: Option<i32>,
}
