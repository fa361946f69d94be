use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::api::{CourseRefDto, UserSummaryDto};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AchievementDto {
    #[serde(rename = "_id")]
    pub id: i32,
    pub user_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummaryDto>,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub achievement_type: String,
    pub points: i32,
    pub course: Option<CourseRefDto>,
    pub icon: String,
    pub date_earned: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateAchievementDto {
    pub user: Option<i32>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub achievement_type: Option<String>,
    pub points: Option<i32>,
    pub course: Option<i32>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PointsDto {
    pub points: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntryDto {
    pub user: Option<UserSummaryDto>,
    pub total_points: i64,
}
