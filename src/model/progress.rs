use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressStatsDto {
    pub enrolled_courses: u64,
    pub learning_hours: f64,
    pub achievements: u64,
    pub avg_score: i32,
    pub skill_level_label: String,
    pub skill_level_percent: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SkillDto {
    pub name: String,
    pub percent: i32,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CertificateStatusDto {
    pub id: i32,
    pub course_id: i32,
    pub title: String,
    pub enrolled_at: DateTime<Utc>,
    /// `Pending`, `Available` or `Downloaded`.
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntryDto {
    pub id: i32,
    pub action: String,
    pub description: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressOverviewDto {
    pub stats: ProgressStatsDto,
    pub skills: Vec<SkillDto>,
    pub certificates: Vec<CertificateStatusDto>,
    pub recent_activity: Vec<ActivityEntryDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivityDto {
    pub recent_activity: Vec<ActivityEntryDto>,
}
