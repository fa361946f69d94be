use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::{achievement::AchievementDto, api::UserSummaryDto};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChildSummaryDto {
    #[serde(rename = "_id")]
    pub id: i32,
    pub full_name: String,
    pub email: String,
    pub enrolled_count: u64,
    pub avg_progress: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChildrenDto {
    pub children: Vec<ChildSummaryDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportCourseDto {
    pub course_id: i32,
    pub course_title: String,
    pub completion_percentage: i32,
    pub completed_lessons_count: u64,
    pub enrollment_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentReportDto {
    #[serde(rename = "_id")]
    pub id: i32,
    pub full_name: String,
    pub email: String,
    pub total_hours_learned: f64,
    pub achievements: Vec<AchievementDto>,
    pub enrolled_courses: Vec<ReportCourseDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentReportResponseDto {
    pub report: StudentReportDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkChildDto {
    pub email: Option<String>,
    pub student_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LinkChildResponseDto {
    pub message: String,
    pub student: UserSummaryDto,
}
