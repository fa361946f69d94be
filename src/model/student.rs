use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::{
    achievement::AchievementDto,
    api::{CourseRefDto, UserSummaryDto},
    course::CourseDetailDto,
    user::UserDto,
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverviewDto {
    pub total_courses_enrolled: u64,
    pub completed_courses: u64,
    pub in_progress_courses: u64,
    pub total_study_hours: f64,
    pub average_progress: i32,
    pub total_achievements: u64,
    pub streak_days: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentDashboardDto {
    pub student: UserSummaryDto,
    pub overview: DashboardOverviewDto,
}

/// An enrolled course together with the learner's progress in it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentCourseDto {
    #[serde(rename = "_id")]
    pub id: i32,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub instructor: Option<UserSummaryDto>,
    pub level: String,
    pub completion_percentage: i32,
    pub hours_spent: f64,
    pub completed_lessons: u64,
    pub total_lessons: u64,
    pub enrollment_date: DateTime<Utc>,
    pub certificate_downloaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserCourseProgressDto {
    pub completion_percentage: i32,
    pub hours_spent: f64,
    pub completed_lessons: Vec<i32>,
    pub enrollment_date: DateTime<Utc>,
    pub certificate_downloaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentCourseDetailDto {
    pub course: CourseDetailDto,
    pub enrollment: UserCourseProgressDto,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompleteLessonDto {
    pub hours_spent: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonCompletionDto {
    pub completion_percentage: i32,
    pub hours_spent: f64,
    pub completed_lessons: u64,
    pub total_lessons: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AchievementTotalsDto {
    pub all: usize,
    pub course_completions: usize,
    pub assessment_scores: usize,
    pub participation: usize,
    pub special: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentAchievementsDto {
    pub course_completions: Vec<AchievementDto>,
    pub assessment_scores: Vec<AchievementDto>,
    pub participation: Vec<AchievementDto>,
    pub special: Vec<AchievementDto>,
    pub total: AchievementTotalsDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseHoursDto {
    pub course: String,
    pub hours_spent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentActivityDto {
    pub total_hours: f64,
    pub hours_by_course: Vec<CourseHoursDto>,
    pub streak_days: i32,
    pub last_login_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentProfileDto {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub address: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfileDto {
    #[serde(flatten)]
    pub user: UserDto,
    pub enrolled_courses: Vec<CourseRefDto>,
    pub achievements: Vec<AchievementDto>,
}

/// Row created by a direct (unpaid) enrollment.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserCourseDto {
    #[serde(rename = "_id")]
    pub id: i32,
    pub course: i32,
    pub completed_lessons: Vec<i32>,
    pub hours_spent: f64,
    pub completion_percentage: i32,
    pub enrollment_date: DateTime<Utc>,
}
