use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::{api::UserSummaryDto, course::CourseDto, lesson::LessonDto};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstructorCourseDto {
    #[serde(flatten)]
    pub course: CourseDto,
    pub lessons: Vec<LessonDto>,
    pub enrolled_students: Vec<UserSummaryDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstructorStudentDto {
    #[serde(rename = "_id")]
    pub id: i32,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: String,
    pub total_hours_learned: f64,
    pub streak_days: i32,
    pub enrolled_in_course_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentCourseProgressDto {
    pub student_id: i32,
    pub course_id: i32,
    pub course_name: String,
    pub completed_lessons: u64,
    pub total_lessons: u64,
    pub completion_percentage: i32,
    pub hours_spent: f64,
    pub enrollment_date: DateTime<Utc>,
}
