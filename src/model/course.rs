use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::{api::UserSummaryDto, lesson::LessonDto};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseDto {
    #[serde(rename = "_id")]
    pub id: i32,
    pub title: String,
    pub description: String,
    pub instructor_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructor: Option<UserSummaryDto>,
    pub thumbnail: String,
    pub price: f64,
    pub duration: String,
    pub level: String,
    pub category: String,
    pub rating: f64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseReviewDto {
    #[serde(rename = "_id")]
    pub id: i32,
    pub user: Option<UserSummaryDto>,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Course with its instructor, ordered lessons and reviews.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetailDto {
    #[serde(flatten)]
    pub course: CourseDto,
    pub lessons: Vec<LessonDto>,
    pub reviews: Vec<CourseReviewDto>,
    pub enrolled_students: Vec<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseDto {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub level: Option<String>,
    pub price: Option<f64>,
    pub duration: Option<String>,
    pub thumbnail: Option<String>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseDto {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub level: Option<String>,
    pub price: Option<f64>,
    pub duration: Option<String>,
    pub thumbnail: Option<String>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaginatedCoursesDto {
    pub courses: Vec<CourseDto>,
    pub page: u64,
    pub pages: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateReviewDto {
    #[serde(default)]
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CertificateDto {
    pub id: String,
    pub student_name: String,
    pub course_name: String,
    pub instructor_name: String,
    pub completion_date: DateTime<Utc>,
    pub completion_percentage: f64,
    pub course_id: i32,
    pub enrollment_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CertificateResponseDto {
    pub message: String,
    pub certificate: CertificateDto,
    pub download_url: String,
}
