use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::api::{CourseRefDto, UserSummaryDto};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentDto {
    #[serde(rename = "_id")]
    pub id: i32,
    pub student_id: i32,
    pub course_id: i32,
    pub enrollment_status: String,
    pub payment_id: Option<i32>,
    pub enrolled_at: DateTime<Utc>,
    pub progress_percentage: f64,
    pub completed: bool,
    pub watch_hours: f64,
    pub last_accessed: Option<DateTime<Utc>>,
    pub grade: Option<String>,
    pub feedback: Option<String>,
    pub certificate_downloaded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentCourseDto {
    #[serde(rename = "_id")]
    pub id: i32,
    pub title: String,
    pub thumbnail: String,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentPaymentDto {
    #[serde(rename = "_id")]
    pub id: i32,
    pub status: String,
    pub transaction_id: Option<String>,
    pub amount: f64,
}

/// Enrollment listed for its student, with course and payment summaries.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentWithRefsDto {
    #[serde(flatten)]
    pub enrollment: EnrollmentDto,
    pub course: Option<EnrollmentCourseDto>,
    pub payment: Option<EnrollmentPaymentDto>,
}

/// Enrollment listed for administrators, with student and course summaries.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminEnrollmentDto {
    #[serde(flatten)]
    pub enrollment: EnrollmentDto,
    pub student: Option<UserSummaryDto>,
    pub course: Option<CourseRefDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnrollmentDto {
    pub course_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnrollmentResponseDto {
    pub message: String,
    pub enrollment_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivateEnrollmentDto {
    pub payment_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActivateEnrollmentResponseDto {
    pub message: String,
    pub enrollment: EnrollmentDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentStatusDto {
    pub enrolled: bool,
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEnrollmentDto {
    pub progress_percentage: Option<f64>,
    pub watch_hours: Option<f64>,
    pub completed: Option<bool>,
}
