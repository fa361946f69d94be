use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::EnrollmentStatus;

use crate::{
    model::enrollment::{
        EnrollmentCourseDto, EnrollmentDto, EnrollmentPaymentDto, EnrollmentStatusDto,
        EnrollmentWithRefsDto,
    },
    server::model::{course::Course, enum_name, payment::Payment},
};

#[derive(Debug, Clone, PartialEq)]
pub struct Enrollment {
    pub id: i32,
    pub student_id: i32,
    pub course_id: i32,
    pub status: EnrollmentStatus,
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

impl Enrollment {
    pub fn from_entity(entity: entity::enrollment::Model) -> Self {
        Self {
            id: entity.id,
            student_id: entity.student_id,
            course_id: entity.course_id,
            status: entity.status,
            payment_id: entity.payment_id,
            enrolled_at: entity.enrolled_at,
            progress_percentage: entity.progress_percentage,
            completed: entity.completed,
            watch_hours: entity.watch_hours,
            last_accessed: entity.last_accessed,
            grade: entity.grade,
            feedback: entity.feedback,
            certificate_downloaded_at: entity.certificate_downloaded_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }

    /// Active or completed enrollments grant course access.
    pub fn grants_access(&self) -> bool {
        matches!(
            self.status,
            EnrollmentStatus::Active | EnrollmentStatus::Completed
        )
    }

    pub fn status_dto(&self) -> EnrollmentStatusDto {
        EnrollmentStatusDto {
            enrolled: self.status == EnrollmentStatus::Active,
            status: Some(enum_name(&self.status)),
            enrollment_id: Some(self.id),
            progress_percentage: Some(self.progress_percentage),
            completed: Some(self.completed),
        }
    }

    pub fn into_dto(self) -> EnrollmentDto {
        EnrollmentDto {
            id: self.id,
            student_id: self.student_id,
            course_id: self.course_id,
            enrollment_status: enum_name(&self.status),
            payment_id: self.payment_id,
            enrolled_at: self.enrolled_at,
            progress_percentage: self.progress_percentage,
            completed: self.completed,
            watch_hours: self.watch_hours,
            last_accessed: self.last_accessed,
            grade: self.grade,
            feedback: self.feedback,
            certificate_downloaded_at: self.certificate_downloaded_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Enrollment with the purchased course and the payment that activated it.
#[derive(Debug, Clone)]
pub struct EnrollmentWithRefs {
    pub enrollment: Enrollment,
    pub course: Option<Course>,
    pub payment: Option<Payment>,
}

impl EnrollmentWithRefs {
    pub fn into_dto(self) -> EnrollmentWithRefsDto {
        EnrollmentWithRefsDto {
            enrollment: self.enrollment.into_dto(),
            course: self.course.map(|c| EnrollmentCourseDto {
                id: c.id,
                title: c.title,
                thumbnail: c.thumbnail,
                price: c.price,
            }),
            payment: self.payment.map(|p| EnrollmentPaymentDto {
                id: p.id,
                status: enum_name(&p.status),
                transaction_id: p.transaction_id,
                amount: p.amount,
            }),
        }
    }
}

/// Status reported when the caller has no enrollment for a course.
pub fn not_enrolled() -> EnrollmentStatusDto {
    EnrollmentStatusDto {
        enrolled: false,
        status: None,
        enrollment_id: None,
        progress_percentage: None,
        completed: None,
    }
}

/// Partial update of an enrollment. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateEnrollmentParams {
    pub status: Option<EnrollmentStatus>,
    pub payment_id: Option<i32>,
    pub enrolled_at: Option<DateTime<Utc>>,
    pub progress_percentage: Option<f64>,
    pub watch_hours: Option<f64>,
    pub completed: Option<bool>,
    pub last_accessed: Option<DateTime<Utc>>,
    pub grade: Option<String>,
    pub feedback: Option<String>,
    pub certificate_downloaded_at: Option<DateTime<Utc>>,
}
