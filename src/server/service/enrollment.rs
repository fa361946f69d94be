//! Paid enrollment lifecycle.
//!
//! An enrollment starts `pending`, becomes `active` once a completed payment by the same
//! student for the same course is attached, and `completed` when the student reports
//! the course done. Activation also adds the course to the student's progress list and
//! the student to the course roster, all in one transaction.

use chrono::Utc;
use entity::sea_orm_active_enums::EnrollmentStatus;
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde_json::json;

use crate::{
    model::enrollment::{EnrollmentStatusDto, UpdateEnrollmentDto},
    server::{
        data::{
            course::{CourseRepository, CourseStudentRepository},
            enrollment::EnrollmentRepository,
            payment::PaymentRepository,
            user_course::UserCourseRepository,
        },
        error::{auth::AuthError, AppError},
        model::enrollment::{
            not_enrolled, Enrollment, EnrollmentWithRefs, UpdateEnrollmentParams,
        },
    },
};

pub struct EnrollmentService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> EnrollmentService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Opens a pending enrollment ahead of payment.
    ///
    /// # Returns
    /// - `Ok(Enrollment)` - The pending enrollment
    /// - `Err(AppError::NotFound)` - No course with this ID
    /// - `Err(AppError::BadRequestWith)` - An enrollment already exists, with its `enrollmentId`
    pub async fn create(&self, student_id: i32, course_id: i32) -> Result<Enrollment, AppError> {
        CourseRepository::new(self.db)
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

        let enrollment_repo = EnrollmentRepository::new(self.db);
        if let Some(existing) = enrollment_repo.find_by_pair(student_id, course_id).await? {
            return Err(AppError::BadRequestWith {
                message: "Already enrolled or payment pending for this course".to_string(),
                extra: json!({ "enrollmentId": existing.id }),
            });
        }

        let enrollment = enrollment_repo
            .create(student_id, course_id, EnrollmentStatus::Pending)
            .await?;

        tracing::info!(
            "Pending enrollment {} opened for student {} in course {}",
            enrollment.id,
            student_id,
            course_id
        );

        Ok(enrollment)
    }

    /// Activates a pending enrollment with a completed payment.
    ///
    /// The payment must exist, be completed, belong to the caller and be for the
    /// enrollment's course.
    ///
    /// # Arguments
    /// - `student_id` - Caller, who must own the enrollment
    /// - `enrollment_id` - Enrollment to activate
    /// - `payment_id` - Completed payment to attach
    ///
    /// # Returns
    /// - `Ok(Enrollment)` - The active enrollment
    /// - `Err(AppError::NotFound)` - Unknown enrollment or payment
    /// - `Err(AppError::AuthErr)` - Enrollment or payment belongs to another user
    /// - `Err(AppError::BadRequest)` - Payment not completed or for another course
    pub async fn activate(
        &self,
        student_id: i32,
        enrollment_id: i32,
        payment_id: i32,
    ) -> Result<Enrollment, AppError> {
        let enrollment = self.require(enrollment_id).await?;
        if enrollment.student_id != student_id {
            return Err(AuthError::AccessDenied(
                "Not authorized to activate this enrollment".to_string(),
            )
            .into());
        }

        let payment = PaymentRepository::new(self.db)
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;
        if !payment.is_completed() {
            return Err(AppError::BadRequest("Payment not completed".to_string()));
        }
        if payment.user_id != student_id {
            return Err(AuthError::AccessDenied(
                "Payment does not belong to current user".to_string(),
            )
            .into());
        }
        if payment.course_id != Some(enrollment.course_id) {
            return Err(AppError::BadRequest(
                "Payment course does not match enrollment course".to_string(),
            ));
        }

        let txn = self.db.begin().await?;

        let activated = EnrollmentRepository::new(&txn)
            .update(
                enrollment_id,
                UpdateEnrollmentParams {
                    status: Some(EnrollmentStatus::Active),
                    payment_id: Some(payment_id),
                    enrolled_at: Some(Utc::now()),
                    ..Default::default()
                },
            )
            .await?
            .ok_or_else(enrollment_not_found)?;
        UserCourseRepository::new(&txn)
            .ensure(student_id, enrollment.course_id)
            .await?;
        CourseStudentRepository::new(&txn)
            .add(enrollment.course_id, student_id)
            .await?;

        txn.commit().await?;

        tracing::info!(
            "Enrollment {} activated with payment {}",
            enrollment_id,
            payment_id
        );

        Ok(activated)
    }

    /// The caller's enrollments with course and payment summaries.
    pub async fn list(&self, student_id: i32) -> Result<Vec<EnrollmentWithRefs>, AppError> {
        let enrollments = EnrollmentRepository::new(self.db)
            .find_by_student(student_id)
            .await?;

        let course_ids: Vec<i32> = enrollments.iter().map(|e| e.course_id).collect();
        let payment_ids: Vec<i32> = enrollments.iter().filter_map(|e| e.payment_id).collect();
        let mut courses = CourseRepository::new(self.db)
            .find_by_ids(&course_ids)
            .await?;
        let mut payments = PaymentRepository::new(self.db)
            .find_by_ids(&payment_ids)
            .await?;

        Ok(enrollments
            .into_iter()
            .map(|enrollment| EnrollmentWithRefs {
                course: courses.remove(&enrollment.course_id),
                payment: enrollment.payment_id.and_then(|id| payments.remove(&id)),
                enrollment,
            })
            .collect())
    }

    /// Enrollment state of the caller for one course.
    pub async fn status(
        &self,
        student_id: i32,
        course_id: i32,
    ) -> Result<EnrollmentStatusDto, AppError> {
        let enrollment = EnrollmentRepository::new(self.db)
            .find_by_pair(student_id, course_id)
            .await?;

        Ok(enrollment.map_or_else(not_enrolled, |e| e.status_dto()))
    }

    /// Merges progress reported by the student into their enrollment.
    ///
    /// `completed = true` also moves the enrollment to `completed`. The access time is
    /// always refreshed.
    pub async fn update(
        &self,
        student_id: i32,
        enrollment_id: i32,
        dto: UpdateEnrollmentDto,
    ) -> Result<Enrollment, AppError> {
        let enrollment = self.require(enrollment_id).await?;
        if enrollment.student_id != student_id {
            return Err(AuthError::AccessDenied(
                "Not authorized to update this enrollment".to_string(),
            )
            .into());
        }

        let status = (dto.completed == Some(true)).then_some(EnrollmentStatus::Completed);

        EnrollmentRepository::new(self.db)
            .update(
                enrollment_id,
                UpdateEnrollmentParams {
                    status,
                    progress_percentage: dto.progress_percentage,
                    watch_hours: dto.watch_hours,
                    completed: dto.completed,
                    last_accessed: Some(Utc::now()),
                    ..Default::default()
                },
            )
            .await?
            .ok_or_else(enrollment_not_found)
    }

    async fn require(&self, enrollment_id: i32) -> Result<Enrollment, AppError> {
        EnrollmentRepository::new(self.db)
            .find_by_id(enrollment_id)
            .await?
            .ok_or_else(enrollment_not_found)
    }
}

fn enrollment_not_found() -> AppError {
    AppError::NotFound("Enrollment not found".to_string())
}
