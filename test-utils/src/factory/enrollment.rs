//! Enrollment factory for creating test enrollment entities.

use chrono::Utc;
use entity::sea_orm_active_enums::EnrollmentStatus;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test enrollments.
pub struct EnrollmentFactory<'a> {
    db: &'a DatabaseConnection,
    student_id: i32,
    course_id: i32,
    status: EnrollmentStatus,
    payment_id: Option<i32>,
    progress_percentage: f64,
}

impl<'a> EnrollmentFactory<'a> {
    /// Creates a new EnrollmentFactory with default values.
    ///
    /// Defaults:
    /// - status: `pending`
    /// - payment_id: `None`
    /// - progress_percentage: `0`
    pub fn new(db: &'a DatabaseConnection, student_id: i32, course_id: i32) -> Self {
        Self {
            db,
            student_id,
            course_id,
            status: EnrollmentStatus::Pending,
            payment_id: None,
            progress_percentage: 0.0,
        }
    }

    pub fn status(mut self, status: EnrollmentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn payment_id(mut self, payment_id: Option<i32>) -> Self {
        self.payment_id = payment_id;
        self
    }

    pub fn progress_percentage(mut self, progress_percentage: f64) -> Self {
        self.progress_percentage = progress_percentage;
        self
    }

    /// Builds and inserts the enrollment entity into the database.
    pub async fn build(self) -> Result<entity::enrollment::Model, DbErr> {
        let now = Utc::now();
        entity::enrollment::ActiveModel {
            id: ActiveValue::NotSet,
            student_id: ActiveValue::Set(self.student_id),
            course_id: ActiveValue::Set(self.course_id),
            status: ActiveValue::Set(self.status),
            payment_id: ActiveValue::Set(self.payment_id),
            enrolled_at: ActiveValue::Set(now),
            progress_percentage: ActiveValue::Set(self.progress_percentage),
            completed: ActiveValue::Set(false),
            watch_hours: ActiveValue::Set(0.0),
            last_accessed: ActiveValue::Set(None),
            grade: ActiveValue::Set(None),
            feedback: ActiveValue::Set(None),
            certificate_downloaded_at: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a pending enrollment of `student_id` in `course_id`.
pub async fn create_enrollment(
    db: &DatabaseConnection,
    student_id: i32,
    course_id: i32,
) -> Result<entity::enrollment::Model, DbErr> {
    EnrollmentFactory::new(db, student_id, course_id).build().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TestBuilder;
    use crate::factory::{helpers::create_course_with_instructor, user::create_user};

    #[tokio::test]
    async fn creates_pending_enrollment() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_enrollment_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();

        let student = create_user(db).await?;
        let (_, course) = create_course_with_instructor(db).await?;
        let enrollment = create_enrollment(db, student.id, course.id).await?;

        assert_eq!(enrollment.status, EnrollmentStatus::Pending);
        assert!(enrollment.payment_id.is_none());
        assert!(!enrollment.completed);

        Ok(())
    }
}
