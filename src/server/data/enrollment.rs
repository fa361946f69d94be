//! Enrollment data repository.
//!
//! An enrollment is unique per (student, course). Rows start `pending` and are
//! activated once a completed payment is attached.

use chrono::Utc;
use entity::sea_orm_active_enums::EnrollmentStatus;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::model::enrollment::{Enrollment, UpdateEnrollmentParams};

pub struct EnrollmentRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> EnrollmentRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates an enrollment with the given status.
    ///
    /// # Arguments
    /// - `student_id` - Enrolling student
    /// - `course_id` - Target course
    /// - `status` - Initial status, `pending` for paid enrollments
    ///
    /// # Returns
    /// - `Ok(Enrollment)` - The created enrollment
    /// - `Err(DbErr)` - Database error, including a unique violation for a duplicate pair
    pub async fn create(
        &self,
        student_id: i32,
        course_id: i32,
        status: EnrollmentStatus,
    ) -> Result<Enrollment, DbErr> {
        let now = Utc::now();
        let entity = entity::enrollment::ActiveModel {
            student_id: ActiveValue::Set(student_id),
            course_id: ActiveValue::Set(course_id),
            status: ActiveValue::Set(status),
            payment_id: ActiveValue::Set(None),
            enrolled_at: ActiveValue::Set(now),
            progress_percentage: ActiveValue::Set(0.0),
            completed: ActiveValue::Set(false),
            watch_hours: ActiveValue::Set(0.0),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Enrollment::from_entity(entity))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Enrollment>, DbErr> {
        let entity = entity::prelude::Enrollment::find_by_id(id).one(self.db).await?;

        Ok(entity.map(Enrollment::from_entity))
    }

    /// Enrollment of a student in a course, in any status.
    pub async fn find_by_pair(
        &self,
        student_id: i32,
        course_id: i32,
    ) -> Result<Option<Enrollment>, DbErr> {
        let entity = entity::prelude::Enrollment::find()
            .filter(entity::enrollment::Column::StudentId.eq(student_id))
            .filter(entity::enrollment::Column::CourseId.eq(course_id))
            .one(self.db)
            .await?;

        Ok(entity.map(Enrollment::from_entity))
    }

    /// Enrollments of a student, newest first.
    pub async fn find_by_student(&self, student_id: i32) -> Result<Vec<Enrollment>, DbErr> {
        let enrollments = entity::prelude::Enrollment::find()
            .filter(entity::enrollment::Column::StudentId.eq(student_id))
            .order_by_desc(entity::enrollment::Column::CreatedAt)
            .all(self.db)
            .await?;

        Ok(enrollments.into_iter().map(Enrollment::from_entity).collect())
    }

    /// A page of every enrollment, newest first, with the total count.
    pub async fn list(&self, offset: u64, limit: u64) -> Result<(Vec<Enrollment>, u64), DbErr> {
        let query = entity::prelude::Enrollment::find();
        let total = query.clone().count(self.db).await?;

        let enrollments = query
            .order_by_desc(entity::enrollment::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db)
            .await?;

        Ok((
            enrollments.into_iter().map(Enrollment::from_entity).collect(),
            total,
        ))
    }

    pub async fn count(&self) -> Result<u64, DbErr> {
        entity::prelude::Enrollment::find().count(self.db).await
    }

    /// Enrollments flagged as completed.
    pub async fn count_completed(&self) -> Result<u64, DbErr> {
        entity::prelude::Enrollment::find()
            .filter(entity::enrollment::Column::Completed.eq(true))
            .count(self.db)
            .await
    }

    /// Merges the provided fields into an enrollment.
    ///
    /// # Returns
    /// - `Ok(Some(Enrollment))` - The updated enrollment
    /// - `Ok(None)` - No enrollment with this ID
    /// - `Err(DbErr)` - Database error
    pub async fn update(
        &self,
        id: i32,
        params: UpdateEnrollmentParams,
    ) -> Result<Option<Enrollment>, DbErr> {
        let Some(entity) = entity::prelude::Enrollment::find_by_id(id).one(self.db).await? else {
            return Ok(None);
        };

        let mut active = entity.into_active_model();
        if let Some(status) = params.status {
            active.status = ActiveValue::Set(status);
        }
        if let Some(payment_id) = params.payment_id {
            active.payment_id = ActiveValue::Set(Some(payment_id));
        }
        if let Some(enrolled_at) = params.enrolled_at {
            active.enrolled_at = ActiveValue::Set(enrolled_at);
        }
        if let Some(progress) = params.progress_percentage {
            active.progress_percentage = ActiveValue::Set(progress);
        }
        if let Some(watch_hours) = params.watch_hours {
            active.watch_hours = ActiveValue::Set(watch_hours);
        }
        if let Some(completed) = params.completed {
            active.completed = ActiveValue::Set(completed);
        }
        if let Some(last_accessed) = params.last_accessed {
            active.last_accessed = ActiveValue::Set(Some(last_accessed));
        }
        if let Some(grade) = params.grade {
            active.grade = ActiveValue::Set(Some(grade));
        }
        if let Some(feedback) = params.feedback {
            active.feedback = ActiveValue::Set(Some(feedback));
        }
        if let Some(downloaded_at) = params.certificate_downloaded_at {
            active.certificate_downloaded_at = ActiveValue::Set(Some(downloaded_at));
        }
        active.updated_at = ActiveValue::Set(Utc::now());

        let entity = active.update(self.db).await?;

        Ok(Some(Enrollment::from_entity(entity)))
    }

    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Enrollment::delete_by_id(id)
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn delete_by_course(&self, course_id: i32) -> Result<(), DbErr> {
        entity::prelude::Enrollment::delete_many()
            .filter(entity::enrollment::Column::CourseId.eq(course_id))
            .exec(self.db)
            .await?;

        Ok(())
    }
}
