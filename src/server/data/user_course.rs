//! Per-user course progress repository.
//!
//! A `user_course` row is unique per (user, course). Completed lessons live in
//! `user_course_lesson`, unique per (user course, lesson), so completing a lesson twice
//! leaves the set unchanged.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::server::model::user_course::UserCourse;

pub struct UserCourseRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserCourseRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Adds a course to a user's list with zero progress.
    pub async fn create(&self, user_id: i32, course_id: i32) -> Result<UserCourse, DbErr> {
        let entity = entity::user_course::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            course_id: ActiveValue::Set(course_id),
            hours_spent: ActiveValue::Set(0.0),
            completion_percentage: ActiveValue::Set(0),
            enrollment_date: ActiveValue::Set(Utc::now()),
            certificate_downloaded_at: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(UserCourse::from_entity(entity, Vec::new()))
    }

    /// Returns the existing entry or creates one.
    ///
    /// # Returns
    /// - `Ok((UserCourse, true))` - A new entry was created
    /// - `Ok((UserCourse, false))` - The user already had this course
    pub async fn ensure(&self, user_id: i32, course_id: i32) -> Result<(UserCourse, bool), DbErr> {
        if let Some(existing) = self.find(user_id, course_id).await? {
            return Ok((existing, false));
        }

        Ok((self.create(user_id, course_id).await?, true))
    }

    /// Entry for a (user, course) pair with its completed lessons.
    pub async fn find(&self, user_id: i32, course_id: i32) -> Result<Option<UserCourse>, DbErr> {
        let Some(entity) = entity::prelude::UserCourse::find()
            .filter(entity::user_course::Column::UserId.eq(user_id))
            .filter(entity::user_course::Column::CourseId.eq(course_id))
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let lessons = entity::prelude::UserCourseLesson::find()
            .filter(entity::user_course_lesson::Column::UserCourseId.eq(entity.id))
            .order_by_asc(entity::user_course_lesson::Column::CompletedAt)
            .all(self.db)
            .await?;

        Ok(Some(UserCourse::from_entity(entity, lessons)))
    }

    /// Every course on a user's list in enrollment order.
    pub async fn find_by_user(&self, user_id: i32) -> Result<Vec<UserCourse>, DbErr> {
        let entries = entity::prelude::UserCourse::find()
            .filter(entity::user_course::Column::UserId.eq(user_id))
            .order_by_asc(entity::user_course::Column::EnrollmentDate)
            .all(self.db)
            .await?;

        let ids: Vec<i32> = entries.iter().map(|e| e.id).collect();
        let mut lessons: HashMap<i32, Vec<entity::user_course_lesson::Model>> = HashMap::new();
        if !ids.is_empty() {
            for row in entity::prelude::UserCourseLesson::find()
                .filter(entity::user_course_lesson::Column::UserCourseId.is_in(ids))
                .order_by_asc(entity::user_course_lesson::Column::CompletedAt)
                .all(self.db)
                .await?
            {
                lessons.entry(row.user_course_id).or_default().push(row);
            }
        }

        Ok(entries
            .into_iter()
            .map(|e| {
                let completed = lessons.remove(&e.id).unwrap_or_default();
                UserCourse::from_entity(e, completed)
            })
            .collect())
    }

    pub async fn count_by_user(&self, user_id: i32) -> Result<u64, DbErr> {
        entity::prelude::UserCourse::find()
            .filter(entity::user_course::Column::UserId.eq(user_id))
            .count(self.db)
            .await
    }

    /// Records a completed lesson unless it is already in the set.
    ///
    /// # Returns
    /// - `Ok(true)` - The lesson was newly added
    /// - `Ok(false)` - The lesson was already completed
    pub async fn add_completed_lesson(
        &self,
        user_course_id: i32,
        lesson_id: i32,
    ) -> Result<bool, DbErr> {
        let exists = entity::prelude::UserCourseLesson::find()
            .filter(entity::user_course_lesson::Column::UserCourseId.eq(user_course_id))
            .filter(entity::user_course_lesson::Column::LessonId.eq(lesson_id))
            .one(self.db)
            .await?
            .is_some();
        if exists {
            return Ok(false);
        }

        entity::user_course_lesson::ActiveModel {
            user_course_id: ActiveValue::Set(user_course_id),
            lesson_id: ActiveValue::Set(lesson_id),
            completed_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(true)
    }

    pub async fn count_completed_lessons(&self, user_course_id: i32) -> Result<u64, DbErr> {
        entity::prelude::UserCourseLesson::find()
            .filter(entity::user_course_lesson::Column::UserCourseId.eq(user_course_id))
            .count(self.db)
            .await
    }

    /// Stores new progress figures on an entry.
    pub async fn set_progress(
        &self,
        id: i32,
        hours_spent: f64,
        completion_percentage: i32,
    ) -> Result<(), DbErr> {
        let Some(entity) = entity::prelude::UserCourse::find_by_id(id).one(self.db).await? else {
            return Err(DbErr::RecordNotFound(format!("user_course {}", id)));
        };

        let mut active = entity.into_active_model();
        active.hours_spent = ActiveValue::Set(hours_spent);
        active.completion_percentage = ActiveValue::Set(completion_percentage.clamp(0, 100));
        active.update(self.db).await?;

        Ok(())
    }

    /// Sets the certificate download time if it has not been set yet.
    pub async fn stamp_certificate(&self, id: i32, at: DateTime<Utc>) -> Result<(), DbErr> {
        let Some(entity) = entity::prelude::UserCourse::find_by_id(id).one(self.db).await? else {
            return Ok(());
        };
        if entity.certificate_downloaded_at.is_some() {
            return Ok(());
        }

        let mut active = entity.into_active_model();
        active.certificate_downloaded_at = ActiveValue::Set(Some(at));
        active.update(self.db).await?;

        Ok(())
    }

    /// Removes every entry for a course with its completed lessons.
    pub async fn delete_by_course(&self, course_id: i32) -> Result<(), DbErr> {
        let ids: Vec<i32> = entity::prelude::UserCourse::find()
            .filter(entity::user_course::Column::CourseId.eq(course_id))
            .all(self.db)
            .await?
            .into_iter()
            .map(|e| e.id)
            .collect();

        if ids.is_empty() {
            return Ok(());
        }

        entity::prelude::UserCourseLesson::delete_many()
            .filter(entity::user_course_lesson::Column::UserCourseId.is_in(ids.clone()))
            .exec(self.db)
            .await?;
        entity::prelude::UserCourse::delete_many()
            .filter(entity::user_course::Column::Id.is_in(ids))
            .exec(self.db)
            .await?;

        Ok(())
    }
}
