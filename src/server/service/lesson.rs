use sea_orm::DatabaseConnection;

use crate::server::{
    data::{course::CourseRepository, lesson::LessonRepository},
    error::AppError,
    model::{
        course::Course,
        lesson::{CreateLessonParams, Lesson, UpdateLessonParams},
        user::User,
    },
    service::ensure_owner,
};

pub struct LessonService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> LessonService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Adds a lesson to a course taught by the caller.
    ///
    /// # Returns
    /// - `Ok(Lesson)` - The created lesson
    /// - `Err(AppError::NotFound)` - No course with this ID
    /// - `Err(AppError::AuthErr)` - Caller does not teach the course and is not an admin
    pub async fn create(&self, actor: &User, params: CreateLessonParams) -> Result<Lesson, AppError> {
        let course = self.require_course(params.course_id).await?;
        ensure_owner(
            actor,
            course.instructor_id,
            "Not authorized to add lessons to this course",
        )?;

        Ok(LessonRepository::new(self.db).create(params).await?)
    }

    pub async fn list(&self, course_id: Option<i32>) -> Result<Vec<Lesson>, AppError> {
        Ok(LessonRepository::new(self.db).list(course_id).await?)
    }

    /// Lesson with its parent course reference.
    pub async fn get(&self, lesson_id: i32) -> Result<Lesson, AppError> {
        let lesson = self.require(lesson_id).await?;
        let course = CourseRepository::new(self.db)
            .find_by_id(lesson.course_id)
            .await?
            .map(|c| c.to_ref());

        Ok(lesson.with_course(course))
    }

    pub async fn update(
        &self,
        actor: &User,
        lesson_id: i32,
        params: UpdateLessonParams,
    ) -> Result<Lesson, AppError> {
        let lesson = self.require(lesson_id).await?;
        let course = self.require_course(lesson.course_id).await?;
        ensure_owner(actor, course.instructor_id, "Not authorized to update this lesson")?;

        LessonRepository::new(self.db)
            .update(lesson_id, params)
            .await?
            .ok_or_else(lesson_not_found)
    }

    pub async fn delete(&self, actor: &User, lesson_id: i32) -> Result<(), AppError> {
        let lesson = self.require(lesson_id).await?;
        let course = self.require_course(lesson.course_id).await?;
        ensure_owner(actor, course.instructor_id, "Not authorized to delete this lesson")?;

        LessonRepository::new(self.db).delete(lesson_id).await?;

        Ok(())
    }

    async fn require(&self, lesson_id: i32) -> Result<Lesson, AppError> {
        LessonRepository::new(self.db)
            .find_by_id(lesson_id)
            .await?
            .ok_or_else(lesson_not_found)
    }

    async fn require_course(&self, course_id: i32) -> Result<Course, AppError> {
        CourseRepository::new(self.db)
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))
    }
}

fn lesson_not_found() -> AppError {
    AppError::NotFound("Lesson not found".to_string())
}
