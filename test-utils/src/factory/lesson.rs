//! Lesson factory for creating test lesson entities.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test lessons within a course.
pub struct LessonFactory<'a> {
    db: &'a DatabaseConnection,
    course_id: i32,
    title: String,
    duration: i32,
    order_index: i32,
    is_published: bool,
}

impl<'a> LessonFactory<'a> {
    /// Creates a new LessonFactory with default values.
    ///
    /// Defaults:
    /// - title: `"Lesson {id}"`
    /// - duration: `30` minutes
    /// - order_index: `0`
    /// - is_published: `true`
    pub fn new(db: &'a DatabaseConnection, course_id: i32) -> Self {
        let id = next_id();
        Self {
            db,
            course_id,
            title: format!("Lesson {}", id),
            duration: 30,
            order_index: 0,
            is_published: true,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the duration in minutes.
    pub fn duration(mut self, duration: i32) -> Self {
        self.duration = duration;
        self
    }

    pub fn order_index(mut self, order_index: i32) -> Self {
        self.order_index = order_index;
        self
    }

    pub fn is_published(mut self, is_published: bool) -> Self {
        self.is_published = is_published;
        self
    }

    /// Builds and inserts the lesson entity into the database.
    pub async fn build(self) -> Result<entity::lesson::Model, DbErr> {
        let now = Utc::now();
        entity::lesson::ActiveModel {
            id: ActiveValue::NotSet,
            course_id: ActiveValue::Set(self.course_id),
            title: ActiveValue::Set(self.title),
            description: ActiveValue::Set("Test lesson description".to_string()),
            content: ActiveValue::Set("Test lesson content".to_string()),
            video_url: ActiveValue::Set(None),
            duration: ActiveValue::Set(self.duration),
            resources: ActiveValue::Set(serde_json::json!([])),
            order_index: ActiveValue::Set(self.order_index),
            quiz_id: ActiveValue::Set(None),
            is_published: ActiveValue::Set(self.is_published),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a published lesson with default values in the given course.
pub async fn create_lesson(
    db: &DatabaseConnection,
    course_id: i32,
) -> Result<entity::lesson::Model, DbErr> {
    LessonFactory::new(db, course_id).build().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TestBuilder;
    use crate::factory::helpers::create_course_with_instructor;
    use entity::prelude::*;

    #[tokio::test]
    async fn creates_lesson_with_defaults() -> Result<(), DbErr> {
        let test = TestBuilder::new()
            .with_table(User)
            .with_table(Course)
            .with_table(Lesson)
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let (_, course) = create_course_with_instructor(db).await?;
        let lesson = create_lesson(db, course.id).await?;

        assert_eq!(lesson.course_id, course.id);
        assert_eq!(lesson.duration, 30);
        assert_eq!(lesson.resources, serde_json::json!([]));
        assert!(lesson.quiz_id.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn creates_lessons_in_order() -> Result<(), DbErr> {
        let test = TestBuilder::new()
            .with_table(User)
            .with_table(Course)
            .with_table(Lesson)
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let (_, _, lessons) = crate::factory::helpers::create_course_with_lessons(db, 3).await?;

        let order: Vec<i32> = lessons.iter().map(|l| l.order_index).collect();
        assert_eq!(order, vec![0, 1, 2]);

        Ok(())
    }
}
