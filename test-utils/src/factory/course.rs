//! Course factory for creating test course entities.

use crate::factory::helpers::next_id;
use chrono::Utc;
use entity::sea_orm_active_enums::CourseLevel;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test courses with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// let course = CourseFactory::new(&db, instructor.id)
///     .title("Algebra I")
///     .price(519.0)
///     .build()
///     .await?;
/// ```
pub struct CourseFactory<'a> {
    db: &'a DatabaseConnection,
    instructor_id: i32,
    title: String,
    description: String,
    price: f64,
    category: String,
    level: CourseLevel,
    is_published: bool,
}

impl<'a> CourseFactory<'a> {
    /// Creates a new CourseFactory with default values.
    ///
    /// Defaults:
    /// - title: `"Course {id}"`
    /// - price: `499.0`
    /// - category: `"General"`
    /// - level: `Beginner`
    /// - is_published: `true`
    pub fn new(db: &'a DatabaseConnection, instructor_id: i32) -> Self {
        let id = next_id();
        Self {
            db,
            instructor_id,
            title: format!("Course {}", id),
            description: "Test course description".to_string(),
            price: 499.0,
            category: "General".to_string(),
            level: CourseLevel::Beginner,
            is_published: true,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn level(mut self, level: CourseLevel) -> Self {
        self.level = level;
        self
    }

    pub fn is_published(mut self, is_published: bool) -> Self {
        self.is_published = is_published;
        self
    }

    /// Builds and inserts the course entity into the database.
    ///
    /// # Returns
    /// - `Ok(entity::course::Model)` - Created course entity
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::course::Model, DbErr> {
        let now = Utc::now();
        entity::course::ActiveModel {
            id: ActiveValue::NotSet,
            title: ActiveValue::Set(self.title),
            description: ActiveValue::Set(self.description),
            instructor_id: ActiveValue::Set(self.instructor_id),
            thumbnail: ActiveValue::Set(String::new()),
            price: ActiveValue::Set(self.price),
            duration: ActiveValue::Set("4 weeks".to_string()),
            level: ActiveValue::Set(self.level),
            category: ActiveValue::Set(self.category),
            rating: ActiveValue::Set(0.0),
            is_published: ActiveValue::Set(self.is_published),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a published course with default values for the given instructor.
pub async fn create_course(
    db: &DatabaseConnection,
    instructor_id: i32,
) -> Result<entity::course::Model, DbErr> {
    CourseFactory::new(db, instructor_id).build().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TestBuilder;
    use crate::factory::user::create_user;
    use entity::prelude::*;

    #[tokio::test]
    async fn creates_course_with_defaults() -> Result<(), DbErr> {
        let test = TestBuilder::new()
            .with_table(User)
            .with_table(Course)
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let instructor = create_user(db).await?;
        let course = create_course(db, instructor.id).await?;

        assert_eq!(course.instructor_id, instructor.id);
        assert_eq!(course.category, "General");
        assert!(course.is_published);
        assert_eq!(course.rating, 0.0);

        Ok(())
    }

    #[tokio::test]
    async fn creates_course_with_custom_values() -> Result<(), DbErr> {
        let test = TestBuilder::new()
            .with_table(User)
            .with_table(Course)
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let instructor = create_user(db).await?;
        let course = CourseFactory::new(db, instructor.id)
            .title("Geometry")
            .price(519.0)
            .level(CourseLevel::Advanced)
            .is_published(false)
            .build()
            .await?;

        assert_eq!(course.title, "Geometry");
        assert_eq!(course.price, 519.0);
        assert_eq!(course.level, CourseLevel::Advanced);
        assert!(!course.is_published);

        Ok(())
    }
}
