use entity::prelude::*;
use sea_orm::{sea_query::TableCreateStatement, EntityTrait, Schema};

use crate::{context::TestContext, error::TestError};

/// Builder for creating test contexts with customizable database schemas.
///
/// Add entity tables with `with_table()` (or one of the grouped helpers), then call
/// `build()` to create the configured test context.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::builder::TestBuilder;
/// use entity::prelude::{User, Course};
///
/// let test = TestBuilder::new()
///     .with_table(User)
///     .with_table(Course)
///     .build()
///     .await?;
/// ```
pub struct TestBuilder {
    /// CREATE TABLE statements executed in insertion order during `build()`.
    tables: Vec<TableCreateStatement>,
}

impl TestBuilder {
    /// Creates a new test builder with no tables configured.
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }

    /// Adds an entity table to the test database schema.
    ///
    /// Generates a CREATE TABLE statement from the provided SeaORM entity using SQLite
    /// backend syntax. Tables with foreign keys must be added after the tables they
    /// reference.
    ///
    /// # Arguments
    /// - `entity` - SeaORM entity model implementing `EntityTrait` to create table for
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Adds the user tables: User and UserPermission.
    pub fn with_user_tables(self) -> Self {
        self.with_table(User).with_table(UserPermission)
    }

    /// Adds every table needed for catalog work on top of the user tables:
    /// - Course
    /// - CourseReview
    /// - CourseStudent
    /// - Lesson
    pub fn with_course_tables(self) -> Self {
        self.with_user_tables()
            .with_table(Course)
            .with_table(CourseReview)
            .with_table(CourseStudent)
            .with_table(Lesson)
    }

    /// Adds the course tables plus payments, enrollments and per-user course progress.
    ///
    /// Use this when testing enrollment activation or lesson completion.
    pub fn with_enrollment_tables(self) -> Self {
        self.with_course_tables()
            .with_table(Payment)
            .with_table(Enrollment)
            .with_table(UserCourse)
            .with_table(UserCourseLesson)
            .with_table(Achievement)
            .with_table(ActivityLog)
    }

    /// Adds every table of the schema in dependency order.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let test = TestBuilder::new()
    ///     .with_lms_tables()
    ///     .build()
    ///     .await?;
    /// ```
    pub fn with_lms_tables(self) -> Self {
        self.with_table(User)
            .with_table(UserPermission)
            .with_table(ParentChild)
            .with_table(Course)
            .with_table(CourseReview)
            .with_table(CourseStudent)
            .with_table(Lesson)
            .with_table(Quiz)
            .with_table(QuizQuestion)
            .with_table(QuizAttempt)
            .with_table(Assignment)
            .with_table(Event)
            .with_table(EventStudent)
            .with_table(Payment)
            .with_table(Enrollment)
            .with_table(UserCourse)
            .with_table(UserCourseLesson)
            .with_table(Achievement)
            .with_table(ActivityLog)
            .with_table(FeatureFlag)
            .with_table(Announcement)
            .with_table(AiInteraction)
    }

    /// Builds and initializes the test context with configured tables.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Fully initialized test context with database and tables ready
    /// - `Err(TestError::Database)`- Failed to connect to database or create tables
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut setup = TestContext::new();

        setup.with_tables(self.tables).await?;

        Ok(setup)
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
