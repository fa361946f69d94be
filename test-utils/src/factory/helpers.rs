//! Shared helper utilities for factory methods.
//!
//! Common utilities used across all factory modules, including ID generation and
//! convenience methods for creating entities with their dependencies.

use entity::sea_orm_active_enums::Role;
use sea_orm::{DatabaseConnection, DbErr};

/// Counter for generating unique values in tests.
static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

/// Gets the next unique counter value for test data.
///
/// # Returns
/// - `u64` - Next unique counter value
pub fn next_id() -> u64 {
    COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
}

/// Creates an instructor and a published course they own.
///
/// # Arguments
/// - `db` - Database connection
///
/// # Returns
/// - `Ok((instructor, course))` - Tuple of created entities
/// - `Err(DbErr)` - Database error during creation
pub async fn create_course_with_instructor(
    db: &DatabaseConnection,
) -> Result<(entity::user::Model, entity::course::Model), DbErr> {
    let instructor = crate::factory::user::create_user_with_role(db, Role::Instructor).await?;
    let course = crate::factory::course::create_course(db, instructor.id).await?;

    Ok((instructor, course))
}

/// Creates an instructor, a course and `lessons` published lessons in order.
///
/// # Arguments
/// - `db` - Database connection
/// - `lessons` - Number of lessons to create
///
/// # Returns
/// - `Ok((instructor, course, lessons))` - Created entities, lessons sorted by `order_index`
/// - `Err(DbErr)` - Database error during creation
pub async fn create_course_with_lessons(
    db: &DatabaseConnection,
    lessons: usize,
) -> Result<
    (
        entity::user::Model,
        entity::course::Model,
        Vec<entity::lesson::Model>,
    ),
    DbErr,
> {
    let (instructor, course) = create_course_with_instructor(db).await?;

    let mut created = Vec::with_capacity(lessons);
    for index in 0..lessons {
        let lesson = crate::factory::lesson::LessonFactory::new(db, course.id)
            .order_index(index as i32)
            .build()
            .await?;
        created.push(lesson);
    }

    Ok((instructor, course, created))
}
