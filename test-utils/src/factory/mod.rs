//! Factory methods for creating test data.
//!
//! Factories insert entities with sensible defaults so tests only spell out the fields
//! they care about. Each entity has a `Factory` struct for customization and a `create_*`
//! convenience function for quick default creation.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), sea_orm::DbErr> {
//!     let db = /* ... */;
//!
//!     let student = factory::user::create_user(&db).await?;
//!     let (instructor, course) = factory::helpers::create_course_with_instructor(&db).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Customization
//!
//! ```rust,ignore
//! let admin = factory::user::UserFactory::new(&db)
//!     .role(Role::Admin)
//!     .email("root@kavyalearn.test")
//!     .build()
//!     .await?;
//! ```
//!
//! # Available Factories
//!
//! - `user` - Users of any role
//! - `course` - Courses owned by an instructor
//! - `lesson` - Lessons within a course
//! - `quiz` - Quizzes together with their questions
//! - `payment` - Payment records
//! - `enrollment` - Enrollment records
//! - `helpers` - ID generation and multi-entity setups

pub mod course;
pub mod enrollment;
pub mod helpers;
pub mod lesson;
pub mod payment;
pub mod quiz;
pub mod user;

pub use course::create_course;
pub use enrollment::create_enrollment;
pub use lesson::create_lesson;
pub use payment::create_payment;
pub use quiz::create_quiz;
pub use user::{create_user, create_user_with_role};
