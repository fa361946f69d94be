use entity::sea_orm_active_enums::Role;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use test_utils::{builder::TestBuilder, factory};

use crate::server::{
    error::AppError,
    service::{
        course::{CourseService, COURSES_PER_PAGE},
        MAX_PAGE,
    },
};

use super::load_user;

/// Expected: ten courses per page with the page count rounded up
#[tokio::test]
async fn lists_catalog_in_pages_of_ten() -> Result<(), AppError> {
    let test = TestBuilder::new().with_course_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let instructor = factory::user::create_user_with_role(db, Role::Instructor).await?;
    for _ in 0..12 {
        factory::course::create_course(db, instructor.id).await?;
    }
    let service = CourseService::new(db);

    let first = service.list(None, None).await?;
    let second = service.list(None, Some(2)).await?;

    assert_eq!(first.courses.len() as u64, COURSES_PER_PAGE);
    assert_eq!((first.page, first.pages, first.total), (1, 2, 12));
    assert_eq!(second.courses.len(), 2);
    assert_eq!(second.page, 2);

    Ok(())
}

/// Expected: keyword matches title or description regardless of case
#[tokio::test]
async fn keyword_matches_title_and_description() -> Result<(), AppError> {
    let test = TestBuilder::new().with_course_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let instructor = factory::user::create_user_with_role(db, Role::Instructor).await?;
    let by_title = factory::course::CourseFactory::new(db, instructor.id)
        .title("Rust Basics")
        .description("Ownership and borrowing")
        .build()
        .await?;
    let by_description = factory::course::CourseFactory::new(db, instructor.id)
        .title("Systems Programming")
        .description("Taught in rust from scratch")
        .build()
        .await?;
    factory::course::CourseFactory::new(db, instructor.id)
        .title("Watercolour")
        .description("Painting for beginners")
        .build()
        .await?;

    let result = CourseService::new(db)
        .list(Some("RUST".to_string()), None)
        .await?;

    let mut ids: Vec<i32> = result.courses.iter().map(|c| c.id).collect();
    ids.sort();
    assert_eq!(ids, vec![by_title.id, by_description.id]);
    assert_eq!((result.total, result.pages), (2, 1));

    Ok(())
}

/// Expected: an absurd page number is clamped and yields an empty page
#[tokio::test]
async fn huge_page_returns_empty_page() -> Result<(), AppError> {
    let test = TestBuilder::new().with_course_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    factory::helpers::create_course_with_instructor(db).await?;

    let result = CourseService::new(db).list(None, Some(u64::MAX)).await?;

    assert!(result.courses.is_empty());
    assert_eq!(result.page, MAX_PAGE);
    assert_eq!(result.total, 1);

    Ok(())
}

/// Deleting a course removes its content and memberships and detaches payments.
///
/// Expected: Ok, no rows left for the course, payment kept with no course
#[tokio::test]
async fn delete_cascades_to_course_content() -> Result<(), AppError> {
    let test = TestBuilder::new().with_lms_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let (instructor, course, _) = factory::helpers::create_course_with_lessons(db, 2).await?;
    let other_course = factory::course::create_course(db, instructor.id).await?;
    let student = factory::user::create_user(db).await?;
    factory::quiz::QuizFactory::new(db, course.id, instructor.id)
        .question("2 + 2?", &[("4", true), ("5", false)], 1)
        .build()
        .await?;
    let payment = factory::payment::PaymentFactory::new(db, student.id, Some(course.id))
        .build()
        .await?;
    factory::enrollment::create_enrollment(db, student.id, course.id).await?;
    let service = CourseService::new(db);
    service.enroll(&load_user(db, student.id).await?, course.id).await?;
    service.enroll(&load_user(db, student.id).await?, other_course.id).await?;

    service
        .delete(&load_user(db, instructor.id).await?, course.id)
        .await?;

    assert!(entity::prelude::Course::find_by_id(course.id).one(db).await?.is_none());
    assert_eq!(
        entity::prelude::Lesson::find()
            .filter(entity::lesson::Column::CourseId.eq(course.id))
            .count(db)
            .await?,
        0
    );
    assert_eq!(entity::prelude::Quiz::find().count(db).await?, 0);
    assert_eq!(entity::prelude::Enrollment::find().count(db).await?, 0);
    assert_eq!(
        entity::prelude::UserCourse::find()
            .filter(entity::user_course::Column::CourseId.eq(course.id))
            .count(db)
            .await?,
        0
    );
    assert_eq!(
        entity::prelude::CourseStudent::find()
            .filter(entity::course_student::Column::CourseId.eq(course.id))
            .count(db)
            .await?,
        0
    );
    let payment = entity::prelude::Payment::find_by_id(payment.id)
        .one(db)
        .await?
        .unwrap();
    assert_eq!(payment.course_id, None);
    // The student's other course is untouched.
    assert_eq!(
        entity::prelude::UserCourse::find()
            .filter(entity::user_course::Column::CourseId.eq(other_course.id))
            .count(db)
            .await?,
        1
    );

    Ok(())
}

/// Expected: Err(AuthErr) when another instructor deletes the course, course kept
#[tokio::test]
async fn delete_requires_owner() -> Result<(), AppError> {
    let test = TestBuilder::new().with_lms_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, course) = factory::helpers::create_course_with_instructor(db).await?;
    let stranger = factory::user::create_user_with_role(db, Role::Instructor).await?;

    let result = CourseService::new(db)
        .delete(&load_user(db, stranger.id).await?, course.id)
        .await;

    assert!(matches!(result, Err(AppError::AuthErr(_))));
    assert!(entity::prelude::Course::find_by_id(course.id).one(db).await?.is_some());

    Ok(())
}
