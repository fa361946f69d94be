//! End-to-end flows across services: catalog, enrollment, payment and progress.

use entity::sea_orm_active_enums::{AchievementType, EnrollmentStatus, PaymentStatus, Role};
use serde_json::json;
use test_utils::{builder::TestBuilder, factory};

use crate::{
    model::{course::CreateCourseDto, payment::CreatePaymentDto},
    server::{
        data::achievement::AchievementRepository,
        error::AppError,
        model::{course::CreateCourseParams, lesson::CreateLessonParams},
        service::{
            course::CourseService, enrollment::EnrollmentService, lesson::LessonService,
            payment::PaymentService, student::StudentService,
        },
    },
};

use super::load_user;

fn lesson_params(course_id: i32, title: &str, order_index: i32) -> CreateLessonParams {
    CreateLessonParams {
        course_id,
        title: title.to_string(),
        description: format!("{} description", title),
        content: format!("{} content", title),
        video_url: None,
        duration: 10,
        resources: json!([]),
        order_index,
        quiz_id: None,
        is_published: true,
    }
}

/// Instructor publishes a course, the student pays and activates, then completes
/// every lesson.
///
/// Expected: the payment takes the course price, the enrollment turns Active, the
/// course shows on the student's list and completion awards one achievement
#[tokio::test]
async fn paid_enrollment_through_completion() -> Result<(), AppError> {
    let test = TestBuilder::new().with_lms_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let instructor = factory::user::create_user_with_role(db, Role::Instructor).await?;
    let instructor = load_user(db, instructor.id).await?;
    let student = factory::user::create_user(db).await?;

    let course = CourseService::new(db)
        .create(CreateCourseParams::from_dto(
            instructor.id,
            CreateCourseDto {
                title: "Data Structures".to_string(),
                description: "Lists, trees and graphs".to_string(),
                category: "General".to_string(),
                level: None,
                price: Some(519.0),
                duration: None,
                thumbnail: None,
                is_published: Some(true),
            },
        )?)
        .await?;
    let lesson_service = LessonService::new(db);
    let first = lesson_service
        .create(&instructor, lesson_params(course.id, "Arrays", 0))
        .await?;
    let second = lesson_service
        .create(&instructor, lesson_params(course.id, "Trees", 1))
        .await?;

    let enrollments = EnrollmentService::new(db);
    let pending = enrollments.create(student.id, course.id).await?;
    assert_eq!(pending.status, EnrollmentStatus::Pending);

    let payment = PaymentService::new(db)
        .create(
            student.id,
            CreatePaymentDto {
                course_id: Some(course.id),
                amount: None,
                payment_method: "upi".to_string(),
                transaction_id: Some("TXN-FLOW-1".to_string()),
            },
        )
        .await?;
    assert_eq!(payment.status, PaymentStatus::Completed);
    assert_eq!(payment.amount, 519.0);

    let active = enrollments
        .activate(student.id, pending.id, payment.id)
        .await?;
    assert_eq!(active.status, EnrollmentStatus::Active);
    assert!(enrollments.status(student.id, course.id).await?.enrolled);

    let students = StudentService::new(db);
    let courses = students.courses(student.id).await?;
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].id, course.id);

    students
        .complete_lesson(student.id, course.id, first.id, Some(1.0))
        .await?;
    let progress = students
        .complete_lesson(student.id, course.id, second.id, Some(2.0))
        .await?;
    assert_eq!(progress.completion_percentage, 100);
    assert_eq!(progress.hours_spent, 3.0);

    let completions = AchievementRepository::new(db)
        .find_by_user(student.id)
        .await?
        .into_iter()
        .filter(|a| a.achievement_type == AchievementType::CourseCompletion)
        .count();
    assert_eq!(completions, 1);

    Ok(())
}

/// Expected: the payment of one course cannot activate another course's enrollment
#[tokio::test]
async fn payment_is_bound_to_its_course() -> Result<(), AppError> {
    let test = TestBuilder::new().with_lms_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let (instructor, paid_course) = factory::helpers::create_course_with_instructor(db).await?;
    let other_course = factory::course::CourseFactory::new(db, instructor.id)
        .price(99.0)
        .build()
        .await?;
    let student = factory::user::create_user(db).await?;

    let payment = PaymentService::new(db)
        .create(
            student.id,
            CreatePaymentDto {
                course_id: Some(paid_course.id),
                amount: None,
                payment_method: "card".to_string(),
                transaction_id: None,
            },
        )
        .await?;
    let enrollments = EnrollmentService::new(db);
    let pending = enrollments.create(student.id, other_course.id).await?;

    let result = enrollments
        .activate(student.id, pending.id, payment.id)
        .await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));
    assert!(!enrollments.status(student.id, other_course.id).await?.enrolled);

    Ok(())
}
