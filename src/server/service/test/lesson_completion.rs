use entity::sea_orm_active_enums::AchievementType;
use test_utils::{builder::TestBuilder, factory};

use crate::server::{
    data::{achievement::AchievementRepository, user_course::UserCourseRepository},
    error::{auth::AuthError, AppError},
    service::student::StudentService,
};

/// One of three lessons done rounds to 33 percent.
///
/// Expected: Ok(LessonCompletionDto { completion_percentage: 33, completed 1 of 3 })
#[tokio::test]
async fn reports_rounded_completion() -> Result<(), AppError> {
    let test = TestBuilder::new().with_enrollment_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, course, lessons) = factory::helpers::create_course_with_lessons(db, 3).await?;
    let student = factory::user::create_user(db).await?;
    UserCourseRepository::new(db).ensure(student.id, course.id).await?;

    let progress = StudentService::new(db)
        .complete_lesson(student.id, course.id, lessons[0].id, Some(1.5))
        .await?;

    assert_eq!(progress.completion_percentage, 33);
    assert_eq!(progress.completed_lessons, 1);
    assert_eq!(progress.total_lessons, 3);
    assert_eq!(progress.hours_spent, 1.5);

    Ok(())
}

/// Completing the same lesson twice keeps one entry in the completed set but still
/// adds the reported hours.
///
/// Expected: completed_lessons stays 1, hours accumulate
#[tokio::test]
async fn repeated_completion_keeps_set() -> Result<(), AppError> {
    let test = TestBuilder::new().with_enrollment_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, course, lessons) = factory::helpers::create_course_with_lessons(db, 2).await?;
    let student = factory::user::create_user(db).await?;
    UserCourseRepository::new(db).ensure(student.id, course.id).await?;
    let service = StudentService::new(db);

    service
        .complete_lesson(student.id, course.id, lessons[0].id, Some(1.0))
        .await?;
    let progress = service
        .complete_lesson(student.id, course.id, lessons[0].id, Some(0.5))
        .await?;

    assert_eq!(progress.completed_lessons, 1);
    assert_eq!(progress.completion_percentage, 50);
    assert_eq!(progress.hours_spent, 1.5);
    let user_course = UserCourseRepository::new(db)
        .find(student.id, course.id)
        .await?
        .unwrap();
    assert_eq!(user_course.completed_lessons, vec![lessons[0].id]);

    Ok(())
}

/// Expected: Err(NotFound("Lesson not found"))
#[tokio::test]
async fn rejects_lesson_of_other_course() -> Result<(), AppError> {
    let test = TestBuilder::new().with_enrollment_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, course, _) = factory::helpers::create_course_with_lessons(db, 1).await?;
    let (_, _, foreign_lessons) = factory::helpers::create_course_with_lessons(db, 1).await?;
    let student = factory::user::create_user(db).await?;
    UserCourseRepository::new(db).ensure(student.id, course.id).await?;

    let result = StudentService::new(db)
        .complete_lesson(student.id, course.id, foreign_lessons[0].id, None)
        .await;

    assert!(matches!(result, Err(AppError::NotFound(msg)) if msg == "Lesson not found"));

    Ok(())
}

/// Expected: Err(AuthError::AccessDenied)
#[tokio::test]
async fn rejects_student_without_progress_entry() -> Result<(), AppError> {
    let test = TestBuilder::new().with_enrollment_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, course, lessons) = factory::helpers::create_course_with_lessons(db, 1).await?;
    let student = factory::user::create_user(db).await?;

    let result = StudentService::new(db)
        .complete_lesson(student.id, course.id, lessons[0].id, None)
        .await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::AccessDenied(_)))
    ));

    Ok(())
}

/// Reaching 100 percent awards a single course completion achievement, even when the
/// final lesson is reported again.
///
/// Expected: exactly one CourseCompletion achievement worth 100 points
#[tokio::test]
async fn awards_course_completion_once() -> Result<(), AppError> {
    let test = TestBuilder::new().with_enrollment_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, course, lessons) = factory::helpers::create_course_with_lessons(db, 2).await?;
    let student = factory::user::create_user(db).await?;
    UserCourseRepository::new(db).ensure(student.id, course.id).await?;
    let service = StudentService::new(db);

    for lesson in &lessons {
        service
            .complete_lesson(student.id, course.id, lesson.id, None)
            .await?;
    }
    let progress = service
        .complete_lesson(student.id, course.id, lessons[1].id, None)
        .await?;

    assert_eq!(progress.completion_percentage, 100);
    let achievements = AchievementRepository::new(db).find_by_user(student.id).await?;
    let completions: Vec<_> = achievements
        .iter()
        .filter(|a| a.achievement_type == AchievementType::CourseCompletion)
        .collect();
    assert_eq!(completions.len(), 1);
    assert_eq!(completions[0].course_id, Some(course.id));
    assert_eq!(completions[0].points, 100);

    Ok(())
}
