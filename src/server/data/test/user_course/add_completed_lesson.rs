use super::*;

/// Tests that a lesson enters the completed set only once.
///
/// Expected: Ok(true) then Ok(false), with a single stored lesson
#[tokio::test]
async fn adds_lesson_once() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_enrollment_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, course, lessons) = factory::helpers::create_course_with_lessons(db, 2).await?;
    let student = factory::user::create_user(db).await?;
    let repo = UserCourseRepository::new(db);
    let (entry, _) = repo.ensure(student.id, course.id).await?;

    let first = repo.add_completed_lesson(entry.id, lessons[0].id).await?;
    let repeat = repo.add_completed_lesson(entry.id, lessons[0].id).await?;

    assert!(first);
    assert!(!repeat);
    assert_eq!(repo.count_completed_lessons(entry.id).await?, 1);

    Ok(())
}

/// Tests that stored progress is clamped to 0..=100.
///
/// Expected: Ok with completion_percentage 100
#[tokio::test]
async fn clamps_progress() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_enrollment_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, course) = factory::helpers::create_course_with_instructor(db).await?;
    let student = factory::user::create_user(db).await?;
    let repo = UserCourseRepository::new(db);
    let (entry, _) = repo.ensure(student.id, course.id).await?;

    repo.set_progress(entry.id, 1.0, 140).await?;

    let stored = repo.find(student.id, course.id).await?.unwrap();
    assert_eq!(stored.completion_percentage, 100);

    Ok(())
}
