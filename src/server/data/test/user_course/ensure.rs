use super::*;

/// Tests that ensure creates an entry once and returns it afterwards.
///
/// Expected: Ok((entry, true)) then Ok((same entry, false))
#[tokio::test]
async fn creates_once() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_enrollment_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, course) = factory::helpers::create_course_with_instructor(db).await?;
    let student = factory::user::create_user(db).await?;
    let repo = UserCourseRepository::new(db);

    let (created, was_created) = repo.ensure(student.id, course.id).await?;
    let (again, created_again) = repo.ensure(student.id, course.id).await?;

    assert!(was_created);
    assert!(!created_again);
    assert_eq!(created.id, again.id);
    assert_eq!(created.completion_percentage, 0);
    assert_eq!(repo.count_by_user(student.id).await?, 1);

    Ok(())
}
