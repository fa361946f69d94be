use super::*;

/// Tests that only a completion achievement for the same course counts.
///
/// Expected: Ok(true) for the completed course, Ok(false) for another course or type
#[tokio::test]
async fn matches_course_and_type() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_enrollment_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let (instructor, course) = factory::helpers::create_course_with_instructor(db).await?;
    let other_course = factory::course::create_course(db, instructor.id).await?;
    let student = factory::user::create_user(db).await?;
    let repo = AchievementRepository::new(db);

    repo.create(CreateAchievementParams::course_completion(
        student.id,
        course.id,
        &course.title,
    ))
    .await?;
    repo.create(CreateAchievementParams {
        course_id: Some(other_course.id),
        ..award(student.id, 5)
    })
    .await?;

    assert!(repo.has_course_completion(student.id, course.id).await?);
    assert!(!repo.has_course_completion(student.id, other_course.id).await?);

    Ok(())
}
