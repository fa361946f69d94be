use crate::server::{data::enrollment::EnrollmentRepository, model::enrollment::UpdateEnrollmentParams};
use entity::sea_orm_active_enums::EnrollmentStatus;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

/// Tests lookup by student and course.
///
/// Expected: Ok(Some) for the enrolled pair, Ok(None) for another student
#[tokio::test]
async fn find_by_pair() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_enrollment_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, course) = factory::helpers::create_course_with_instructor(db).await?;
    let student = factory::user::create_user(db).await?;
    let other = factory::user::create_user(db).await?;
    let repo = EnrollmentRepository::new(db);
    let enrollment = repo
        .create(student.id, course.id, EnrollmentStatus::Pending)
        .await?;

    let found = repo.find_by_pair(student.id, course.id).await?;

    assert_eq!(found.map(|e| e.id), Some(enrollment.id));
    assert!(repo.find_by_pair(other.id, course.id).await?.is_none());

    Ok(())
}

/// Tests that update merges only the given fields.
///
/// Expected: Ok with new progress and completion, status unchanged
#[tokio::test]
async fn update_merges_fields() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_enrollment_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, course) = factory::helpers::create_course_with_instructor(db).await?;
    let student = factory::user::create_user(db).await?;
    let enrollment = factory::enrollment::EnrollmentFactory::new(db, student.id, course.id)
        .status(EnrollmentStatus::Active)
        .build()
        .await?;
    let repo = EnrollmentRepository::new(db);

    let updated = repo
        .update(
            enrollment.id,
            UpdateEnrollmentParams {
                progress_percentage: Some(100.0),
                completed: Some(true),
                ..Default::default()
            },
        )
        .await?
        .unwrap();

    assert_eq!(updated.status, EnrollmentStatus::Active);
    assert_eq!(updated.progress_percentage, 100.0);
    assert!(updated.completed);
    assert_eq!(repo.count_completed().await?, 1);

    Ok(())
}

/// Expected: Ok(None) for an unknown enrollment
#[tokio::test]
async fn update_unknown_returns_none() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_enrollment_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let result = EnrollmentRepository::new(db)
        .update(404, UpdateEnrollmentParams::default())
        .await?;

    assert!(result.is_none());

    Ok(())
}
