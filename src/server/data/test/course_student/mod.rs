use crate::server::data::course::CourseStudentRepository;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

/// Tests that the roster behaves as a set.
///
/// Expected: Ok(true) then Ok(false), one roster entry
#[tokio::test]
async fn add_is_idempotent() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_course_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, course) = factory::helpers::create_course_with_instructor(db).await?;
    let student = factory::user::create_user(db).await?;
    let repo = CourseStudentRepository::new(db);

    assert!(repo.add(course.id, student.id).await?);
    assert!(!repo.add(course.id, student.id).await?);

    assert_eq!(repo.student_ids(course.id).await?, vec![student.id]);

    Ok(())
}

/// Tests grouping rosters by course.
///
/// Expected: Ok with each course mapped to its own students
#[tokio::test]
async fn groups_by_course() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_course_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let (instructor, first) = factory::helpers::create_course_with_instructor(db).await?;
    let second = factory::course::create_course(db, instructor.id).await?;
    let alice = factory::user::create_user(db).await?;
    let bob = factory::user::create_user(db).await?;
    let repo = CourseStudentRepository::new(db);
    repo.add(first.id, alice.id).await?;
    repo.add(second.id, alice.id).await?;
    repo.add(second.id, bob.id).await?;

    repo.remove(second.id, alice.id).await?;
    let rosters = repo.student_ids_by_course(&[first.id, second.id]).await?;

    assert_eq!(rosters.get(&first.id), Some(&vec![alice.id]));
    assert_eq!(rosters.get(&second.id), Some(&vec![bob.id]));

    Ok(())
}
