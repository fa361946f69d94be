use entity::sea_orm_active_enums::Role;
use test_utils::{builder::TestBuilder, factory};

use crate::server::{
    data::{parent_child::ParentChildRepository, user_course::UserCourseRepository},
    error::{auth::AuthError, AppError},
    service::parent::ParentService,
};

/// Emails are matched case-insensitively.
///
/// Expected: Ok(User) and a stored link
#[tokio::test]
async fn links_student_by_email() -> Result<(), AppError> {
    let test = TestBuilder::new().with_lms_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let parent = factory::user::create_user_with_role(db, Role::Parent).await?;
    let student = factory::user::UserFactory::new(db)
        .email("kid@example.com")
        .build()
        .await?;

    let linked = ParentService::new(db)
        .link(parent.id, Some(" Kid@Example.com ".to_string()), None)
        .await?;

    assert_eq!(linked.id, student.id);
    assert!(ParentChildRepository::new(db).is_linked(parent.id, student.id).await?);

    Ok(())
}

/// Expected: Err(BadRequest("Student already linked"))
#[tokio::test]
async fn rejects_duplicate_link() -> Result<(), AppError> {
    let test = TestBuilder::new().with_lms_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let parent = factory::user::create_user_with_role(db, Role::Parent).await?;
    let student = factory::user::create_user(db).await?;
    let service = ParentService::new(db);

    service.link(parent.id, None, Some(student.id)).await?;
    let result = service.link(parent.id, None, Some(student.id)).await;

    assert!(matches!(result, Err(AppError::BadRequest(msg)) if msg == "Student already linked"));

    Ok(())
}

/// Expected: Err(BadRequest) for an instructor account
#[tokio::test]
async fn rejects_non_student() -> Result<(), AppError> {
    let test = TestBuilder::new().with_lms_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let parent = factory::user::create_user_with_role(db, Role::Parent).await?;
    let instructor = factory::user::create_user_with_role(db, Role::Instructor).await?;

    let result = ParentService::new(db)
        .link(parent.id, None, Some(instructor.id))
        .await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));

    Ok(())
}

/// Expected: Err(BadRequest) when neither email nor id is given
#[tokio::test]
async fn rejects_link_without_identifier() -> Result<(), AppError> {
    let test = TestBuilder::new().with_lms_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let parent = factory::user::create_user_with_role(db, Role::Parent).await?;

    let result = ParentService::new(db)
        .link(parent.id, Some("  ".to_string()), None)
        .await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));

    Ok(())
}

/// Expected: Err(AuthError::AccessDenied) for a student that is not linked
#[tokio::test]
async fn report_requires_link() -> Result<(), AppError> {
    let test = TestBuilder::new().with_lms_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let parent = factory::user::create_user_with_role(db, Role::Parent).await?;
    let student = factory::user::create_user(db).await?;

    let result = ParentService::new(db).report(parent.id, student.id).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::AccessDenied(_)))
    ));

    Ok(())
}

/// Children list the enrolled course count and report lists course progress.
///
/// Expected: one child with one course; report carries the course title
#[tokio::test]
async fn children_and_report_show_progress() -> Result<(), AppError> {
    let test = TestBuilder::new().with_lms_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let parent = factory::user::create_user_with_role(db, Role::Parent).await?;
    let student = factory::user::create_user(db).await?;
    let (_, course) = factory::helpers::create_course_with_instructor(db).await?;
    UserCourseRepository::new(db).ensure(student.id, course.id).await?;
    let service = ParentService::new(db);
    service.link(parent.id, None, Some(student.id)).await?;

    let children = service.children(parent.id).await?;
    let report = service.report(parent.id, student.id).await?;

    assert_eq!(children.len(), 1);
    assert_eq!(children[0].id, student.id);
    assert_eq!(children[0].enrolled_count, 1);
    assert_eq!(children[0].avg_progress, 0);
    assert_eq!(report.enrolled_courses.len(), 1);
    assert_eq!(report.enrolled_courses[0].course_title, course.title);

    Ok(())
}

/// Expected: Err(NotFound("Student not linked"))
#[tokio::test]
async fn unlink_missing_link() -> Result<(), AppError> {
    let test = TestBuilder::new().with_lms_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let parent = factory::user::create_user_with_role(db, Role::Parent).await?;
    let student = factory::user::create_user(db).await?;

    let result = ParentService::new(db).unlink(parent.id, student.id).await;

    assert!(matches!(result, Err(AppError::NotFound(msg)) if msg == "Student not linked"));

    Ok(())
}
