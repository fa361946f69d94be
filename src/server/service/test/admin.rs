use entity::sea_orm_active_enums::{EnrollmentStatus, Role};
use test_utils::{builder::TestBuilder, factory};

use crate::{
    model::admin::{AdminCreateEnrollmentDto, CreateSubAdminDto},
    server::{
        data::user::UserRepository,
        error::{auth::AuthError, AppError},
        service::admin::AdminService,
    },
};

use super::load_user;

fn subadmin_dto(email: &str, permissions: &[&str]) -> CreateSubAdminDto {
    CreateSubAdminDto {
        full_name: "Helper".to_string(),
        email: email.to_string(),
        password: "secret123".to_string(),
        permissions: permissions.iter().map(|p| p.to_string()).collect(),
    }
}

/// Expected: Ok(SubAdmin) holding exactly the requested capabilities
#[tokio::test]
async fn creates_subadmin_with_permissions() -> Result<(), AppError> {
    let test = TestBuilder::new().with_lms_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let admin = factory::user::create_user_with_role(db, Role::Admin).await?;
    let admin = load_user(db, admin.id).await?;

    let subadmin = AdminService::new(db)
        .create_subadmin(&admin, subadmin_dto("helper@example.com", &["manageCourses"]))
        .await?;

    assert_eq!(subadmin.user.role, Role::SubAdmin);
    assert_eq!(subadmin.permissions, vec!["manageCourses".to_string()]);
    let user_repo = UserRepository::new(db);
    assert!(user_repo.has_permission(subadmin.user.id, "manageCourses").await?);
    assert!(!user_repo.has_permission(subadmin.user.id, "viewReports").await?);

    Ok(())
}

/// Expected: Err(BadRequest("Invalid permission: deleteEverything")) and no account created
#[tokio::test]
async fn rejects_unknown_permission() -> Result<(), AppError> {
    let test = TestBuilder::new().with_lms_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let admin = factory::user::create_user_with_role(db, Role::Admin).await?;
    let admin = load_user(db, admin.id).await?;

    let result = AdminService::new(db)
        .create_subadmin(&admin, subadmin_dto("helper@example.com", &["deleteEverything"]))
        .await;

    assert!(matches!(
        result,
        Err(AppError::BadRequest(msg)) if msg == "Invalid permission: deleteEverything"
    ));
    assert!(UserRepository::new(db)
        .find_by_email("helper@example.com")
        .await?
        .is_none());

    Ok(())
}

/// Deleting accounts is reserved to full admins.
///
/// Expected: Err(AuthError::InsufficientRole)
#[tokio::test]
async fn subadmin_cannot_delete_user() -> Result<(), AppError> {
    let test = TestBuilder::new().with_lms_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let subadmin = factory::user::create_user_with_role(db, Role::SubAdmin).await?;
    let subadmin = load_user(db, subadmin.id).await?;
    let student = factory::user::create_user(db).await?;

    let result = AdminService::new(db).delete_user(&subadmin, student.id).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::InsufficientRole))
    ));
    assert!(UserRepository::new(db).find_by_id(student.id).await?.is_some());

    Ok(())
}

/// Admin enrollments skip payment and start active.
///
/// Expected: Ok(Enrollment { status: Active }); a second attempt is a BadRequest
#[tokio::test]
async fn admin_enrollment_starts_active() -> Result<(), AppError> {
    let test = TestBuilder::new().with_lms_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let admin = factory::user::create_user_with_role(db, Role::Admin).await?;
    let admin = load_user(db, admin.id).await?;
    let student = factory::user::create_user(db).await?;
    let (_, course) = factory::helpers::create_course_with_instructor(db).await?;
    let service = AdminService::new(db);
    let dto = AdminCreateEnrollmentDto {
        student_id: Some(student.id),
        course_id: Some(course.id),
    };

    let enrollment = service.create_enrollment(&admin, dto.clone()).await?;
    let again = service.create_enrollment(&admin, dto).await;

    assert_eq!(enrollment.status, EnrollmentStatus::Active);
    assert!(matches!(again, Err(AppError::BadRequest(_))));

    Ok(())
}

/// Expected: counts per role, course and enrollment totals
#[tokio::test]
async fn dashboard_counts() -> Result<(), AppError> {
    let test = TestBuilder::new().with_lms_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, course) = factory::helpers::create_course_with_instructor(db).await?;
    let student = factory::user::create_user(db).await?;
    factory::user::create_user(db).await?;
    factory::user::create_user_with_role(db, Role::Parent).await?;
    factory::enrollment::EnrollmentFactory::new(db, student.id, course.id)
        .status(EnrollmentStatus::Active)
        .build()
        .await?;

    let summary = AdminService::new(db).dashboard_summary().await?;

    assert_eq!(summary.total_students, 2);
    assert_eq!(summary.total_parents, 1);
    assert_eq!(summary.total_instructors, 1);
    assert_eq!(summary.total_courses, 1);
    assert_eq!(summary.total_enrollments, 1);
    assert_eq!(summary.completed_courses, 0);

    Ok(())
}
