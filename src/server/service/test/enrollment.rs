use entity::sea_orm_active_enums::{EnrollmentStatus, PaymentStatus};
use test_utils::{builder::TestBuilder, factory};

use crate::server::{
    data::{course::CourseStudentRepository, user_course::UserCourseRepository},
    error::{auth::AuthError, AppError},
    service::enrollment::EnrollmentService,
};

/// Expected: Ok(Enrollment) with status Pending
#[tokio::test]
async fn creates_pending_enrollment() -> Result<(), AppError> {
    let test = TestBuilder::new().with_enrollment_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, course) = factory::helpers::create_course_with_instructor(db).await?;
    let student = factory::user::create_user(db).await?;

    let enrollment = EnrollmentService::new(db).create(student.id, course.id).await?;

    assert_eq!(enrollment.status, EnrollmentStatus::Pending);
    assert_eq!(enrollment.payment_id, None);

    Ok(())
}

/// A second attempt reports the existing enrollment id.
///
/// Expected: Err(BadRequestWith { extra.enrollmentId })
#[tokio::test]
async fn rejects_second_enrollment_for_course() -> Result<(), AppError> {
    let test = TestBuilder::new().with_enrollment_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, course) = factory::helpers::create_course_with_instructor(db).await?;
    let student = factory::user::create_user(db).await?;
    let service = EnrollmentService::new(db);

    let first = service.create(student.id, course.id).await?;
    let result = service.create(student.id, course.id).await;

    match result {
        Err(AppError::BadRequestWith { extra, .. }) => {
            assert_eq!(extra["enrollmentId"], first.id);
        }
        other => panic!("expected BadRequestWith, got {:?}", other.map(|e| e.id)),
    }

    Ok(())
}

/// Expected: Err(NotFound)
#[tokio::test]
async fn rejects_unknown_course() -> Result<(), AppError> {
    let test = TestBuilder::new().with_enrollment_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let student = factory::user::create_user(db).await?;

    let result = EnrollmentService::new(db).create(student.id, 999).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}

/// Activation with a completed payment of the same user and course.
///
/// Expected: enrollment Active with the payment attached, progress row and roster entry created
#[tokio::test]
async fn activates_with_completed_payment() -> Result<(), AppError> {
    let test = TestBuilder::new().with_enrollment_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, course) = factory::helpers::create_course_with_instructor(db).await?;
    let student = factory::user::create_user(db).await?;
    let payment = factory::payment::PaymentFactory::new(db, student.id, Some(course.id))
        .status(PaymentStatus::Completed)
        .build()
        .await?;
    let service = EnrollmentService::new(db);
    let pending = service.create(student.id, course.id).await?;

    let active = service.activate(student.id, pending.id, payment.id).await?;

    assert_eq!(active.status, EnrollmentStatus::Active);
    assert_eq!(active.payment_id, Some(payment.id));
    assert!(UserCourseRepository::new(db)
        .find(student.id, course.id)
        .await?
        .is_some());
    let rosters = CourseStudentRepository::new(db)
        .student_ids_by_course(&[course.id])
        .await?;
    assert_eq!(rosters.get(&course.id), Some(&vec![student.id]));

    Ok(())
}

/// Expected: Err(BadRequest("Payment not completed")) and the enrollment stays pending
#[tokio::test]
async fn rejects_pending_payment() -> Result<(), AppError> {
    let test = TestBuilder::new().with_enrollment_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, course) = factory::helpers::create_course_with_instructor(db).await?;
    let student = factory::user::create_user(db).await?;
    let payment = factory::payment::PaymentFactory::new(db, student.id, Some(course.id))
        .status(PaymentStatus::Pending)
        .build()
        .await?;
    let service = EnrollmentService::new(db);
    let pending = service.create(student.id, course.id).await?;

    let result = service.activate(student.id, pending.id, payment.id).await;

    assert!(matches!(result, Err(AppError::BadRequest(msg)) if msg == "Payment not completed"));
    let status = service.status(student.id, course.id).await?;
    assert!(!status.enrolled);

    Ok(())
}

/// Expected: Err(AuthError::AccessDenied)
#[tokio::test]
async fn rejects_payment_of_other_user() -> Result<(), AppError> {
    let test = TestBuilder::new().with_enrollment_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, course) = factory::helpers::create_course_with_instructor(db).await?;
    let student = factory::user::create_user(db).await?;
    let other = factory::user::create_user(db).await?;
    let payment = factory::payment::PaymentFactory::new(db, other.id, Some(course.id))
        .status(PaymentStatus::Completed)
        .build()
        .await?;
    let service = EnrollmentService::new(db);
    let pending = service.create(student.id, course.id).await?;

    let result = service.activate(student.id, pending.id, payment.id).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::AccessDenied(_)))
    ));

    Ok(())
}

/// Expected: Err(BadRequest("Payment course does not match enrollment course"))
#[tokio::test]
async fn rejects_payment_for_other_course() -> Result<(), AppError> {
    let test = TestBuilder::new().with_enrollment_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let (instructor, course) = factory::helpers::create_course_with_instructor(db).await?;
    let other_course = factory::course::create_course(db, instructor.id).await?;
    let student = factory::user::create_user(db).await?;
    let payment = factory::payment::PaymentFactory::new(db, student.id, Some(other_course.id))
        .status(PaymentStatus::Completed)
        .build()
        .await?;
    let service = EnrollmentService::new(db);
    let pending = service.create(student.id, course.id).await?;

    let result = service.activate(student.id, pending.id, payment.id).await;

    assert!(matches!(
        result,
        Err(AppError::BadRequest(msg)) if msg == "Payment course does not match enrollment course"
    ));

    Ok(())
}

/// Expected: Err(NotFound("Payment not found"))
#[tokio::test]
async fn rejects_unknown_payment() -> Result<(), AppError> {
    let test = TestBuilder::new().with_enrollment_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, course) = factory::helpers::create_course_with_instructor(db).await?;
    let student = factory::user::create_user(db).await?;
    let service = EnrollmentService::new(db);
    let pending = service.create(student.id, course.id).await?;

    let result = service.activate(student.id, pending.id, 4242).await;

    assert!(matches!(result, Err(AppError::NotFound(msg)) if msg == "Payment not found"));

    Ok(())
}

/// Only the student who opened the enrollment may activate it.
///
/// Expected: Err(AuthError::AccessDenied)
#[tokio::test]
async fn rejects_activation_by_other_student() -> Result<(), AppError> {
    let test = TestBuilder::new().with_enrollment_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, course) = factory::helpers::create_course_with_instructor(db).await?;
    let owner = factory::user::create_user(db).await?;
    let intruder = factory::user::create_user(db).await?;
    let payment = factory::payment::PaymentFactory::new(db, intruder.id, Some(course.id))
        .status(PaymentStatus::Completed)
        .build()
        .await?;
    let service = EnrollmentService::new(db);
    let pending = service.create(owner.id, course.id).await?;

    let result = service.activate(intruder.id, pending.id, payment.id).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::AccessDenied(_)))
    ));

    Ok(())
}
