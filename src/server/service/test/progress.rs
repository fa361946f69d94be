use test_utils::{builder::TestBuilder, factory};

use crate::server::{
    data::user_course::UserCourseRepository, error::AppError, service::progress::ProgressService,
};

use super::load_user;

/// Expected: Err(NotFound) without a progress entry
#[tokio::test]
async fn certificate_requires_progress_entry() -> Result<(), AppError> {
    let test = TestBuilder::new().with_lms_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, course) = factory::helpers::create_course_with_instructor(db).await?;
    let student = factory::user::create_user(db).await?;
    let student = load_user(db, student.id).await?;

    let result = ProgressService::new(db)
        .download_certificate(&student, course.id)
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}

/// Expected: Err(BadRequest) while the course is below 100 percent
#[tokio::test]
async fn certificate_requires_completion() -> Result<(), AppError> {
    let test = TestBuilder::new().with_lms_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, course) = factory::helpers::create_course_with_instructor(db).await?;
    let student = factory::user::create_user(db).await?;
    let student = load_user(db, student.id).await?;
    let user_course_repo = UserCourseRepository::new(db);
    let (entry, _) = user_course_repo.ensure(student.id, course.id).await?;
    user_course_repo.set_progress(entry.id, 2.0, 99).await?;

    let result = ProgressService::new(db)
        .download_certificate(&student, course.id)
        .await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));

    Ok(())
}

/// A finished course renders a PDF and stamps the first download.
///
/// Expected: PDF bytes, a file name derived from the title and the certificate marked Downloaded
#[tokio::test]
async fn certificate_renders_pdf() -> Result<(), AppError> {
    let test = TestBuilder::new().with_lms_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let (instructor, _) = factory::helpers::create_course_with_instructor(db).await?;
    let course = factory::course::CourseFactory::new(db, instructor.id)
        .title("Rust Basics")
        .build()
        .await?;
    let student = factory::user::create_user(db).await?;
    let student = load_user(db, student.id).await?;
    let user_course_repo = UserCourseRepository::new(db);
    let (entry, _) = user_course_repo.ensure(student.id, course.id).await?;
    user_course_repo.set_progress(entry.id, 4.0, 100).await?;
    let service = ProgressService::new(db);

    let file = service.download_certificate(&student, course.id).await?;

    assert_eq!(file.file_name, "Rust_Basics_Certificate.pdf");
    assert!(file.bytes.starts_with(b"%PDF"));
    let entry = user_course_repo.find(student.id, course.id).await?.unwrap();
    assert!(entry.certificate_downloaded_at.is_some());
    let overview = service.overview(&student).await?;
    assert_eq!(overview.certificates.len(), 1);
    assert_eq!(overview.certificates[0].status, "Downloaded");

    Ok(())
}
