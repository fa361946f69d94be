//! Course catalog, direct enrollment, reviews and certificate metadata.
//!
//! Deleting a course runs in one transaction that removes its lessons, quizzes,
//! assignments, reviews, student links, progress rows and enrollments, and clears the
//! course reference on payments, achievements, events and tutor interactions.

use chrono::Utc;
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde_json::json;

use crate::{
    model::course::{CertificateDto, CertificateResponseDto},
    server::{
        data::{
            achievement::AchievementRepository,
            ai_interaction::AiInteractionRepository,
            assignment::AssignmentRepository,
            course::{CourseRepository, CourseStudentRepository},
            course_review::CourseReviewRepository,
            enrollment::EnrollmentRepository,
            event::EventRepository,
            lesson::LessonRepository,
            payment::PaymentRepository,
            quiz::QuizRepository,
            user::UserRepository,
            user_course::UserCourseRepository,
        },
        error::{auth::AuthError, AppError},
        model::{
            activity::{NewActivity, TargetType},
            course::{
                Course, CourseDetail, CourseFilter, CreateCourseParams, PaginatedCourses,
                UpdateCourseParams,
            },
            enrollment::UpdateEnrollmentParams,
            user::User,
        },
        service::{activity::ActivityLogger, ensure_owner, MAX_PAGE},
    },
};

pub const COURSES_PER_PAGE: u64 = 10;

pub struct CourseService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CourseService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, params: CreateCourseParams) -> Result<Course, AppError> {
        let course = CourseRepository::new(self.db).create(params).await?;

        tracing::info!(
            "Course {} '{}' created by instructor {}",
            course.id,
            course.title,
            course.instructor_id
        );

        Ok(course)
    }

    /// Gets one page of the catalog, newest first, with instructor summaries attached.
    ///
    /// # Arguments
    /// - `keyword` - Case-insensitive substring over title and description
    /// - `page` - 1-based page number, clamped to `1..=MAX_PAGE`
    ///
    /// # Returns
    /// - `Ok(PaginatedCourses)` - Courses with page, page count and total
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn list(
        &self,
        keyword: Option<String>,
        page: Option<u64>,
    ) -> Result<PaginatedCourses, AppError> {
        let page = page.unwrap_or(1).clamp(1, MAX_PAGE);
        let filter = CourseFilter {
            keyword: keyword.filter(|k| !k.trim().is_empty()),
            ..Default::default()
        };

        let (courses, total) = CourseRepository::new(self.db)
            .get_paginated(&filter, page - 1, COURSES_PER_PAGE)
            .await?;
        let courses = self.attach_instructors(courses).await?;

        Ok(PaginatedCourses {
            courses,
            page,
            pages: total.div_ceil(COURSES_PER_PAGE),
            total,
        })
    }

    /// Course with instructor, ordered lessons, reviews and enrolled student ids.
    pub async fn detail(&self, course_id: i32) -> Result<CourseDetail, AppError> {
        let course = self.require(course_id).await?;

        let user_repo = UserRepository::new(self.db);
        let instructor = user_repo
            .find_by_id(course.instructor_id)
            .await?
            .map(|u| u.to_summary());

        let lessons = LessonRepository::new(self.db)
            .find_by_course(course_id)
            .await?;

        let reviews = CourseReviewRepository::new(self.db)
            .find_by_course(course_id)
            .await?;
        let reviewer_ids: Vec<i32> = reviews.iter().map(|r| r.user_id).collect();
        let reviewers = user_repo.find_by_ids(&reviewer_ids).await?;
        let reviews = reviews
            .into_iter()
            .map(|r| {
                let user = reviewers.get(&r.user_id).map(User::to_summary);
                r.with_user(user)
            })
            .collect();

        let enrolled_students = CourseStudentRepository::new(self.db)
            .student_ids(course_id)
            .await?;

        Ok(CourseDetail {
            course: course.with_instructor(instructor),
            lessons,
            reviews,
            enrolled_students,
        })
    }

    /// Merges the provided fields into a course owned by the caller.
    ///
    /// # Returns
    /// - `Ok(Course)` - The updated course
    /// - `Err(AppError::NotFound)` - No course with this ID
    /// - `Err(AppError::AuthErr)` - Caller is neither the instructor nor an admin
    pub async fn update(
        &self,
        actor: &User,
        course_id: i32,
        params: UpdateCourseParams,
    ) -> Result<Course, AppError> {
        let course = self.require(course_id).await?;
        ensure_owner(actor, course.instructor_id, "Not authorized to update this course")?;

        CourseRepository::new(self.db)
            .update(course_id, params)
            .await?
            .ok_or_else(course_not_found)
    }

    /// Deletes a course owned by the caller together with its dependent rows.
    pub async fn delete(&self, actor: &User, course_id: i32) -> Result<(), AppError> {
        let course = self.require(course_id).await?;
        ensure_owner(actor, course.instructor_id, "Not authorized to delete this course")?;

        self.delete_cascade(course_id).await?;

        tracing::info!("Course {} deleted by user {}", course_id, actor.id);

        Ok(())
    }

    /// Removes a course and applies the delete policy in one transaction.
    ///
    /// Used directly by admin routes that skip the ownership check.
    pub async fn delete_cascade(&self, course_id: i32) -> Result<bool, AppError> {
        let txn = self.db.begin().await?;

        UserCourseRepository::new(&txn)
            .delete_by_course(course_id)
            .await?;
        EnrollmentRepository::new(&txn)
            .delete_by_course(course_id)
            .await?;
        CourseStudentRepository::new(&txn)
            .delete_by_course(course_id)
            .await?;
        CourseReviewRepository::new(&txn)
            .delete_by_course(course_id)
            .await?;
        QuizRepository::new(&txn).delete_by_course(course_id).await?;
        AssignmentRepository::new(&txn)
            .delete_by_course(course_id)
            .await?;
        LessonRepository::new(&txn)
            .delete_by_course(course_id)
            .await?;

        PaymentRepository::new(&txn).clear_course(course_id).await?;
        AchievementRepository::new(&txn)
            .clear_course(course_id)
            .await?;
        EventRepository::new(&txn).clear_course(course_id).await?;
        AiInteractionRepository::new(&txn)
            .clear_course(course_id)
            .await?;

        let deleted = CourseRepository::new(&txn).delete(course_id).await?;

        txn.commit().await?;

        Ok(deleted)
    }

    /// Adds the caller to a course without payment.
    ///
    /// # Returns
    /// - `Ok(Course)` - The course joined
    /// - `Err(AppError::NotFound)` - No course with this ID
    /// - `Err(AppError::BadRequest)` - The caller already has this course
    pub async fn enroll(&self, user: &User, course_id: i32) -> Result<Course, AppError> {
        let course = self.require(course_id).await?;

        let already_listed = UserCourseRepository::new(self.db)
            .find(user.id, course_id)
            .await?
            .is_some();
        let already_student = CourseStudentRepository::new(self.db)
            .contains(course_id, user.id)
            .await?;
        if already_listed || already_student {
            return Err(AppError::BadRequest(
                "Already enrolled in this course".to_string(),
            ));
        }

        let txn = self.db.begin().await?;
        UserCourseRepository::new(&txn).create(user.id, course_id).await?;
        CourseStudentRepository::new(&txn).add(course_id, user.id).await?;
        txn.commit().await?;

        ActivityLogger::new(self.db)
            .record(
                NewActivity::new("Course Enrolled", user.id)
                    .target(TargetType::Course, course_id)
                    .details(json!({ "courseId": course_id, "title": course.title })),
            )
            .await;

        Ok(course)
    }

    /// Adds the caller's review and recomputes the course's average rating.
    ///
    /// # Returns
    /// - `Ok(())` - Review stored and rating updated
    /// - `Err(AppError::BadRequest)` - Rating outside 1-5 or the caller already reviewed
    /// - `Err(AppError::NotFound)` - No course with this ID
    pub async fn review(
        &self,
        user_id: i32,
        course_id: i32,
        rating: i32,
        comment: Option<String>,
    ) -> Result<(), AppError> {
        if !(1..=5).contains(&rating) {
            return Err(AppError::BadRequest(
                "Rating must be between 1 and 5".to_string(),
            ));
        }

        self.require(course_id).await?;

        if CourseReviewRepository::new(self.db)
            .exists(course_id, user_id)
            .await?
        {
            return Err(AppError::BadRequest("Course already reviewed".to_string()));
        }

        let txn = self.db.begin().await?;
        let review_repo = CourseReviewRepository::new(&txn);
        review_repo
            .create(course_id, user_id, rating, comment)
            .await?;
        let average = review_repo.average_rating(course_id).await?;
        CourseRepository::new(&txn)
            .set_rating(course_id, average)
            .await?;
        txn.commit().await?;

        Ok(())
    }

    /// Certificate metadata for a completed enrollment.
    ///
    /// The first call stamps the download time on the enrollment and on the caller's
    /// course progress entry.
    ///
    /// # Returns
    /// - `Ok(CertificateResponseDto)` - Certificate data and the PDF download URL
    /// - `Err(AppError::NotFound)` - No course with this ID
    /// - `Err(AppError::AuthErr)` - The caller has no active enrollment
    /// - `Err(AppError::BadRequestWith)` - Progress is below 100, with `currentProgress`
    pub async fn certificate(
        &self,
        user: &User,
        course_id: i32,
    ) -> Result<CertificateResponseDto, AppError> {
        let course = self.require(course_id).await?;

        let enrollment_repo = EnrollmentRepository::new(self.db);
        let enrollment = enrollment_repo
            .find_by_pair(user.id, course_id)
            .await?
            .filter(|e| e.grants_access())
            .ok_or_else(|| {
                AuthError::AccessDenied(
                    "You must be enrolled in this course to download certificate".to_string(),
                )
            })?;

        if enrollment.progress_percentage < 100.0 {
            return Err(AppError::BadRequestWith {
                message: "Course not completed. Completion required: 100%".to_string(),
                extra: json!({ "currentProgress": enrollment.progress_percentage }),
            });
        }

        let instructor_name = UserRepository::new(self.db)
            .find_by_id(course.instructor_id)
            .await?
            .map(|u| u.full_name)
            .unwrap_or_else(|| "Instructor".to_string());

        let certificate = CertificateDto {
            id: format!("CERT-{}", enrollment.id),
            student_name: user.full_name.clone(),
            course_name: course.title.clone(),
            instructor_name,
            completion_date: enrollment.updated_at,
            completion_percentage: enrollment.progress_percentage,
            course_id,
            enrollment_id: enrollment.id,
        };

        let now = Utc::now();
        if enrollment.certificate_downloaded_at.is_none() {
            enrollment_repo
                .update(
                    enrollment.id,
                    UpdateEnrollmentParams {
                        certificate_downloaded_at: Some(now),
                        ..Default::default()
                    },
                )
                .await?;
        }

        let user_course_repo = UserCourseRepository::new(self.db);
        if let Some(entry) = user_course_repo.find(user.id, course_id).await? {
            if entry.certificate_downloaded_at.is_none() {
                user_course_repo.stamp_certificate(entry.id, now).await?;
            }
        }

        Ok(CertificateResponseDto {
            message: "Certificate ready for download".to_string(),
            certificate,
            download_url: format!("/api/courses/{}/certificate/pdf", course_id),
        })
    }

    pub async fn require(&self, course_id: i32) -> Result<Course, AppError> {
        CourseRepository::new(self.db)
            .find_by_id(course_id)
            .await?
            .ok_or_else(course_not_found)
    }

    async fn attach_instructors(&self, courses: Vec<Course>) -> Result<Vec<Course>, AppError> {
        let mut instructor_ids: Vec<i32> = courses.iter().map(|c| c.instructor_id).collect();
        instructor_ids.sort_unstable();
        instructor_ids.dedup();

        let instructors = UserRepository::new(self.db)
            .find_by_ids(&instructor_ids)
            .await?;

        Ok(courses
            .into_iter()
            .map(|c| {
                let instructor = instructors.get(&c.instructor_id).map(User::to_summary);
                c.with_instructor(instructor)
            })
            .collect())
    }
}

fn course_not_found() -> AppError {
    AppError::NotFound("Course not found".to_string())
}
