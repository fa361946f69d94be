//! Learner progress overview and certificate downloads.

use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde_json::json;

use crate::{
    model::progress::{ProgressOverviewDto, ProgressStatsDto, RecentActivityDto},
    server::{
        data::{
            achievement::AchievementRepository, activity_log::ActivityLogRepository,
            course::CourseRepository, quiz::QuizRepository, user_course::UserCourseRepository,
        },
        error::AppError,
        model::{
            activity::{NewActivity, TargetType},
            progress::{
                certificate_file_name, certificate_status_dto, rounded_mean, skill_level, skills,
            },
            user::User,
        },
        service::activity::ActivityLogger,
        util::certificate::render_certificate,
    },
};

const OVERVIEW_ACTIVITY_LIMIT: u64 = 10;
const ACTIVITY_LIMIT: u64 = 20;

/// A rendered certificate ready to be served as an attachment.
#[derive(Debug, Clone)]
pub struct CertificateFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub struct ProgressService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ProgressService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Aggregated learning statistics for the caller.
    ///
    /// Learning hours sum the per-course hours and fall back to the user's lifetime
    /// counter when no course has recorded time. The skill level follows the average
    /// quiz score, or average completion when no quiz has been taken.
    pub async fn overview(&self, user: &User) -> Result<ProgressOverviewDto, AppError> {
        let user_courses = UserCourseRepository::new(self.db)
            .find_by_user(user.id)
            .await?;
        let course_ids: Vec<i32> = user_courses.iter().map(|uc| uc.course_id).collect();
        let courses = CourseRepository::new(self.db)
            .find_by_ids(&course_ids)
            .await?;

        let course_hours: f64 = user_courses.iter().map(|uc| uc.hours_spent).sum();
        let learning_hours = if course_hours > 0.0 {
            course_hours
        } else {
            user.total_hours_learned
        };

        let achievements = AchievementRepository::new(self.db)
            .count_by_user(user.id)
            .await?;

        let completions: Vec<f64> = user_courses
            .iter()
            .map(|uc| uc.completion_percentage as f64)
            .collect();
        let avg_completion = rounded_mean(&completions);

        let scores = QuizRepository::new(self.db)
            .attempt_percentages(user.id)
            .await?;
        let avg_score = rounded_mean(&scores);

        let basis = if avg_score > 0 { avg_score } else { avg_completion };
        let overall = skill_level(basis as f64);

        let certificates = user_courses
            .iter()
            .map(|uc| {
                let title = courses.get(&uc.course_id).map(|c| c.title.clone());
                certificate_status_dto(uc, title)
            })
            .collect();

        let recent_activity = ActivityLogRepository::new(self.db)
            .recent_by_user(user.id, OVERVIEW_ACTIVITY_LIMIT)
            .await?
            .iter()
            .map(|log| log.to_entry(true))
            .collect();

        Ok(ProgressOverviewDto {
            stats: ProgressStatsDto {
                enrolled_courses: user_courses.len() as u64,
                learning_hours,
                achievements,
                avg_score,
                skill_level_label: overall.label.to_string(),
                skill_level_percent: overall.percent,
            },
            skills: skills(avg_completion, avg_score, learning_hours, &overall),
            certificates,
            recent_activity,
        })
    }

    /// The caller's latest twenty activity entries.
    pub async fn activity(&self, user_id: i32) -> Result<RecentActivityDto, AppError> {
        let recent_activity = ActivityLogRepository::new(self.db)
            .recent_by_user(user_id, ACTIVITY_LIMIT)
            .await?
            .iter()
            .map(|log| log.to_entry(false))
            .collect();

        Ok(RecentActivityDto { recent_activity })
    }

    /// Renders the completion certificate PDF for a finished course.
    ///
    /// The first download stamps the progress entry; every download is logged.
    ///
    /// # Returns
    /// - `Ok(CertificateFile)` - PDF bytes and the attachment file name
    /// - `Err(AppError::NotFound)` - The caller has no progress entry for the course
    /// - `Err(AppError::BadRequest)` - The course is not fully completed
    pub async fn download_certificate(
        &self,
        user: &User,
        course_id: i32,
    ) -> Result<CertificateFile, AppError> {
        let user_course_repo = UserCourseRepository::new(self.db);
        let user_course = user_course_repo
            .find(user.id, course_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Enrollment for this course not found".to_string())
            })?;
        if user_course.completion_percentage < 100 {
            return Err(AppError::BadRequest(
                "Certificate is only available after course completion".to_string(),
            ));
        }

        let course_title = CourseRepository::new(self.db)
            .find_by_id(course_id)
            .await?
            .map(|c| c.title)
            .unwrap_or_else(|| "Course".to_string());
        let student_name = if user.full_name.trim().is_empty() {
            "Student"
        } else {
            user.full_name.as_str()
        };

        let now = Utc::now();
        let bytes = render_certificate(student_name, &course_title, now)?;

        user_course_repo
            .stamp_certificate(user_course.id, now)
            .await?;
        ActivityLogger::new(self.db)
            .record(
                NewActivity::new("Certificate Downloaded", user.id)
                    .target(TargetType::Certificate, course_id)
                    .details(json!({ "courseId": course_id, "courseTitle": course_title })),
            )
            .await;

        Ok(CertificateFile {
            file_name: certificate_file_name(&course_title),
            bytes,
        })
    }
}
