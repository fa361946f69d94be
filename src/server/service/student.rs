//! Student dashboard, course progress and lesson completion.
//!
//! Progress lives in `user_course` rows. Completing a lesson adds it to the row's
//! completed set, accumulates study hours on the row and the user, and recomputes the
//! completion percentage. The first time a course reaches 100% the student earns a
//! single "Course Completion" achievement.

use entity::sea_orm_active_enums::AchievementType;
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde_json::json;

use crate::{
    model::student::{
        AchievementTotalsDto, CourseHoursDto, DashboardOverviewDto, LessonCompletionDto,
        StudentAchievementsDto, StudentActivityDto, StudentCourseDetailDto, StudentCourseDto,
        StudentDashboardDto, StudentProfileDto, UpdateStudentProfileDto,
    },
    server::{
        data::{
            achievement::AchievementRepository, course::CourseRepository,
            lesson::LessonRepository, user::UserRepository, user_course::UserCourseRepository,
        },
        error::{auth::AuthError, AppError},
        model::{
            achievement::{Achievement, CreateAchievementParams},
            activity::{NewActivity, TargetType},
            enum_name,
            progress::rounded_mean,
            user::{UpdateUserParams, User},
            user_course::{completion_percentage, UserCourse},
        },
        service::{activity::ActivityLogger, course::CourseService},
    },
};

pub struct StudentService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> StudentService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn dashboard(&self, user_id: i32) -> Result<StudentDashboardDto, AppError> {
        let student = self.require_user(user_id).await?;
        let user_courses = UserCourseRepository::new(self.db)
            .find_by_user(user_id)
            .await?;
        let total_achievements = AchievementRepository::new(self.db)
            .count_by_user(user_id)
            .await?;

        let enrolled = user_courses.len() as u64;
        let completed = user_courses
            .iter()
            .filter(|uc| uc.completion_percentage >= 100)
            .count() as u64;
        let completions: Vec<f64> = user_courses
            .iter()
            .map(|uc| uc.completion_percentage as f64)
            .collect();

        Ok(StudentDashboardDto {
            student: student.to_summary(),
            overview: DashboardOverviewDto {
                total_courses_enrolled: enrolled,
                completed_courses: completed,
                in_progress_courses: enrolled - completed,
                total_study_hours: student.total_hours_learned,
                average_progress: rounded_mean(&completions),
                total_achievements,
                streak_days: student.streak_days,
            },
        })
    }

    /// The student's account with enrolled course titles and achievements.
    pub async fn profile(&self, user_id: i32) -> Result<StudentProfileDto, AppError> {
        let student = self.require_user(user_id).await?;

        let course_ids: Vec<i32> = UserCourseRepository::new(self.db)
            .find_by_user(user_id)
            .await?
            .into_iter()
            .map(|uc| uc.course_id)
            .collect();
        let courses = CourseRepository::new(self.db)
            .find_by_ids(&course_ids)
            .await?;
        let enrolled_courses = course_ids
            .iter()
            .filter_map(|id| courses.get(id))
            .map(|c| c.to_ref())
            .collect();

        let achievements = AchievementRepository::new(self.db)
            .find_by_user(user_id)
            .await?
            .into_iter()
            .map(Achievement::into_dto)
            .collect();

        Ok(StudentProfileDto {
            user: student.into_dto(),
            enrolled_courses,
            achievements,
        })
    }

    /// Updates the profile fields a student may edit. Empty strings are ignored.
    pub async fn update_profile(
        &self,
        user_id: i32,
        dto: UpdateStudentProfileDto,
    ) -> Result<User, AppError> {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        UserRepository::new(self.db)
            .update(
                user_id,
                UpdateUserParams {
                    full_name: non_empty(dto.full_name).map(|n| n.trim().to_string()),
                    phone: non_empty(dto.phone),
                    bio: non_empty(dto.bio),
                    avatar: non_empty(dto.avatar),
                    address: dto.address.filter(|a| !a.is_null()),
                    ..Default::default()
                },
            )
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Every course on the student's list with progress and lesson counts.
    pub async fn courses(&self, user_id: i32) -> Result<Vec<StudentCourseDto>, AppError> {
        let user_courses = UserCourseRepository::new(self.db)
            .find_by_user(user_id)
            .await?;

        let course_ids: Vec<i32> = user_courses.iter().map(|uc| uc.course_id).collect();
        let courses = CourseRepository::new(self.db)
            .find_by_ids(&course_ids)
            .await?;
        let lessons = LessonRepository::new(self.db)
            .find_by_courses(&course_ids)
            .await?;
        let instructor_ids: Vec<i32> = courses.values().map(|c| c.instructor_id).collect();
        let instructors = UserRepository::new(self.db)
            .find_by_ids(&instructor_ids)
            .await?;

        Ok(user_courses
            .into_iter()
            .filter_map(|uc| {
                let course = courses.get(&uc.course_id)?;
                let total_lessons = lessons.get(&uc.course_id).map_or(0, Vec::len) as u64;
                Some(StudentCourseDto {
                    id: course.id,
                    title: course.title.clone(),
                    description: course.description.clone(),
                    thumbnail: course.thumbnail.clone(),
                    instructor: instructors.get(&course.instructor_id).map(User::to_summary),
                    level: enum_name(&course.level),
                    completion_percentage: uc.completion_percentage,
                    hours_spent: uc.hours_spent,
                    completed_lessons: uc.completed_lessons.len() as u64,
                    total_lessons,
                    enrollment_date: uc.enrollment_date,
                    certificate_downloaded_at: uc.certificate_downloaded_at,
                })
            })
            .collect())
    }

    /// Course detail for a course the student is enrolled in.
    ///
    /// # Returns
    /// - `Ok(StudentCourseDetailDto)` - Course detail and the student's progress
    /// - `Err(AppError::AuthErr)` - The student is not enrolled
    /// - `Err(AppError::NotFound)` - The course no longer exists
    pub async fn course(
        &self,
        user_id: i32,
        course_id: i32,
    ) -> Result<StudentCourseDetailDto, AppError> {
        let user_course = self.require_enrolled(user_id, course_id).await?;
        let detail = CourseService::new(self.db).detail(course_id).await?;

        Ok(StudentCourseDetailDto {
            course: detail.into_dto(),
            enrollment: user_course.progress_dto(),
        })
    }

    /// Directly enrolls the student in a course and returns the new progress row.
    pub async fn enroll(&self, user: &User, course_id: i32) -> Result<UserCourse, AppError> {
        CourseService::new(self.db).enroll(user, course_id).await?;

        UserCourseRepository::new(self.db)
            .find(user.id, course_id)
            .await?
            .ok_or_else(|| AppError::InternalError("Enrollment was not stored".to_string()))
    }

    /// Marks a lesson complete and recomputes course progress.
    ///
    /// Completing the same lesson twice leaves the completed set unchanged but still
    /// adds the reported hours.
    ///
    /// # Arguments
    /// - `user_id` - Student completing the lesson
    /// - `course_id` - Course the lesson belongs to
    /// - `lesson_id` - Completed lesson
    /// - `hours_spent` - Study time to add, ignored unless positive
    ///
    /// # Returns
    /// - `Ok(LessonCompletionDto)` - Updated progress figures
    /// - `Err(AppError::AuthErr)` - The student is not enrolled in the course
    /// - `Err(AppError::NotFound)` - The lesson does not belong to the course
    pub async fn complete_lesson(
        &self,
        user_id: i32,
        course_id: i32,
        lesson_id: i32,
        hours_spent: Option<f64>,
    ) -> Result<LessonCompletionDto, AppError> {
        let user_course = self.require_enrolled(user_id, course_id).await?;

        let lesson = LessonRepository::new(self.db)
            .find_by_id(lesson_id)
            .await?
            .filter(|l| l.course_id == course_id)
            .ok_or_else(|| AppError::NotFound("Lesson not found".to_string()))?;
        let course = CourseService::new(self.db).require(course_id).await?;

        let added_hours = hours_spent.filter(|h| h.is_finite() && *h > 0.0).unwrap_or(0.0);

        let txn = self.db.begin().await?;

        let user_course_repo = UserCourseRepository::new(&txn);
        user_course_repo
            .add_completed_lesson(user_course.id, lesson.id)
            .await?;
        let completed = user_course_repo
            .count_completed_lessons(user_course.id)
            .await?;
        let total = LessonRepository::new(&txn)
            .count_by_course(course_id)
            .await?;
        let percentage = completion_percentage(completed, total);
        let hours = user_course.hours_spent + added_hours;
        user_course_repo
            .set_progress(user_course.id, hours, percentage)
            .await?;

        if added_hours > 0.0 {
            UserRepository::new(&txn)
                .add_hours_learned(user_id, added_hours)
                .await?;
        }

        let mut awarded = false;
        if percentage >= 100 {
            let achievement_repo = AchievementRepository::new(&txn);
            if !achievement_repo
                .has_course_completion(user_id, course_id)
                .await?
            {
                achievement_repo
                    .create(CreateAchievementParams::course_completion(
                        user_id,
                        course_id,
                        &course.title,
                    ))
                    .await?;
                awarded = true;
            }
        }

        txn.commit().await?;

        if awarded {
            tracing::info!("User {} completed course {}", user_id, course_id);
        }
        ActivityLogger::new(self.db)
            .record(
                NewActivity::new("Lesson Completed", user_id)
                    .target(TargetType::Lesson, lesson.id)
                    .details(json!({
                        "courseId": course_id,
                        "description": format!("Completed {}", lesson.title),
                        "completionPercentage": percentage,
                    })),
            )
            .await;

        Ok(LessonCompletionDto {
            completion_percentage: percentage,
            hours_spent: hours,
            completed_lessons: completed,
            total_lessons: total,
        })
    }

    pub async fn achievements(&self, user_id: i32) -> Result<StudentAchievementsDto, AppError> {
        let achievements = AchievementRepository::new(self.db)
            .find_by_user(user_id)
            .await?;

        let course_ids: Vec<i32> = achievements.iter().filter_map(|a| a.course_id).collect();
        let courses = CourseRepository::new(self.db)
            .find_by_ids(&course_ids)
            .await?;
        let achievements = achievements
            .into_iter()
            .map(|a| {
                let course = a
                    .course_id
                    .and_then(|id| courses.get(&id))
                    .map(|c| c.to_ref());
                a.with_refs(None, course)
            })
            .collect();

        Ok(group_achievements(achievements))
    }

    /// Study hours overall and per enrolled course.
    pub async fn activity(&self, user_id: i32) -> Result<StudentActivityDto, AppError> {
        let student = self.require_user(user_id).await?;
        let user_courses = UserCourseRepository::new(self.db)
            .find_by_user(user_id)
            .await?;

        let course_ids: Vec<i32> = user_courses.iter().map(|uc| uc.course_id).collect();
        let courses = CourseRepository::new(self.db)
            .find_by_ids(&course_ids)
            .await?;

        let hours_by_course = user_courses
            .iter()
            .map(|uc| CourseHoursDto {
                course: courses
                    .get(&uc.course_id)
                    .map(|c| c.title.clone())
                    .unwrap_or_default(),
                hours_spent: uc.hours_spent,
            })
            .collect();

        Ok(StudentActivityDto {
            total_hours: student.total_hours_learned,
            hours_by_course,
            streak_days: student.streak_days,
            last_login_date: student.last_login_date,
        })
    }

    async fn require_user(&self, user_id: i32) -> Result<User, AppError> {
        UserRepository::new(self.db)
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    async fn require_enrolled(&self, user_id: i32, course_id: i32) -> Result<UserCourse, AppError> {
        UserCourseRepository::new(self.db)
            .find(user_id, course_id)
            .await?
            .ok_or_else(|| AuthError::AccessDenied("Not enrolled in this course".to_string()).into())
    }
}

/// Splits achievements into the four type buckets with per-bucket totals.
pub fn group_achievements(achievements: Vec<Achievement>) -> StudentAchievementsDto {
    let all = achievements.len();
    let mut course_completions = Vec::new();
    let mut assessment_scores = Vec::new();
    let mut participation = Vec::new();
    let mut special = Vec::new();

    for achievement in achievements {
        let bucket = match achievement.achievement_type {
            AchievementType::CourseCompletion => &mut course_completions,
            AchievementType::AssessmentScore => &mut assessment_scores,
            AchievementType::Participation => &mut participation,
            AchievementType::Special => &mut special,
        };
        bucket.push(achievement.into_dto());
    }

    StudentAchievementsDto {
        total: AchievementTotalsDto {
            all,
            course_completions: course_completions.len(),
            assessment_scores: assessment_scores.len(),
            participation: participation.len(),
            special: special.len(),
        },
        course_completions,
        assessment_scores,
        participation,
        special,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn achievement(id: i32, achievement_type: AchievementType) -> Achievement {
        Achievement {
            id,
            user_id: 1,
            user: None,
            title: format!("Award {}", id),
            description: String::new(),
            achievement_type,
            points: 10,
            course_id: None,
            course: None,
            icon: "default-achievement.png".to_string(),
            date_earned: Utc::now(),
        }
    }

    #[test]
    fn groups_by_type_with_totals() {
        let grouped = group_achievements(vec![
            achievement(1, AchievementType::CourseCompletion),
            achievement(2, AchievementType::CourseCompletion),
            achievement(3, AchievementType::Special),
        ]);

        assert_eq!(grouped.total.all, 3);
        assert_eq!(grouped.total.course_completions, 2);
        assert_eq!(grouped.total.special, 1);
        assert!(grouped.participation.is_empty());
        assert_eq!(grouped.special[0].id, 3);
    }
}
