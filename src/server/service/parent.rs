//! Parent accounts and the students linked to them.

use entity::sea_orm_active_enums::Role;
use sea_orm::DatabaseConnection;

use crate::{
    model::parent::{ChildSummaryDto, ReportCourseDto, StudentReportDto},
    server::{
        data::{
            achievement::AchievementRepository, course::CourseRepository,
            parent_child::ParentChildRepository, user::UserRepository,
            user_course::UserCourseRepository,
        },
        error::{auth::AuthError, AppError},
        model::{achievement::Achievement, progress::rounded_mean, user::User},
        util::parse::normalize_email,
    },
};

pub struct ParentService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ParentService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Linked students with their enrolled course count and average progress.
    pub async fn children(&self, parent_id: i32) -> Result<Vec<ChildSummaryDto>, AppError> {
        let child_ids = ParentChildRepository::new(self.db)
            .children_of(parent_id)
            .await?;
        let users = UserRepository::new(self.db).find_by_ids(&child_ids).await?;
        let user_course_repo = UserCourseRepository::new(self.db);

        let mut children = Vec::with_capacity(child_ids.len());
        for child_id in child_ids {
            let Some(child) = users.get(&child_id) else {
                continue;
            };

            let courses = user_course_repo.find_by_user(child_id).await?;
            let completions: Vec<f64> = courses
                .iter()
                .map(|c| c.completion_percentage as f64)
                .collect();

            children.push(ChildSummaryDto {
                id: child.id,
                full_name: child.full_name.clone(),
                email: child.email.clone(),
                enrolled_count: courses.len() as u64,
                avg_progress: rounded_mean(&completions),
            });
        }

        Ok(children)
    }

    /// Progress report for a student linked to the parent.
    ///
    /// # Returns
    /// - `Ok(StudentReportDto)` - Hours, achievements and per-course progress
    /// - `Err(AppError::AuthErr)` - The student is not linked to this parent
    /// - `Err(AppError::NotFound)` - The student no longer exists
    pub async fn report(
        &self,
        parent_id: i32,
        student_id: i32,
    ) -> Result<StudentReportDto, AppError> {
        let linked = ParentChildRepository::new(self.db)
            .is_linked(parent_id, student_id)
            .await?;
        if !linked {
            return Err(AuthError::AccessDenied(
                "Student not linked to this parent".to_string(),
            )
            .into());
        }

        let student = UserRepository::new(self.db)
            .find_by_id(student_id)
            .await?
            .ok_or_else(student_not_found)?;

        let user_courses = UserCourseRepository::new(self.db)
            .find_by_user(student_id)
            .await?;
        let course_ids: Vec<i32> = user_courses.iter().map(|uc| uc.course_id).collect();
        let courses = CourseRepository::new(self.db)
            .find_by_ids(&course_ids)
            .await?;

        let achievements = AchievementRepository::new(self.db)
            .find_by_user(student_id)
            .await?
            .into_iter()
            .map(Achievement::into_dto)
            .collect();

        let enrolled_courses = user_courses
            .into_iter()
            .map(|uc| ReportCourseDto {
                course_id: uc.course_id,
                course_title: courses
                    .get(&uc.course_id)
                    .map(|c| c.title.clone())
                    .unwrap_or_else(|| "Unknown".to_string()),
                completion_percentage: uc.completion_percentage,
                completed_lessons_count: uc.completed_lessons.len() as u64,
                enrollment_date: uc.enrollment_date,
            })
            .collect();

        Ok(StudentReportDto {
            id: student.id,
            full_name: student.full_name,
            email: student.email,
            total_hours_learned: student.total_hours_learned,
            achievements,
            enrolled_courses,
        })
    }

    /// Links a student to the parent by id or email. The id wins when both are given.
    ///
    /// # Returns
    /// - `Ok(User)` - The linked student
    /// - `Err(AppError::BadRequest)` - Neither identifier given, the account is not a
    ///   student, or it is already linked
    /// - `Err(AppError::NotFound)` - No matching account
    pub async fn link(
        &self,
        parent_id: i32,
        email: Option<String>,
        student_id: Option<i32>,
    ) -> Result<User, AppError> {
        let user_repo = UserRepository::new(self.db);
        let email = email.filter(|e| !e.trim().is_empty());

        let student = match (student_id, email) {
            (Some(id), _) => user_repo.find_by_id(id).await?,
            (None, Some(email)) => user_repo.find_by_email(&normalize_email(&email)).await?,
            (None, None) => {
                return Err(AppError::BadRequest(
                    "Provide student email or studentId".to_string(),
                ))
            }
        }
        .ok_or_else(student_not_found)?;

        if student.role != Role::Student {
            return Err(AppError::BadRequest(
                "Can only link users with role student".to_string(),
            ));
        }

        let links = ParentChildRepository::new(self.db);
        if links.is_linked(parent_id, student.id).await? {
            return Err(AppError::BadRequest("Student already linked".to_string()));
        }
        links.link(parent_id, student.id).await?;

        tracing::info!("Parent {} linked student {}", parent_id, student.id);

        Ok(student)
    }

    pub async fn unlink(&self, parent_id: i32, student_id: i32) -> Result<(), AppError> {
        let removed = ParentChildRepository::new(self.db)
            .unlink(parent_id, student_id)
            .await?;
        if !removed {
            return Err(AppError::NotFound("Student not linked".to_string()));
        }

        Ok(())
    }
}

fn student_not_found() -> AppError {
    AppError::NotFound("Student not found".to_string())
}
