use std::collections::HashMap;

use sea_orm::DatabaseConnection;

use crate::server::{
    data::{assignment::AssignmentRepository, course::CourseRepository, user::UserRepository},
    error::AppError,
    model::{
        assignment::{Assignment, CreateAssignmentParams, UpdateAssignmentParams},
        user::User,
    },
    service::ensure_owner,
};

pub struct AssignmentService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AssignmentService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an assignment for a course taught by the caller.
    ///
    /// # Returns
    /// - `Ok(Assignment)` - The created assignment
    /// - `Err(AppError::NotFound)` - No course with this ID
    /// - `Err(AppError::AuthErr)` - Caller does not teach the course and is not an admin
    pub async fn create(
        &self,
        actor: &User,
        params: CreateAssignmentParams,
    ) -> Result<Assignment, AppError> {
        let course = CourseRepository::new(self.db)
            .find_by_id(params.course_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;
        ensure_owner(
            actor,
            course.instructor_id,
            "Not authorized to create assignments for this course",
        )?;

        Ok(AssignmentRepository::new(self.db).create(params).await?)
    }

    /// Assignments with course titles and instructor summaries attached.
    pub async fn list(&self, course_id: Option<i32>) -> Result<Vec<Assignment>, AppError> {
        let assignments = AssignmentRepository::new(self.db).list(course_id).await?;

        self.attach_refs(assignments).await
    }

    pub async fn get(&self, assignment_id: i32) -> Result<Assignment, AppError> {
        let assignment = self.require(assignment_id).await?;

        let mut attached = self.attach_refs(vec![assignment]).await?;
        attached.pop().ok_or_else(assignment_not_found)
    }

    pub async fn update(
        &self,
        actor: &User,
        assignment_id: i32,
        params: UpdateAssignmentParams,
    ) -> Result<Assignment, AppError> {
        let assignment = self.require(assignment_id).await?;
        ensure_owner(
            actor,
            assignment.instructor_id,
            "Not authorized to update this assignment",
        )?;

        AssignmentRepository::new(self.db)
            .update(assignment_id, params)
            .await?
            .ok_or_else(assignment_not_found)
    }

    pub async fn delete(&self, actor: &User, assignment_id: i32) -> Result<(), AppError> {
        let assignment = self.require(assignment_id).await?;
        ensure_owner(
            actor,
            assignment.instructor_id,
            "Not authorized to delete this assignment",
        )?;

        AssignmentRepository::new(self.db)
            .delete(assignment_id)
            .await?;

        Ok(())
    }

    async fn require(&self, assignment_id: i32) -> Result<Assignment, AppError> {
        AssignmentRepository::new(self.db)
            .find_by_id(assignment_id)
            .await?
            .ok_or_else(assignment_not_found)
    }

    async fn attach_refs(&self, assignments: Vec<Assignment>) -> Result<Vec<Assignment>, AppError> {
        let course_ids: Vec<i32> = assignments.iter().map(|a| a.course_id).collect();
        let instructor_ids: Vec<i32> = assignments.iter().map(|a| a.instructor_id).collect();

        let courses = CourseRepository::new(self.db)
            .find_by_ids(&course_ids)
            .await?;
        let instructors: HashMap<i32, User> = UserRepository::new(self.db)
            .find_by_ids(&instructor_ids)
            .await?;

        Ok(assignments
            .into_iter()
            .map(|a| {
                let course = courses.get(&a.course_id).map(|c| c.to_ref());
                let instructor = instructors.get(&a.instructor_id).map(User::to_summary);
                a.with_refs(course, instructor)
            })
            .collect())
    }
}

fn assignment_not_found() -> AppError {
    AppError::NotFound("Assignment not found".to_string())
}
