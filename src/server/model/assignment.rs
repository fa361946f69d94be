use chrono::{DateTime, Utc};

use crate::{
    model::{
        api::{CourseRefDto, UserSummaryDto},
        assignment::{AssignmentDto, CreateAssignmentDto, UpdateAssignmentDto},
    },
    server::error::AppError,
};

pub const DEFAULT_MAX_SCORE: i32 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub id: i32,
    pub course_id: i32,
    pub course: Option<CourseRefDto>,
    pub lesson_id: Option<i32>,
    pub instructor_id: i32,
    pub instructor: Option<UserSummaryDto>,
    pub title: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
    pub max_score: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assignment {
    pub fn from_entity(entity: entity::assignment::Model) -> Self {
        Self {
            id: entity.id,
            course_id: entity.course_id,
            course: None,
            lesson_id: entity.lesson_id,
            instructor_id: entity.instructor_id,
            instructor: None,
            title: entity.title,
            description: entity.description,
            due_date: entity.due_date,
            max_score: entity.max_score,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }

    pub fn with_refs(
        mut self,
        course: Option<CourseRefDto>,
        instructor: Option<UserSummaryDto>,
    ) -> Self {
        self.course = course;
        self.instructor = instructor;
        self
    }

    pub fn into_dto(self) -> AssignmentDto {
        AssignmentDto {
            id: self.id,
            course_id: self.course_id,
            course: self.course,
            lesson_id: self.lesson_id,
            instructor_id: self.instructor_id,
            instructor: self.instructor,
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            max_score: self.max_score,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateAssignmentParams {
    pub course_id: i32,
    pub lesson_id: Option<i32>,
    pub instructor_id: i32,
    pub title: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
    pub max_score: i32,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateAssignmentParams {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub max_score: Option<i32>,
    pub lesson_id: Option<i32>,
}

impl CreateAssignmentParams {
    /// Validates a create request; the caller becomes the assignment's instructor.
    pub fn from_dto(
        course_id: i32,
        instructor_id: i32,
        dto: CreateAssignmentDto,
    ) -> Result<Self, AppError> {
        let title = dto.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::BadRequest("Title required".to_string()));
        }

        Ok(Self {
            course_id,
            lesson_id: dto.lesson_id,
            instructor_id,
            title,
            description: dto.description,
            due_date: dto.due_date,
            max_score: dto.max_score.filter(|s| *s > 0).unwrap_or(DEFAULT_MAX_SCORE),
        })
    }
}

impl From<UpdateAssignmentDto> for UpdateAssignmentParams {
    fn from(dto: UpdateAssignmentDto) -> Self {
        Self {
            title: dto.title,
            description: dto.description,
            due_date: dto.due_date,
            max_score: dto.max_score,
            lesson_id: dto.lesson_id,
        }
    }
}
