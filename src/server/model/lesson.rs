use chrono::{DateTime, Utc};

use crate::{
    model::{
        api::CourseRefDto,
        lesson::{CreateLessonDto, LessonDto, UpdateLessonDto},
    },
    server::error::AppError,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Lesson {
    pub id: i32,
    pub course_id: i32,
    pub course: Option<CourseRefDto>,
    pub title: String,
    pub description: String,
    pub content: String,
    pub video_url: Option<String>,
    /// Minutes.
    pub duration: i32,
    pub resources: serde_json::Value,
    pub order_index: i32,
    pub quiz_id: Option<i32>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lesson {
    pub fn from_entity(entity: entity::lesson::Model) -> Self {
        Self {
            id: entity.id,
            course_id: entity.course_id,
            course: None,
            title: entity.title,
            description: entity.description,
            content: entity.content,
            video_url: entity.video_url,
            duration: entity.duration,
            resources: entity.resources,
            order_index: entity.order_index,
            quiz_id: entity.quiz_id,
            is_published: entity.is_published,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }

    pub fn with_course(mut self, course: Option<CourseRefDto>) -> Self {
        self.course = course;
        self
    }

    pub fn into_dto(self) -> LessonDto {
        LessonDto {
            id: self.id,
            course_id: self.course_id,
            course: self.course,
            title: self.title,
            description: self.description,
            content: self.content,
            video_url: self.video_url,
            duration: self.duration,
            resources: self.resources,
            order: self.order_index,
            quiz_id: self.quiz_id,
            is_published: self.is_published,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateLessonParams {
    pub course_id: i32,
    pub title: String,
    pub description: String,
    pub content: String,
    pub video_url: Option<String>,
    pub duration: i32,
    pub resources: serde_json::Value,
    pub order_index: i32,
    pub quiz_id: Option<i32>,
    pub is_published: bool,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateLessonParams {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub video_url: Option<String>,
    pub duration: Option<i32>,
    pub resources: Option<serde_json::Value>,
    pub order_index: Option<i32>,
    pub quiz_id: Option<i32>,
    pub is_published: Option<bool>,
}

impl CreateLessonParams {
    /// Validates a create request for a course. Only the title is required.
    pub fn from_dto(course_id: i32, dto: CreateLessonDto) -> Result<Self, AppError> {
        let title = dto.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::BadRequest("Title required".to_string()));
        }

        Ok(Self {
            course_id,
            title,
            description: dto.description,
            content: dto.content,
            video_url: dto.video_url,
            duration: dto.duration.unwrap_or(0),
            resources: dto.resources.unwrap_or_else(|| serde_json::json!([])),
            order_index: dto.order.unwrap_or(0),
            quiz_id: dto.quiz_id,
            is_published: dto.is_published.unwrap_or(false),
        })
    }
}

impl From<UpdateLessonDto> for UpdateLessonParams {
    fn from(dto: UpdateLessonDto) -> Self {
        Self {
            title: dto.title,
            description: dto.description,
            content: dto.content,
            video_url: dto.video_url,
            duration: dto.duration,
            resources: dto.resources,
            order_index: dto.order,
            quiz_id: dto.quiz_id,
            is_published: dto.is_published,
        }
    }
}
