use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::{EventStatus, EventType};

use crate::{
    model::{
        api::{CourseRefDto, UserSummaryDto},
        event::{CreateEventDto, EventDto, UpdateEventDto},
    },
    server::{
        error::AppError,
        model::{enum_name, parse_optional_enum},
    },
};

pub const DEFAULT_MAX_STUDENTS: i32 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: i32,
    pub title: String,
    pub instructor_id: i32,
    pub instructor: Option<UserSummaryDto>,
    pub event_type: EventType,
    pub date: DateTime<Utc>,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub max_students: i32,
    pub enrolled_students: Vec<i32>,
    pub status: EventStatus,
    pub course_id: Option<i32>,
    pub course: Option<CourseRefDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn from_entity(
        entity: entity::event::Model,
        enrolled: Vec<entity::event_student::Model>,
    ) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            instructor_id: entity.instructor_id,
            instructor: None,
            event_type: entity.event_type,
            date: entity.date,
            start_time: entity.start_time,
            end_time: entity.end_time,
            location: entity.location,
            max_students: entity.max_students,
            enrolled_students: enrolled.into_iter().map(|e| e.user_id).collect(),
            status: entity.status,
            course_id: entity.course_id,
            course: None,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }

    pub fn with_refs(
        mut self,
        instructor: Option<UserSummaryDto>,
        course: Option<CourseRefDto>,
    ) -> Self {
        self.instructor = instructor;
        self.course = course;
        self
    }

    pub fn is_full(&self) -> bool {
        self.enrolled_students.len() as i32 >= self.max_students
    }

    pub fn into_dto(self) -> EventDto {
        EventDto {
            id: self.id,
            title: self.title,
            instructor: self.instructor,
            event_type: enum_name(&self.event_type),
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            location: self.location,
            max_students: self.max_students,
            enrolled_students: self.enrolled_students,
            status: enum_name(&self.status),
            course: self.course,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateEventParams {
    pub title: String,
    pub instructor_id: i32,
    pub event_type: EventType,
    pub date: DateTime<Utc>,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub max_students: i32,
    pub course_id: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateEventParams {
    pub title: Option<String>,
    pub event_type: Option<EventType>,
    pub date: Option<DateTime<Utc>>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub location: Option<String>,
    pub max_students: Option<i32>,
    pub status: Option<EventStatus>,
    pub course_id: Option<i32>,
}

impl CreateEventParams {
    /// Validates a create request; the caller becomes the event's instructor.
    ///
    /// Title, date, start and end time and location are required. The type defaults to
    /// `Live Class` and capacity to 30.
    pub fn from_dto(instructor_id: i32, dto: CreateEventDto) -> Result<Self, AppError> {
        let title = dto.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::BadRequest("Title required".to_string()));
        }
        let date = dto
            .date
            .ok_or_else(|| AppError::BadRequest("Date required".to_string()))?;
        if dto.start_time.trim().is_empty() || dto.end_time.trim().is_empty() {
            return Err(AppError::BadRequest(
                "Start and end time required".to_string(),
            ));
        }
        if dto.location.trim().is_empty() {
            return Err(AppError::BadRequest("Location required".to_string()));
        }

        Ok(Self {
            title,
            instructor_id,
            event_type: parse_optional_enum("type", dto.event_type)?
                .unwrap_or(EventType::LiveClass),
            date,
            start_time: dto.start_time,
            end_time: dto.end_time,
            location: dto.location,
            max_students: dto
                .max_students
                .filter(|m| *m > 0)
                .unwrap_or(DEFAULT_MAX_STUDENTS),
            course_id: dto.course,
        })
    }
}

impl UpdateEventParams {
    pub fn from_dto(dto: UpdateEventDto) -> Result<Self, AppError> {
        Ok(Self {
            title: dto.title,
            event_type: parse_optional_enum("type", dto.event_type)?,
            date: dto.date,
            start_time: dto.start_time,
            end_time: dto.end_time,
            location: dto.location,
            max_students: dto.max_students,
            status: parse_optional_enum("status", dto.status)?,
            course_id: dto.course,
        })
    }
}
