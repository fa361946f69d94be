//! Course domain models and parameters.
//!
//! A course is owned by one instructor and carries its lessons, reviews and the set of
//! students enrolled in it as child rows. Catalog listings use the paginated wrapper.

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::CourseLevel;

use crate::{
    model::{
        api::{CourseRefDto, UserSummaryDto},
        course::{
            CourseDetailDto, CourseDto, CourseReviewDto, CreateCourseDto, PaginatedCoursesDto,
            UpdateCourseDto,
        },
    },
    server::{
        error::AppError,
        model::{enum_name, lesson::Lesson, parse_optional_enum},
    },
};

#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub instructor_id: i32,
    /// Instructor summary, attached when the caller fetched it.
    pub instructor: Option<UserSummaryDto>,
    pub thumbnail: String,
    pub price: f64,
    pub duration: String,
    pub level: CourseLevel,
    pub category: String,
    pub rating: f64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    /// Converts an entity model to a domain model at the repository boundary.
    ///
    /// The instructor summary is attached separately with `with_instructor`.
    pub fn from_entity(entity: entity::course::Model) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            description: entity.description,
            instructor_id: entity.instructor_id,
            instructor: None,
            thumbnail: entity.thumbnail,
            price: entity.price,
            duration: entity.duration,
            level: entity.level,
            category: entity.category,
            rating: entity.rating,
            is_published: entity.is_published,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }

    pub fn with_instructor(mut self, instructor: Option<UserSummaryDto>) -> Self {
        self.instructor = instructor;
        self
    }

    pub fn to_ref(&self) -> CourseRefDto {
        CourseRefDto {
            id: self.id,
            title: self.title.clone(),
        }
    }

    pub fn into_dto(self) -> CourseDto {
        CourseDto {
            id: self.id,
            title: self.title,
            description: self.description,
            instructor_id: self.instructor_id,
            instructor: self.instructor,
            thumbnail: self.thumbnail,
            price: self.price,
            duration: self.duration,
            level: enum_name(&self.level),
            category: self.category,
            rating: self.rating,
            is_published: self.is_published,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// A review with the reviewer's name and avatar.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseReview {
    pub id: i32,
    pub user_id: i32,
    pub user: Option<UserSummaryDto>,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CourseReview {
    pub fn from_entity(entity: entity::course_review::Model) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            user: None,
            rating: entity.rating,
            comment: entity.comment,
            created_at: entity.created_at,
        }
    }

    pub fn with_user(mut self, user: Option<UserSummaryDto>) -> Self {
        self.user = user;
        self
    }

    pub fn into_dto(self) -> CourseReviewDto {
        CourseReviewDto {
            id: self.id,
            user: self.user,
            rating: self.rating,
            comment: self.comment,
            created_at: self.created_at,
        }
    }
}

/// Course with instructor, ordered lessons, reviews and enrolled student ids.
#[derive(Debug, Clone)]
pub struct CourseDetail {
    pub course: Course,
    pub lessons: Vec<Lesson>,
    pub reviews: Vec<CourseReview>,
    pub enrolled_students: Vec<i32>,
}

impl CourseDetail {
    pub fn into_dto(self) -> CourseDetailDto {
        CourseDetailDto {
            course: self.course.into_dto(),
            lessons: self.lessons.into_iter().map(Lesson::into_dto).collect(),
            reviews: self.reviews.into_iter().map(CourseReview::into_dto).collect(),
            enrolled_students: self.enrolled_students,
        }
    }
}

/// One page of the public catalog.
#[derive(Debug, Clone)]
pub struct PaginatedCourses {
    pub courses: Vec<Course>,
    /// 1-based page number.
    pub page: u64,
    pub pages: u64,
    pub total: u64,
}

impl PaginatedCourses {
    pub fn into_dto(self) -> PaginatedCoursesDto {
        PaginatedCoursesDto {
            courses: self.courses.into_iter().map(Course::into_dto).collect(),
            page: self.page,
            pages: self.pages,
            total: self.total,
        }
    }
}

/// Filters for course listings.
#[derive(Debug, Clone, Default)]
pub struct CourseFilter {
    /// Case-insensitive substring over title and description.
    pub keyword: Option<String>,
    pub category: Option<String>,
    pub instructor_id: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct CreateCourseParams {
    pub title: String,
    pub description: String,
    pub instructor_id: i32,
    pub category: String,
    pub level: CourseLevel,
    pub price: f64,
    pub duration: String,
    pub thumbnail: String,
    pub is_published: bool,
}

impl CreateCourseParams {
    /// Validates a create request and fills defaults.
    ///
    /// Title, description and category are required. Level defaults to `Beginner`,
    /// price to 0 and the course starts unpublished.
    pub fn from_dto(instructor_id: i32, dto: CreateCourseDto) -> Result<Self, AppError> {
        let title = required(dto.title, "Title required")?;
        let description = required(dto.description, "Description required")?;
        let category = required(dto.category, "Category required")?;
        let level = parse_optional_enum("level", dto.level)?.unwrap_or(CourseLevel::Beginner);

        let price = dto.price.unwrap_or(0.0);
        if price < 0.0 {
            return Err(AppError::BadRequest("Price cannot be negative".to_string()));
        }

        Ok(Self {
            title,
            description,
            instructor_id,
            category,
            level,
            price,
            duration: dto.duration.unwrap_or_default(),
            thumbnail: dto.thumbnail.unwrap_or_default(),
            is_published: dto.is_published.unwrap_or(false),
        })
    }
}

fn required(value: String, message: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(message.to_string()));
    }
    Ok(value.to_string())
}

/// Partial update of a course. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateCourseParams {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub level: Option<CourseLevel>,
    pub price: Option<f64>,
    pub duration: Option<String>,
    pub thumbnail: Option<String>,
    pub is_published: Option<bool>,
}

impl UpdateCourseParams {
    pub fn from_dto(dto: UpdateCourseDto) -> Result<Self, AppError> {
        Ok(Self {
            title: dto.title,
            description: dto.description,
            category: dto.category,
            level: parse_optional_enum("level", dto.level)?,
            price: dto.price,
            duration: dto.duration,
            thumbnail: dto.thumbnail,
            is_published: dto.is_published,
        })
    }
}
