use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::AchievementType;

use crate::{
    model::{
        achievement::{AchievementDto, CreateAchievementDto},
        api::{CourseRefDto, UserSummaryDto},
    },
    server::{
        error::AppError,
        model::{enum_name, parse_enum},
    },
};

pub const DEFAULT_ICON: &str = "default-achievement.png";
/// Points granted for finishing every lesson of a course.
pub const COURSE_COMPLETION_POINTS: i32 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct Achievement {
    pub id: i32,
    pub user_id: i32,
    pub user: Option<UserSummaryDto>,
    pub title: String,
    pub description: String,
    pub achievement_type: AchievementType,
    pub points: i32,
    pub course_id: Option<i32>,
    pub course: Option<CourseRefDto>,
    pub icon: String,
    pub date_earned: DateTime<Utc>,
}

impl Achievement {
    pub fn from_entity(entity: entity::achievement::Model) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            user: None,
            title: entity.title,
            description: entity.description,
            achievement_type: entity.achievement_type,
            points: entity.points,
            course_id: entity.course_id,
            course: None,
            icon: entity.icon,
            date_earned: entity.date_earned,
        }
    }

    pub fn with_refs(mut self, user: Option<UserSummaryDto>, course: Option<CourseRefDto>) -> Self {
        self.user = user;
        self.course = course;
        self
    }

    pub fn into_dto(self) -> AchievementDto {
        AchievementDto {
            id: self.id,
            user_id: self.user_id,
            user: self.user,
            title: self.title,
            description: self.description,
            achievement_type: enum_name(&self.achievement_type),
            points: self.points,
            course: self.course,
            icon: self.icon,
            date_earned: self.date_earned,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateAchievementParams {
    pub user_id: i32,
    pub title: String,
    pub description: String,
    pub achievement_type: AchievementType,
    pub points: i32,
    pub course_id: Option<i32>,
    pub icon: String,
}

impl CreateAchievementParams {
    /// Validates an achievement awarded by an administrator.
    ///
    /// A recipient, a title and a type are required; points default to 0.
    pub fn from_dto(dto: CreateAchievementDto) -> Result<Self, AppError> {
        let invalid = || AppError::BadRequest("Invalid achievement data".to_string());

        let user_id = dto.user.ok_or_else(invalid)?;
        let title = dto.title.trim().to_string();
        if title.is_empty() {
            return Err(invalid());
        }
        let raw_type = dto.achievement_type.ok_or_else(invalid)?;
        let achievement_type = parse_enum("type", &raw_type)?;

        Ok(Self {
            user_id,
            title,
            description: dto.description,
            achievement_type,
            points: dto.points.unwrap_or(0).max(0),
            course_id: dto.course,
            icon: dto
                .icon
                .filter(|i| !i.is_empty())
                .unwrap_or_else(|| DEFAULT_ICON.to_string()),
        })
    }

    /// The award granted once per (user, course) when completion reaches 100%.
    pub fn course_completion(user_id: i32, course_id: i32, course_title: &str) -> Self {
        Self {
            user_id,
            title: format!("{} Completed", course_title),
            description: format!("Successfully completed {}", course_title),
            achievement_type: AchievementType::CourseCompletion,
            points: COURSE_COMPLETION_POINTS,
            course_id: Some(course_id),
            icon: DEFAULT_ICON.to_string(),
        }
    }
}
