//! A learner's personal course list with progress.
//!
//! Rows here back the student dashboard and lesson completion. The completed lesson set
//! lives in its own table keyed by the user course row.

use chrono::{DateTime, Utc};

use crate::{
    model::student::{UserCourseDto, UserCourseProgressDto},
    server::model::quiz::percentage_of,
};

#[derive(Debug, Clone, PartialEq)]
pub struct UserCourse {
    pub id: i32,
    pub user_id: i32,
    pub course_id: i32,
    pub hours_spent: f64,
    pub completion_percentage: i32,
    pub enrollment_date: DateTime<Utc>,
    pub certificate_downloaded_at: Option<DateTime<Utc>>,
    pub completed_lessons: Vec<i32>,
}

impl UserCourse {
    pub fn from_entity(
        entity: entity::user_course::Model,
        completed_lessons: Vec<entity::user_course_lesson::Model>,
    ) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            course_id: entity.course_id,
            hours_spent: entity.hours_spent,
            completion_percentage: entity.completion_percentage,
            enrollment_date: entity.enrollment_date,
            certificate_downloaded_at: entity.certificate_downloaded_at,
            completed_lessons: completed_lessons.into_iter().map(|l| l.lesson_id).collect(),
        }
    }

    pub fn progress_dto(&self) -> UserCourseProgressDto {
        UserCourseProgressDto {
            completion_percentage: self.completion_percentage,
            hours_spent: self.hours_spent,
            completed_lessons: self.completed_lessons.clone(),
            enrollment_date: self.enrollment_date,
            certificate_downloaded_at: self.certificate_downloaded_at,
        }
    }

    pub fn into_dto(self) -> UserCourseDto {
        UserCourseDto {
            id: self.id,
            course: self.course_id,
            completed_lessons: self.completed_lessons,
            hours_spent: self.hours_spent,
            completion_percentage: self.completion_percentage,
            enrollment_date: self.enrollment_date,
        }
    }
}

/// `round(completed / total * 100)` capped to 100, 0 for a course without lessons.
pub fn completion_percentage(completed: u64, total: u64) -> i32 {
    percentage_of(completed as i32, total as i32).clamp(0, 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_rounds_to_nearest_percent() {
        assert_eq!(completion_percentage(1, 3), 33);
        assert_eq!(completion_percentage(2, 3), 67);
        assert_eq!(completion_percentage(2, 2), 100);
    }

    #[test]
    fn completion_is_zero_without_lessons() {
        assert_eq!(completion_percentage(0, 0), 0);
    }
}
