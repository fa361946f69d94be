//! Administrative models: announcements, sub-admin permissions and dashboard counts.

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::Audience;

use crate::{
    model::admin::{AnnouncementDto, DashboardSummaryDto, SubAdminDto},
    server::{
        error::AppError,
        model::{enum_name, user::User},
    },
};

/// Capability a sub-admin may hold. Admins hold all of them implicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    ManageStudents,
    ManageCourses,
    ViewReports,
}

impl Capability {
    pub const ALL: [Capability; 3] = [
        Capability::ManageStudents,
        Capability::ManageCourses,
        Capability::ViewReports,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ManageStudents => "manageStudents",
            Self::ManageCourses => "manageCourses",
            Self::ViewReports => "viewReports",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == raw)
    }
}

/// Validates capability names, rejecting unknown ones.
pub fn parse_capabilities(raw: &[String]) -> Result<Vec<String>, AppError> {
    raw.iter()
        .map(|name| {
            Capability::parse(name)
                .map(|c| c.as_str().to_string())
                .ok_or_else(|| AppError::BadRequest(format!("Invalid permission: {}", name)))
        })
        .collect()
}

/// A sub-admin account with the capabilities it holds.
#[derive(Debug, Clone)]
pub struct SubAdmin {
    pub user: User,
    pub permissions: Vec<String>,
}

impl SubAdmin {
    pub fn into_dto(self) -> SubAdminDto {
        SubAdminDto {
            user: self.user.into_dto(),
            permissions: self.permissions,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Announcement {
    pub id: i32,
    pub title: String,
    pub message: String,
    pub target_role: Audience,
    pub created_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Announcement {
    pub fn from_entity(entity: entity::announcement::Model) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            message: entity.message,
            target_role: entity.target_role,
            created_by: entity.created_by,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }

    pub fn into_dto(self) -> AnnouncementDto {
        AnnouncementDto {
            id: self.id,
            title: self.title,
            message: self.message,
            target_role: enum_name(&self.target_role),
            created_by: self.created_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateAnnouncementParams {
    pub title: String,
    pub message: String,
    pub target_role: Audience,
    pub created_by: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DashboardSummary {
    pub total_students: u64,
    pub total_parents: u64,
    pub total_instructors: u64,
    pub total_courses: u64,
    pub total_enrollments: u64,
    pub completed_courses: u64,
}

impl DashboardSummary {
    pub fn into_dto(self) -> DashboardSummaryDto {
        DashboardSummaryDto {
            total_students: self.total_students,
            total_parents: self.total_parents,
            total_instructors: self.total_instructors,
            total_courses: self.total_courses,
            total_enrollments: self.total_enrollments,
            completed_courses: self.completed_courses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capabilities_round_trip_names() {
        for capability in Capability::ALL {
            assert_eq!(Capability::parse(capability.as_str()), Some(capability));
        }
        assert_eq!(Capability::parse("manageEverything"), None);
    }

    #[test]
    fn unknown_capability_is_rejected() {
        let ok = parse_capabilities(&["viewReports".to_string()]).unwrap();
        assert_eq!(ok, vec!["viewReports".to_string()]);

        let err = parse_capabilities(&["viewReports".to_string(), "root".to_string()]);
        assert!(matches!(err, Err(AppError::BadRequest(m)) if m == "Invalid permission: root"));
    }
}
