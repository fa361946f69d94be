//! Activity log entries.
//!
//! The log is append-only. Learner-facing actions ("Quiz Passed", "Course Enrolled")
//! and administrative mutations ("create_user") share the same table.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::model::{admin::ActivityLogDto, api::UserSummaryDto, progress::ActivityEntryDto};

/// Kind of record an activity entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetType {
    User,
    Course,
    Lesson,
    Quiz,
    Certificate,
    Achievement,
    Enrollment,
    Announcement,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Course => "Course",
            Self::Lesson => "Lesson",
            Self::Quiz => "Quiz",
            Self::Certificate => "Certificate",
            Self::Achievement => "Achievement",
            Self::Enrollment => "Enrollment",
            Self::Announcement => "Announcement",
        }
    }
}

/// Timeline color for a stored target type.
pub fn activity_color(target_type: Option<&str>) -> &'static str {
    match target_type {
        Some("Lesson") => "#27c5aa",
        Some("Quiz") => "#f1c40f",
        Some("Certificate") => "#28a745",
        Some("Achievement") => "#9b59b6",
        _ => "#1b65d4",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityLog {
    pub id: i32,
    pub action: String,
    pub performed_by_id: Option<i32>,
    pub performed_by: Option<UserSummaryDto>,
    pub target_type: Option<String>,
    pub target_id: Option<i32>,
    pub details: Option<Value>,
    pub created_at: DateTime<Utc>,
}

impl ActivityLog {
    pub fn from_entity(entity: entity::activity_log::Model) -> Self {
        Self {
            id: entity.id,
            action: entity.action,
            performed_by_id: entity.performed_by,
            performed_by: None,
            target_type: entity.target_type,
            target_id: entity.target_id,
            details: entity.details,
            created_at: entity.created_at,
        }
    }

    pub fn with_performer(mut self, performer: Option<UserSummaryDto>) -> Self {
        self.performed_by = performer;
        self
    }

    /// Timeline entry: description falls back to the action, type to "general".
    pub fn to_entry(&self, with_color: bool) -> ActivityEntryDto {
        let description = self
            .details
            .as_ref()
            .and_then(|d| d.get("description"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| self.action.clone());

        ActivityEntryDto {
            id: self.id,
            action: self.action.clone(),
            description,
            entry_type: self
                .target_type
                .clone()
                .unwrap_or_else(|| "general".to_string()),
            color: with_color.then(|| activity_color(self.target_type.as_deref()).to_string()),
            created_at: self.created_at,
        }
    }

    pub fn into_dto(self) -> ActivityLogDto {
        ActivityLogDto {
            id: self.id,
            action: self.action,
            performed_by: self.performed_by,
            target_type: self.target_type,
            target_id: self.target_id,
            details: self.details,
            created_at: self.created_at,
        }
    }
}

/// Entry to append to the log.
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub action: String,
    pub performed_by: Option<i32>,
    pub target_type: Option<TargetType>,
    pub target_id: Option<i32>,
    pub details: Option<Value>,
}

impl NewActivity {
    pub fn new(action: impl Into<String>, performed_by: i32) -> Self {
        Self {
            action: action.into(),
            performed_by: Some(performed_by),
            target_type: None,
            target_id: None,
            details: None,
        }
    }

    pub fn target(mut self, target_type: TargetType, target_id: i32) -> Self {
        self.target_type = Some(target_type);
        self.target_id = Some(target_id);
        self
    }

    pub fn details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn log(target_type: Option<&str>, details: Option<Value>) -> ActivityLog {
        ActivityLog {
            id: 1,
            action: "Quiz Passed".to_string(),
            performed_by_id: Some(1),
            performed_by: None,
            target_type: target_type.map(str::to_string),
            target_id: None,
            details,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn entry_uses_description_detail_when_present() {
        let entry = log(Some("Quiz"), Some(json!({ "description": "Scored 90%" }))).to_entry(true);

        assert_eq!(entry.description, "Scored 90%");
        assert_eq!(entry.entry_type, "Quiz");
        assert_eq!(entry.color.as_deref(), Some("#f1c40f"));
    }

    #[test]
    fn entry_falls_back_to_action_and_general() {
        let entry = log(None, None).to_entry(false);

        assert_eq!(entry.description, "Quiz Passed");
        assert_eq!(entry.entry_type, "general");
        assert_eq!(entry.color, None);
    }
}
