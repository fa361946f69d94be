use chrono::{DateTime, Utc};

use crate::model::{ai::AiInteractionDto, api::CourseRefDto};

const TUTOR_RESPONSES: &[(&str, &str)] = &[
    (
        "what is",
        "In education, we use technology to help understand concepts better. Your question is great! Let me help you understand this better.",
    ),
    (
        "how do i",
        "Here are the steps to accomplish this: First, understand the fundamentals. Then, practice with examples. Finally, apply your knowledge.",
    ),
    (
        "explain",
        "A great question! Let me break this down into simpler parts so it's easier to understand. This concept is fundamental to learning.",
    ),
];

const TUTOR_DEFAULT_RESPONSE: &str = "That's a thoughtful question! To better answer you, could you provide more context about what you're trying to learn?";

/// Canned tutor reply chosen by the first keyword contained in the query.
pub fn tutor_response(query: &str) -> &'static str {
    let query = query.to_lowercase();
    TUTOR_RESPONSES
        .iter()
        .find(|(keyword, _)| query.contains(keyword))
        .map(|(_, response)| *response)
        .unwrap_or(TUTOR_DEFAULT_RESPONSE)
}

#[derive(Debug, Clone, PartialEq)]
pub struct AiInteraction {
    pub id: i32,
    pub user_id: i32,
    pub course_id: Option<i32>,
    pub course: Option<CourseRefDto>,
    pub query: String,
    pub response: String,
    pub rating: Option<i32>,
    pub timestamp: DateTime<Utc>,
}

impl AiInteraction {
    pub fn from_entity(entity: entity::ai_interaction::Model) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            course_id: entity.course_id,
            course: None,
            query: entity.query,
            response: entity.response,
            rating: entity.rating,
            timestamp: entity.timestamp,
        }
    }

    pub fn with_course(mut self, course: Option<CourseRefDto>) -> Self {
        self.course = course;
        self
    }

    pub fn into_dto(self) -> AiInteractionDto {
        AiInteractionDto {
            id: self.id,
            user_id: self.user_id,
            course_id: self.course_id,
            course: self.course,
            query: self.query,
            response: self.response,
            rating: self.rating,
            timestamp: self.timestamp,
        }
    }
}

/// Chat provider selected from the requested model name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatProvider {
    Claude,
    OpenAi,
}

impl ChatProvider {
    pub fn for_model(model: Option<&str>) -> Self {
        match model {
            Some(m) if m.to_lowercase().starts_with("claude") => Self::Claude,
            _ => Self::OpenAi,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tutor_picks_first_matching_keyword() {
        assert!(tutor_response("What is a closure?").starts_with("In education"));
        assert!(tutor_response("how do I deploy").starts_with("Here are the steps"));
        assert!(tutor_response("Please EXPLAIN ownership").starts_with("A great question"));
        assert_eq!(tutor_response("hello"), TUTOR_DEFAULT_RESPONSE);
    }

    #[test]
    fn provider_follows_model_prefix() {
        assert_eq!(ChatProvider::for_model(Some("claude-haiku")), ChatProvider::Claude);
        assert_eq!(ChatProvider::for_model(Some("gpt-4o-mini")), ChatProvider::OpenAi);
        assert_eq!(ChatProvider::for_model(None), ChatProvider::OpenAi);
    }
}
