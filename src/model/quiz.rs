use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::api::CourseRefDto;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizOptionDto {
    pub text: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestionDto {
    #[serde(rename = "_id")]
    pub id: i32,
    pub question: String,
    pub options: Vec<QuizOptionDto>,
    pub explanation: Option<String>,
    pub marks: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizDto {
    #[serde(rename = "_id")]
    pub id: i32,
    pub course_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<CourseRefDto>,
    pub lesson_id: Option<i32>,
    pub instructor_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub duration: i32,
    pub total_marks: i32,
    pub passing_percentage: i32,
    pub is_published: bool,
    pub questions: Vec<QuizQuestionDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Question as authored: plain option strings plus the text of the correct one.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizQuestionDto {
    #[serde(default, alias = "text")]
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub correct_answer: Option<String>,
    pub explanation: Option<String>,
    pub marks: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizDto {
    pub course_id: Option<i32>,
    pub lesson_id: Option<i32>,
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub questions: Vec<CreateQuizQuestionDto>,
    pub passing_score: Option<i32>,
    pub time_limit: Option<i32>,
    pub duration: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuizDto {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration: Option<i32>,
    pub passing_percentage: Option<i32>,
    pub is_published: Option<bool>,
    pub lesson_id: Option<i32>,
}

/// One submitted answer. Both fields accept a number or a string.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnswerDto {
    #[schema(value_type = Object)]
    pub question_id: serde_json::Value,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub selected_option: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitQuizDto {
    #[serde(default)]
    pub answers: Vec<QuizAnswerDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResultDto {
    pub question_id: i32,
    #[schema(value_type = Object)]
    pub user_answer: serde_json::Value,
    pub correct_options: Vec<String>,
    pub is_correct: bool,
    pub marks_awarded: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizResultDto {
    pub score: i32,
    pub total_marks: i32,
    pub percentage: i32,
    pub passed: bool,
    pub passing_percentage: i32,
    pub results: Vec<QuestionResultDto>,
}
