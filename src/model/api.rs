use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDto {
    pub message: String,
}

/// Body of responses that only confirm an action.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageDto {
    pub message: String,
}

impl MessageDto {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `{ success, count?, message?, data }` envelope used by the role dashboards.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SuccessDto<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T> SuccessDto<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            count: None,
            message: None,
            data,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T> SuccessDto<Vec<T>> {
    /// Wraps a list and reports its length in `count`.
    pub fn counted(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: Some(data.len()),
            message: None,
            data,
        }
    }
}

/// `{ data, total }` envelope used by the admin listings.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListDto<T> {
    pub data: Vec<T>,
    pub total: u64,
}

/// Minimal user reference attached to other records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummaryDto {
    #[serde(rename = "_id")]
    pub id: i32,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Minimal course reference attached to other records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseRefDto {
    #[serde(rename = "_id")]
    pub id: i32,
    pub title: String,
}
