use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::api::{CourseRefDto, UserSummaryDto};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDto {
    #[serde(rename = "_id")]
    pub id: i32,
    pub user_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummaryDto>,
    pub course_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<CourseRefDto>,
    pub amount: f64,
    pub currency: String,
    pub payment_type: String,
    pub status: String,
    pub payment_method: String,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentDto {
    pub course_id: Option<i32>,
    pub amount: Option<f64>,
    #[serde(default)]
    pub payment_method: String,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentDto {
    pub status: Option<String>,
    pub amount: Option<f64>,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstructorRevenueDto {
    pub total_revenue: f64,
    pub total_payments: usize,
    pub payment_details: Vec<PaymentDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerifyUpiDto {
    pub upi: Option<String>,
    pub gateway: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerifyUpiResponseDto {
    pub verified: bool,
    pub name: String,
    pub gateway: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProcessPaymentDto {
    pub method: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub amount: Option<serde_json::Value>,
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessPaymentResponseDto {
    pub success: bool,
    pub tx_id: String,
    pub method: String,
    #[schema(value_type = Object)]
    pub amount: serde_json::Value,
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
}
