use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::{PaymentStatus, PaymentType};

use crate::{
    model::{
        api::{CourseRefDto, UserSummaryDto},
        payment::PaymentDto,
    },
    server::model::enum_name,
};

pub const DEFAULT_CURRENCY: &str = "INR";

#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub id: i32,
    pub user_id: i32,
    pub user: Option<UserSummaryDto>,
    pub course_id: Option<i32>,
    pub course: Option<CourseRefDto>,
    pub amount: f64,
    pub currency: String,
    pub payment_type: PaymentType,
    pub status: PaymentStatus,
    pub payment_method: String,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    pub fn from_entity(entity: entity::payment::Model) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            user: None,
            course_id: entity.course_id,
            course: None,
            amount: entity.amount,
            currency: entity.currency,
            payment_type: entity.payment_type,
            status: entity.status,
            payment_method: entity.payment_method,
            transaction_id: entity.transaction_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }

    pub fn with_refs(mut self, user: Option<UserSummaryDto>, course: Option<CourseRefDto>) -> Self {
        self.user = user;
        self.course = course;
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == PaymentStatus::Completed
    }

    pub fn into_dto(self) -> PaymentDto {
        PaymentDto {
            id: self.id,
            user_id: self.user_id,
            user: self.user,
            course_id: self.course_id,
            course: self.course,
            amount: self.amount,
            currency: self.currency,
            payment_type: enum_name(&self.payment_type),
            status: enum_name(&self.status),
            payment_method: self.payment_method,
            transaction_id: self.transaction_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreatePaymentParams {
    pub user_id: i32,
    pub course_id: Option<i32>,
    pub amount: f64,
    pub status: PaymentStatus,
    pub payment_method: String,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdatePaymentParams {
    pub status: Option<PaymentStatus>,
    pub amount: Option<f64>,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
}

/// Checks the `name@handle` shape of a UPI id: exactly two non-empty parts.
pub fn is_valid_upi(upi: &str) -> bool {
    let mut parts = upi.split('@');
    matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(name), Some(handle), None) if !name.is_empty() && !handle.is_empty()
    )
}

/// Display name derived from the local part of a UPI id, first letter upper-cased.
pub fn upi_display_name(upi: &str) -> String {
    let local = upi.split('@').next().unwrap_or_default();
    let mut chars = local.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upi_requires_two_non_empty_parts() {
        assert!(is_valid_upi("riya@okbank"));
        assert!(!is_valid_upi("riya"));
        assert!(!is_valid_upi("@okbank"));
        assert!(!is_valid_upi("riya@"));
        assert!(!is_valid_upi("a@b@c"));
    }

    #[test]
    fn upi_name_is_capitalised() {
        assert_eq!(upi_display_name("riya.k@okbank"), "Riya.k");
    }
}
