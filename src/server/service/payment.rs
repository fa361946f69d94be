//! Course payments and the mock payment gateway.
//!
//! Payments recorded through the API are stored as completed and put the payer on the
//! course roster. The UPI verification and processing endpoints only simulate a
//! gateway: they validate input, wait briefly and echo a success.

use std::time::Duration;

use entity::sea_orm_active_enums::PaymentStatus;
use rand::Rng;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    model::payment::{
        CreatePaymentDto, ProcessPaymentDto, ProcessPaymentResponseDto, UpdatePaymentDto,
        VerifyUpiDto, VerifyUpiResponseDto,
    },
    server::{
        data::{
            course::{CourseRepository, CourseStudentRepository},
            payment::PaymentRepository,
            user::UserRepository,
        },
        error::AppError,
        model::{
            parse_optional_enum,
            payment::{
                is_valid_upi, upi_display_name, CreatePaymentParams, Payment,
                UpdatePaymentParams,
            },
            user::User,
        },
        service::ensure_owner,
        util::parse::is_present,
    },
};

pub const UPI_VERIFY_DELAY: Duration = Duration::from_millis(600);
pub const PAYMENT_PROCESS_DELAY: Duration = Duration::from_millis(800);

/// Revenue over every payment made for an instructor's courses.
#[derive(Debug, Clone)]
pub struct InstructorRevenue {
    pub total_revenue: f64,
    pub payments: Vec<Payment>,
}

pub struct PaymentService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PaymentService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a completed course payment and adds the payer to the course roster.
    ///
    /// # Arguments
    /// - `user_id` - Paying user
    /// - `dto` - Course, optional amount (defaults to the course price), method and
    ///   transaction id
    ///
    /// # Returns
    /// - `Ok(Payment)` - The stored payment
    /// - `Err(AppError::BadRequest)` - Missing course id or payment method
    /// - `Err(AppError::NotFound)` - No course with this ID
    pub async fn create(&self, user_id: i32, dto: CreatePaymentDto) -> Result<Payment, AppError> {
        let course_id = dto
            .course_id
            .ok_or_else(|| AppError::BadRequest("Course ID is required".to_string()))?;
        let payment_method = dto.payment_method.trim().to_string();
        if payment_method.is_empty() {
            return Err(AppError::BadRequest(
                "Payment method is required".to_string(),
            ));
        }

        let course = CourseRepository::new(self.db)
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

        let amount = dto.amount.filter(|a| *a > 0.0).unwrap_or(course.price);

        let txn = self.db.begin().await?;
        let payment = PaymentRepository::new(&txn)
            .create(CreatePaymentParams {
                user_id,
                course_id: Some(course_id),
                amount,
                status: PaymentStatus::Completed,
                payment_method,
                transaction_id: dto.transaction_id.filter(|t| !t.is_empty()),
            })
            .await?;
        CourseStudentRepository::new(&txn)
            .add(course_id, user_id)
            .await?;
        txn.commit().await?;

        tracing::info!(
            "Payment {} of {} recorded for user {} on course {}",
            payment.id,
            payment.amount,
            user_id,
            course_id
        );

        Ok(payment.with_refs(None, Some(course.to_ref())))
    }

    /// The caller's payments with course and payer summaries attached.
    pub async fn list(&self, user: &User) -> Result<Vec<Payment>, AppError> {
        let payments = PaymentRepository::new(self.db).find_by_user(user.id).await?;

        let course_ids: Vec<i32> = payments.iter().filter_map(|p| p.course_id).collect();
        let courses = CourseRepository::new(self.db)
            .find_by_ids(&course_ids)
            .await?;

        Ok(payments
            .into_iter()
            .map(|p| {
                let course = p.course_id.and_then(|id| courses.get(&id)).map(|c| c.to_ref());
                p.with_refs(Some(user.to_summary()), course)
            })
            .collect())
    }

    /// A payment visible to its payer or an admin.
    pub async fn get(&self, actor: &User, payment_id: i32) -> Result<Payment, AppError> {
        let payment = self.require(payment_id).await?;
        ensure_owner(actor, payment.user_id, "Not authorized to view this payment")?;

        let payer = UserRepository::new(self.db)
            .find_by_id(payment.user_id)
            .await?
            .map(|u| u.to_summary());
        let course = match payment.course_id {
            Some(id) => CourseRepository::new(self.db)
                .find_by_id(id)
                .await?
                .map(|c| c.to_ref()),
            None => None,
        };

        Ok(payment.with_refs(payer, course))
    }

    /// Sum of every payment made for the instructor's courses.
    pub async fn instructor_revenue(
        &self,
        instructor_id: i32,
    ) -> Result<InstructorRevenue, AppError> {
        let course_ids: Vec<i32> = CourseRepository::new(self.db)
            .find_by_instructor(instructor_id)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();

        let payments = PaymentRepository::new(self.db)
            .find_by_courses(&course_ids)
            .await?;

        Ok(InstructorRevenue {
            total_revenue: payments.iter().map(|p| p.amount).sum(),
            payments,
        })
    }

    pub async fn update(&self, payment_id: i32, dto: UpdatePaymentDto) -> Result<Payment, AppError> {
        let params = UpdatePaymentParams {
            status: parse_optional_enum("status", dto.status)?,
            amount: dto.amount,
            payment_method: dto.payment_method,
            transaction_id: dto.transaction_id,
        };

        PaymentRepository::new(self.db)
            .update(payment_id, params)
            .await?
            .ok_or_else(payment_not_found)
    }

    async fn require(&self, payment_id: i32) -> Result<Payment, AppError> {
        PaymentRepository::new(self.db)
            .find_by_id(payment_id)
            .await?
            .ok_or_else(payment_not_found)
    }
}

/// Simulates verifying a UPI id with a payment gateway.
///
/// # Returns
/// - `Ok(VerifyUpiResponseDto)` - Always verified, with a display name from the id
/// - `Err(AppError::BadRequest)` - Missing id or not `name@handle`
pub async fn verify_upi(dto: VerifyUpiDto) -> Result<VerifyUpiResponseDto, AppError> {
    let upi = dto
        .upi
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::BadRequest("UPI ID is required".to_string()))?;
    if !is_valid_upi(&upi) {
        return Err(AppError::BadRequest("Invalid UPI ID format".to_string()));
    }

    tokio::time::sleep(UPI_VERIFY_DELAY).await;

    Ok(VerifyUpiResponseDto {
        verified: true,
        name: upi_display_name(&upi),
        gateway: dto.gateway,
    })
}

/// Simulates charging a payment and returns a generated transaction id.
pub async fn process_payment(dto: ProcessPaymentDto) -> Result<ProcessPaymentResponseDto, AppError> {
    let method = dto.method.filter(|m| !m.is_empty());
    let (Some(method), Some(amount)) = (method, dto.amount.filter(|a| is_present(Some(a))))
    else {
        return Err(AppError::BadRequest("method and amount required".to_string()));
    };

    tokio::time::sleep(PAYMENT_PROCESS_DELAY).await;

    Ok(ProcessPaymentResponseDto {
        success: true,
        tx_id: transaction_id(),
        method,
        amount,
        details: dto.details,
    })
}

fn transaction_id() -> String {
    let digits: u32 = rand::rng().random_range(0..1_000_000);
    format!("TXN-{:06}", digits)
}

fn payment_not_found() -> AppError {
    AppError::NotFound("Payment not found".to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn transaction_ids_have_six_digits() {
        let id = transaction_id();

        assert!(id.starts_with("TXN-"));
        assert_eq!(id.len(), 10);
        assert!(id[4..].chars().all(|c| c.is_ascii_digit()));
    }

    /// Expected: a well formed UPI id verifies with a capitalised name
    #[tokio::test(start_paused = true)]
    async fn upi_verification_echoes_gateway() {
        let reply = verify_upi(VerifyUpiDto {
            upi: Some("riya@okbank".to_string()),
            gateway: Some("razorpay".to_string()),
        })
        .await
        .unwrap();

        assert!(reply.verified);
        assert_eq!(reply.name, "Riya");
        assert_eq!(reply.gateway.as_deref(), Some("razorpay"));
    }

    /// Expected: missing and malformed ids are rejected before any delay
    #[tokio::test(start_paused = true)]
    async fn upi_verification_rejects_bad_ids() {
        let missing = verify_upi(VerifyUpiDto {
            upi: None,
            gateway: None,
        })
        .await;
        let malformed = verify_upi(VerifyUpiDto {
            upi: Some("riya@bank@extra".to_string()),
            gateway: None,
        })
        .await;

        assert!(matches!(missing, Err(AppError::BadRequest(m)) if m == "UPI ID is required"));
        assert!(matches!(malformed, Err(AppError::BadRequest(m)) if m == "Invalid UPI ID format"));
    }

    /// Expected: processing requires both method and a non-zero amount
    #[tokio::test(start_paused = true)]
    async fn payment_processing_requires_method_and_amount() {
        let missing_amount = process_payment(ProcessPaymentDto {
            method: Some("upi".to_string()),
            amount: Some(json!(0)),
            details: None,
        })
        .await;
        assert!(matches!(missing_amount, Err(AppError::BadRequest(_))));

        let reply = process_payment(ProcessPaymentDto {
            method: Some("upi".to_string()),
            amount: Some(json!(519)),
            details: Some(json!({ "upi": "riya@okbank" })),
        })
        .await
        .unwrap();
        assert!(reply.success);
        assert!(reply.tx_id.starts_with("TXN-"));
        assert_eq!(reply.amount, json!(519));
    }
}
