//! Payment factory for creating test payment entities.

use crate::factory::helpers::next_id;
use chrono::Utc;
use entity::sea_orm_active_enums::{PaymentStatus, PaymentType};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test payments.
pub struct PaymentFactory<'a> {
    db: &'a DatabaseConnection,
    user_id: i32,
    course_id: Option<i32>,
    amount: f64,
    status: PaymentStatus,
    transaction_id: Option<String>,
}

impl<'a> PaymentFactory<'a> {
    /// Creates a new PaymentFactory with default values.
    ///
    /// Defaults:
    /// - amount: `499.0` INR
    /// - status: `completed`
    /// - transaction_id: `"TXN-TEST-{id}"`
    pub fn new(db: &'a DatabaseConnection, user_id: i32, course_id: Option<i32>) -> Self {
        let id = next_id();
        Self {
            db,
            user_id,
            course_id,
            amount: 499.0,
            status: PaymentStatus::Completed,
            transaction_id: Some(format!("TXN-TEST-{}", id)),
        }
    }

    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = amount;
        self
    }

    pub fn status(mut self, status: PaymentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn transaction_id(mut self, transaction_id: Option<String>) -> Self {
        self.transaction_id = transaction_id;
        self
    }

    /// Builds and inserts the payment entity into the database.
    pub async fn build(self) -> Result<entity::payment::Model, DbErr> {
        let now = Utc::now();
        entity::payment::ActiveModel {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(self.user_id),
            course_id: ActiveValue::Set(self.course_id),
            amount: ActiveValue::Set(self.amount),
            currency: ActiveValue::Set("INR".to_string()),
            payment_type: ActiveValue::Set(PaymentType::CoursePurchase),
            status: ActiveValue::Set(self.status),
            payment_method: ActiveValue::Set("upi".to_string()),
            transaction_id: ActiveValue::Set(self.transaction_id),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a completed payment by `user_id` for `course_id`.
pub async fn create_payment(
    db: &DatabaseConnection,
    user_id: i32,
    course_id: i32,
) -> Result<entity::payment::Model, DbErr> {
    PaymentFactory::new(db, user_id, Some(course_id)).build().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TestBuilder;
    use crate::factory::{helpers::create_course_with_instructor, user::create_user};

    #[tokio::test]
    async fn creates_payment_with_defaults() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_enrollment_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();

        let student = create_user(db).await?;
        let (_, course) = create_course_with_instructor(db).await?;
        let payment = create_payment(db, student.id, course.id).await?;

        assert_eq!(payment.user_id, student.id);
        assert_eq!(payment.course_id, Some(course.id));
        assert_eq!(payment.status, PaymentStatus::Completed);
        assert!(payment.transaction_id.is_some());

        Ok(())
    }
}
