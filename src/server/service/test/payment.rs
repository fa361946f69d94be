use axum::{http::StatusCode, response::IntoResponse};
use sea_orm::{EntityTrait, PaginatorTrait};
use test_utils::{builder::TestBuilder, factory};

use crate::{
    model::payment::{CreatePaymentDto, UpdatePaymentDto},
    server::{error::AppError, service::payment::PaymentService},
};

fn payment(course_id: i32, transaction_id: &str) -> CreatePaymentDto {
    CreatePaymentDto {
        course_id: Some(course_id),
        amount: None,
        payment_method: "upi".to_string(),
        transaction_id: Some(transaction_id.to_string()),
    }
}

/// Transaction ids are unique across payments.
///
/// Expected: Err(BadRequest) answered with 400, one stored payment
#[tokio::test]
async fn rejects_reused_transaction_id() -> Result<(), AppError> {
    let test = TestBuilder::new().with_lms_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, course) = factory::helpers::create_course_with_instructor(db).await?;
    let student = factory::user::create_user(db).await?;
    let service = PaymentService::new(db);

    service.create(student.id, payment(course.id, "TXN-DUP")).await?;
    let result = service.create(student.id, payment(course.id, "TXN-DUP")).await;

    let Err(err) = result else {
        panic!("second payment with the same transaction id was stored");
    };
    assert!(
        matches!(&err, AppError::BadRequest(msg) if msg == "Duplicate value for transaction_id")
    );
    assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    assert_eq!(entity::prelude::Payment::find().count(db).await?, 1);

    Ok(())
}

/// Expected: Err(BadRequest) when an update takes another payment's transaction id
#[tokio::test]
async fn update_rejects_taken_transaction_id() -> Result<(), AppError> {
    let test = TestBuilder::new().with_lms_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, course) = factory::helpers::create_course_with_instructor(db).await?;
    let student = factory::user::create_user(db).await?;
    let service = PaymentService::new(db);

    service.create(student.id, payment(course.id, "TXN-A")).await?;
    let second = service.create(student.id, payment(course.id, "TXN-B")).await?;

    let result = service
        .update(
            second.id,
            UpdatePaymentDto {
                status: None,
                amount: None,
                payment_method: None,
                transaction_id: Some("TXN-A".to_string()),
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));

    Ok(())
}
