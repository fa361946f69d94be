use chrono::{Duration, Utc};
use sea_orm::{EntityTrait, PaginatorTrait};
use test_utils::builder::TestBuilder;

use super::{mailer, tokens};
use crate::server::{
    data::user::UserRepository,
    error::{auth::AuthError, AppError},
    model::user::RegisterParams,
    service::auth::AuthService,
};

fn registration(email: &str) -> RegisterParams {
    RegisterParams {
        full_name: "Asha Rao".to_string(),
        email: email.to_string(),
        password: "secret123".to_string(),
        role: None,
        phone: None,
    }
}

/// Expected: a student account whose token resolves back to it
#[tokio::test]
async fn registers_student_by_default() -> Result<(), AppError> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let tokens = tokens();
    let mailer = mailer();

    let (user, token) = AuthService::new(db, &tokens, &mailer)
        .register(registration("Asha@Example.com"))
        .await?;

    assert_eq!(user.email, "asha@example.com");
    assert_eq!(user.role, entity::sea_orm_active_enums::Role::Student);
    assert_eq!(tokens.verify(&token)?.id, user.id);

    Ok(())
}

/// Emails are compared after normalisation.
///
/// Expected: Err(BadRequest("User already exists"))
#[tokio::test]
async fn rejects_duplicate_email() -> Result<(), AppError> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let tokens = tokens();
    let mailer = mailer();
    let service = AuthService::new(db, &tokens, &mailer);

    service.register(registration("asha@example.com")).await?;
    let result = service.register(registration(" ASHA@example.com ")).await;

    assert!(matches!(result, Err(AppError::BadRequest(msg)) if msg == "User already exists"));
    assert_eq!(entity::prelude::User::find().count(db).await?, 1);

    Ok(())
}

/// Expected: Err(BadRequest) for a six character minimum
#[tokio::test]
async fn rejects_short_password() -> Result<(), AppError> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let tokens = tokens();
    let mailer = mailer();

    let mut params = registration("short@example.com");
    params.password = "abc".to_string();
    let result = AuthService::new(db, &tokens, &mailer).register(params).await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));

    Ok(())
}

/// Administrative roles cannot be self-assigned.
///
/// Expected: Err(BadRequest)
#[tokio::test]
async fn rejects_admin_self_registration() -> Result<(), AppError> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let tokens = tokens();
    let mailer = mailer();

    let mut params = registration("root@example.com");
    params.role = Some("admin".to_string());
    let result = AuthService::new(db, &tokens, &mailer).register(params).await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));

    Ok(())
}

/// Expected: first login leaves the streak at zero and stamps the login time
#[tokio::test]
async fn first_login_keeps_zero_streak() -> Result<(), AppError> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let tokens = tokens();
    let mailer = mailer();
    let service = AuthService::new(db, &tokens, &mailer);

    service.register(registration("asha@example.com")).await?;
    let (user, _) = service.login("asha@example.com", "secret123").await?;

    assert_eq!(user.streak_days, 0);
    assert!(user.last_login_date.is_some());

    Ok(())
}

/// Logs in after a previous login `days_ago` days back with a streak of 4.
async fn login_after(days_ago: i64) -> Result<i32, AppError> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let tokens = tokens();
    let mailer = mailer();
    let service = AuthService::new(db, &tokens, &mailer);

    let (user, _) = service.register(registration("asha@example.com")).await?;
    UserRepository::new(db)
        .record_login(user.id, 4, Utc::now() - Duration::days(days_ago))
        .await?;

    let (user, _) = service.login("asha@example.com", "secret123").await?;
    let stored = UserRepository::new(db).find_by_id(user.id).await?.unwrap();
    assert_eq!(stored.streak_days, user.streak_days);

    Ok(user.streak_days)
}

/// Expected: a second login on the same day keeps the streak
#[tokio::test]
async fn same_day_login_keeps_streak() -> Result<(), AppError> {
    assert_eq!(login_after(0).await?, 4);

    Ok(())
}

/// Expected: a login on the following day extends the streak by one
#[tokio::test]
async fn next_day_login_extends_streak() -> Result<(), AppError> {
    assert_eq!(login_after(1).await?, 5);

    Ok(())
}

/// Expected: a gap of more than a day restarts the streak at one
#[tokio::test]
async fn login_after_gap_restarts_streak() -> Result<(), AppError> {
    assert_eq!(login_after(3).await?, 1);

    Ok(())
}

/// Unknown email and wrong password fail the same way.
///
/// Expected: Err(AuthError::InvalidCredentials) for both
#[tokio::test]
async fn login_rejects_bad_credentials() -> Result<(), AppError> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let tokens = tokens();
    let mailer = mailer();
    let service = AuthService::new(db, &tokens, &mailer);

    service.register(registration("asha@example.com")).await?;
    let wrong_password = service.login("asha@example.com", "nope-nope").await;
    let unknown = service.login("nobody@example.com", "secret123").await;

    assert!(matches!(
        wrong_password,
        Err(AppError::AuthErr(AuthError::InvalidCredentials))
    ));
    assert!(matches!(
        unknown,
        Err(AppError::AuthErr(AuthError::InvalidCredentials))
    ));

    Ok(())
}
