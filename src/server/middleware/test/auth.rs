use axum::http::{header::AUTHORIZATION, HeaderMap, HeaderValue};
use entity::sea_orm_active_enums::Role;
use sea_orm::DatabaseConnection;
use test_utils::{builder::TestBuilder, factory};

use crate::server::{
    data::user::UserRepository,
    error::{auth::AuthError, AppError},
    middleware::auth::{AuthGuard, Permission},
    model::admin::Capability,
    service::token::TokenService,
};

const SECRET: &str = "guard-test-secret";

fn bearer(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );
    headers
}

async fn headers_for(
    db: &DatabaseConnection,
    tokens: &TokenService,
    role: Role,
) -> Result<(i32, HeaderMap), AppError> {
    let user = factory::user::create_user_with_role(db, role).await?;
    let token = tokens.issue(user.id, user.role)?;
    Ok((user.id, bearer(&token)))
}

/// Expected: Ok(User) matching the token subject
#[tokio::test]
async fn authenticates_valid_token() -> Result<(), AppError> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let tokens = TokenService::new(SECRET);
    let (user_id, headers) = headers_for(db, &tokens, Role::Student).await?;

    let user = AuthGuard::new(db, &tokens, &headers).require(&[]).await?;

    assert_eq!(user.id, user_id);
    assert_eq!(user.role, Role::Student);

    Ok(())
}

/// Expected: Err(AuthError::MissingToken)
#[tokio::test]
async fn rejects_missing_header() -> Result<(), AppError> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let tokens = TokenService::new(SECRET);
    let headers = HeaderMap::new();

    let result = AuthGuard::new(db, &tokens, &headers).require(&[]).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::MissingToken))
    ));

    Ok(())
}

/// Tokens signed with another secret fail verification.
///
/// Expected: Err(AuthError::InvalidToken)
#[tokio::test]
async fn rejects_foreign_token() -> Result<(), AppError> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let tokens = TokenService::new(SECRET);
    let (_, headers) = headers_for(db, &TokenService::new("other"), Role::Student).await?;

    let result = AuthGuard::new(db, &tokens, &headers).require(&[]).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::InvalidToken))
    ));

    Ok(())
}

/// Expected: Err(AuthError::UserNotFound) once the account is deleted
#[tokio::test]
async fn rejects_deleted_user() -> Result<(), AppError> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let tokens = TokenService::new(SECRET);
    let (user_id, headers) = headers_for(db, &tokens, Role::Student).await?;
    UserRepository::new(db).delete(user_id).await?;

    let result = AuthGuard::new(db, &tokens, &headers).require(&[]).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::UserNotFound))
    ));

    Ok(())
}

/// The token says admin but the stored role is student; storage wins.
///
/// Expected: Err(AuthError::RoleNotAllowed)
#[tokio::test]
async fn role_is_read_from_storage() -> Result<(), AppError> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let tokens = TokenService::new(SECRET);
    let student = factory::user::create_user(db).await?;
    let headers = bearer(&tokens.issue(student.id, Role::Admin)?);

    let result = AuthGuard::new(db, &tokens, &headers)
        .require(&[Permission::Roles(&[Role::Admin])])
        .await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::RoleNotAllowed(_)))
    ));

    Ok(())
}

/// Expected: Ok(User) for admins on capability-gated routes
#[tokio::test]
async fn admin_bypasses_capability() -> Result<(), AppError> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let tokens = TokenService::new(SECRET);
    let (_, headers) = headers_for(db, &tokens, Role::Admin).await?;

    let result = AuthGuard::new(db, &tokens, &headers)
        .require(&[Permission::Capability(Capability::ViewReports)])
        .await;

    assert!(result.is_ok());

    Ok(())
}

/// Expected: MissingPermission without the capability, Ok(User) once granted
#[tokio::test]
async fn sub_admin_needs_capability() -> Result<(), AppError> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let tokens = TokenService::new(SECRET);
    let (user_id, headers) = headers_for(db, &tokens, Role::SubAdmin).await?;
    let gate = [Permission::Capability(Capability::ManageCourses)];

    let denied = AuthGuard::new(db, &tokens, &headers).require(&gate).await;
    assert!(matches!(
        denied,
        Err(AppError::AuthErr(AuthError::MissingPermission(ref p))) if p == "manageCourses"
    ));

    UserRepository::new(db)
        .set_permissions(user_id, &["manageCourses".to_string()])
        .await?;
    let granted = AuthGuard::new(db, &tokens, &headers).require(&gate).await;
    assert!(granted.is_ok());

    Ok(())
}

/// Expected: Err(AuthError::InsufficientRole) for roles that never hold capabilities
#[tokio::test]
async fn other_roles_fail_capability_gate() -> Result<(), AppError> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let tokens = TokenService::new(SECRET);
    let (_, headers) = headers_for(db, &tokens, Role::Instructor).await?;

    let result = AuthGuard::new(db, &tokens, &headers)
        .require(&[Permission::Capability(Capability::ManageStudents)])
        .await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::InsufficientRole))
    ));

    Ok(())
}
