use super::*;

fn params(email: &str) -> CreateUserParams {
    CreateUserParams {
        full_name: "Asha Rao".to_string(),
        email: email.to_string(),
        password_hash: "hash".to_string(),
        role: Role::Student,
        phone: None,
        address: None,
    }
}

/// Tests that new accounts start active with zeroed counters.
///
/// Expected: Ok with status active, streak 0 and no learned hours
#[tokio::test]
async fn creates_active_user() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = UserRepository::new(db).create(params("asha@example.com")).await?;

    assert_eq!(user.full_name, "Asha Rao");
    assert_eq!(user.role, Role::Student);
    assert_eq!(user.streak_days, 0);
    assert_eq!(user.total_hours_learned, 0.0);

    Ok(())
}

/// Tests that stored emails are lower-cased and looked up case-insensitively.
///
/// Expected: Ok with lower-cased email, found by a mixed-case lookup
#[tokio::test]
async fn lowercases_email() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let repo = UserRepository::new(db);

    let user = repo.create(params(" Asha@Example.COM ")).await?;
    let found = repo.find_by_email("ASHA@example.com").await?;

    assert_eq!(user.email, "asha@example.com");
    assert_eq!(found.map(|u| u.id), Some(user.id));
    assert!(repo.email_exists("asha@example.com").await?);

    Ok(())
}

/// Tests that the unique email constraint holds.
///
/// Expected: Err on the second insert
#[tokio::test]
async fn rejects_duplicate_email() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let repo = UserRepository::new(db);

    repo.create(params("asha@example.com")).await?;
    let result = repo.create(params("asha@example.com")).await;

    assert!(result.is_err());

    Ok(())
}
