use super::*;

/// Tests filtering by role with a total that ignores paging.
///
/// Expected: Ok with one page of students and total counting all of them
#[tokio::test]
async fn filters_by_role_and_pages() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    for _ in 0..3 {
        factory::user::create_user(db).await?;
    }
    factory::user::create_user_with_role(db, Role::Instructor).await?;

    let filter = UserFilter {
        role: Some(Role::Student),
        ..Default::default()
    };
    let (users, total) = UserRepository::new(db).list(&filter, 0, 2).await?;

    assert_eq!(total, 3);
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.role == Role::Student));

    Ok(())
}

/// Tests the name and email search.
///
/// Expected: Ok with only the matching user
#[tokio::test]
async fn searches_name_and_email() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let meera = factory::user::UserFactory::new(db)
        .full_name("Meera Iyer")
        .build()
        .await?;
    factory::user::UserFactory::new(db)
        .full_name("Ravi Kumar")
        .build()
        .await?;

    let filter = UserFilter {
        search: Some("Meera".to_string()),
        ..Default::default()
    };
    let (users, total) = UserRepository::new(db).list(&filter, 0, 20).await?;

    assert_eq!(total, 1);
    assert_eq!(users[0].id, meera.id);

    Ok(())
}
