use super::*;

/// Tests that setting permissions replaces the previous set and drops duplicates.
///
/// Expected: Ok with only the latest, de-duplicated permissions stored
#[tokio::test]
async fn replaces_permission_set() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let subadmin = factory::user::create_user_with_role(db, Role::SubAdmin).await?;
    let repo = UserRepository::new(db);

    repo.set_permissions(subadmin.id, &["viewReports".to_string()])
        .await?;
    repo.set_permissions(
        subadmin.id,
        &[
            "manageStudents".to_string(),
            "manageCourses".to_string(),
            "manageStudents".to_string(),
        ],
    )
    .await?;

    assert_eq!(
        repo.permissions(subadmin.id).await?,
        vec!["manageCourses".to_string(), "manageStudents".to_string()]
    );
    assert!(!repo.has_permission(subadmin.id, "viewReports").await?);

    Ok(())
}
