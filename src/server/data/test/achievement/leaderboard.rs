use super::*;

/// Tests ranking by summed points with ties broken by user ID.
///
/// Expected: Ok with users ordered by points desc, then ID asc, truncated to the limit
#[tokio::test]
async fn ranks_by_total_points() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_enrollment_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let first = factory::user::create_user(db).await?;
    let second = factory::user::create_user(db).await?;
    let third = factory::user::create_user(db).await?;
    let repo = AchievementRepository::new(db);
    repo.create(award(first.id, 30)).await?;
    repo.create(award(first.id, 20)).await?;
    repo.create(award(second.id, 50)).await?;
    repo.create(award(third.id, 10)).await?;

    let ranked = repo.leaderboard(2).await?;

    assert_eq!(ranked, vec![(first.id, 50), (second.id, 50)]);
    assert_eq!(repo.total_points(third.id).await?, 10);

    Ok(())
}

/// Tests that users without achievements are left out.
///
/// Expected: Ok with an empty ranking and zero points
#[tokio::test]
async fn empty_without_achievements() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_enrollment_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::user::create_user(db).await?;
    let repo = AchievementRepository::new(db);

    let ranked = repo.leaderboard(10).await?;

    assert!(ranked.is_empty());
    assert_eq!(repo.total_points(user.id).await?, 0);

    Ok(())
}
