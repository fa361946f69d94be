use crate::server::data::feature_flag::FeatureFlagRepository;
use entity::sea_orm_active_enums::Role;
use sea_orm::DbErr;
use serde_json::json;
use test_utils::{builder::TestBuilder, factory};

/// Tests that reading an unknown key stores it as false.
///
/// Expected: Ok with value false, found afterwards by key
#[tokio::test]
async fn get_or_create_defaults_false() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_user_tables()
        .with_table(entity::prelude::FeatureFlag)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let repo = FeatureFlagRepository::new(db);

    let flag = repo.get_or_create("beta_ui").await?;
    let again = repo.get_or_create("beta_ui").await?;

    assert_eq!(flag.value, json!(false));
    assert_eq!(flag.id, again.id);
    assert!(repo.find_by_key("beta_ui").await?.is_some());

    Ok(())
}

/// Tests that upsert keeps one row per key.
///
/// Expected: Ok with the latest value, listed once
#[tokio::test]
async fn upsert_keeps_single_row() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_user_tables()
        .with_table(entity::prelude::FeatureFlag)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let admin = factory::user::create_user_with_role(db, Role::Admin).await?;
    let repo = FeatureFlagRepository::new(db);

    repo.upsert("banner", json!("hello"), admin.id).await?;
    let flag = repo.upsert("banner", json!({ "text": "bye" }), admin.id).await?;

    assert_eq!(flag.value, json!({ "text": "bye" }));
    assert_eq!(repo.list().await?.len(), 1);

    Ok(())
}

/// Tests that concurrent first reads of a key settle on a single row.
///
/// Expected: Ok for both reads with the same id, one stored row
#[tokio::test]
async fn concurrent_get_or_create_shares_row() -> Result<(), DbErr> {
    use sea_orm::{EntityTrait, PaginatorTrait};

    let test = TestBuilder::new()
        .with_user_tables()
        .with_table(entity::prelude::FeatureFlag)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let repo = FeatureFlagRepository::new(db);

    let (first, second) = tokio::join!(repo.get_or_create("ai_tutor"), repo.get_or_create("ai_tutor"));

    assert_eq!(first?.id, second?.id);
    assert_eq!(entity::prelude::FeatureFlag::find().count(db).await?, 1);

    Ok(())
}
