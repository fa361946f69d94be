use entity::prelude::FeatureFlag;
use serde_json::{json, Value};
use test_utils::{builder::TestBuilder, factory};

use crate::server::{error::AppError, service::flag::FeatureFlagService};

/// Expected: Ok(FeatureFlag { value: false }) persisted on first read
#[tokio::test]
async fn unknown_flag_reads_false() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_user_tables()
        .with_table(FeatureFlag)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let service = FeatureFlagService::new(db);

    let flag = service.get("dark_mode").await?;

    assert_eq!(flag.value, Value::Bool(false));
    assert_eq!(flag.updated_by, None);
    assert_eq!(service.list().await?.len(), 1);

    Ok(())
}

/// Setting an existing flag overwrites its value and stamps the admin.
///
/// Expected: one flag holding the new value, updated_by the admin
#[tokio::test]
async fn set_overwrites_value() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_user_tables()
        .with_table(FeatureFlag)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let admin = factory::user::create_user_with_role(db, entity::sea_orm_active_enums::Role::Admin)
        .await?;
    let service = FeatureFlagService::new(db);

    service.get("max_uploads").await?;
    let flag = service.set("max_uploads", json!(5), admin.id).await?;

    assert_eq!(flag.value, json!(5));
    assert_eq!(flag.updated_by, Some(admin.id));
    let flags = service.list().await?;
    assert_eq!(flags.len(), 1);
    assert_eq!(service.get("max_uploads").await?.value, json!(5));

    Ok(())
}
