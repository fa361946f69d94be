use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::model::activity::{ActivityLog, NewActivity};

pub struct ActivityLogRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ActivityLogRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, activity: NewActivity) -> Result<ActivityLog, DbErr> {
        let entity = entity::activity_log::ActiveModel {
            action: ActiveValue::Set(activity.action),
            performed_by: ActiveValue::Set(activity.performed_by),
            target_type: ActiveValue::Set(activity.target_type.map(|t| t.as_str().to_string())),
            target_id: ActiveValue::Set(activity.target_id),
            details: ActiveValue::Set(activity.details),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(ActivityLog::from_entity(entity))
    }

    /// The newest entries performed by a user.
    pub async fn recent_by_user(&self, user_id: i32, limit: u64) -> Result<Vec<ActivityLog>, DbErr> {
        let logs = entity::prelude::ActivityLog::find()
            .filter(entity::activity_log::Column::PerformedBy.eq(user_id))
            .order_by_desc(entity::activity_log::Column::CreatedAt)
            .order_by_desc(entity::activity_log::Column::Id)
            .limit(limit)
            .all(self.db)
            .await?;

        Ok(logs.into_iter().map(ActivityLog::from_entity).collect())
    }

    /// A page of the whole log, newest first, with the total count.
    pub async fn list(&self, offset: u64, limit: u64) -> Result<(Vec<ActivityLog>, u64), DbErr> {
        let query = entity::prelude::ActivityLog::find();
        let total = query.clone().count(self.db).await?;

        let logs = query
            .order_by_desc(entity::activity_log::Column::CreatedAt)
            .order_by_desc(entity::activity_log::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(self.db)
            .await?;

        Ok((logs.into_iter().map(ActivityLog::from_entity).collect(), total))
    }
}
