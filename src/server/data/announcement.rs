use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ConnectionTrait, DbErr, EntityTrait, QueryOrder, QuerySelect,
};

use crate::server::model::admin::{Announcement, CreateAnnouncementParams};

pub struct AnnouncementRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AnnouncementRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, params: CreateAnnouncementParams) -> Result<Announcement, DbErr> {
        let now = Utc::now();
        let entity = entity::announcement::ActiveModel {
            title: ActiveValue::Set(params.title),
            message: ActiveValue::Set(params.message),
            target_role: ActiveValue::Set(params.target_role),
            created_by: ActiveValue::Set(Some(params.created_by)),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Announcement::from_entity(entity))
    }

    /// The newest announcements.
    pub async fn recent(&self, limit: u64) -> Result<Vec<Announcement>, DbErr> {
        let announcements = entity::prelude::Announcement::find()
            .order_by_desc(entity::announcement::Column::CreatedAt)
            .order_by_desc(entity::announcement::Column::Id)
            .limit(limit)
            .all(self.db)
            .await?;

        Ok(announcements
            .into_iter()
            .map(Announcement::from_entity)
            .collect())
    }

    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Announcement::delete_by_id(id)
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
