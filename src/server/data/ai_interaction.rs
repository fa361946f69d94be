use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder,
};

use crate::server::model::ai::AiInteraction;

pub struct AiInteractionRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AiInteractionRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        user_id: i32,
        course_id: Option<i32>,
        query: String,
        response: String,
    ) -> Result<AiInteraction, DbErr> {
        let entity = entity::ai_interaction::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            course_id: ActiveValue::Set(course_id),
            query: ActiveValue::Set(query),
            response: ActiveValue::Set(response),
            rating: ActiveValue::Set(None),
            timestamp: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(AiInteraction::from_entity(entity))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<AiInteraction>, DbErr> {
        let entity = entity::prelude::AiInteraction::find_by_id(id)
            .one(self.db)
            .await?;

        Ok(entity.map(AiInteraction::from_entity))
    }

    /// A user's interactions, newest first, optionally limited to one course.
    pub async fn history(
        &self,
        user_id: i32,
        course_id: Option<i32>,
    ) -> Result<Vec<AiInteraction>, DbErr> {
        let mut query = entity::prelude::AiInteraction::find()
            .filter(entity::ai_interaction::Column::UserId.eq(user_id));
        if let Some(course_id) = course_id {
            query = query.filter(entity::ai_interaction::Column::CourseId.eq(course_id));
        }

        let interactions = query
            .order_by_desc(entity::ai_interaction::Column::Timestamp)
            .order_by_desc(entity::ai_interaction::Column::Id)
            .all(self.db)
            .await?;

        Ok(interactions
            .into_iter()
            .map(AiInteraction::from_entity)
            .collect())
    }

    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::AiInteraction::delete_by_id(id)
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Detaches interactions from a course that is being deleted.
    pub async fn clear_course(&self, course_id: i32) -> Result<(), DbErr> {
        let interactions = entity::prelude::AiInteraction::find()
            .filter(entity::ai_interaction::Column::CourseId.eq(course_id))
            .all(self.db)
            .await?;

        for interaction in interactions {
            let mut active = interaction.into_active_model();
            active.course_id = ActiveValue::Set(None);
            active.update(self.db).await?;
        }

        Ok(())
    }
}
