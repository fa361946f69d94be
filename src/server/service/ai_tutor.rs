//! Stored AI tutor conversations.
//!
//! Replies are canned and chosen by keyword; every exchange is kept so learners can
//! revisit their history per course.

use sea_orm::DatabaseConnection;

use crate::server::{
    data::{ai_interaction::AiInteractionRepository, course::CourseRepository},
    error::AppError,
    model::{
        ai::{tutor_response, AiInteraction},
        user::User,
    },
    service::ensure_owner,
};

pub struct AiTutorService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AiTutorService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Answers a question and stores the exchange.
    ///
    /// # Returns
    /// - `Ok(AiInteraction)` - The stored question and reply
    /// - `Err(AppError::BadRequest)` - The query is blank
    pub async fn query(
        &self,
        user_id: i32,
        course_id: Option<i32>,
        query: &str,
    ) -> Result<AiInteraction, AppError> {
        if query.trim().is_empty() {
            return Err(AppError::BadRequest("Query cannot be empty".to_string()));
        }

        let response = tutor_response(query).to_string();

        Ok(AiInteractionRepository::new(self.db)
            .create(user_id, course_id, query.to_string(), response)
            .await?)
    }

    /// The caller's exchanges, newest first, with course titles.
    pub async fn history(
        &self,
        user_id: i32,
        course_id: Option<i32>,
    ) -> Result<Vec<AiInteraction>, AppError> {
        let interactions = AiInteractionRepository::new(self.db)
            .history(user_id, course_id)
            .await?;

        let course_ids: Vec<i32> = interactions.iter().filter_map(|i| i.course_id).collect();
        let courses = CourseRepository::new(self.db)
            .find_by_ids(&course_ids)
            .await?;

        Ok(interactions
            .into_iter()
            .map(|i| {
                let course = i.course_id.and_then(|id| courses.get(&id)).map(|c| c.to_ref());
                i.with_course(course)
            })
            .collect())
    }

    pub async fn get(&self, actor: &User, interaction_id: i32) -> Result<AiInteraction, AppError> {
        let interaction = self.require(interaction_id).await?;
        ensure_owner(
            actor,
            interaction.user_id,
            "Not authorized to view this interaction",
        )?;

        let course = match interaction.course_id {
            Some(id) => CourseRepository::new(self.db)
                .find_by_id(id)
                .await?
                .map(|c| c.to_ref()),
            None => None,
        };

        Ok(interaction.with_course(course))
    }

    pub async fn delete(&self, actor: &User, interaction_id: i32) -> Result<(), AppError> {
        let interaction = self.require(interaction_id).await?;
        ensure_owner(actor, interaction.user_id, "Not authorized")?;

        AiInteractionRepository::new(self.db)
            .delete(interaction_id)
            .await?;

        Ok(())
    }

    async fn require(&self, interaction_id: i32) -> Result<AiInteraction, AppError> {
        AiInteractionRepository::new(self.db)
            .find_by_id(interaction_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Interaction not found".to_string()))
    }
}
