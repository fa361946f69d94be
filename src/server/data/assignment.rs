use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder,
};

use crate::server::model::assignment::{
    Assignment, CreateAssignmentParams, UpdateAssignmentParams,
};

pub struct AssignmentRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AssignmentRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, params: CreateAssignmentParams) -> Result<Assignment, DbErr> {
        let now = Utc::now();
        let entity = entity::assignment::ActiveModel {
            course_id: ActiveValue::Set(params.course_id),
            lesson_id: ActiveValue::Set(params.lesson_id),
            instructor_id: ActiveValue::Set(params.instructor_id),
            title: ActiveValue::Set(params.title),
            description: ActiveValue::Set(params.description),
            due_date: ActiveValue::Set(params.due_date),
            max_score: ActiveValue::Set(params.max_score),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Assignment::from_entity(entity))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Assignment>, DbErr> {
        let entity = entity::prelude::Assignment::find_by_id(id).one(self.db).await?;

        Ok(entity.map(Assignment::from_entity))
    }

    /// Assignments, optionally limited to one course, by due date then creation.
    pub async fn list(&self, course_id: Option<i32>) -> Result<Vec<Assignment>, DbErr> {
        let mut query = entity::prelude::Assignment::find();
        if let Some(course_id) = course_id {
            query = query.filter(entity::assignment::Column::CourseId.eq(course_id));
        }

        let assignments = query
            .order_by_asc(entity::assignment::Column::DueDate)
            .order_by_asc(entity::assignment::Column::CreatedAt)
            .all(self.db)
            .await?;

        Ok(assignments.into_iter().map(Assignment::from_entity).collect())
    }

    pub async fn update(
        &self,
        id: i32,
        params: UpdateAssignmentParams,
    ) -> Result<Option<Assignment>, DbErr> {
        let Some(entity) = entity::prelude::Assignment::find_by_id(id).one(self.db).await? else {
            return Ok(None);
        };

        let mut active = entity.into_active_model();
        if let Some(title) = params.title {
            active.title = ActiveValue::Set(title);
        }
        if let Some(description) = params.description {
            active.description = ActiveValue::Set(description);
        }
        if let Some(due_date) = params.due_date {
            active.due_date = ActiveValue::Set(Some(due_date));
        }
        if let Some(max_score) = params.max_score {
            active.max_score = ActiveValue::Set(max_score);
        }
        if let Some(lesson_id) = params.lesson_id {
            active.lesson_id = ActiveValue::Set(Some(lesson_id));
        }
        active.updated_at = ActiveValue::Set(Utc::now());

        let entity = active.update(self.db).await?;

        Ok(Some(Assignment::from_entity(entity)))
    }

    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Assignment::delete_by_id(id)
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn delete_by_course(&self, course_id: i32) -> Result<(), DbErr> {
        entity::prelude::Assignment::delete_many()
            .filter(entity::assignment::Column::CourseId.eq(course_id))
            .exec(self.db)
            .await?;

        Ok(())
    }
}
