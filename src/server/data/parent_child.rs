use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

pub struct ParentChildRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ParentChildRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn link(&self, parent_id: i32, student_id: i32) -> Result<(), DbErr> {
        entity::parent_child::ActiveModel {
            parent_id: ActiveValue::Set(parent_id),
            student_id: ActiveValue::Set(student_id),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(())
    }

    /// Removes a link. Returns false when the pair was not linked.
    pub async fn unlink(&self, parent_id: i32, student_id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::ParentChild::delete_many()
            .filter(entity::parent_child::Column::ParentId.eq(parent_id))
            .filter(entity::parent_child::Column::StudentId.eq(student_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn is_linked(&self, parent_id: i32, student_id: i32) -> Result<bool, DbErr> {
        let count = entity::prelude::ParentChild::find()
            .filter(entity::parent_child::Column::ParentId.eq(parent_id))
            .filter(entity::parent_child::Column::StudentId.eq(student_id))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// Students linked to a parent in link order.
    pub async fn children_of(&self, parent_id: i32) -> Result<Vec<i32>, DbErr> {
        let links = entity::prelude::ParentChild::find()
            .filter(entity::parent_child::Column::ParentId.eq(parent_id))
            .order_by_asc(entity::parent_child::Column::Id)
            .all(self.db)
            .await?;

        Ok(links.into_iter().map(|l| l.student_id).collect())
    }
}
