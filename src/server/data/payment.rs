use std::collections::HashMap;

use chrono::Utc;
use entity::sea_orm_active_enums::PaymentType;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder,
};

use crate::server::model::payment::{
    CreatePaymentParams, Payment, UpdatePaymentParams, DEFAULT_CURRENCY,
};

pub struct PaymentRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PaymentRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Records a course purchase in the default currency.
    pub async fn create(&self, params: CreatePaymentParams) -> Result<Payment, DbErr> {
        let now = Utc::now();
        let entity = entity::payment::ActiveModel {
            user_id: ActiveValue::Set(params.user_id),
            course_id: ActiveValue::Set(params.course_id),
            amount: ActiveValue::Set(params.amount),
            currency: ActiveValue::Set(DEFAULT_CURRENCY.to_string()),
            payment_type: ActiveValue::Set(PaymentType::CoursePurchase),
            status: ActiveValue::Set(params.status),
            payment_method: ActiveValue::Set(params.payment_method),
            transaction_id: ActiveValue::Set(params.transaction_id),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Payment::from_entity(entity))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Payment>, DbErr> {
        let entity = entity::prelude::Payment::find_by_id(id).one(self.db).await?;

        Ok(entity.map(Payment::from_entity))
    }

    pub async fn find_by_ids(&self, ids: &[i32]) -> Result<HashMap<i32, Payment>, DbErr> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let payments = entity::prelude::Payment::find()
            .filter(entity::payment::Column::Id.is_in(ids.iter().copied()))
            .all(self.db)
            .await?;

        Ok(payments
            .into_iter()
            .map(|p| (p.id, Payment::from_entity(p)))
            .collect())
    }

    /// Payments made by a user, newest first.
    pub async fn find_by_user(&self, user_id: i32) -> Result<Vec<Payment>, DbErr> {
        let payments = entity::prelude::Payment::find()
            .filter(entity::payment::Column::UserId.eq(user_id))
            .order_by_desc(entity::payment::Column::CreatedAt)
            .all(self.db)
            .await?;

        Ok(payments.into_iter().map(Payment::from_entity).collect())
    }

    /// Payments for any of the given courses, newest first.
    pub async fn find_by_courses(&self, course_ids: &[i32]) -> Result<Vec<Payment>, DbErr> {
        if course_ids.is_empty() {
            return Ok(Vec::new());
        }

        let payments = entity::prelude::Payment::find()
            .filter(entity::payment::Column::CourseId.is_in(course_ids.iter().copied()))
            .order_by_desc(entity::payment::Column::CreatedAt)
            .all(self.db)
            .await?;

        Ok(payments.into_iter().map(Payment::from_entity).collect())
    }

    pub async fn update(
        &self,
        id: i32,
        params: UpdatePaymentParams,
    ) -> Result<Option<Payment>, DbErr> {
        let Some(entity) = entity::prelude::Payment::find_by_id(id).one(self.db).await? else {
            return Ok(None);
        };

        let mut active = entity.into_active_model();
        if let Some(status) = params.status {
            active.status = ActiveValue::Set(status);
        }
        if let Some(amount) = params.amount {
            active.amount = ActiveValue::Set(amount);
        }
        if let Some(method) = params.payment_method {
            active.payment_method = ActiveValue::Set(method);
        }
        if let Some(transaction_id) = params.transaction_id {
            active.transaction_id = ActiveValue::Set(Some(transaction_id));
        }
        active.updated_at = ActiveValue::Set(Utc::now());

        let entity = active.update(self.db).await?;

        Ok(Some(Payment::from_entity(entity)))
    }

    /// Detaches every payment from a course that is being deleted.
    pub async fn clear_course(&self, course_id: i32) -> Result<(), DbErr> {
        let payments = entity::prelude::Payment::find()
            .filter(entity::payment::Column::CourseId.eq(course_id))
            .all(self.db)
            .await?;

        for payment in payments {
            let mut active = payment.into_active_model();
            active.course_id = ActiveValue::Set(None);
            active.update(self.db).await?;
        }

        Ok(())
    }
}
