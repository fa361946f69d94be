//! Append-only activity logging.
//!
//! Writing a log entry is never allowed to fail the operation that produced it, so the
//! logger swallows storage errors after reporting them through tracing.

use sea_orm::ConnectionTrait;

use crate::server::{data::activity_log::ActivityLogRepository, model::activity::NewActivity};

pub struct ActivityLogger<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ActivityLogger<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Appends an entry, logging and discarding any storage error.
    pub async fn record(&self, activity: NewActivity) {
        let action = activity.action.clone();
        if let Err(e) = ActivityLogRepository::new(self.db).create(activity).await {
            tracing::warn!("Failed to record activity '{}': {}", action, e);
        }
    }
}
