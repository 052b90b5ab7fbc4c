use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::error::AppResult;

use crate::model::queue::{JoinQueue, QueueEntry};

#[async_trait]
pub trait QueueRepository: Send + Sync {
    /// Adds a waitlist entry; fails if any player is already queued.
    async fn join(&self, event: JoinQueue, now: DateTime<Utc>) -> AppResult<QueueEntry>;
    /// Entries in join order.
    async fn find_all(&self) -> AppResult<Vec<QueueEntry>>;
}
