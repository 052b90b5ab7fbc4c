use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::court::Court;
use crate::model::id::CourtId;

#[async_trait]
pub trait CourtRepository: Send + Sync {
    /// Idempotently creates missing court slots 1..=total. Safe to call on
    /// every startup; never duplicates.
    async fn ensure_slots(&self, total: i32) -> AppResult<()>;
    /// All slots in number order, with reservation summaries where occupied.
    async fn find_all(&self) -> AppResult<Vec<Court>>;
    /// Visible slots only, for the public listing.
    async fn find_visible(&self) -> AppResult<Vec<Court>>;
    async fn set_visibility(&self, court_id: CourtId, visible: bool) -> AppResult<Court>;
    /// Admin path: unconditionally clears the reservation link and frees
    /// the court, regardless of expiry state.
    async fn force_release(&self, court_id: CourtId) -> AppResult<()>;
}
