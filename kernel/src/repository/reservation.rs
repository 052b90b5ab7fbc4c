use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::error::AppResult;

use crate::model::id::ReservationId;
use crate::model::reservation::event::{MergeCourt, ReserveCourt};
use crate::model::reservation::{ActivePlayer, Reservation};

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Creates a reservation and flips its court to unavailable as one
    /// atomic unit. Re-validates participants and court availability inside
    /// the transaction; two racing calls cannot both win the same court.
    async fn reserve(&self, event: ReserveCourt, now: DateTime<Utc>) -> AppResult<Reservation>;
    /// Appends two newcomers to a half-court reservation and promotes it to
    /// full, atomically.
    async fn merge(&self, event: MergeCourt, now: DateTime<Utc>) -> AppResult<Reservation>;
    /// Deletes a reservation and frees its court, atomically.
    async fn cancel(&self, reservation_id: ReservationId) -> AppResult<()>;
    /// The sweep: clears every court whose reservation has run out and
    /// deletes those reservations. Returns how many were released.
    async fn release_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;
    /// Unexpired reservations, soonest to expire first.
    async fn find_active(&self, now: DateTime<Utc>) -> AppResult<Vec<Reservation>>;
    /// Every participant of an unexpired reservation (the busy set), tagged
    /// with court and start time.
    async fn active_players(&self, now: DateTime<Utc>) -> AppResult<Vec<ActivePlayer>>;
}
