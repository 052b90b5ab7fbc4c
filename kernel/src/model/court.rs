use chrono::{DateTime, Utc};

use crate::model::id::{CourtId, ReservationId};
use crate::model::reservation::{CourtKind, ReservationOption};
use crate::model::user::DisplayName;

/// A numbered court slot. `is_available` is false exactly while an
/// unexpired reservation is linked.
#[derive(Debug, Clone)]
pub struct Court {
    pub id: CourtId,
    pub is_available: bool,
    pub is_visible: bool,
    pub reservation: Option<ReservationSummary>,
}

/// Denormalized view of the current reservation, embedded in court
/// listings so readers never chase the reference themselves.
#[derive(Debug, Clone)]
pub struct ReservationSummary {
    pub reservation_id: ReservationId,
    pub players: Vec<DisplayName>,
    pub kind: CourtKind,
    pub option: Option<ReservationOption>,
    pub started_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}
