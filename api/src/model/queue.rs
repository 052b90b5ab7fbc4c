use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::id::{CourtId, QueueEntryId};
use kernel::model::queue::{JoinQueue, QueueEntry};
use kernel::model::reservation::Reservation;
use serde::{Deserialize, Serialize};
use shared::error::AppError;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JoinQueueRequest {
    #[garde(length(min = 1))]
    pub players: Vec<String>,
    #[garde(length(min = 1))]
    pub kind: String,
    #[garde(skip)]
    pub court_number: Option<CourtId>,
}

impl TryFrom<JoinQueueRequest> for JoinQueue {
    type Error = AppError;

    fn try_from(value: JoinQueueRequest) -> Result<Self, Self::Error> {
        JoinQueue::new(&value.players, &value.kind, value.court_number)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntriesResponse {
    pub items: Vec<QueueEntryResponse>,
}

impl From<Vec<QueueEntry>> for QueueEntriesResponse {
    fn from(value: Vec<QueueEntry>) -> Self {
        Self {
            items: value.into_iter().map(QueueEntryResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntryResponse {
    pub queue_entry_id: QueueEntryId,
    pub players: Vec<String>,
    pub kind: String,
    pub court_number: Option<CourtId>,
    pub joined_at: DateTime<Utc>,
}

impl From<QueueEntry> for QueueEntryResponse {
    fn from(value: QueueEntry) -> Self {
        let QueueEntry {
            id,
            players,
            kind,
            court_id,
            joined_at,
        } = value;
        Self {
            queue_entry_id: id,
            players: players.into_iter().map(|p| p.into_string()).collect(),
            kind: kind.to_string(),
            court_number: court_id,
            joined_at,
        }
    }
}

/// The public queue view: games in progress, soonest to finish first.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueResponse {
    pub items: Vec<ActiveGameResponse>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveGameResponse {
    pub court_number: CourtId,
    pub players: Vec<String>,
    pub kind: String,
    pub started_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub seconds_remaining: i64,
}

impl ActiveGameResponse {
    pub fn from_reservation(reservation: Reservation, now: DateTime<Utc>) -> Self {
        let seconds_remaining = reservation.seconds_remaining(now);
        Self {
            court_number: reservation.court_id,
            players: reservation
                .players
                .into_iter()
                .map(|p| p.into_string())
                .collect(),
            kind: reservation.kind.to_string(),
            started_at: reservation.started_at,
            ends_at: reservation.ends_at,
            seconds_remaining,
        }
    }
}
