use chrono::{DateTime, Utc};
use kernel::model::id::{CourtId, QueueEntryId};
use kernel::model::queue::QueueEntry;
use kernel::model::user::DisplayName;
use shared::error::{AppError, AppResult};

use super::reservation::parse_kind;

#[derive(sqlx::FromRow)]
pub struct QueueEntryRow {
    pub queue_entry_id: QueueEntryId,
    pub players: Vec<String>,
    pub kind: String,
    pub court_number: Option<CourtId>,
    pub joined_at: DateTime<Utc>,
}

impl TryFrom<QueueEntryRow> for QueueEntry {
    type Error = AppError;

    fn try_from(value: QueueEntryRow) -> AppResult<Self> {
        let QueueEntryRow {
            queue_entry_id,
            players,
            kind,
            court_number,
            joined_at,
        } = value;
        Ok(QueueEntry {
            id: queue_entry_id,
            players: players.into_iter().map(DisplayName::from).collect(),
            kind: parse_kind(&kind)?,
            court_id: court_number,
            joined_at,
        })
    }
}
