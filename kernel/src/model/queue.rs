use chrono::{DateTime, Utc};
use shared::error::{AppError, AppResult};

use crate::model::id::{CourtId, QueueEntryId};
use crate::model::reservation::event::normalize_roster;
use crate::model::reservation::CourtKind;
use crate::model::user::DisplayName;

/// A waitlist entry. Entries target a specific court when `court_id` is
/// set, otherwise the global pool; they are served in join order.
#[derive(Debug, Clone)]
pub struct QueueEntry {
    pub id: QueueEntryId,
    pub players: Vec<DisplayName>,
    pub kind: CourtKind,
    pub court_id: Option<CourtId>,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct JoinQueue {
    pub players: Vec<DisplayName>,
    pub kind: CourtKind,
    pub court_id: Option<CourtId>,
}

impl JoinQueue {
    pub fn new(raw_players: &[String], kind: &str, court_id: Option<CourtId>) -> AppResult<Self> {
        let players = normalize_roster(raw_players)?;
        let kind: CourtKind = kind.parse().map_err(|_| {
            AppError::UnprocessableEntity(r#"Type must be either "half" or "full""#.into())
        })?;
        if players.len() != kind.required_players() {
            return Err(AppError::WrongPlayerCount {
                kind: match kind {
                    CourtKind::Half => "half",
                    CourtKind::Full => "full",
                },
                required: kind.required_players(),
            });
        }
        Ok(Self {
            players,
            kind,
            court_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_normalizes_and_validates_roster() {
        let entry = JoinQueue::new(
            &["eve".to_string(), "FAY".to_string()],
            "half",
            Some(CourtId::new(5)),
        )
        .unwrap();
        let players: Vec<_> = entry.players.iter().map(DisplayName::as_str).collect();
        assert_eq!(players, vec!["Eve", "Fay"]);
        assert_eq!(entry.kind, CourtKind::Half);
    }

    #[test]
    fn join_rejects_count_mismatch() {
        let err = JoinQueue::new(&["eve".to_string()], "half", None).unwrap_err();
        assert!(matches!(err, AppError::WrongPlayerCount { required: 2, .. }));
    }
}
