use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::model::id::{CourtId, ReservationId};
use crate::model::user::DisplayName;

pub mod event;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumString,
    AsRefStr,
    Display,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CourtKind {
    Half,
    Full,
}

impl CourtKind {
    pub fn required_players(self) -> usize {
        match self {
            CourtKind::Half => 2,
            CourtKind::Full => 4,
        }
    }
}

/// Descriptive tag on half-court reservations. It is validated and echoed
/// in views but never changes engine behavior.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumString,
    AsRefStr,
    Display,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReservationOption {
    Merge,
    Queue,
}

/// An occupied court slot. Owned by its court while active; deleted on
/// expiry, cancel, or admin reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub id: ReservationId,
    pub court_id: CourtId,
    pub players: Vec<DisplayName>,
    pub kind: CourtKind,
    pub option: Option<ReservationOption>,
    pub started_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl Reservation {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.ends_at
    }

    pub fn seconds_remaining(&self, now: DateTime<Utc>) -> i64 {
        (self.ends_at - now).num_seconds().max(0)
    }
}

/// A participant of an unexpired reservation, tagged with where they play.
#[derive(Debug, Clone)]
pub struct ActivePlayer {
    pub display_name: DisplayName,
    pub court_id: CourtId,
    pub started_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn reservation(started_at: DateTime<Utc>, minutes: i64) -> Reservation {
        Reservation {
            id: ReservationId::new(),
            court_id: CourtId::new(3),
            players: vec![DisplayName::normalize("ana"), DisplayName::normalize("bob")],
            kind: CourtKind::Half,
            option: Some(ReservationOption::Merge),
            started_at,
            ends_at: started_at + Duration::minutes(minutes),
        }
    }

    #[test]
    fn expires_exactly_at_end_time() {
        let start = Utc::now();
        let res = reservation(start, 60);
        assert!(!res.is_expired(start + Duration::minutes(59)));
        assert!(res.is_expired(start + Duration::minutes(60)));
        assert!(res.is_expired(start + Duration::minutes(61)));
    }

    #[test]
    fn remaining_time_never_goes_negative() {
        let start = Utc::now();
        let res = reservation(start, 60);
        assert_eq!(res.seconds_remaining(start + Duration::minutes(60)), 0);
        assert_eq!(res.seconds_remaining(start + Duration::hours(2)), 0);
        assert_eq!(res.seconds_remaining(start), 3600);
    }

    #[test]
    fn kind_parses_from_lowercase_tags() {
        assert_eq!("half".parse::<CourtKind>().unwrap(), CourtKind::Half);
        assert_eq!("full".parse::<CourtKind>().unwrap(), CourtKind::Full);
        assert!("doubles".parse::<CourtKind>().is_err());
    }

    #[test]
    fn required_players_per_kind() {
        assert_eq!(CourtKind::Half.required_players(), 2);
        assert_eq!(CourtKind::Full.required_players(), 4);
    }
}
