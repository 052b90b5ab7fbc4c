use shared::error::{AppError, AppResult};

use crate::model::id::CourtId;
use crate::model::reservation::{CourtKind, ReservationOption};
use crate::model::user::DisplayName;

/// Normalizes a raw roster and rejects blanks and duplicates. Every request
/// that names players goes through here before touching storage.
pub fn normalize_roster(raw_players: &[String]) -> AppResult<Vec<DisplayName>> {
    let players: Vec<DisplayName> = raw_players
        .iter()
        .map(|raw| DisplayName::normalize(raw))
        .collect();
    if players.iter().any(DisplayName::is_empty) {
        return Err(AppError::UnprocessableEntity(
            "Player names must not be empty".into(),
        ));
    }
    for (i, player) in players.iter().enumerate() {
        if players[..i].contains(player) {
            return Err(AppError::DuplicatePlayers);
        }
    }
    Ok(players)
}

fn parse_kind(kind: &str) -> AppResult<CourtKind> {
    kind.parse().map_err(|_| {
        AppError::UnprocessableEntity(r#"Type must be either "half" or "full""#.into())
    })
}

/// A validated reservation request: normalized players, legal kind/option
/// combination, correct player count. Conflict checks against live state
/// happen inside the storage transaction.
#[derive(Debug)]
pub struct ReserveCourt {
    pub court_id: CourtId,
    pub players: Vec<DisplayName>,
    pub kind: CourtKind,
    pub option: Option<ReservationOption>,
}

impl ReserveCourt {
    pub fn new(
        court_id: CourtId,
        raw_players: &[String],
        kind: &str,
        option: Option<&str>,
    ) -> AppResult<Self> {
        let players = normalize_roster(raw_players)?;
        let kind = parse_kind(kind)?;
        let option = match kind {
            CourtKind::Half => {
                let tag: ReservationOption = option
                    .unwrap_or_default()
                    .parse()
                    .map_err(|_| {
                        AppError::UnprocessableEntity(
                            r#"Half court reservation requires option to be either "merge" or "queue""#
                                .into(),
                        )
                    })?;
                Some(tag)
            }
            // Full courts carry no option; anything supplied is dropped.
            CourtKind::Full => None,
        };
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
            court_id,
            players,
            kind,
            option,
        })
    }
}

/// Exactly two validated newcomers joining an existing half court.
#[derive(Debug)]
pub struct MergeCourt {
    pub court_id: CourtId,
    pub players: Vec<DisplayName>,
}

impl MergeCourt {
    pub fn new(court_id: CourtId, raw_players: &[String]) -> AppResult<Self> {
        let players = normalize_roster(raw_players)?;
        if players.len() != 2 {
            return Err(AppError::WrongPlayerCount {
                kind: "merge",
                required: 2,
            });
        }
        Ok(Self { court_id, players })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn reserve_normalizes_players() {
        let event =
            ReserveCourt::new(CourtId::new(3), &names(&["ana", "BOB"]), "half", Some("merge"))
                .unwrap();
        let players: Vec<_> = event.players.iter().map(DisplayName::as_str).collect();
        assert_eq!(players, vec!["Ana", "Bob"]);
        assert_eq!(event.kind, CourtKind::Half);
        assert_eq!(event.option, Some(ReservationOption::Merge));
    }

    #[test]
    fn reserve_rejects_duplicates_after_normalization() {
        let err = ReserveCourt::new(
            CourtId::new(3),
            &names(&["ana", "ANA"]),
            "half",
            Some("merge"),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::DuplicatePlayers));
    }

    #[test]
    fn reserve_rejects_unknown_kind() {
        let err =
            ReserveCourt::new(CourtId::new(3), &names(&["ana", "bob"]), "third", None).unwrap_err();
        assert!(err.to_string().contains("half"));
    }

    #[test]
    fn half_court_requires_merge_or_queue_option() {
        assert!(
            ReserveCourt::new(CourtId::new(3), &names(&["ana", "bob"]), "half", None).is_err()
        );
        assert!(ReserveCourt::new(
            CourtId::new(3),
            &names(&["ana", "bob"]),
            "half",
            Some("waitlist")
        )
        .is_err());
        assert!(ReserveCourt::new(
            CourtId::new(3),
            &names(&["ana", "bob"]),
            "half",
            Some("queue")
        )
        .is_ok());
    }

    #[test]
    fn full_court_ignores_any_option() {
        let event = ReserveCourt::new(
            CourtId::new(3),
            &names(&["ana", "bob", "cara", "dan"]),
            "full",
            Some("merge"),
        )
        .unwrap();
        assert_eq!(event.option, None);
    }

    #[test]
    fn player_count_must_match_kind() {
        let err = ReserveCourt::new(
            CourtId::new(3),
            &names(&["ana", "bob", "cara"]),
            "half",
            Some("merge"),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AppError::WrongPlayerCount { required: 2, .. }
        ));

        let err =
            ReserveCourt::new(CourtId::new(3), &names(&["ana", "bob"]), "full", None).unwrap_err();
        assert!(matches!(
            err,
            AppError::WrongPlayerCount { required: 4, .. }
        ));
    }

    #[test]
    fn reserve_rejects_blank_names() {
        let err = ReserveCourt::new(
            CourtId::new(3),
            &names(&["ana", "  "]),
            "half",
            Some("merge"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn merge_takes_exactly_two_players() {
        assert!(MergeCourt::new(CourtId::new(3), &names(&["cara", "dan"])).is_ok());
        assert!(MergeCourt::new(CourtId::new(3), &names(&["cara"])).is_err());
        assert!(MergeCourt::new(CourtId::new(3), &names(&["cara", "dan", "eve"])).is_err());
    }
}
