use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::id::{CourtId, ReservationId};
use kernel::model::reservation::event::{MergeCourt, ReserveCourt};
use kernel::model::reservation::Reservation;
use serde::{Deserialize, Serialize};
use shared::error::AppError;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReserveCourtRequest {
    #[garde(length(min = 1))]
    pub players: Vec<String>,
    #[garde(length(min = 1))]
    pub kind: String,
    #[garde(skip)]
    pub option: Option<String>,
}

/// Pairs the body with the court taken from the path before the conversion
/// into a kernel event runs the domain validation.
#[derive(new)]
pub struct ReserveCourtRequestWithCourt {
    court_id: CourtId,
    req: ReserveCourtRequest,
}

impl TryFrom<ReserveCourtRequestWithCourt> for ReserveCourt {
    type Error = AppError;

    fn try_from(value: ReserveCourtRequestWithCourt) -> Result<Self, Self::Error> {
        let ReserveCourtRequestWithCourt { court_id, req } = value;
        ReserveCourt::new(court_id, &req.players, &req.kind, req.option.as_deref())
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MergeCourtRequest {
    #[garde(length(min = 1))]
    pub players: Vec<String>,
}

#[derive(new)]
pub struct MergeCourtRequestWithCourt {
    court_id: CourtId,
    req: MergeCourtRequest,
}

impl TryFrom<MergeCourtRequestWithCourt> for MergeCourt {
    type Error = AppError;

    fn try_from(value: MergeCourtRequestWithCourt) -> Result<Self, Self::Error> {
        let MergeCourtRequestWithCourt { court_id, req } = value;
        MergeCourt::new(court_id, &req.players)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub reservation_id: ReservationId,
    pub court_number: CourtId,
    pub players: Vec<String>,
    pub kind: String,
    pub option: Option<String>,
    pub started_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationResponse {
    fn from(value: Reservation) -> Self {
        let Reservation {
            id,
            court_id,
            players,
            kind,
            option,
            started_at,
            ends_at,
        } = value;
        Self {
            reservation_id: id,
            court_number: court_id,
            players: players.into_iter().map(|p| p.into_string()).collect(),
            kind: kind.to_string(),
            option: option.map(|o| o.to_string()),
            started_at,
            ends_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_bodies_are_camel_case() {
        let req: ReserveCourtRequest = serde_json::from_str(
            r#"{"players": ["ana", "bob"], "kind": "half", "option": "merge"}"#,
        )
        .unwrap();
        assert_eq!(req.players.len(), 2);
        assert_eq!(req.kind, "half");

        let event =
            ReserveCourt::try_from(ReserveCourtRequestWithCourt::new(CourtId::new(3), req))
                .unwrap();
        assert_eq!(event.court_id, CourtId::new(3));
    }

    #[test]
    fn reservation_response_uses_lowercase_tags() {
        use kernel::model::reservation::{CourtKind, ReservationOption};
        use kernel::model::user::DisplayName;

        let now = Utc::now();
        let response = ReservationResponse::from(Reservation {
            id: ReservationId::new(),
            court_id: CourtId::new(3),
            players: vec![DisplayName::normalize("ana"), DisplayName::normalize("bob")],
            kind: CourtKind::Half,
            option: Some(ReservationOption::Queue),
            started_at: now,
            ends_at: now + chrono::Duration::minutes(60),
        });
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["kind"], "half");
        assert_eq!(json["option"], "queue");
        assert_eq!(json["players"][0], "Ana");
        assert_eq!(json["courtNumber"], 3);
    }
}
