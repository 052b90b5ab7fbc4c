use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::court::{Court, ReservationSummary};
use kernel::model::id::{CourtId, ReservationId};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourtsResponse {
    pub items: Vec<CourtResponse>,
}

impl From<Vec<Court>> for CourtsResponse {
    fn from(value: Vec<Court>) -> Self {
        Self {
            items: value.into_iter().map(CourtResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourtResponse {
    pub court_number: CourtId,
    pub is_available: bool,
    pub is_visible: bool,
    pub current_reservation: Option<ReservationSummaryResponse>,
}

impl From<Court> for CourtResponse {
    fn from(value: Court) -> Self {
        let Court {
            id,
            is_available,
            is_visible,
            reservation,
        } = value;
        Self {
            court_number: id,
            is_available,
            is_visible,
            current_reservation: reservation.map(ReservationSummaryResponse::from),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationSummaryResponse {
    pub reservation_id: ReservationId,
    pub players: Vec<String>,
    pub kind: String,
    pub option: Option<String>,
    pub started_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl From<ReservationSummary> for ReservationSummaryResponse {
    fn from(value: ReservationSummary) -> Self {
        let ReservationSummary {
            reservation_id,
            players,
            kind,
            option,
            started_at,
            ends_at,
        } = value;
        Self {
            reservation_id,
            players: players.into_iter().map(|p| p.into_string()).collect(),
            kind: kind.to_string(),
            option: option.map(|o| o.to_string()),
            started_at,
            ends_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetVisibilityRequest {
    #[garde(skip)]
    pub visible: bool,
}
