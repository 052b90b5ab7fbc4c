use chrono::{DateTime, Utc};
use kernel::model::court::{Court, ReservationSummary};
use kernel::model::id::{CourtId, ReservationId};
use kernel::model::user::DisplayName;
use shared::error::{AppError, AppResult};

use super::reservation::{parse_kind, parse_option};

/// One row of the court listing: the court joined with its current
/// reservation, reservation columns NULL when the slot is free.
#[derive(sqlx::FromRow)]
pub struct CourtRow {
    pub court_number: CourtId,
    pub is_available: bool,
    pub is_visible: bool,
    pub reservation_id: Option<ReservationId>,
    pub players: Option<Vec<String>>,
    pub kind: Option<String>,
    pub option: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}

impl TryFrom<CourtRow> for Court {
    type Error = AppError;

    fn try_from(value: CourtRow) -> AppResult<Self> {
        let reservation = match value.reservation_id {
            None => None,
            Some(reservation_id) => {
                let (Some(players), Some(kind), Some(started_at), Some(ends_at)) =
                    (value.players, value.kind, value.started_at, value.ends_at)
                else {
                    return Err(AppError::ConversionEntityError(format!(
                        "court {} carries an incomplete reservation",
                        value.court_number
                    )));
                };
                Some(ReservationSummary {
                    reservation_id,
                    players: players.into_iter().map(DisplayName::from).collect(),
                    kind: parse_kind(&kind)?,
                    option: parse_option(value.option.as_deref())?,
                    started_at,
                    ends_at,
                })
            }
        };
        Ok(Court {
            id: value.court_number,
            is_available: value.is_available,
            is_visible: value.is_visible,
            reservation,
        })
    }
}

/// Availability snapshot re-read inside the reservation transaction.
#[derive(sqlx::FromRow)]
pub struct CourtStateRow {
    pub court_number: CourtId,
    pub is_available: bool,
    pub current_reservation: Option<ReservationId>,
}
