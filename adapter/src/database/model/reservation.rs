use chrono::{DateTime, Utc};
use kernel::model::id::{CourtId, ReservationId};
use kernel::model::reservation::{CourtKind, Reservation, ReservationOption};
use kernel::model::user::DisplayName;
use shared::error::{AppError, AppResult};

pub(crate) fn parse_kind(kind: &str) -> AppResult<CourtKind> {
    kind.parse()
        .map_err(|_| AppError::ConversionEntityError(format!("unknown court kind: {kind}")))
}

pub(crate) fn parse_option(option: Option<&str>) -> AppResult<Option<ReservationOption>> {
    option
        .map(|o| {
            o.parse().map_err(|_| {
                AppError::ConversionEntityError(format!("unknown reservation option: {o}"))
            })
        })
        .transpose()
}

#[derive(sqlx::FromRow)]
pub struct ReservationRow {
    pub reservation_id: ReservationId,
    pub court_number: CourtId,
    pub players: Vec<String>,
    pub kind: String,
    pub option: Option<String>,
    pub started_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = AppError;

    fn try_from(value: ReservationRow) -> AppResult<Self> {
        let ReservationRow {
            reservation_id,
            court_number,
            players,
            kind,
            option,
            started_at,
            ends_at,
        } = value;
        Ok(Reservation {
            id: reservation_id,
            court_id: court_number,
            players: players.into_iter().map(DisplayName::from).collect(),
            kind: parse_kind(&kind)?,
            option: parse_option(option.as_deref())?,
            started_at,
            ends_at,
        })
    }
}
