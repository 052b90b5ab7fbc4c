use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    UnprocessableEntity(String),
    #[error("{0}")]
    EntityNotFound(String),
    #[error("{0}")]
    ValidationError(#[from] garde::Report),
    #[error("Each player must be unique")]
    DuplicatePlayers,
    #[error("{kind} court requires exactly {required} players")]
    WrongPlayerCount { kind: &'static str, required: usize },
    #[error("The following players are not registered or have expired: {}", .0.join(", "))]
    UnknownPlayers(Vec<String>),
    #[error("The following players are already in active courts: {}", .0.join(", "))]
    PlayersBusy(Vec<String>),
    #[error("Court is not available")]
    CourtNotAvailable,
    #[error("Court is not in use")]
    CourtNotInUse,
    #[error("Can only merge into a half court")]
    NotHalfCourt,
    #[error("One or more players are already in the queue")]
    AlreadyQueued,
    #[error("{0}")]
    InvalidPhoneNumber(String),
    #[error("No more display names available today. Please try again later.")]
    NamePoolExhausted,
    #[error("Invalid admin password")]
    UnauthorizedError,
    #[error("failed to run the transaction")]
    TransactionError(#[source] sqlx::Error),
    #[error("failed to run a database query")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("no rows affected: {0}")]
    NoRowsAffectedError(String),
    #[error("{0}")]
    ConversionEntityError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::UnprocessableEntity(_)
            | AppError::ValidationError(_)
            | AppError::DuplicatePlayers
            | AppError::WrongPlayerCount { .. }
            | AppError::UnknownPlayers(_)
            | AppError::PlayersBusy(_)
            | AppError::CourtNotAvailable
            | AppError::CourtNotInUse
            | AppError::NotHalfCourt
            | AppError::AlreadyQueued
            | AppError::InvalidPhoneNumber(_) => StatusCode::BAD_REQUEST,
            AppError::UnauthorizedError => StatusCode::UNAUTHORIZED,
            AppError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::NamePoolExhausted
            | AppError::TransactionError(_)
            | AppError::SpecificOperationError(_)
            | AppError::NoRowsAffectedError(_)
            | AppError::ConversionEntityError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(
                error.cause_chain = ?self,
                error.message = %self,
                "unexpected error happened"
            );
        }

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_bad_request() {
        let res = AppError::DuplicatePlayers.into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let res = AppError::PlayersBusy(vec!["Panda".into()]).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_entities_map_to_not_found() {
        let res = AppError::EntityNotFound("Court 42 not found".into()).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn busy_players_are_named_in_the_message() {
        let err = AppError::PlayersBusy(vec!["Ana".into(), "Bob".into()]);
        assert_eq!(
            err.to_string(),
            "The following players are already in active courts: Ana, Bob"
        );
    }
}
