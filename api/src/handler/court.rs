use axum::extract::State;
use axum::Json;

use registry::AppRegistry;
use shared::error::AppResult;

use crate::handler::sweep_expired;
use crate::model::court::CourtsResponse;

/// The public listing: visible courts only, reconciled against expired
/// reservations first.
pub async fn show_court_list(
    State(registry): State<AppRegistry>,
) -> AppResult<Json<CourtsResponse>> {
    sweep_expired(&registry).await?;

    registry
        .court_repository()
        .find_visible()
        .await
        .map(CourtsResponse::from)
        .map(Json)
}
