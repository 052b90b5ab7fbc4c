use axum::{
    routing::{delete, get, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::court::show_court_list;
use crate::handler::reservation::{cancel_reservation, merge_court, reserve_court};

pub fn build_court_routers() -> Router<AppRegistry> {
    let courts_routers = Router::new()
        .route("/", get(show_court_list))
        .route("/:court_number/reservations", post(reserve_court))
        .route("/:court_number/reservations/merge", post(merge_court));

    let reservations_routers =
        Router::new().route("/:reservation_id", delete(cancel_reservation));

    Router::new()
        .nest("/courts", courts_routers)
        .nest("/reservations", reservations_routers)
}
