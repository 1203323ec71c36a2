use axum::{
    routing::{get, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::reservation::{
    accept_reservation, book_reservation, mark_attended, reject_reservation,
    show_my_reservations, show_pending_reservations, show_reservation,
};

pub fn build_reservation_routers() -> Router<AppRegistry> {
    let reservation_routers = Router::new()
        .route("/", get(show_pending_reservations))
        .route("/all", get(show_my_reservations))
        .route("/book", post(book_reservation))
        .route("/accept", post(accept_reservation))
        .route("/reject", post(reject_reservation))
        .route("/attended", post(mark_attended))
        .route("/:reservation_id", get(show_reservation));

    Router::new().nest("/reservations", reservation_routers)
}
