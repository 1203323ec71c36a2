use axum::{
    routing::{get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::venue::{register_venue, show_main_venue, show_venue, update_staff};

pub fn build_venue_routers() -> Router<AppRegistry> {
    let venue_routers = Router::new()
        .route("/", post(register_venue))
        .route("/main", get(show_main_venue))
        .route("/:category/:venue_id", get(show_venue))
        .route("/:category/:venue_id/staff", put(update_staff));

    Router::new().nest("/venues", venue_routers)
}
