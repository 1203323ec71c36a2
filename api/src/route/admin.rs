use axum::{
    routing::{get, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::admin::{approve_venue, reject_venue, show_pending_venues, show_totals};

pub fn build_admin_routers() -> Router<AppRegistry> {
    let admin_routers = Router::new()
        .route("/approve", post(approve_venue))
        .route("/reject", post(reject_venue))
        .route("/pending", get(show_pending_venues))
        .route("/totals", get(show_totals));

    Router::new().nest("/admin", admin_routers)
}
