use crate::{
    extractor::{AuthorizedUser, JsonBody},
    model::{
        admin::{MessageResponse, ModerateVenueRequest, TotalsResponse},
        venue::VenuesResponse,
    },
};
use axum::{extract::State, Json};
use garde::Validate;
use kernel::model::venue::{event::UpdateVenueStatus, VenueStatus};
use registry::AppRegistry;
use shared::error::AppResult;

pub async fn approve_venue(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    JsonBody(req): JsonBody<ModerateVenueRequest>,
) -> AppResult<Json<MessageResponse>> {
    moderate(user, registry, req, VenueStatus::Approved).await
}

pub async fn reject_venue(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    JsonBody(req): JsonBody<ModerateVenueRequest>,
) -> AppResult<Json<MessageResponse>> {
    moderate(user, registry, req, VenueStatus::Rejected).await
}

async fn moderate(
    user: AuthorizedUser,
    registry: AppRegistry,
    req: ModerateVenueRequest,
    status: VenueStatus,
) -> AppResult<Json<MessageResponse>> {
    user.context().require_admin()?;
    req.validate(&())?;
    let (venue_id, category) = req.place()?;

    registry
        .venue_repository()
        .update_status(UpdateVenueStatus {
            venue_id,
            category,
            status,
        })
        .await?;

    tracing::info!(%venue_id, %category, %status, "venue moderated");
    Ok(Json(MessageResponse {
        message: format!("{category} {status}"),
    }))
}

pub async fn show_pending_venues(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<VenuesResponse>> {
    user.context().require_admin()?;

    registry
        .venue_repository()
        .find_by_status(VenueStatus::Pending)
        .await
        .map(VenuesResponse::from)
        .map(Json)
}

pub async fn show_totals(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<TotalsResponse>> {
    user.context().require_admin()?;

    let venues = registry.venue_repository().count_by_status().await?;
    let reservations = registry.reservation_repository().count_by_status().await?;
    Ok(Json(TotalsResponse::new(venues, reservations)))
}
