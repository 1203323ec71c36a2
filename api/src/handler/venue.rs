use crate::{
    extractor::{AuthorizedUser, JsonBody},
    model::venue::{CreateVenueRequest, CreatedVenueResponse, UpdateStaffRequest, VenueResponse},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{id::VenueId, venue::event::UpdateStaffing};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn register_venue(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    JsonBody(req): JsonBody<CreateVenueRequest>,
) -> AppResult<(StatusCode, Json<CreatedVenueResponse>)> {
    user.context().require_manager()?;
    req.validate(&())?;

    let venue_id = registry
        .venue_repository()
        .create(req.into_event(user.id()))
        .await?;

    Ok((StatusCode::CREATED, Json(CreatedVenueResponse { venue_id })))
}

pub async fn show_venue(
    Path((category, venue_id)): Path<(String, VenueId)>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<VenueResponse>> {
    registry
        .place_resolver()
        .resolve(venue_id, category.parse()?)
        .await
        .map(VenueResponse::from)
        .map(Json)
}

// スタッフが担当しているメイン会場
pub async fn show_main_venue(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<VenueResponse>> {
    user.context().require_staff()?;

    registry
        .place_resolver()
        .extract_main(user.id())
        .await?
        .map(|v| Json(v.into()))
        .ok_or_else(|| AppError::EntityNotFound("No venue found for this account".into()))
}

pub async fn update_staff(
    user: AuthorizedUser,
    Path((category, venue_id)): Path<(String, VenueId)>,
    State(registry): State<AppRegistry>,
    JsonBody(req): JsonBody<UpdateStaffRequest>,
) -> AppResult<StatusCode> {
    let category = category.parse()?;
    let venue = registry.place_resolver().resolve(venue_id, category).await?;

    // 担当者の入れ替えはオーナーのみ
    if venue.manager_id != user.id() {
        return Err(AppError::ForbiddenOperation("Unauthorized".into()));
    }

    registry
        .venue_repository()
        .update_staffing(UpdateStaffing {
            venue_id,
            category,
            staffing: req.into(),
        })
        .await
        .map(|_| StatusCode::OK)
}
