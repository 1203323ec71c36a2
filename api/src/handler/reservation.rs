use crate::{
    extractor::{AuthorizedUser, JsonBody},
    model::reservation::{
        CreateReservationRequest, CreatedReservationResponse, MyReservationsQuery,
        PaginatedReservationResponse, ReservationDetailResponse, ReservationListQuery,
        TransitionReservationRequest, TransitionResponse,
    },
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{
    id::{ReservationId, VenueId},
    list::PaginatedList,
    reservation::{event::CreateReservation, Reservation, ReservationDetail},
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

// 会場の pending な予約一覧
pub async fn show_pending_reservations(
    user: AuthorizedUser,
    Query(query): Query<ReservationListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<PaginatedReservationResponse>> {
    query.validate(&())?;
    let (venue_id, category) = query.place()?;

    registry
        .reservation_lifecycle()
        .list_pending(&user.context(), venue_id, category, query.pagination())
        .await
        .map(PaginatedReservationResponse::from)
        .map(Json)
}

// ログインユーザーが担当する全会場の予約一覧
pub async fn show_my_reservations(
    user: AuthorizedUser,
    Query(query): Query<MyReservationsQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<PaginatedReservationResponse>> {
    user.context().require_staff()?;

    let venue_ids: Vec<VenueId> = registry
        .venue_repository()
        .find_operated_by(user.id())
        .await?
        .into_iter()
        .map(|v| v.venue_id)
        .collect();

    let pagination = query.pagination();
    if venue_ids.is_empty() {
        return Ok(Json(PaginatedReservationResponse::from(
            PaginatedList::<Reservation> {
                total: 0,
                page: pagination.page,
                count: pagination.count,
                items: vec![],
            },
        )));
    }

    registry
        .reservation_repository()
        .find_by_venues(&venue_ids, query.status(), pagination)
        .await
        .map(PaginatedReservationResponse::from)
        .map(Json)
}

pub async fn show_reservation(
    user: AuthorizedUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationDetailResponse>> {
    let ctx = user.context();
    ctx.require_staff()?;

    let reservation = registry
        .reservation_repository()
        .find_by_id(reservation_id)
        .await?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("No reservation with ID: {reservation_id}"))
        })?;

    // 管理者以外は担当会場の予約しか見られない
    if ctx.require_admin().is_err() {
        registry
            .place_resolver()
            .resolve_authorized(&ctx, reservation.venue_id, reservation.category)
            .await?;
    }

    let customer = registry
        .user_repository()
        .find_current_user(reservation.customer_id)
        .await?
        .ok_or_else(|| AppError::EntityNotFound("User not found".into()))?;

    Ok(Json(
        ReservationDetail {
            reservation,
            customer,
        }
        .into(),
    ))
}

pub async fn accept_reservation(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    JsonBody(req): JsonBody<TransitionReservationRequest>,
) -> AppResult<Json<TransitionResponse>> {
    req.validate(&())?;

    let reservation = registry
        .reservation_lifecycle()
        .accept(&user.context(), req.try_into()?)
        .await?;

    Ok(Json(TransitionResponse {
        message: "Acceptance email sent",
        reservation_id: reservation.reservation_id,
        status: reservation.status,
    }))
}

pub async fn reject_reservation(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    JsonBody(req): JsonBody<TransitionReservationRequest>,
) -> AppResult<Json<TransitionResponse>> {
    req.validate(&())?;

    let reservation = registry
        .reservation_lifecycle()
        .reject(&user.context(), req.try_into()?)
        .await?;

    Ok(Json(TransitionResponse {
        message: "Rejection email sent",
        reservation_id: reservation.reservation_id,
        status: reservation.status,
    }))
}

pub async fn mark_attended(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    JsonBody(req): JsonBody<TransitionReservationRequest>,
) -> AppResult<Json<TransitionResponse>> {
    req.validate(&())?;

    let reservation = registry
        .reservation_lifecycle()
        .mark_attended(&user.context(), req.try_into()?)
        .await?;

    Ok(Json(TransitionResponse {
        message: "Reservation attended",
        reservation_id: reservation.reservation_id,
        status: reservation.status,
    }))
}

pub async fn book_reservation(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    JsonBody(req): JsonBody<CreateReservationRequest>,
) -> AppResult<(StatusCode, Json<CreatedReservationResponse>)> {
    req.validate(&())?;
    let (venue_id, category) = req.place()?;

    let create_reservation = CreateReservation::new(
        venue_id,
        category,
        user.id(),
        req.date,
        req.time,
        req.people,
        chrono::Utc::now(),
    );

    let reservation_id = registry
        .reservation_lifecycle()
        .book(&user.context(), create_reservation)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedReservationResponse { reservation_id }),
    ))
}
