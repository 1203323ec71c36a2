use crate::{
    model::{
        auth::AuthContext,
        id::{ReservationId, VenueId},
        list::{PaginatedList, Pagination},
        reservation::{
            event::{CreateReservation, TransitionReservation, UpdateReservationStatus},
            Reservation, ReservationAction, ReservationStatus,
        },
        venue::{Category, Venue, VenueStatus},
    },
    notifier::ReservationEvent,
    repository::reservation::ReservationRepository,
    service::place::PlaceResolver,
};
use derive_new::new;
use shared::error::{AppError, AppResult};
use std::sync::Arc;
use tokio::sync::mpsc::{error::TrySendError, Sender};

/// 予約の状態遷移を管理する。
///
/// 遷移のたびに会場の解決と権限確認をやり直し、更新は現在の状態を条件にした
/// 一回の条件付き更新で行う。同じ予約への同時リクエストは片方だけが成功する。
#[derive(new, Clone)]
pub struct ReservationLifecycle {
    places: PlaceResolver,
    reservation_repository: Arc<dyn ReservationRepository>,
    events: Sender<ReservationEvent>,
}

impl ReservationLifecycle {
    pub async fn accept(
        &self,
        ctx: &AuthContext,
        req: TransitionReservation,
    ) -> AppResult<Reservation> {
        self.transition(ctx, req, ReservationAction::Accept).await
    }

    pub async fn reject(
        &self,
        ctx: &AuthContext,
        req: TransitionReservation,
    ) -> AppResult<Reservation> {
        self.transition(ctx, req, ReservationAction::Reject).await
    }

    pub async fn mark_attended(
        &self,
        ctx: &AuthContext,
        req: TransitionReservation,
    ) -> AppResult<Reservation> {
        self.transition(ctx, req, ReservationAction::MarkAttended)
            .await
    }

    /// 会場の pending な予約一覧
    pub async fn list_pending(
        &self,
        ctx: &AuthContext,
        venue_id: VenueId,
        category: Category,
        pagination: Pagination,
    ) -> AppResult<PaginatedList<Reservation>> {
        ctx.require_staff()?;
        let venue = self
            .places
            .resolve_authorized(ctx, venue_id, category)
            .await?;
        self.reservation_repository
            .find_by_venues(
                &[venue.venue_id],
                Some(ReservationStatus::Pending),
                pagination,
            )
            .await
    }

    /// 承認済みの会場に対して顧客が予約を申し込む
    pub async fn book(&self, ctx: &AuthContext, event: CreateReservation) -> AppResult<ReservationId> {
        if event.party_size < 1 {
            return Err(AppError::BadRequest("Party size must be at least 1".into()));
        }
        if event.customer_id != ctx.user_id {
            return Err(AppError::ForbiddenOperation(
                "Cannot book on behalf of another user".into(),
            ));
        }
        let venue = self.places.resolve(event.venue_id, event.category).await?;
        if venue.status != VenueStatus::Approved {
            return Err(AppError::UnprocessableEntity(format!(
                "{} is not accepting reservations",
                venue.category
            )));
        }
        self.reservation_repository.create(event).await
    }

    async fn transition(
        &self,
        ctx: &AuthContext,
        req: TransitionReservation,
        action: ReservationAction,
    ) -> AppResult<Reservation> {
        ctx.require_staff()?;
        let venue = self
            .places
            .resolve_authorized(ctx, req.venue_id, req.category)
            .await?;

        let reservation = self.find_in_venue(req.reservation_id, &venue).await?;
        let next = reservation.status.apply(action).map_err(already)?;

        let updated = self
            .reservation_repository
            .update_status_if(UpdateReservationStatus::for_action(
                reservation.reservation_id,
                action,
            ))
            .await?;
        if !updated {
            // 読み取りから更新までの間に別のリクエストが遷移させた
            let current = self.find_in_venue(req.reservation_id, &venue).await?;
            return Err(already(current.status));
        }

        tracing::info!(
            reservation_id = %reservation.reservation_id,
            venue_id = %venue.venue_id,
            from = %reservation.status,
            to = %next,
            "reservation status changed"
        );

        let reservation = Reservation {
            status: next,
            ..reservation
        };
        self.emit(action, &reservation, venue);
        Ok(reservation)
    }

    async fn find_in_venue(
        &self,
        reservation_id: ReservationId,
        venue: &Venue,
    ) -> AppResult<Reservation> {
        self.reservation_repository
            .find_by_id(reservation_id)
            .await?
            .filter(|r| r.venue_id == venue.venue_id)
            .ok_or_else(|| {
                AppError::EntityNotFound(format!("No reservation with ID: {reservation_id}"))
            })
    }

    fn emit(&self, action: ReservationAction, reservation: &Reservation, venue: Venue) {
        let event = match action {
            ReservationAction::Accept => ReservationEvent::Accepted {
                reservation: reservation.clone(),
                venue,
            },
            ReservationAction::Reject => ReservationEvent::Rejected {
                reservation: reservation.clone(),
                venue,
            },
            ReservationAction::MarkAttended => return,
        };
        // 遷移自体は確定しているので、通知を待ち合わせたり失敗扱いにはしない
        match self.events.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => tracing::warn!(
                reservation_id = %reservation.reservation_id,
                "notification queue is full; dropping notification"
            ),
            Err(TrySendError::Closed(_)) => tracing::warn!(
                reservation_id = %reservation.reservation_id,
                "notification dispatcher is not running"
            ),
        }
    }
}

fn already(current: ReservationStatus) -> AppError {
    AppError::Conflict(format!("Reservation already {current}"))
}
