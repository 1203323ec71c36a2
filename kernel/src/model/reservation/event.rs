use crate::model::{
    id::{ReservationId, UserId, VenueId},
    reservation::{ReservationAction, ReservationStatus},
    venue::Category,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use derive_new::new;

#[derive(new, Debug)]
pub struct CreateReservation {
    pub venue_id: VenueId,
    pub category: Category,
    pub customer_id: UserId,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub party_size: i32,
    pub created_at: DateTime<Utc>,
}

/// スタッフによる状態遷移の要求
#[derive(new, Debug, Clone, Copy)]
pub struct TransitionReservation {
    pub reservation_id: ReservationId,
    pub venue_id: VenueId,
    pub category: Category,
}

/// `expected` のいずれかである場合に限り `next` へ更新する条件付き更新
#[derive(Debug)]
pub struct UpdateReservationStatus {
    pub reservation_id: ReservationId,
    pub expected: &'static [ReservationStatus],
    pub next: ReservationStatus,
}

impl UpdateReservationStatus {
    pub fn for_action(reservation_id: ReservationId, action: ReservationAction) -> Self {
        Self {
            reservation_id,
            expected: action.allowed_from(),
            next: action.target(),
        }
    }
}
