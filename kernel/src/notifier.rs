//! 予約の承認・却下を顧客へ知らせる通知
use crate::model::{reservation::Reservation, user::User, venue::Venue};
use async_trait::async_trait;
use shared::error::AppResult;

/// 状態遷移の後にライフサイクルが発行するイベント
#[derive(Debug, Clone)]
pub enum ReservationEvent {
    Accepted {
        reservation: Reservation,
        venue: Venue,
    },
    Rejected {
        reservation: Reservation,
        venue: Venue,
    },
}

impl ReservationEvent {
    pub fn reservation(&self) -> &Reservation {
        match self {
            ReservationEvent::Accepted { reservation, .. }
            | ReservationEvent::Rejected { reservation, .. } => reservation,
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_acceptance(
        &self,
        customer: &User,
        reservation: &Reservation,
        venue: &Venue,
    ) -> AppResult<()>;

    async fn send_rejection(&self, customer: &User) -> AppResult<()>;
}
