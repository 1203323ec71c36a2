use crate::model::{
    id::{ReservationId, VenueId},
    list::{PaginatedList, Pagination},
    reservation::{
        event::{CreateReservation, UpdateReservationStatus},
        Reservation, ReservationStatus, ReservationStatusCount,
    },
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    // 予約を pending で登録する
    async fn create(&self, event: CreateReservation) -> AppResult<ReservationId>;
    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Option<Reservation>>;
    // 会場の予約を新しい順に取得する。status が None なら全状態
    async fn find_by_venues(
        &self,
        venue_ids: &[VenueId],
        status: Option<ReservationStatus>,
        pagination: Pagination,
    ) -> AppResult<PaginatedList<Reservation>>;
    // 現在の状態が expected に含まれる場合のみ更新する。更新できたら true
    async fn update_status_if(&self, event: UpdateReservationStatus) -> AppResult<bool>;
    async fn count_by_status(&self) -> AppResult<Vec<ReservationStatusCount>>;
}
