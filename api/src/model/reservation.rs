use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use garde::Validate;
use kernel::model::{
    id::{ReservationId, UserId, VenueId},
    list::{PaginatedList, Pagination},
    reservation::{event::TransitionReservation, Reservation, ReservationDetail, ReservationStatus},
    venue::Category,
};
use serde::{Deserialize, Serialize};
use shared::error::AppResult;

use super::parse_place;

#[derive(Debug, Deserialize, Validate)]
pub struct ReservationListQuery {
    #[garde(required)]
    #[serde(rename = "ID")]
    pub id: Option<String>,
    #[garde(required)]
    pub category: Option<String>,
    #[garde(skip)]
    pub page: Option<i64>,
    #[garde(skip)]
    pub count: Option<i64>,
}

impl ReservationListQuery {
    pub fn place(&self) -> AppResult<(VenueId, Category)> {
        parse_place(
            self.id.as_deref().unwrap_or_default(),
            self.category.as_deref().unwrap_or_default(),
        )
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.count)
    }
}

#[derive(Debug, Deserialize)]
pub struct MyReservationsQuery {
    pub status: Option<String>,
    pub page: Option<i64>,
    pub count: Option<i64>,
}

impl MyReservationsQuery {
    // 既知の状態以外は絞り込みに使わない
    pub fn status(&self) -> Option<ReservationStatus> {
        self.status.as_deref().and_then(|s| s.parse().ok())
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.count)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct TransitionReservationRequest {
    #[garde(required)]
    #[serde(rename = "reservationID")]
    pub reservation_id: Option<String>,
    #[garde(required)]
    #[serde(rename = "ID")]
    pub id: Option<String>,
    #[garde(required)]
    pub category: Option<String>,
}

impl TryFrom<TransitionReservationRequest> for TransitionReservation {
    type Error = shared::error::AppError;

    fn try_from(value: TransitionReservationRequest) -> Result<Self, Self::Error> {
        let (venue_id, category) = parse_place(
            value.id.as_deref().unwrap_or_default(),
            value.category.as_deref().unwrap_or_default(),
        )?;
        let reservation_id: ReservationId =
            value.reservation_id.as_deref().unwrap_or_default().parse()?;
        Ok(TransitionReservation::new(reservation_id, venue_id, category))
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    #[garde(required)]
    #[serde(rename = "ID")]
    pub id: Option<String>,
    #[garde(required)]
    pub category: Option<String>,
    #[garde(skip)]
    pub date: NaiveDate,
    #[garde(skip)]
    pub time: NaiveTime,
    #[garde(range(min = 1))]
    pub people: i32,
}

impl CreateReservationRequest {
    pub fn place(&self) -> AppResult<(VenueId, Category)> {
        parse_place(
            self.id.as_deref().unwrap_or_default(),
            self.category.as_deref().unwrap_or_default(),
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub reservation_id: ReservationId,
    #[serde(rename = "ID")]
    pub venue_id: VenueId,
    pub category: Category,
    pub customer_id: UserId,
    pub status: ReservationStatus,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub party_size: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationResponse {
    fn from(value: Reservation) -> Self {
        let Reservation {
            reservation_id,
            venue_id,
            category,
            customer_id,
            status,
            date,
            time,
            party_size,
            created_at,
        } = value;
        Self {
            reservation_id,
            venue_id,
            category,
            customer_id,
            status,
            date,
            time,
            party_size,
            created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedReservationResponse {
    pub page: i64,
    pub total_pages: i64,
    pub reservations_count: i64,
    pub reservations: Vec<ReservationResponse>,
}

impl From<PaginatedList<Reservation>> for PaginatedReservationResponse {
    fn from(value: PaginatedList<Reservation>) -> Self {
        Self {
            page: value.page,
            total_pages: value.total_pages(),
            reservations_count: value.total,
            reservations: value
                .into_inner()
                .into_iter()
                .map(ReservationResponse::from)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDetailResponse {
    #[serde(flatten)]
    pub reservation: ReservationResponse,
    pub user_name: String,
    pub email: String,
}

impl From<ReservationDetail> for ReservationDetailResponse {
    fn from(value: ReservationDetail) -> Self {
        let ReservationDetail {
            reservation,
            customer,
        } = value;
        Self {
            reservation: reservation.into(),
            user_name: customer.user_name,
            email: customer.email,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionResponse {
    pub message: &'static str,
    pub reservation_id: ReservationId,
    pub status: ReservationStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedReservationResponse {
    pub reservation_id: ReservationId,
}
