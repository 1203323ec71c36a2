use kernel::model::{
    id::{ReservationId, UserId, VenueId},
    reservation::{Reservation, ReservationStatusCount},
};
use super::parse_column;
use shared::error::AppError;
use sqlx::{
    types::chrono::{DateTime, NaiveDate, NaiveTime, Utc},
    FromRow,
};

#[derive(FromRow)]
pub struct ReservationRow {
    pub reservation_id: ReservationId,
    pub venue_id: VenueId,
    pub category: String,
    pub customer_id: UserId,
    pub status: String,
    pub reservation_date: NaiveDate,
    pub reservation_time: NaiveTime,
    pub party_size: i32,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = AppError;

    fn try_from(value: ReservationRow) -> Result<Self, Self::Error> {
        let ReservationRow {
            reservation_id,
            venue_id,
            category,
            customer_id,
            status,
            reservation_date,
            reservation_time,
            party_size,
            created_at,
        } = value;
        Ok(Reservation {
            reservation_id,
            venue_id,
            category: parse_column("category", &category)?,
            customer_id,
            status: parse_column("status", &status)?,
            date: reservation_date,
            time: reservation_time,
            party_size,
            created_at,
        })
    }
}

#[derive(FromRow)]
pub struct ReservationStatusCountRow {
    pub status: String,
    pub total: i64,
}

impl TryFrom<ReservationStatusCountRow> for ReservationStatusCount {
    type Error = AppError;

    fn try_from(value: ReservationStatusCountRow) -> Result<Self, Self::Error> {
        Ok(ReservationStatusCount {
            status: parse_column("status", &value.status)?,
            total: value.total,
        })
    }
}
