use crate::database::{
    model::reservation::{ReservationRow, ReservationStatusCountRow},
    ConnectionPool,
};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::{ReservationId, VenueId},
    list::{PaginatedList, Pagination},
    reservation::{
        event::{CreateReservation, UpdateReservationStatus},
        Reservation, ReservationStatus, ReservationStatusCount,
    },
};
use kernel::repository::reservation::ReservationRepository;
use shared::error::{AppError, AppResult};
use uuid::Uuid;

#[derive(new)]
pub struct ReservationRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl ReservationRepository for ReservationRepositoryImpl {
    async fn create(&self, event: CreateReservation) -> AppResult<ReservationId> {
        let reservation_id = ReservationId::new();
        let res = sqlx::query(
            r#"
                INSERT INTO reservations
                (reservation_id, venue_id, category, customer_id, status,
                reservation_date, reservation_time, party_size, created_at)
                VALUES ($1, $2, $3, $4, 'pending', $5, $6, $7, $8)
            "#,
        )
        .bind(reservation_id)
        .bind(event.venue_id)
        .bind(event.category.as_str())
        .bind(event.customer_id)
        .bind(event.date)
        .bind(event.time)
        .bind(event.party_size)
        .bind(event.created_at)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No reservation record has been created".into(),
            ));
        }

        Ok(reservation_id)
    }

    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Option<Reservation>> {
        sqlx::query_as::<_, ReservationRow>(
            r#"
                SELECT
                reservation_id, venue_id, category, customer_id, status,
                reservation_date, reservation_time, party_size, created_at
                FROM reservations
                WHERE reservation_id = $1
            "#,
        )
        .bind(reservation_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .map(Reservation::try_from)
        .transpose()
    }

    async fn find_by_venues(
        &self,
        venue_ids: &[VenueId],
        status: Option<ReservationStatus>,
        pagination: Pagination,
    ) -> AppResult<PaginatedList<Reservation>> {
        let venue_ids: Vec<Uuid> = venue_ids.iter().map(|id| id.raw()).collect();
        let status = status.map(|s| s.as_str());

        // status が NULL のときは絞り込まない
        let total: i64 = sqlx::query_scalar(
            r#"
                SELECT COUNT(*) FROM reservations
                WHERE venue_id = ANY($1)
                AND ($2::VARCHAR IS NULL OR status = $2)
            "#,
        )
        .bind(&venue_ids)
        .bind(status)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let items = sqlx::query_as::<_, ReservationRow>(
            r#"
                SELECT
                reservation_id, venue_id, category, customer_id, status,
                reservation_date, reservation_time, party_size, created_at
                FROM reservations
                WHERE venue_id = ANY($1)
                AND ($2::VARCHAR IS NULL OR status = $2)
                ORDER BY created_at DESC
                LIMIT $3
                OFFSET $4
            "#,
        )
        .bind(&venue_ids)
        .bind(status)
        .bind(pagination.count)
        .bind(pagination.offset())
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(Reservation::try_from)
        .collect::<AppResult<Vec<_>>>()?;

        Ok(PaginatedList {
            total,
            page: pagination.page,
            count: pagination.count,
            items,
        })
    }

    async fn update_status_if(&self, event: UpdateReservationStatus) -> AppResult<bool> {
        // 読み取りと書き込みを一文にまとめ、同時更新で二重に遷移しないようにする
        let expected: Vec<&str> = event.expected.iter().map(|s| s.as_str()).collect();
        let res = sqlx::query(
            r#"
                UPDATE reservations
                SET status = $2
                WHERE reservation_id = $1
                AND status = ANY($3)
            "#,
        )
        .bind(event.reservation_id)
        .bind(event.next.as_str())
        .bind(&expected)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(res.rows_affected() == 1)
    }

    async fn count_by_status(&self) -> AppResult<Vec<ReservationStatusCount>> {
        sqlx::query_as::<_, ReservationStatusCountRow>(
            r#"
                SELECT status, COUNT(*) AS total
                FROM reservations
                GROUP BY status
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(ReservationStatusCount::try_from)
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, Utc};
    use kernel::model::reservation::ReservationAction;
    use kernel::model::venue::Category;

    async fn seed(pool: &sqlx::PgPool) -> anyhow::Result<(VenueId, kernel::model::id::UserId)> {
        let manager_id = kernel::model::id::UserId::new();
        let customer_id = kernel::model::id::UserId::new();
        for (id, name, role) in [(manager_id, "manager", "manager"), (customer_id, "guest", "user")] {
            sqlx::query("INSERT INTO users (user_id, user_name, email, role) VALUES ($1, $2, $3, $4)")
                .bind(id)
                .bind(name)
                .bind(format!("{name}@example.com"))
                .bind(role)
                .execute(pool)
                .await?;
        }
        let venue_id = VenueId::new();
        sqlx::query(
            "INSERT INTO venues (venue_id, category, venue_name, manager_id, status) VALUES ($1, 'bar', 'Blue Note', $2, 'approved')",
        )
        .bind(venue_id)
        .bind(manager_id)
        .execute(pool)
        .await?;
        Ok((venue_id, customer_id))
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
    async fn conditional_update_only_applies_once(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let (venue_id, customer_id) = seed(&pool).await?;
        let repo = ReservationRepositoryImpl::new(ConnectionPool::new(pool));

        let reservation_id = repo
            .create(CreateReservation::new(
                venue_id,
                Category::Bar,
                customer_id,
                NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
                NaiveTime::from_hms_opt(19, 30, 0).unwrap(),
                4,
                Utc::now(),
            ))
            .await?;

        let accept = || UpdateReservationStatus::for_action(reservation_id, ReservationAction::Accept);
        assert!(repo.update_status_if(accept()).await?);
        assert!(!repo.update_status_if(accept()).await?);

        let res = repo.find_by_id(reservation_id).await?.unwrap();
        assert_eq!(res.status, ReservationStatus::Accepted);

        let pending = repo
            .find_by_venues(&[venue_id], Some(ReservationStatus::Pending), Pagination::default())
            .await?;
        assert_eq!(pending.total, 0);
        Ok(())
    }
}
