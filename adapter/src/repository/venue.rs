use crate::database::{
    model::venue::{into_raw_ids, VenueRow, VenueStatusCountRow},
    ConnectionPool,
};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::{UserId, VenueId},
    venue::{
        event::{CreateVenue, UpdateStaffing, UpdateVenueStatus},
        Category, Venue, VenueStatus, VenueStatusCount,
    },
};
use kernel::repository::venue::VenueRepository;
use shared::error::{AppError, AppResult};

const VENUE_COLUMNS: &str = r#"
    venue_id, category, venue_name, manager_id, supervisor_ids, employee_ids,
    is_sub_venue, status, created_at
"#;

// カテゴリ横断の検索は bar, club, hotel, restaurant の順に並べる
const CATEGORY_ORDER: &str = r#"
    CASE category
        WHEN 'bar' THEN 0
        WHEN 'club' THEN 1
        WHEN 'hotel' THEN 2
        ELSE 3
    END
"#;

#[derive(new)]
pub struct VenueRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl VenueRepository for VenueRepositoryImpl {
    async fn create(&self, event: CreateVenue) -> AppResult<VenueId> {
        let venue_id = VenueId::new();
        let (supervisor_ids, employee_ids) = match &event.staffing {
            Some(s) => (
                Some(into_raw_ids(&s.supervisors)),
                Some(into_raw_ids(&s.employees)),
            ),
            None => (None, None),
        };
        sqlx::query(
            r#"
                INSERT INTO venues
                (venue_id, category, venue_name, manager_id, supervisor_ids, employee_ids,
                is_sub_venue, status)
                VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending')
            "#,
        )
        .bind(venue_id)
        .bind(event.category.as_str())
        .bind(&event.venue_name)
        .bind(event.manager_id)
        .bind(supervisor_ids)
        .bind(employee_ids)
        .bind(event.is_sub_venue)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(venue_id)
    }

    async fn find_by_id(&self, venue_id: VenueId, category: Category) -> AppResult<Option<Venue>> {
        let sql = format!("SELECT {VENUE_COLUMNS} FROM venues WHERE venue_id = $1 AND category = $2");
        sqlx::query_as::<_, VenueRow>(&sql)
            .bind(venue_id)
            .bind(category.as_str())
            .fetch_optional(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?
            .map(Venue::try_from)
            .transpose()
    }

    async fn find_main(&self, user_id: UserId, legacy_fallback: bool) -> AppResult<Option<Venue>> {
        // 支店は除外。担当者情報を持たない旧レコードは $2 が真のときだけ一致させる
        let sql = format!(
            r#"
                SELECT {VENUE_COLUMNS} FROM venues
                WHERE is_sub_venue = FALSE
                AND (
                    manager_id = $1
                    OR $1 = ANY(supervisor_ids)
                    OR $1 = ANY(employee_ids)
                    OR ($2 AND supervisor_ids IS NULL AND employee_ids IS NULL)
                )
                ORDER BY {CATEGORY_ORDER}, created_at ASC
                LIMIT 1
            "#
        );
        sqlx::query_as::<_, VenueRow>(&sql)
            .bind(user_id)
            .bind(legacy_fallback)
            .fetch_optional(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?
            .map(Venue::try_from)
            .transpose()
    }

    async fn find_operated_by(&self, user_id: UserId) -> AppResult<Vec<Venue>> {
        let sql = format!(
            r#"
                SELECT {VENUE_COLUMNS} FROM venues
                WHERE manager_id = $1
                OR $1 = ANY(supervisor_ids)
                OR $1 = ANY(employee_ids)
                ORDER BY {CATEGORY_ORDER}, created_at ASC
            "#
        );
        self.fetch_venues(sqlx::query_as::<_, VenueRow>(&sql).bind(user_id))
            .await
    }

    async fn find_by_status(&self, status: VenueStatus) -> AppResult<Vec<Venue>> {
        let sql = format!(
            "SELECT {VENUE_COLUMNS} FROM venues WHERE status = $1 ORDER BY {CATEGORY_ORDER}, created_at ASC"
        );
        self.fetch_venues(sqlx::query_as::<_, VenueRow>(&sql).bind(status.as_str()))
            .await
    }

    async fn update_staffing(&self, event: UpdateStaffing) -> AppResult<()> {
        let res = sqlx::query(
            r#"
                UPDATE venues
                SET supervisor_ids = $1, employee_ids = $2
                WHERE venue_id = $3 AND category = $4
            "#,
        )
        .bind(into_raw_ids(&event.staffing.supervisors))
        .bind(into_raw_ids(&event.staffing.employees))
        .bind(event.venue_id)
        .bind(event.category.as_str())
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "{} not found",
                event.category
            )));
        }
        Ok(())
    }

    async fn update_status(&self, event: UpdateVenueStatus) -> AppResult<()> {
        let res = sqlx::query("UPDATE venues SET status = $1 WHERE venue_id = $2 AND category = $3")
            .bind(event.status.as_str())
            .bind(event.venue_id)
            .bind(event.category.as_str())
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "No {} with ID: {}",
                event.category, event.venue_id
            )));
        }
        Ok(())
    }

    async fn count_by_status(&self) -> AppResult<Vec<VenueStatusCount>> {
        sqlx::query_as::<_, VenueStatusCountRow>(
            r#"
                SELECT category, status, COUNT(*) AS total
                FROM venues
                GROUP BY category, status
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(VenueStatusCount::try_from)
        .collect()
    }
}

impl VenueRepositoryImpl {
    async fn fetch_venues<'q>(
        &self,
        query: sqlx::query::QueryAs<'q, sqlx::Postgres, VenueRow, sqlx::postgres::PgArguments>,
    ) -> AppResult<Vec<Venue>> {
        query
            .fetch_all(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?
            .into_iter()
            .map(Venue::try_from)
            .collect()
    }
}
