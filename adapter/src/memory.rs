//! プロセス内で完結するリポジトリ実装。
//!
//! テストやローカル確認用。予約状態の更新はロックを取った状態で比較と書き込みを行うため、
//! Postgres 実装の条件付き UPDATE と同じく同時更新でも一件しか成功しない。
use async_trait::async_trait;
use chrono::Utc;
use kernel::model::{
    auth::AccessToken,
    id::{ReservationId, UserId, VenueId},
    list::{PaginatedList, Pagination},
    reservation::{
        event::{CreateReservation, UpdateReservationStatus},
        Reservation, ReservationStatus, ReservationStatusCount,
    },
    user::User,
    venue::{
        event::{CreateVenue, UpdateStaffing, UpdateVenueStatus},
        Category, Venue, VenueStatus, VenueStatusCount,
    },
};
use kernel::repository::{
    auth::AuthRepository, health::HealthCheckRepository, reservation::ReservationRepository,
    user::UserRepository, venue::VenueRepository,
};
use shared::error::{AppError, AppResult};
use std::collections::HashMap;
use strum::VariantArray;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<UserId, User>>,
    tokens: RwLock<HashMap<String, UserId>>,
    // 登録順を保つため Vec で持つ
    venues: RwLock<Vec<Venue>>,
    reservations: RwLock<Vec<Reservation>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(&self, user: User) {
        self.users.write().await.insert(user.user_id, user);
    }

    pub async fn issue_token(&self, token: impl Into<String>, user_id: UserId) {
        self.tokens.write().await.insert(token.into(), user_id);
    }

    /// 既存の会場をそのまま登録する（旧レコードの再現など）
    pub async fn insert_venue(&self, venue: Venue) {
        self.venues.write().await.push(venue);
    }

    pub async fn insert_reservation(&self, reservation: Reservation) {
        self.reservations.write().await.push(reservation);
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_current_user(&self, user_id: UserId) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }
}

#[async_trait]
impl AuthRepository for InMemoryStore {
    async fn fetch_user_id_from_token(
        &self,
        access_token: &AccessToken,
    ) -> AppResult<Option<UserId>> {
        Ok(self.tokens.read().await.get(&access_token.0).copied())
    }
}

#[async_trait]
impl HealthCheckRepository for InMemoryStore {
    async fn check_db(&self) -> bool {
        true
    }
}

fn sorted_across_categories(mut venues: Vec<Venue>) -> Vec<Venue> {
    // sort_by_key は安定ソートなので、同じカテゴリ内は登録順のまま
    venues.sort_by_key(|v| v.category.rank());
    venues
}

#[async_trait]
impl VenueRepository for InMemoryStore {
    async fn create(&self, event: CreateVenue) -> AppResult<VenueId> {
        let venue_id = VenueId::new();
        self.venues.write().await.push(Venue {
            venue_id,
            category: event.category,
            venue_name: event.venue_name,
            manager_id: event.manager_id,
            staffing: event.staffing,
            is_sub_venue: event.is_sub_venue,
            status: VenueStatus::Pending,
            created_at: Utc::now(),
        });
        Ok(venue_id)
    }

    async fn find_by_id(&self, venue_id: VenueId, category: Category) -> AppResult<Option<Venue>> {
        Ok(self
            .venues
            .read()
            .await
            .iter()
            .find(|v| v.venue_id == venue_id && v.category == category)
            .cloned())
    }

    async fn find_main(&self, user_id: UserId, legacy_fallback: bool) -> AppResult<Option<Venue>> {
        let venues = self.venues.read().await.clone();
        Ok(sorted_across_categories(venues)
            .into_iter()
            .find(|v| v.matches_main(user_id, legacy_fallback)))
    }

    async fn find_operated_by(&self, user_id: UserId) -> AppResult<Vec<Venue>> {
        let venues = self.venues.read().await.clone();
        Ok(sorted_across_categories(venues)
            .into_iter()
            .filter(|v| v.is_authorized(user_id))
            .collect())
    }

    async fn find_by_status(&self, status: VenueStatus) -> AppResult<Vec<Venue>> {
        let venues = self.venues.read().await.clone();
        Ok(sorted_across_categories(venues)
            .into_iter()
            .filter(|v| v.status == status)
            .collect())
    }

    async fn update_staffing(&self, event: UpdateStaffing) -> AppResult<()> {
        let mut venues = self.venues.write().await;
        let venue = venues
            .iter_mut()
            .find(|v| v.venue_id == event.venue_id && v.category == event.category)
            .ok_or_else(|| AppError::EntityNotFound(format!("{} not found", event.category)))?;
        venue.staffing = Some(event.staffing);
        Ok(())
    }

    async fn update_status(&self, event: UpdateVenueStatus) -> AppResult<()> {
        let mut venues = self.venues.write().await;
        let venue = venues
            .iter_mut()
            .find(|v| v.venue_id == event.venue_id && v.category == event.category)
            .ok_or_else(|| {
                AppError::EntityNotFound(format!(
                    "No {} with ID: {}",
                    event.category, event.venue_id
                ))
            })?;
        venue.status = event.status;
        Ok(())
    }

    async fn count_by_status(&self) -> AppResult<Vec<VenueStatusCount>> {
        let mut counts: HashMap<(Category, VenueStatus), i64> = HashMap::new();
        for v in self.venues.read().await.iter() {
            *counts.entry((v.category, v.status)).or_default() += 1;
        }
        Ok(counts
            .into_iter()
            .map(|((category, status), total)| VenueStatusCount {
                category,
                status,
                total,
            })
            .collect())
    }
}

#[async_trait]
impl ReservationRepository for InMemoryStore {
    async fn create(&self, event: CreateReservation) -> AppResult<ReservationId> {
        let reservation_id = ReservationId::new();
        self.reservations.write().await.push(Reservation {
            reservation_id,
            venue_id: event.venue_id,
            category: event.category,
            customer_id: event.customer_id,
            status: ReservationStatus::Pending,
            date: event.date,
            time: event.time,
            party_size: event.party_size,
            created_at: event.created_at,
        });
        Ok(reservation_id)
    }

    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Option<Reservation>> {
        Ok(self
            .reservations
            .read()
            .await
            .iter()
            .find(|r| r.reservation_id == reservation_id)
            .cloned())
    }

    async fn find_by_venues(
        &self,
        venue_ids: &[VenueId],
        status: Option<ReservationStatus>,
        pagination: Pagination,
    ) -> AppResult<PaginatedList<Reservation>> {
        let mut matched: Vec<Reservation> = self
            .reservations
            .read()
            .await
            .iter()
            .filter(|r| venue_ids.contains(&r.venue_id))
            .filter(|r| status.map_or(true, |s| r.status == s))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matched.len() as i64;
        let items = matched
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.count as usize)
            .collect();
        Ok(PaginatedList {
            total,
            page: pagination.page,
            count: pagination.count,
            items,
        })
    }

    async fn update_status_if(&self, event: UpdateReservationStatus) -> AppResult<bool> {
        let mut reservations = self.reservations.write().await;
        let Some(reservation) = reservations
            .iter_mut()
            .find(|r| r.reservation_id == event.reservation_id)
        else {
            return Ok(false);
        };
        if !event.expected.contains(&reservation.status) {
            return Ok(false);
        }
        reservation.status = event.next;
        Ok(true)
    }

    async fn count_by_status(&self) -> AppResult<Vec<ReservationStatusCount>> {
        let reservations = self.reservations.read().await;
        Ok(ReservationStatus::VARIANTS
            .iter()
            .copied()
            .map(|status| ReservationStatusCount {
                status,
                total: reservations.iter().filter(|r| r.status == status).count() as i64,
            })
            .filter(|c| c.total > 0)
            .collect())
    }
}
