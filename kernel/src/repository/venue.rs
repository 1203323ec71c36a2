use crate::model::{
    id::{UserId, VenueId},
    venue::{
        event::{CreateVenue, UpdateStaffing, UpdateVenueStatus},
        Category, Venue, VenueStatus, VenueStatusCount,
    },
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait VenueRepository: Send + Sync {
    async fn create(&self, event: CreateVenue) -> AppResult<VenueId>;
    // 指定カテゴリの中だけを探す
    async fn find_by_id(&self, venue_id: VenueId, category: Category) -> AppResult<Option<Venue>>;
    // カテゴリ順（bar, club, hotel, restaurant）、登録順で最初に一致したメイン会場
    async fn find_main(&self, user_id: UserId, legacy_fallback: bool) -> AppResult<Option<Venue>>;
    // オーナー・スーパーバイザー・従業員として関わる全会場（支店を含む）
    async fn find_operated_by(&self, user_id: UserId) -> AppResult<Vec<Venue>>;
    async fn find_by_status(&self, status: VenueStatus) -> AppResult<Vec<Venue>>;
    async fn update_staffing(&self, event: UpdateStaffing) -> AppResult<()>;
    async fn update_status(&self, event: UpdateVenueStatus) -> AppResult<()>;
    async fn count_by_status(&self) -> AppResult<Vec<VenueStatusCount>>;
}
