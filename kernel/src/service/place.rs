use crate::{
    model::{
        auth::AuthContext,
        id::{UserId, VenueId},
        venue::{Category, Venue},
    },
    repository::venue::VenueRepository,
};
use derive_new::new;
use shared::error::{AppError, AppResult};
use std::sync::Arc;

/// ID とカテゴリから会場を探し、スタッフの権限を判定する
#[derive(new, Clone)]
pub struct PlaceResolver {
    venue_repository: Arc<dyn VenueRepository>,
    legacy_fallback: bool,
}

impl PlaceResolver {
    pub async fn resolve(&self, venue_id: VenueId, category: Category) -> AppResult<Venue> {
        self.venue_repository
            .find_by_id(venue_id, category)
            .await?
            .ok_or_else(|| AppError::EntityNotFound(format!("{category} not found")))
    }

    /// 会場を解決したうえで、呼び出し元がその会場を操作できるか確認する
    pub async fn resolve_authorized(
        &self,
        ctx: &AuthContext,
        venue_id: VenueId,
        category: Category,
    ) -> AppResult<Venue> {
        let venue = self.resolve(venue_id, category).await?;
        if !venue.is_authorized(ctx.user_id) {
            return Err(AppError::ForbiddenOperation("Unauthorized action".into()));
        }
        Ok(venue)
    }

    pub async fn extract_main(&self, user_id: UserId) -> AppResult<Option<Venue>> {
        let venue = self
            .venue_repository
            .find_main(user_id, self.legacy_fallback)
            .await?;
        if let Some(v) = &venue {
            if v.staffing.is_none() && v.manager_id != user_id {
                tracing::debug!(
                    venue_id = %v.venue_id,
                    user_id = %user_id,
                    "main venue matched through legacy fallback"
                );
            }
        }
        Ok(venue)
    }
}
