use crate::redis::{model::AuthorizationKey, RedisClient};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{auth::AccessToken, id::UserId};
use kernel::repository::auth::AuthRepository;
use shared::error::AppResult;
use std::sync::Arc;

#[derive(new)]
pub struct AuthRepositoryImpl {
    kv: Arc<RedisClient>,
}

#[async_trait]
impl AuthRepository for AuthRepositoryImpl {
    async fn fetch_user_id_from_token(
        &self,
        access_token: &AccessToken,
    ) -> AppResult<Option<UserId>> {
        let key: AuthorizationKey = access_token.into();
        self.kv.get(&key).await.map(|v| v.map(UserId::from))
    }
}
