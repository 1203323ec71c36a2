use crate::model::{auth::AccessToken, id::UserId};
use async_trait::async_trait;
use shared::error::AppResult;

// トークンの発行は認証サービス側の責務。ここでは検証のみ行う
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn fetch_user_id_from_token(&self, access_token: &AccessToken)
        -> AppResult<Option<UserId>>;
}
