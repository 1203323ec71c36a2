use kernel::model::auth::AccessToken;
use shared::error::AppError;
use uuid::Uuid;

pub trait RedisKey {
    type Value: TryFrom<String, Error = AppError>;
    fn inner(&self) -> String;
}

/// 認証サービスが発行したアクセストークンの保存キー
pub struct AuthorizationKey(String);

impl From<&AccessToken> for AuthorizationKey {
    fn from(token: &AccessToken) -> Self {
        Self(format!("auth:{}", token.0))
    }
}

impl RedisKey for AuthorizationKey {
    type Value = AuthorizedUserId;

    fn inner(&self) -> String {
        self.0.clone()
    }
}

pub struct AuthorizedUserId(Uuid);

impl TryFrom<String> for AuthorizedUserId {
    type Error = AppError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Ok(Self(Uuid::parse_str(&s)?))
    }
}

impl From<AuthorizedUserId> for kernel::model::id::UserId {
    fn from(value: AuthorizedUserId) -> Self {
        value.0.into()
    }
}
