use kernel::model::{id::UserId, user::User};
use super::parse_column;
use shared::error::AppError;
use sqlx::FromRow;

#[derive(FromRow)]
pub struct UserRow {
    pub user_id: UserId,
    pub user_name: String,
    pub email: String,
    pub role: String,
    pub is_banned: bool,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(value: UserRow) -> Result<Self, Self::Error> {
        let UserRow {
            user_id,
            user_name,
            email,
            role,
            is_banned,
        } = value;
        Ok(User {
            user_id,
            user_name,
            email,
            role: parse_column("role", &role)?,
            is_banned,
        })
    }
}
