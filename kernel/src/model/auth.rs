use crate::model::{id::UserId, role::Role};
use shared::error::{AppError, AppResult};

pub struct AccessToken(pub String);

/// リクエスト元の利用者。各操作には引数として明示的に渡す
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: UserId,
    pub role: Role,
}

impl AuthContext {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn require_staff(&self) -> AppResult<()> {
        if self.role.is_staff() {
            Ok(())
        } else {
            Err(AppError::ForbiddenOperation("Action not allowed".into()))
        }
    }

    pub fn require_manager(&self) -> AppResult<()> {
        if self.role.is_manager() {
            Ok(())
        } else {
            Err(AppError::ForbiddenOperation("Action not allowed".into()))
        }
    }

    pub fn require_admin(&self) -> AppResult<()> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(AppError::ForbiddenOperation("Admin only".into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customers_are_not_staff() {
        let ctx = AuthContext::new(UserId::new(), Role::User);
        assert!(matches!(
            ctx.require_staff(),
            Err(AppError::ForbiddenOperation(_))
        ));
        assert!(AuthContext::new(UserId::new(), Role::Employee)
            .require_staff()
            .is_ok());
    }

    #[test]
    fn only_admin_passes_admin_check() {
        assert!(AuthContext::new(UserId::new(), Role::Admin)
            .require_admin()
            .is_ok());
        assert!(AuthContext::new(UserId::new(), Role::Manager)
            .require_admin()
            .is_err());
        assert!(AuthContext::new(UserId::new(), Role::Admin)
            .require_manager()
            .is_ok());
    }
}
