use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr, VariantArray};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
    IntoStaticStr,
    VariantArray,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Supervisor,
    Employee,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    // 会場スタッフとして予約を扱えるロール
    pub fn is_staff(&self) -> bool {
        !matches!(self, Role::User)
    }

    pub fn is_manager(&self) -> bool {
        matches!(self, Role::Manager | Role::Admin)
    }
}
