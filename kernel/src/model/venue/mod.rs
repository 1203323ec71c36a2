use crate::model::id::{UserId, VenueId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr, VariantArray};

pub mod event;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
    IntoStaticStr,
    VariantArray,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Category {
    // VARIANTS の並びがカテゴリ横断で検索するときの順序になる
    #[strum(to_string = "bar", serialize = "bars")]
    Bar,
    #[strum(to_string = "club", serialize = "clubs")]
    Club,
    #[strum(to_string = "hotel", serialize = "hotels")]
    Hotel,
    #[strum(to_string = "restaurant", serialize = "restaurants")]
    Restaurant,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    pub fn rank(&self) -> i16 {
        match self {
            Category::Bar => 0,
            Category::Club => 1,
            Category::Hotel => 2,
            Category::Restaurant => 3,
        }
    }
}

/// 掲載審査の状態。予約の状態とは別物
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
pub enum VenueStatus {
    Pending,
    Approved,
    Rejected,
    Deleted,
}

impl VenueStatus {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Staffing {
    pub supervisors: Vec<UserId>,
    pub employees: Vec<UserId>,
}

impl Staffing {
    pub fn contains(&self, user_id: UserId) -> bool {
        self.supervisors.contains(&user_id) || self.employees.contains(&user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Venue {
    pub venue_id: VenueId,
    pub category: Category,
    pub venue_name: String,
    pub manager_id: UserId,
    // None は担当者モデル導入前の旧レコード
    pub staffing: Option<Staffing>,
    pub is_sub_venue: bool,
    pub status: VenueStatus,
    pub created_at: DateTime<Utc>,
}

impl Venue {
    /// オーナー、スーパーバイザー、従業員のいずれかであれば操作できる
    pub fn is_authorized(&self, user_id: UserId) -> bool {
        self.manager_id == user_id
            || self
                .staffing
                .as_ref()
                .is_some_and(|staffing| staffing.contains(user_id))
    }

    /// メイン会場の抽出条件。
    /// 支店は常に対象外。担当者情報を持たない旧レコードは `legacy_fallback` が有効なら誰にでも一致する
    pub fn matches_main(&self, user_id: UserId, legacy_fallback: bool) -> bool {
        if self.is_sub_venue {
            return false;
        }
        self.is_authorized(user_id) || (legacy_fallback && self.staffing.is_none())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueStatusCount {
    pub category: Category,
    pub status: VenueStatus,
    pub total: i64,
}
