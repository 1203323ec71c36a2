use crate::model::{
    id::{ReservationId, UserId, VenueId},
    user::User,
    venue::Category,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
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
pub enum ReservationStatus {
    Pending,
    Accepted,
    Rejected,
    Attended,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// 遷移を適用した結果の状態を返す。不正な遷移なら現在の状態を Err で返す
    pub fn apply(self, action: ReservationAction) -> Result<ReservationStatus, ReservationStatus> {
        if action.allowed_from().contains(&self) {
            Ok(action.target())
        } else {
            Err(self)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationAction {
    Accept,
    Reject,
    MarkAttended,
}

impl ReservationAction {
    pub fn target(&self) -> ReservationStatus {
        match self {
            ReservationAction::Accept => ReservationStatus::Accepted,
            ReservationAction::Reject => ReservationStatus::Rejected,
            ReservationAction::MarkAttended => ReservationStatus::Attended,
        }
    }

    // pending に戻る遷移は存在しない
    pub fn allowed_from(&self) -> &'static [ReservationStatus] {
        match self {
            ReservationAction::Accept | ReservationAction::Reject => &[ReservationStatus::Pending],
            ReservationAction::MarkAttended => {
                &[ReservationStatus::Pending, ReservationStatus::Accepted]
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub reservation_id: ReservationId,
    pub venue_id: VenueId,
    pub category: Category,
    pub customer_id: UserId,
    pub status: ReservationStatus,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub party_size: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct ReservationDetail {
    pub reservation: Reservation,
    pub customer: User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationStatusCount {
    pub status: ReservationStatus,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn any_status() -> impl Strategy<Value = ReservationStatus> {
        prop::sample::select(ReservationStatus::VARIANTS.to_vec())
    }

    fn any_action() -> impl Strategy<Value = ReservationAction> {
        prop::sample::select(vec![
            ReservationAction::Accept,
            ReservationAction::Reject,
            ReservationAction::MarkAttended,
        ])
    }

    #[test]
    fn pending_transitions() {
        let pending = ReservationStatus::Pending;
        assert_eq!(pending.apply(ReservationAction::Accept), Ok(ReservationStatus::Accepted));
        assert_eq!(pending.apply(ReservationAction::Reject), Ok(ReservationStatus::Rejected));
        assert_eq!(
            pending.apply(ReservationAction::MarkAttended),
            Ok(ReservationStatus::Attended)
        );
    }

    #[test]
    fn accepted_can_only_be_attended() {
        let accepted = ReservationStatus::Accepted;
        assert_eq!(accepted.apply(ReservationAction::Accept), Err(accepted));
        assert_eq!(accepted.apply(ReservationAction::Reject), Err(accepted));
        assert_eq!(
            accepted.apply(ReservationAction::MarkAttended),
            Ok(ReservationStatus::Attended)
        );
    }

    proptest! {
        #[test]
        fn rejected_and_attended_are_terminal(action in any_action()) {
            prop_assert_eq!(
                ReservationStatus::Rejected.apply(action),
                Err(ReservationStatus::Rejected)
            );
            prop_assert_eq!(
                ReservationStatus::Attended.apply(action),
                Err(ReservationStatus::Attended)
            );
        }

        #[test]
        fn no_transition_reaches_pending(status in any_status(), action in any_action()) {
            prop_assert_ne!(status.apply(action), Ok(ReservationStatus::Pending));
        }

        #[test]
        fn failed_transition_reports_current(status in any_status(), action in any_action()) {
            if let Err(blocking) = status.apply(action) {
                prop_assert_eq!(blocking, status);
            }
        }
    }
}
