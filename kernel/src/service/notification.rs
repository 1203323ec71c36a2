use crate::{
    notifier::{Notifier, ReservationEvent},
    repository::user::UserRepository,
};
use derive_new::new;
use shared::error::{AppError, AppResult};
use std::sync::Arc;
use tokio::sync::mpsc::Receiver;

/// ライフサイクルが発行したイベントを受け取り、顧客へメールを送る
#[derive(new)]
pub struct NotificationDispatcher {
    user_repository: Arc<dyn UserRepository>,
    notifier: Arc<dyn Notifier>,
}

impl NotificationDispatcher {
    pub async fn run(self, mut events: Receiver<ReservationEvent>) {
        while let Some(event) = events.recv().await {
            let reservation_id = event.reservation().reservation_id;
            // 送信失敗は状態遷移を巻き戻さない
            if let Err(e) = self.dispatch(event).await {
                tracing::warn!(
                    %reservation_id,
                    error.message = %e,
                    "failed to notify customer"
                );
            }
        }
        tracing::debug!("notification channel closed");
    }

    pub async fn dispatch(&self, event: ReservationEvent) -> AppResult<()> {
        let customer_id = event.reservation().customer_id;
        let customer = self
            .user_repository
            .find_current_user(customer_id)
            .await?
            .ok_or_else(|| AppError::EntityNotFound(format!("User not found: {customer_id}")))?;

        match &event {
            ReservationEvent::Accepted { reservation, venue } => {
                self.notifier
                    .send_acceptance(&customer, reservation, venue)
                    .await
            }
            ReservationEvent::Rejected { .. } => self.notifier.send_rejection(&customer).await,
        }
    }
}
