use super::Mail;
use async_trait::async_trait;
use kernel::model::{reservation::Reservation, user::User, venue::Venue};
use kernel::notifier::Notifier;
use shared::error::AppResult;

/// メール設定が無い環境向け。送信内容をログに出すだけ
#[derive(Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_acceptance(
        &self,
        customer: &User,
        reservation: &Reservation,
        venue: &Venue,
    ) -> AppResult<()> {
        let mail = Mail::acceptance(customer, reservation, venue);
        tracing::info!(to = %mail.to, subject = %mail.subject, "acceptance mail (not sent)");
        Ok(())
    }

    async fn send_rejection(&self, customer: &User) -> AppResult<()> {
        let mail = Mail::rejection(customer);
        tracing::info!(to = %mail.to, subject = %mail.subject, "rejection mail (not sent)");
        Ok(())
    }
}
