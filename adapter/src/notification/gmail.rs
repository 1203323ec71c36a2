use super::Mail;
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use kernel::model::{reservation::Reservation, user::User, venue::Venue};
use kernel::notifier::Notifier;
use reqwest::Client;
use shared::error::{AppError, AppResult};
use yup_oauth2::{authenticator::DefaultAuthenticator, ServiceAccountAuthenticator};

const GMAIL_SEND_URL: &str = "https://gmail.googleapis.com/gmail/v1/users/me/messages/send";
const GMAIL_SEND_SCOPE: &str = "https://www.googleapis.com/auth/gmail.send";

/// サービスアカウント（ドメイン全体の委任）で送信者になりすまして Gmail API から送る
pub struct GmailNotifier {
    client: Client,
    auth: DefaultAuthenticator,
}

impl GmailNotifier {
    pub async fn new(service_account_key: &str, sender: &str) -> AppResult<Self> {
        let key = yup_oauth2::read_service_account_key(service_account_key)
            .await
            .map_err(|e| AppError::NotificationError(e.to_string()))?;
        let auth = ServiceAccountAuthenticator::builder(key)
            .subject(sender)
            .build()
            .await
            .map_err(|e| AppError::NotificationError(e.to_string()))?;
        Ok(Self {
            client: Client::new(),
            auth,
        })
    }

    async fn send(&self, mail: Mail) -> AppResult<()> {
        let token = self
            .auth
            .token(&[GMAIL_SEND_SCOPE])
            .await
            .map_err(|e| AppError::NotificationError(e.to_string()))?;
        let access_token = token
            .token()
            .ok_or_else(|| AppError::NotificationError("empty access token".into()))?;

        let encoded_message = general_purpose::URL_SAFE_NO_PAD.encode(mail.to_rfc5322().as_bytes());

        let res = self
            .client
            .post(GMAIL_SEND_URL)
            .bearer_auth(access_token)
            .json(&serde_json::json!({ "raw": encoded_message }))
            .send()
            .await
            .map_err(|e| AppError::NotificationError(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(AppError::NotificationError(format!(
                "gmail returned {status}: {body}"
            )));
        }

        tracing::info!(to = %mail.to, subject = %mail.subject, "mail sent");
        Ok(())
    }
}

#[async_trait]
impl Notifier for GmailNotifier {
    async fn send_acceptance(
        &self,
        customer: &User,
        reservation: &Reservation,
        venue: &Venue,
    ) -> AppResult<()> {
        self.send(Mail::acceptance(customer, reservation, venue))
            .await
    }

    async fn send_rejection(&self, customer: &User) -> AppResult<()> {
        self.send(Mail::rejection(customer)).await
    }
}
