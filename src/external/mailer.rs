use crate::config::MailConfig;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use resend_rs::{Resend, types::CreateEmailBaseOptions};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Outbound email. Implementations report failures as errors and never panic,
/// so callers can keep going with other recipients.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> AppResult<()>;
}

#[derive(Clone)]
pub struct ResendMailer {
    config: MailConfig,
}

impl ResendMailer {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        if !self.config.is_configured() {
            return Err(AppError::ConfigError(
                "RESEND_API_KEY/RESEND_FROM not configured".into(),
            ));
        }
        if message.to.trim().is_empty() {
            return Err(AppError::ConfigError("alert recipient not configured".into()));
        }

        let resend = Resend::new(self.config.api_key.trim());
        let email = CreateEmailBaseOptions::new(
            self.config.from.trim().to_string(),
            [message.to.trim().to_string()],
            message.subject.clone(),
        )
        .with_text(&message.body);

        match resend.emails.send(email).await {
            Ok(_) => {
                log::info!("Email sent to {}: {}", message.to, message.subject);
                Ok(())
            }
            Err(e) => {
                log::error!("Email to {} failed to send: {e}", message.to);
                Err(AppError::ExternalApiError(format!("Email sending failed: {e}")))
            }
        }
    }
}
