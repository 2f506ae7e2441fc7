//! SMTP delivery through lettre.

use async_trait::async_trait;
use lettre::message::{header, Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tracing::info;

use super::{MailTransport, OutgoingMail};
use crate::config::MailConfig;
use crate::{BlogError, Result};

/// Transport that relays mail to an SMTP server.
#[derive(Clone)]
pub struct SmtpTransport {
    inner: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpTransport {
    /// Build a relay transport for the configured host.
    pub fn new(config: &MailConfig) -> Result<Self> {
        let builder = if config.use_starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
        }
        .map_err(|e| BlogError::Mail(format!("failed to configure SMTP transport: {}", e)))?
        .port(config.smtp_port);

        let builder = if let (Some(username), Some(password)) =
            (&config.smtp_username, &config.smtp_password)
        {
            builder.credentials(Credentials::new(username.clone(), password.clone()))
        } else {
            builder
        };

        Ok(Self {
            inner: builder.build(),
        })
    }
}

/// Convert an outgoing mail into a lettre message.
fn build_message(mail: &OutgoingMail) -> Result<Message> {
    let from = mail
        .from
        .parse::<Mailbox>()
        .map_err(|e| BlogError::Mail(format!("invalid sender address: {}", e)))?;
    let to = mail
        .to
        .parse::<Mailbox>()
        .map_err(|e| BlogError::Mail(format!("invalid recipient address: {}", e)))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(mail.subject.as_str())
        .header(header::ContentType::TEXT_PLAIN)
        .body(mail.body.clone())
        .map_err(|e| BlogError::Mail(format!("failed to build message: {}", e)))
}

#[async_trait]
impl MailTransport for SmtpTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<()> {
        let message = build_message(mail)?;
        self.inner
            .send(message)
            .await
            .map_err(|e| BlogError::Mail(format!("failed to send mail: {}", e)))?;
        info!(to = %mail.to, subject = %mail.subject, "mail sent");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}
