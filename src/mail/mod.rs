//! Outbound email.
//!
//! Handlers hand an [`OutgoingMail`] to a [`MailTransport`]. The transport is
//! chosen once at startup from `[mail]` config: SMTP when a host is set,
//! otherwise a transport that only logs.

mod memory;
mod recommendation;
mod smtp;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

pub use memory::MemoryTransport;
pub use recommendation::recommendation_mail;
pub use smtp::SmtpTransport;

use crate::config::MailConfig;
use crate::Result;

/// A plain-text message with a single recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Something that can deliver mail.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Deliver one message.
    async fn send(&self, mail: &OutgoingMail) -> Result<()>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Transport that logs messages instead of delivering them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTransport;

#[async_trait]
impl MailTransport for LogTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<()> {
        info!(
            from = %mail.from,
            to = %mail.to,
            subject = %mail.subject,
            "SMTP not configured; mail not delivered"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

/// Build the transport selected by configuration.
pub fn transport_from_config(config: &MailConfig) -> Result<Arc<dyn MailTransport>> {
    if config.smtp_host.trim().is_empty() {
        info!("SMTP host not configured; outbound mail will only be logged");
        return Ok(Arc::new(LogTransport));
    }
    Ok(Arc::new(SmtpTransport::new(config)?))
}
