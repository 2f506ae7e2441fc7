//! In-memory transport that records messages.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{MailTransport, OutgoingMail};
use crate::{BlogError, Result};

/// Transport that keeps every message it is given.
///
/// Clones share the same outbox. A failing transport rejects every message,
/// which lets callers exercise delivery errors.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    outbox: Arc<Mutex<Vec<OutgoingMail>>>,
    failing: bool,
}

impl MemoryTransport {
    /// Create an empty transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport whose sends always fail.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Messages delivered so far.
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.outbox
            .lock()
            .map(|outbox| outbox.clone())
            .unwrap_or_default()
    }

    /// Number of messages delivered so far.
    pub fn sent_count(&self) -> usize {
        self.outbox.lock().map(|outbox| outbox.len()).unwrap_or(0)
    }
}

#[async_trait]
impl MailTransport for MemoryTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<()> {
        if self.failing {
            return Err(BlogError::Mail("delivery refused".to_string()));
        }
        self.outbox
            .lock()
            .map_err(|_| BlogError::Mail("outbox lock poisoned".to_string()))?
            .push(mail.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
