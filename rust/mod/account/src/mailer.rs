//! Outbound email.
//!
//! The server ships with [`LogMailer`], which writes each message to the
//! log; deployments that relay mail plug in their own [`Mailer`].

use std::sync::Mutex;

use crate::service::AccountError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

pub trait Mailer: Send + Sync {
    fn send(&self, mail: &Mail) -> Result<(), AccountError>;
}

/// Writes mail to the tracing log instead of sending it.
#[derive(Debug, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, mail: &Mail) -> Result<(), AccountError> {
        tracing::info!(to = %mail.to, subject = %mail.subject, "outgoing mail:\n{}", mail.body);
        Ok(())
    }
}

/// Keeps sent mail in memory. Used by tests to read verification links.
#[derive(Debug, Default)]
pub struct MemoryMailer {
    outbox: Mutex<Vec<Mail>>,
}

impl MemoryMailer {
    pub fn sent(&self) -> Vec<Mail> {
        self.outbox.lock().map(|o| o.clone()).unwrap_or_default()
    }

    /// Most recent message addressed to `to`.
    pub fn last_to(&self, to: &str) -> Option<Mail> {
        self.sent().into_iter().rev().find(|m| m.to.eq_ignore_ascii_case(to))
    }
}

impl Mailer for MemoryMailer {
    fn send(&self, mail: &Mail) -> Result<(), AccountError> {
        self.outbox
            .lock()
            .map_err(|e| AccountError::Internal(format!("outbox poisoned: {}", e)))?
            .push(mail.clone());
        Ok(())
    }
}
