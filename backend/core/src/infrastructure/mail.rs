// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Outbound mail transports.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Message has no recipients")]
    NoRecipients,

    #[error("Transport failure: {0}")]
    Transport(String),
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn deliver(&self, message: &MailMessage) -> Result<(), MailError>;
}

/// Writes messages to the log instead of sending them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingMailTransport;

#[async_trait]
impl MailTransport for LoggingMailTransport {
    async fn deliver(&self, message: &MailMessage) -> Result<(), MailError> {
        if message.to.is_empty() {
            return Err(MailError::NoRecipients);
        }
        info!(
            from = %message.from,
            to = ?message.to,
            subject = %message.subject,
            "Mail delivered to log"
        );
        Ok(())
    }
}

/// Keeps delivered messages in memory
#[derive(Debug, Default, Clone)]
pub struct InMemoryMailTransport {
    outbox: Arc<Mutex<Vec<MailMessage>>>,
}

impl InMemoryMailTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delivered(&self) -> Vec<MailMessage> {
        self.outbox.lock().clone()
    }
}

#[async_trait]
impl MailTransport for InMemoryMailTransport {
    async fn deliver(&self, message: &MailMessage) -> Result<(), MailError> {
        if message.to.is_empty() {
            return Err(MailError::NoRecipients);
        }
        self.outbox.lock().push(message.clone());
        Ok(())
    }
}
