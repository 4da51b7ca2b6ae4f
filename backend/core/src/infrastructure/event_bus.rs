// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Event Bus Implementation - Pub/Sub for Notifications
//
// In-memory fan-out over a tokio broadcast channel. Publishing never blocks:
// a slow subscriber lags and loses the oldest events instead of holding up
// the service call that produced them.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::application::notifier::Notifier;
use crate::domain::events::NotificationEvent;
use crate::domain::training::TrainingId;

/// Event bus for publishing and subscribing to notifications
#[derive(Clone)]
pub struct EventBus {
    sender: Arc<broadcast::Sender<NotificationEvent>>,
}

impl EventBus {
    /// Create a new event bus buffering up to `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Create event bus with default capacity (1000)
    pub fn with_default_capacity() -> Self {
        Self::new(1000)
    }

    pub fn publish(&self, event: NotificationEvent) {
        debug!(kind = ?event.kind(), "Publishing notification");

        // send() only fails when nobody is subscribed
        let receiver_count = self.sender.send(event).unwrap_or(0);

        if receiver_count == 0 {
            debug!("No subscribers listening to notification");
        }
    }

    pub fn subscribe(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.sender.subscribe(),
        }
    }

    /// Subscribe to notifications about a single training only
    pub fn subscribe_training(&self, training_id: TrainingId) -> TrainingEventReceiver {
        TrainingEventReceiver {
            receiver: self.sender.subscribe(),
            training_id,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Notifier for EventBus {
    fn notify(&self, event: NotificationEvent) {
        self.publish(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

/// Receiver for all notifications
pub struct EventReceiver {
    receiver: broadcast::Receiver<NotificationEvent>,
}

impl EventReceiver {
    /// Receive the next event (waits until one is available)
    pub async fn recv(&mut self) -> Result<NotificationEvent, EventBusError> {
        self.receiver.recv().await.map_err(map_recv_error)
    }

    /// Try to receive an event without waiting
    pub fn try_recv(&mut self) -> Result<NotificationEvent, EventBusError> {
        self.receiver.try_recv().map_err(|e| match e {
            broadcast::error::TryRecvError::Empty => EventBusError::Empty,
            broadcast::error::TryRecvError::Closed => EventBusError::Closed,
            broadcast::error::TryRecvError::Lagged(n) => {
                warn!("Event receiver lagged by {} events", n);
                EventBusError::Lagged(n)
            }
        })
    }

    /// Everything currently buffered, without waiting
    pub fn drain(&mut self) -> Vec<NotificationEvent> {
        let mut events = Vec::new();
        loop {
            match self.try_recv() {
                Ok(event) => events.push(event),
                Err(EventBusError::Lagged(_)) => continue,
                Err(EventBusError::Empty) | Err(EventBusError::Closed) => break,
            }
        }
        events
    }
}

/// Receiver filtered to one training
pub struct TrainingEventReceiver {
    receiver: broadcast::Receiver<NotificationEvent>,
    training_id: TrainingId,
}

impl TrainingEventReceiver {
    pub async fn recv(&mut self) -> Result<NotificationEvent, EventBusError> {
        loop {
            let event = self.receiver.recv().await.map_err(map_recv_error)?;
            if event.training_id() == Some(self.training_id) {
                return Ok(event);
            }
        }
    }
}

fn map_recv_error(e: broadcast::error::RecvError) -> EventBusError {
    match e {
        broadcast::error::RecvError::Closed => EventBusError::Closed,
        broadcast::error::RecvError::Lagged(n) => {
            warn!("Event receiver lagged by {} events", n);
            EventBusError::Lagged(n)
        }
    }
}

/// Errors that can occur when receiving events
#[derive(Debug, thiserror::Error)]
pub enum EventBusError {
    #[error("Event bus is closed")]
    Closed,

    #[error("No events available")]
    Empty,

    #[error("Receiver lagged by {0} events (events were dropped)")]
    Lagged(u64),
}
