// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::events::NotificationEvent;

/// Fire-and-forget sink for notifications.
///
/// `notify` must not block and must not fail the calling operation;
/// implementations log delivery problems instead of returning them.
pub trait Notifier: Send + Sync {
    fn notify(&self, event: NotificationEvent);
}

/// Swallows everything; wired in when notifications are disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledNotifier;

impl Notifier for DisabledNotifier {
    fn notify(&self, event: NotificationEvent) {
        tracing::trace!(kind = ?event.kind(), "Notifications disabled, dropping event");
    }
}
