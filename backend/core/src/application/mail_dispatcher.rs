// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Mail Dispatcher Application Service
//!
//! Subscribes to notifications on the event bus, turns each one into a mail
//! message addressed to the people the notification concerns, and hands it
//! to a `MailTransport`.
//!
//! - Trainers and trainees are resolved from the stored training at the time
//!   the notification is processed.
//! - Topic and employee notifications go to the configured admin recipients.
//! - Delivery failures are logged and counted; they never stop the task.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::domain::config::MailConfig;
use crate::domain::events::NotificationEvent;
use crate::domain::repository::{RepositoryError, TrainingRepository};
use crate::domain::training::{Training, TrainingId};
use crate::infrastructure::event_bus::{EventBus, EventBusError};
use crate::infrastructure::mail::{MailMessage, MailTransport};

/// Background service that mails out notifications
pub struct MailDispatcher {
    transport: Arc<dyn MailTransport>,
    trainings: Arc<dyn TrainingRepository>,
    config: MailConfig,
}

/// Who a notification about a training is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Audience {
    Trainers,
    Trainees,
    Everyone,
}

impl MailDispatcher {
    pub fn new(
        transport: Arc<dyn MailTransport>,
        trainings: Arc<dyn TrainingRepository>,
        config: MailConfig,
    ) -> Self {
        Self {
            transport,
            trainings,
            config,
        }
    }

    /// Start the background dispatch task.
    ///
    /// Subscribes before spawning, so nothing published after `start`
    /// returns is missed. Runs until every handle to the bus is dropped.
    pub fn start(self: Arc<Self>, event_bus: &EventBus) -> JoinHandle<()> {
        info!("Starting mail dispatcher background task");

        let mut receiver = event_bus.subscribe();

        tokio::spawn(async move {
            let mut delivered = 0u64;
            let mut failures = 0u64;

            loop {
                match receiver.recv().await {
                    Ok(event) => match self.dispatch(&event).await {
                        Ok(true) => delivered += 1,
                        Ok(false) => {}
                        Err(e) => {
                            failures += 1;
                            error!(kind = ?event.kind(), error = %e, "Failed to mail notification");
                            if failures % 10 == 0 {
                                warn!("Mail dispatch has failed {} times", failures);
                            }
                        }
                    },
                    Err(EventBusError::Closed) => {
                        info!(
                            "Event bus closed, shutting down mail dispatcher \
                             ({} delivered, {} failures)",
                            delivered, failures
                        );
                        break;
                    }
                    Err(EventBusError::Lagged(n)) => {
                        warn!("Mail dispatcher lagged by {} notifications, they will not be mailed", n);
                    }
                    Err(e) => {
                        error!(error = ?e, "Unexpected error receiving notification");
                    }
                }
            }
        })
    }

    /// Compose and deliver the mail for one notification.
    ///
    /// Returns `Ok(false)` when there is nobody to address it to.
    pub async fn dispatch(&self, event: &NotificationEvent) -> anyhow::Result<bool> {
        let Some(message) = self.compose(event).await? else {
            debug!(kind = ?event.kind(), "No recipients for notification");
            return Ok(false);
        };
        self.transport.deliver(&message).await?;
        Ok(true)
    }

    pub async fn compose(&self, event: &NotificationEvent) -> Result<Option<MailMessage>, RepositoryError> {
        let (subject, body, to) = match event {
            NotificationEvent::TrainingAdded { training, .. } => (
                format!("New training nominated: {}", training.name),
                describe(training),
                self.training_audience(training, Audience::Everyone),
            ),
            NotificationEvent::TrainingUpdated { training, .. } => (
                format!("Training updated: {}", training.name),
                describe(training),
                self.training_audience(training, Audience::Everyone),
            ),
            NotificationEvent::TrainingScheduled { training_id, .. } => {
                let Some(training) = self.find_training(*training_id).await? else {
                    return Ok(None);
                };
                let when = training
                    .scheduled_on
                    .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
                    .unwrap_or_else(|| "a date to be announced".to_string());
                (
                    format!("Training scheduled: {}", training.name),
                    format!("{} is scheduled for {}.\n\n{}", training.name, when, describe(&training)),
                    self.training_audience(&training, Audience::Everyone),
                )
            }
            NotificationEvent::TrainingCancelled { training_id, status, .. } => {
                let Some(training) = self.find_training(*training_id).await? else {
                    return Ok(None);
                };
                let verb = status.as_str().to_lowercase();
                (
                    format!("Training {}: {}", verb, training.name),
                    format!("{} has been {}.", training.name, verb),
                    self.training_audience(&training, Audience::Everyone),
                )
            }
            NotificationEvent::CommentAdded {
                comment,
                training_id: Some(training_id),
                ..
            } => {
                let Some(training) = self.find_training(*training_id).await? else {
                    return Ok(None);
                };
                let author = comment
                    .owner
                    .as_ref()
                    .map_or("Someone", |owner| owner.name.as_str());
                (
                    format!("New comment on {}", training.name),
                    format!("{} wrote:\n\n{}", author, comment.text),
                    self.training_audience(&training, Audience::Trainers),
                )
            }
            NotificationEvent::CommentAdded { training_id: None, .. } => return Ok(None),
            NotificationEvent::FeedbackAdded { feedback, .. } => {
                let Some(training) = self.find_training(feedback.parent_id).await? else {
                    return Ok(None);
                };
                let answers: Vec<String> = feedback
                    .answers
                    .iter()
                    .map(|(question, answer)| format!("{}: {}", question, answer))
                    .collect();
                (
                    format!("New feedback on {}", training.name),
                    format!("From {}\n\n{}", feedback.respondent_name, answers.join("\n")),
                    self.training_audience(&training, Audience::Trainers),
                )
            }
            NotificationEvent::AttachmentAdded { attachment, .. } => {
                let Some(training) = self.find_training(attachment.training_id).await? else {
                    return Ok(None);
                };
                (
                    format!("New material for {}", training.name),
                    format!(
                        "{} ({} bytes) was attached to {}.",
                        attachment.file_name, attachment.size_bytes, training.name
                    ),
                    self.training_audience(&training, Audience::Trainees),
                )
            }
            NotificationEvent::TopicAdded { topic, .. } => (
                format!("New topic: {}", topic.name),
                topic.description.clone().unwrap_or_default(),
                self.config.admin_recipients.clone(),
            ),
            NotificationEvent::TopicUpdated { topic_id, .. } => (
                format!("Topic {} updated", topic_id),
                String::new(),
                self.config.admin_recipients.clone(),
            ),
            NotificationEvent::EmployeeAdded { employee, .. } => (
                format!("New employee: {}", employee.name),
                format!("{} ({})", employee.name, employee.guid),
                self.config.admin_recipients.clone(),
            ),
            NotificationEvent::EmployeeUpdated { guid, .. } => (
                format!("Employee {} updated", guid),
                String::new(),
                self.config.admin_recipients.clone(),
            ),
        };

        if to.is_empty() {
            return Ok(None);
        }
        Ok(Some(MailMessage {
            from: self.config.from.clone(),
            to,
            subject: format!("{} {}", self.config.subject_prefix, subject),
            body,
        }))
    }

    async fn find_training(&self, id: TrainingId) -> Result<Option<Training>, RepositoryError> {
        let training = self.trainings.find_by_id(id).await?;
        if training.is_none() {
            debug!(training_id = %id, "Training gone before its notification was mailed");
        }
        Ok(training)
    }

    fn training_audience(&self, training: &Training, audience: Audience) -> Vec<String> {
        let mut guids: Vec<&String> = Vec::new();
        if audience != Audience::Trainees {
            guids.extend(training.trainers.keys());
        }
        if audience != Audience::Trainers {
            guids.extend(training.trainees.keys());
        }
        let addresses: BTreeSet<String> = guids
            .into_iter()
            .filter_map(|guid| self.address_of(guid))
            .collect();
        addresses.into_iter().collect()
    }

    /// Mail address for an employee guid; guids that already are addresses pass through
    fn address_of(&self, guid: &str) -> Option<String> {
        let guid = guid.trim();
        if guid.is_empty() {
            return None;
        }
        if guid.contains('@') {
            return Some(guid.to_lowercase());
        }
        self.config
            .recipient_domain
            .as_ref()
            .map(|domain| format!("{}@{}", guid.to_lowercase(), domain))
    }
}

fn describe(training: &Training) -> String {
    let trainers: Vec<&str> = training.trainers.values().map(String::as_str).collect();
    let mut body = format!("Training: {}\nStatus: {}", training.name, training.status.as_str());
    if !trainers.is_empty() {
        body.push_str(&format!("\nTrainers: {}", trainers.join(", ")));
    }
    if let Some(description) = &training.description {
        body.push_str(&format!("\n\n{}", description));
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::topic::Topic;
    use crate::domain::training::TrainingStatus;
    use crate::infrastructure::mail::InMemoryMailTransport;
    use crate::infrastructure::repositories::InMemoryTrainingRepository;
    use chrono::Utc;
    use std::time::Duration;

    fn mail_config() -> MailConfig {
        MailConfig {
            admin_recipients: vec!["admin@example.com".to_string()],
            recipient_domain: Some("example.com".to_string()),
            ..MailConfig::default()
        }
    }

    async fn seeded_repository() -> Arc<InMemoryTrainingRepository> {
        let repository = Arc::new(InMemoryTrainingRepository::new());
        let mut training = Training::new("Async Rust")
            .with_trainer("T1", "Tess")
            .with_trainee("E1", "Eve")
            .with_trainee("ann@corp.test", "Ann");
        training.id = Some(TrainingId(1));
        repository.insert(training).await.unwrap();
        repository
    }

    fn dispatcher(
        transport: Arc<InMemoryMailTransport>,
        trainings: Arc<InMemoryTrainingRepository>,
    ) -> MailDispatcher {
        MailDispatcher::new(transport, trainings, mail_config())
    }

    #[tokio::test]
    async fn test_cancellation_goes_to_trainers_and_trainees() {
        let dispatcher = dispatcher(
            Arc::new(InMemoryMailTransport::new()),
            seeded_repository().await,
        );

        let message = dispatcher
            .compose(&NotificationEvent::TrainingCancelled {
                training_id: TrainingId(1),
                status: TrainingStatus::Postponed,
                cancelled_at: Utc::now(),
            })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(
            message.to,
            vec!["ann@corp.test", "e1@example.com", "t1@example.com"]
        );
        assert!(message.subject.starts_with("[Lunch & Learn]"));
        assert!(message.subject.contains("postponed"));
    }

    #[tokio::test]
    async fn test_missing_training_composes_nothing() {
        let dispatcher = dispatcher(
            Arc::new(InMemoryMailTransport::new()),
            seeded_repository().await,
        );

        let message = dispatcher
            .compose(&NotificationEvent::TrainingScheduled {
                training_id: TrainingId(99),
                scheduled_at: Utc::now(),
            })
            .await
            .unwrap();
        assert!(message.is_none());
    }

    #[tokio::test]
    async fn test_background_task_delivers_and_stops_on_close() {
        let transport = Arc::new(InMemoryMailTransport::new());
        let event_bus = EventBus::new(8);
        let handle = Arc::new(dispatcher(transport.clone(), seeded_repository().await))
            .start(&event_bus);

        event_bus.publish(NotificationEvent::TopicAdded {
            topic: Topic::new("Systems"),
            added_at: Utc::now(),
        });

        for _ in 0..50 {
            if !transport.delivered().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        let delivered = transport.delivered();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].to, vec!["admin@example.com"]);

        // Dropping the last sender closes the channel
        drop(event_bus);
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
