// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Interception Pipeline
//!
//! Cross-cutting behaviour applied around every service call:
//!
//! - **create**: id allocation, authorship stamping, per-kind defaults and the
//!   feedback duplicate guard run before the store call; one `*Added`
//!   notification is dispatched after it.
//! - **update**: full updates and single-field patches are translated into
//!   notifications.
//! - **read**: absent single-entity results become a typed not-found error;
//!   listings without an explicit sort get the configured fallback order.
//!
//! The plain services know nothing about any of this; the pipelined
//! wrappers in `crate::application::pipelined` call these phases around them.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::application::error::{ServiceError, ServiceResult};
use crate::application::notifier::Notifier;
use crate::domain::caller::Caller;
use crate::domain::comment::CommentId;
use crate::domain::config::{CollectionNames, LunchLearnConfig};
use crate::domain::employee::EmployeeGuid;
use crate::domain::entity::{EntityKind, EntityMut, EntityRef, Resource};
use crate::domain::events::{ChangeEvent, NotificationEvent};
use crate::domain::feedback::FeedbackId;
use crate::domain::page::{PageRequest, SortPolicy};
use crate::domain::repository::{FeedbackRepository, IdAllocator};
use crate::domain::topic::TopicId;
use crate::domain::training::{TrainingId, TrainingStatus};

pub struct InterceptionPipeline {
    allocator: Arc<dyn IdAllocator>,
    feedback: Arc<dyn FeedbackRepository>,
    notifier: Arc<dyn Notifier>,
    collections: CollectionNames,
    sort_policy: SortPolicy,
}

impl InterceptionPipeline {
    pub fn new(
        allocator: Arc<dyn IdAllocator>,
        feedback: Arc<dyn FeedbackRepository>,
        notifier: Arc<dyn Notifier>,
        collections: CollectionNames,
        sort_policy: SortPolicy,
    ) -> Self {
        Self {
            allocator,
            feedback,
            notifier,
            collections,
            sort_policy,
        }
    }

    pub fn from_config(
        config: &LunchLearnConfig,
        allocator: Arc<dyn IdAllocator>,
        feedback: Arc<dyn FeedbackRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self::new(
            allocator,
            feedback,
            notifier,
            config.spec.collections.clone(),
            config.spec.paging.sort_policy(),
        )
    }

    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Prepare an entity for insertion on behalf of `caller`.
    ///
    /// Fails with `DuplicateResource` when the caller already left feedback
    /// on the same training; in that case no id is consumed.
    pub async fn before_create(&self, caller: &Caller, entity: EntityMut<'_>) -> ServiceResult<()> {
        let kind = entity.kind();
        debug!(kind = %kind, caller = %caller.guid, "before_create");

        match entity {
            EntityMut::Training(training) => {
                training.id = Some(TrainingId(self.allocate(kind).await?));
                training.created_by = Some(caller.stamp());
                training.status = TrainingStatus::Nominated;
                training.created_at = Some(Utc::now());
                training.likes_count = 0;
                training.liked_by.clear();
                training.comments.clear();
            }
            EntityMut::Topic(topic) => {
                topic.id = Some(TopicId(self.allocate(kind).await?));
                topic.created_by = Some(caller.stamp());
                topic.trainings.clear();
            }
            EntityMut::Comment(comment) => {
                comment.id = Some(CommentId(self.allocate(kind).await?));
                comment.owner = Some(caller.stamp());
                comment.created_at = Some(Utc::now());
            }
            EntityMut::Feedback(feedback) => {
                let existing = self
                    .feedback
                    .count_by_parent_and_respondent(feedback.parent_id, &caller.guid)
                    .await?;
                if existing > 0 {
                    debug!(training_id = %feedback.parent_id, respondent = %caller.guid, "Rejecting duplicate feedback");
                    return Err(ServiceError::DuplicateResource("Feedback already exist".to_string()));
                }
                feedback.id = Some(FeedbackId(self.allocate(kind).await?));
                feedback.respondent_guid = caller.guid.clone();
                feedback.respondent_name = caller.display_name.clone();
                feedback.submitted_at = Some(Utc::now());
            }
            EntityMut::Employee(employee) => {
                employee.guid = EmployeeGuid::normalized(employee.guid.as_str());
            }
            EntityMut::Attachment(_) => {}
        }
        Ok(())
    }

    /// Dispatch the `*Added` notification for a created entity.
    ///
    /// `training_id` names the owning training for comments.
    pub fn after_create(&self, created: Option<EntityRef<'_>>, training_id: Option<TrainingId>) {
        let Some(created) = created else {
            debug!("after_create: nothing was created");
            return;
        };
        debug!(kind = %created.kind(), "after_create");

        let added_at = Utc::now();
        let event = match created {
            EntityRef::Topic(topic) => NotificationEvent::TopicAdded {
                topic: topic.clone(),
                added_at,
            },
            EntityRef::Training(training) => NotificationEvent::TrainingAdded {
                training: training.clone(),
                added_at,
            },
            EntityRef::Comment(comment) => NotificationEvent::CommentAdded {
                comment: comment.clone(),
                training_id,
                added_at,
            },
            EntityRef::Feedback(feedback) => NotificationEvent::FeedbackAdded {
                feedback: feedback.clone(),
                added_at,
            },
            EntityRef::Employee(employee) => NotificationEvent::EmployeeAdded {
                employee: employee.clone(),
                added_at,
            },
            EntityRef::Attachment(attachment) => NotificationEvent::AttachmentAdded {
                attachment: attachment.clone(),
                added_at,
            },
        };
        self.notifier.notify(event);
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    pub fn after_update(&self, updated: Option<EntityRef<'_>>) {
        let Some(updated) = updated else {
            debug!("after_update: nothing was updated");
            return;
        };
        debug!(kind = %updated.kind(), "after_update");

        let updated_at = Utc::now();
        let event = match updated {
            EntityRef::Topic(topic) => {
                let Some(topic_id) = topic.id else {
                    warn!(name = %topic.name, "Updated topic has no id, skipping notification");
                    return;
                };
                NotificationEvent::TopicUpdated {
                    topic_id,
                    topic: Some(topic.clone()),
                    updated_at,
                }
            }
            EntityRef::Training(training) => NotificationEvent::TrainingUpdated {
                training: training.clone(),
                updated_at,
            },
            EntityRef::Employee(employee) => NotificationEvent::EmployeeUpdated {
                guid: employee.guid.clone(),
                employee: Some(employee.clone()),
                updated_at,
            },
            EntityRef::Comment(_) | EntityRef::Feedback(_) | EntityRef::Attachment(_) => return,
        };
        self.notifier.notify(event);
    }

    pub fn after_update_field(&self, change: Option<&ChangeEvent>) {
        let Some(change) = change else {
            debug!("after_update_field: patch was not applied");
            return;
        };
        debug!(change = ?change, "after_update_field");

        let now = Utc::now();
        let event = match change {
            ChangeEvent::TopicUpdated { topic_id, .. } => NotificationEvent::TopicUpdated {
                topic_id: *topic_id,
                topic: None,
                updated_at: now,
            },
            ChangeEvent::EmployeeUpdated { guid, .. } => NotificationEvent::EmployeeUpdated {
                guid: guid.clone(),
                employee: None,
                updated_at: now,
            },
            ChangeEvent::TrainingStatusChanged {
                training_id,
                to: TrainingStatus::Scheduled,
                ..
            } => NotificationEvent::TrainingScheduled {
                training_id: *training_id,
                scheduled_at: now,
            },
            ChangeEvent::TrainingStatusChanged { training_id, to, .. } if to.is_called_off() => {
                NotificationEvent::TrainingCancelled {
                    training_id: *training_id,
                    status: *to,
                    cancelled_at: now,
                }
            }
            ChangeEvent::TrainingStatusChanged { .. } | ChangeEvent::TrainingFieldUpdated { .. } => {
                return
            }
        };
        self.notifier.notify(event);
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Turn an absent single-entity read into `ResourceNotFound`.
    pub fn require<T: Resource>(&self, found: Option<T>) -> ServiceResult<T> {
        match found {
            Some(value) => Ok(value),
            None => {
                let kind = T::KIND;
                debug!(kind = %kind, "Read returned nothing");
                Err(ServiceError::not_found(kind))
            }
        }
    }

    /// Same as [`require`](Self::require) for reads whose result is not the
    /// entity itself (collections hanging off a training, for instance).
    pub fn require_parent<T>(&self, kind: EntityKind, found: Option<T>) -> ServiceResult<T> {
        found.ok_or_else(|| {
            debug!(kind = %kind, "Parent of read does not exist");
            ServiceError::not_found(kind)
        })
    }

    /// Fill in the fallback sort for listings and searches.
    ///
    /// A non-empty term ranks by relevance; everything else uses the default
    /// order. An explicit sort on the request is kept as is.
    pub fn apply_default_sort(&self, term: Option<&str>, mut page: PageRequest) -> PageRequest {
        if page.sort.is_some() {
            return page;
        }
        let sort = match term {
            Some(term) if !term.is_empty() => self.sort_policy.score.clone(),
            _ => self.sort_policy.default.clone(),
        };
        debug!(?term, sort = ?sort, "Applying fallback sort");
        page.sort = Some(sort);
        page
    }

    async fn allocate(&self, kind: EntityKind) -> ServiceResult<i64> {
        let Some(scope) = self.collections.allocation_scope(kind) else {
            return Err(ServiceError::InvalidOperation(format!(
                "{} ids are not allocated",
                kind
            )));
        };
        let id = self.allocator.next_id(scope).await?;
        debug!(collection = scope, id, "Allocated id");
        Ok(id)
    }
}
