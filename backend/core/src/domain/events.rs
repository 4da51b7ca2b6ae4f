// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::attachment::FileAttachmentInfo;
use crate::domain::comment::Comment;
use crate::domain::employee::{Employee, EmployeeGuid};
use crate::domain::feedback::Feedback;
use crate::domain::topic::{Topic, TopicId};
use crate::domain::training::{Training, TrainingId, TrainingStatus};

/// What a single-field patch actually changed.
///
/// Returned by every `update_field` so that notification logic can match on
/// the change itself rather than on which service produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeEvent {
    TopicUpdated {
        topic_id: TopicId,
        field: String,
    },
    EmployeeUpdated {
        guid: EmployeeGuid,
        field: String,
    },
    TrainingFieldUpdated {
        training_id: TrainingId,
        field: String,
    },
    TrainingStatusChanged {
        training_id: TrainingId,
        from: TrainingStatus,
        to: TrainingStatus,
    },
}

/// Notifications handed to the dispatcher after a successful operation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationEvent {
    TopicAdded {
        topic: Topic,
        added_at: DateTime<Utc>,
    },
    TrainingAdded {
        training: Training,
        added_at: DateTime<Utc>,
    },
    CommentAdded {
        comment: Comment,
        training_id: Option<TrainingId>,
        added_at: DateTime<Utc>,
    },
    FeedbackAdded {
        feedback: Feedback,
        added_at: DateTime<Utc>,
    },
    EmployeeAdded {
        employee: Employee,
        added_at: DateTime<Utc>,
    },
    AttachmentAdded {
        attachment: FileAttachmentInfo,
        added_at: DateTime<Utc>,
    },
    TopicUpdated {
        topic_id: TopicId,
        topic: Option<Topic>,
        updated_at: DateTime<Utc>,
    },
    TrainingUpdated {
        training: Training,
        updated_at: DateTime<Utc>,
    },
    EmployeeUpdated {
        guid: EmployeeGuid,
        employee: Option<Employee>,
        updated_at: DateTime<Utc>,
    },
    TrainingScheduled {
        training_id: TrainingId,
        scheduled_at: DateTime<Utc>,
    },
    TrainingCancelled {
        training_id: TrainingId,
        status: TrainingStatus,
        cancelled_at: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    TopicAdded,
    TrainingAdded,
    CommentAdded,
    FeedbackAdded,
    EmployeeAdded,
    AttachmentAdded,
    TopicUpdated,
    TrainingUpdated,
    EmployeeUpdated,
    TrainingScheduled,
    TrainingCancelled,
}

impl NotificationEvent {
    pub fn kind(&self) -> NotificationKind {
        match self {
            Self::TopicAdded { .. } => NotificationKind::TopicAdded,
            Self::TrainingAdded { .. } => NotificationKind::TrainingAdded,
            Self::CommentAdded { .. } => NotificationKind::CommentAdded,
            Self::FeedbackAdded { .. } => NotificationKind::FeedbackAdded,
            Self::EmployeeAdded { .. } => NotificationKind::EmployeeAdded,
            Self::AttachmentAdded { .. } => NotificationKind::AttachmentAdded,
            Self::TopicUpdated { .. } => NotificationKind::TopicUpdated,
            Self::TrainingUpdated { .. } => NotificationKind::TrainingUpdated,
            Self::EmployeeUpdated { .. } => NotificationKind::EmployeeUpdated,
            Self::TrainingScheduled { .. } => NotificationKind::TrainingScheduled,
            Self::TrainingCancelled { .. } => NotificationKind::TrainingCancelled,
        }
    }

    /// Training this notification concerns, if any
    pub fn training_id(&self) -> Option<TrainingId> {
        match self {
            Self::TrainingAdded { training, .. } | Self::TrainingUpdated { training, .. } => {
                training.id
            }
            Self::CommentAdded { training_id, .. } => *training_id,
            Self::FeedbackAdded { feedback, .. } => Some(feedback.parent_id),
            Self::AttachmentAdded { attachment, .. } => Some(attachment.training_id),
            Self::TrainingScheduled { training_id, .. }
            | Self::TrainingCancelled { training_id, .. } => Some(*training_id),
            Self::TopicAdded { .. }
            | Self::EmployeeAdded { .. }
            | Self::TopicUpdated { .. }
            | Self::EmployeeUpdated { .. } => None,
        }
    }
}
