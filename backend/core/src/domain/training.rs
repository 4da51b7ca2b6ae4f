// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Training Aggregate
//!
//! A training is a scheduled knowledge-sharing session. Its lifecycle is
//! governed by [`TrainingStatus`]:
//!
//! ```text
//! NOMINATED ──► SCHEDULED ──► COMPLETED (terminal)
//!     │  ▲          │  ▲
//!     │  └──────┐   ▼  │
//!     └──► CANCELLED ◄─► POSTPONED
//! ```
//!
//! Every non-terminal state may move to `COMPLETED`, `CANCELLED` or
//! `POSTPONED`; only `NOMINATED`, `CANCELLED` and `POSTPONED` may move to
//! `SCHEDULED`. Self-transitions are never valid.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::attachment::FileAttachmentInfo;
use crate::domain::caller::UserStamp;
use crate::domain::comment::Comment;
use crate::domain::topic::TopicId;

// ============================================================================
// Value Objects
// ============================================================================

/// Allocator-issued training identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TrainingId(pub i64);

impl fmt::Display for TrainingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrainingStatus {
    Nominated,
    Scheduled,
    Completed,
    Cancelled,
    Postponed,
}

impl TrainingStatus {
    pub const ALL: [TrainingStatus; 5] = [
        Self::Nominated,
        Self::Scheduled,
        Self::Completed,
        Self::Cancelled,
        Self::Postponed,
    ];

    /// Whether a training currently in `self` may be moved to `target`.
    pub fn can_transition_to(self, target: TrainingStatus) -> bool {
        if self == target {
            return false;
        }
        if self == Self::Completed {
            return false;
        }
        if target == Self::Scheduled
            && !matches!(self, Self::Cancelled | Self::Postponed | Self::Nominated)
        {
            return false;
        }
        true
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Completed
    }

    /// Cancelled and postponed trainings are announced the same way.
    pub fn is_called_off(self) -> bool {
        matches!(self, Self::Cancelled | Self::Postponed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nominated => "NOMINATED",
            Self::Scheduled => "SCHEDULED",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::Postponed => "POSTPONED",
        }
    }
}

impl Default for TrainingStatus {
    fn default() -> Self {
        Self::Nominated
    }
}

impl fmt::Display for TrainingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrainingStatus {
    type Err = TrainingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NOMINATED" => Ok(Self::Nominated),
            "SCHEDULED" => Ok(Self::Scheduled),
            "COMPLETED" => Ok(Self::Completed),
            "CANCELLED" => Ok(Self::Cancelled),
            "POSTPONED" => Ok(Self::Postponed),
            _ => Err(TrainingError::UnknownStatus(s.to_string())),
        }
    }
}

/// Pure transition check used by the field-patch path.
pub fn is_valid_transition(from: TrainingStatus, to: TrainingStatus) -> bool {
    from.can_transition_to(to)
}

/// Like / unlike toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeType {
    Like,
    Unlike,
}

impl FromStr for LikeType {
    type Err = TrainingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "like" => Ok(Self::Like),
            "unlike" | "dislike" => Ok(Self::Unlike),
            _ => Err(TrainingError::UnknownLikeType(s.to_string())),
        }
    }
}

/// Denormalized `(id, name)` pair stored on topics and employees
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingRef {
    pub id: TrainingId,
    pub name: String,
}

// ============================================================================
// Aggregate
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Training {
    /// Assigned on creation; `None` until then
    pub id: Option<TrainingId>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TrainingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_on: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserStamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<UserStamp>,
    pub likes_count: u32,
    /// guid -> display name
    #[serde(default)]
    pub liked_by: BTreeMap<String, String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub topics: BTreeMap<TopicId, String>,
    #[serde(default)]
    pub trainers: BTreeMap<String, String>,
    #[serde(default)]
    pub trainees: BTreeMap<String, String>,
    #[serde(default)]
    pub attachments: Vec<FileAttachmentInfo>,
}

impl Training {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_topic(mut self, topic_id: TopicId, name: impl Into<String>) -> Self {
        self.topics.insert(topic_id, name.into());
        self
    }

    pub fn with_trainer(mut self, guid: impl Into<String>, name: impl Into<String>) -> Self {
        self.trainers.insert(guid.into(), name.into());
        self
    }

    pub fn with_trainee(mut self, guid: impl Into<String>, name: impl Into<String>) -> Self {
        self.trainees.insert(guid.into(), name.into());
        self
    }

    /// Reference to this training, if it has been assigned an id
    pub fn as_ref_entry(&self) -> Option<TrainingRef> {
        self.id.map(|id| TrainingRef {
            id,
            name: self.name.clone(),
        })
    }

    /// Apply a like or unlike from `guid`. Repeated likes are idempotent.
    pub fn apply_like(&mut self, like: LikeType, guid: &str, name: &str) {
        match like {
            LikeType::Like => {
                self.liked_by.insert(guid.to_string(), name.to_string());
            }
            LikeType::Unlike => {
                self.liked_by.remove(guid);
            }
        }
        self.likes_count = self.liked_by.len() as u32;
    }
}

// ============================================================================
// Domain Errors
// ============================================================================

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrainingError {
    #[error("Unknown training status: {0}")]
    UnknownStatus(String),

    #[error("Unknown like type: {0}")]
    UnknownLikeType(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use TrainingStatus::*;

    #[test]
    fn test_completed_is_terminal() {
        for target in TrainingStatus::ALL {
            assert!(!is_valid_transition(Completed, target), "COMPLETED -> {}", target);
        }
        assert!(Completed.is_terminal());
    }

    #[test]
    fn test_self_transitions_rejected() {
        for status in TrainingStatus::ALL {
            assert!(!is_valid_transition(status, status));
        }
    }

    #[test]
    fn test_scheduled_only_reachable_from_open_states() {
        for from in TrainingStatus::ALL {
            let expected = matches!(from, Cancelled | Postponed | Nominated);
            assert_eq!(is_valid_transition(from, Scheduled), expected, "{} -> SCHEDULED", from);
        }
    }

    #[test]
    fn test_nominated_can_go_anywhere_else() {
        for to in [Scheduled, Completed, Cancelled, Postponed] {
            assert!(is_valid_transition(Nominated, to));
        }
    }

    #[test]
    fn test_scheduled_transitions() {
        assert!(is_valid_transition(Scheduled, Completed));
        assert!(is_valid_transition(Scheduled, Cancelled));
        assert!(is_valid_transition(Scheduled, Postponed));
        assert!(!is_valid_transition(Scheduled, Scheduled));
        // Rules only constrain moves into SCHEDULED; re-nominating is allowed.
        assert!(is_valid_transition(Scheduled, Nominated));
    }

    #[test]
    fn test_called_off_states_swap() {
        assert!(is_valid_transition(Cancelled, Postponed));
        assert!(is_valid_transition(Postponed, Cancelled));
        assert!(is_valid_transition(Cancelled, Completed));
        assert!(is_valid_transition(Postponed, Scheduled));
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("scheduled".parse::<TrainingStatus>().unwrap(), Scheduled);
        assert_eq!(" POSTPONED ".parse::<TrainingStatus>().unwrap(), Postponed);
        assert_eq!(
            "DONE".parse::<TrainingStatus>().unwrap_err(),
            TrainingError::UnknownStatus("DONE".to_string())
        );
    }

    #[test]
    fn test_status_serializes_upper_case() {
        let json = serde_json::to_string(&Cancelled).unwrap();
        assert_eq!(json, "\"CANCELLED\"");
    }

    #[test]
    fn test_likes_are_counted_per_user() {
        let mut training = Training::new("Rust ownership");
        training.apply_like(LikeType::Like, "G1", "Ann");
        training.apply_like(LikeType::Like, "G1", "Ann");
        training.apply_like(LikeType::Like, "G2", "Bob");
        assert_eq!(training.likes_count, 2);

        training.apply_like(LikeType::Unlike, "G1", "Ann");
        assert_eq!(training.likes_count, 1);
        assert!(training.liked_by.contains_key("G2"));
    }
}
