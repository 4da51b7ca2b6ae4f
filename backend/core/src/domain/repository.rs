// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Domain Repository Interfaces
//!
//! Persistence contracts for each aggregate root: one repository per
//! aggregate, interface defined in the domain layer, implemented in
//! `crate::infrastructure::repositories`.
//!
//! | Trait | Aggregate | Implementations |
//! |-------|-----------|----------------|
//! | `TrainingRepository` | `Training` (+ comments, attachments) | `InMemoryTrainingRepository` |
//! | `TopicRepository` | `Topic` | `InMemoryTopicRepository` |
//! | `EmployeeRepository` | `Employee` | `InMemoryEmployeeRepository` |
//! | `FeedbackRepository` | `Feedback` | `InMemoryFeedbackRepository` |
//!
//! Operations return `Ok(None)` / `Ok(false)` when the addressed entity does
//! not exist; turning that into a typed not-found failure is the service
//! boundary's job.

use async_trait::async_trait;

use crate::domain::attachment::{FileAttachmentInfo, StoredFile};
use crate::domain::caller::UserStamp;
use crate::domain::comment::{Comment, CommentId};
use crate::domain::employee::{Employee, EmployeeGuid, TrainingRole};
use crate::domain::feedback::{Feedback, FeedbackId};
use crate::domain::field::{EmployeeField, TopicField, TrainingField};
use crate::domain::page::{Page, PageRequest};
use crate::domain::topic::{Topic, TopicId};
use crate::domain::training::{LikeType, Training, TrainingId, TrainingRef, TrainingStatus};

/// Issues identifiers per collection.
///
/// Implementations must never hand out the same value twice for one
/// collection, including under concurrent callers, and values must increase.
#[async_trait]
pub trait IdAllocator: Send + Sync {
    async fn next_id(&self, collection: &str) -> Result<i64, RepositoryError>;
}

/// Outcome of a conditional status write
#[derive(Debug, Clone, PartialEq)]
pub enum StatusWrite {
    /// The transition was valid; holds the training as stored afterwards
    Applied(Training),
    /// The transition was refused; holds the status the training kept
    Refused(TrainingStatus),
}

#[async_trait]
pub trait TrainingRepository: Send + Sync {
    /// Insert a new training; fails with `Conflict` if the id is taken
    async fn insert(&self, training: Training) -> Result<Training, RepositoryError>;

    /// Create or replace
    async fn save(&self, training: Training) -> Result<Training, RepositoryError>;

    async fn find_by_id(&self, id: TrainingId) -> Result<Option<Training>, RepositoryError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Training>, RepositoryError>;

    async fn find_all_by_ids(&self, ids: &[TrainingId]) -> Result<Vec<Training>, RepositoryError>;

    async fn find_all(
        &self,
        page: &PageRequest,
        status: Option<TrainingStatus>,
    ) -> Result<Page<Training>, RepositoryError>;

    /// Full-text search over name and description
    async fn search(
        &self,
        term: &str,
        page: &PageRequest,
        status: Option<TrainingStatus>,
    ) -> Result<Page<Training>, RepositoryError>;

    async fn count(&self) -> Result<u64, RepositoryError>;

    async fn delete(&self, id: TrainingId) -> Result<bool, RepositoryError>;

    /// Apply a single-field patch, recording `modified_by`
    async fn update_field(
        &self,
        id: TrainingId,
        field: TrainingField,
        modified_by: &UserStamp,
    ) -> Result<bool, RepositoryError>;

    async fn find_status(&self, id: TrainingId) -> Result<Option<TrainingStatus>, RepositoryError>;

    /// Move to `status` if the current status allows it; `None` if the
    /// training does not exist
    async fn set_status(
        &self,
        id: TrainingId,
        status: TrainingStatus,
    ) -> Result<Option<StatusWrite>, RepositoryError>;

    async fn update_likes(
        &self,
        id: TrainingId,
        like: LikeType,
        user: &UserStamp,
    ) -> Result<Option<Training>, RepositoryError>;

    async fn add_comment(
        &self,
        id: TrainingId,
        comment: Comment,
    ) -> Result<Option<Comment>, RepositoryError>;

    async fn add_comment_reply(
        &self,
        id: TrainingId,
        parent: CommentId,
        reply: Comment,
    ) -> Result<Option<Comment>, RepositoryError>;

    async fn find_comments(&self, id: TrainingId) -> Result<Option<Vec<Comment>>, RepositoryError>;

    async fn remove_comment(&self, id: TrainingId, comment: CommentId) -> Result<bool, RepositoryError>;

    async fn remove_comment_reply(
        &self,
        id: TrainingId,
        comment: CommentId,
        reply: CommentId,
    ) -> Result<bool, RepositoryError>;

    async fn attachment_exists(&self, id: TrainingId, file_name: &str) -> Result<bool, RepositoryError>;

    /// Store the file; `None` if the training does not exist
    async fn attach_file(&self, file: StoredFile) -> Result<Option<FileAttachmentInfo>, RepositoryError>;

    async fn find_attachments(&self, id: TrainingId) -> Result<Vec<FileAttachmentInfo>, RepositoryError>;

    async fn find_attachment(
        &self,
        id: TrainingId,
        file_name: &str,
    ) -> Result<Option<StoredFile>, RepositoryError>;

    async fn remove_attachment(&self, id: TrainingId, file_name: &str) -> Result<bool, RepositoryError>;
}

#[async_trait]
pub trait TopicRepository: Send + Sync {
    async fn insert(&self, topic: Topic) -> Result<Topic, RepositoryError>;

    async fn save(&self, topic: Topic) -> Result<Topic, RepositoryError>;

    async fn find_by_id(&self, id: TopicId) -> Result<Option<Topic>, RepositoryError>;

    async fn find_all(&self, page: &PageRequest) -> Result<Page<Topic>, RepositoryError>;

    async fn search(&self, term: &str, page: &PageRequest) -> Result<Page<Topic>, RepositoryError>;

    async fn count(&self) -> Result<u64, RepositoryError>;

    async fn delete(&self, id: TopicId) -> Result<bool, RepositoryError>;

    async fn update_field(
        &self,
        id: TopicId,
        field: TopicField,
        modified_by: &UserStamp,
    ) -> Result<bool, RepositoryError>;

    /// Link (or re-link) `training` into every listed topic; returns how many matched
    async fn add_training(&self, topics: &[TopicId], training: &TrainingRef) -> Result<usize, RepositoryError>;
}

#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn insert(&self, employee: Employee) -> Result<Employee, RepositoryError>;

    async fn save(&self, employee: Employee) -> Result<Employee, RepositoryError>;

    async fn find_by_guid(&self, guid: &EmployeeGuid) -> Result<Option<Employee>, RepositoryError>;

    async fn find_all(&self, page: &PageRequest) -> Result<Page<Employee>, RepositoryError>;

    async fn search(&self, term: &str, page: &PageRequest) -> Result<Page<Employee>, RepositoryError>;

    async fn delete(&self, guid: &EmployeeGuid) -> Result<bool, RepositoryError>;

    async fn update_field(&self, guid: &EmployeeGuid, field: EmployeeField) -> Result<bool, RepositoryError>;

    /// Record `training` under `role` for each listed employee; returns how many matched
    async fn add_training(
        &self,
        employees: &[EmployeeGuid],
        training: &TrainingRef,
        role: TrainingRole,
    ) -> Result<usize, RepositoryError>;

    /// Rewrite the denormalized training name on every referencing employee
    async fn rename_training(&self, training: &TrainingRef) -> Result<usize, RepositoryError>;
}

#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Insert; fails with `Conflict` if `(parent_id, respondent_guid)` already has feedback
    async fn insert(&self, feedback: Feedback) -> Result<Feedback, RepositoryError>;

    async fn find_by_id(&self, id: FeedbackId) -> Result<Option<Feedback>, RepositoryError>;

    async fn find_all_by_parent(&self, parent: TrainingId) -> Result<Vec<Feedback>, RepositoryError>;

    async fn find_all_by_parent_and_respondent(
        &self,
        parent: TrainingId,
        respondent_guid: &str,
    ) -> Result<Vec<Feedback>, RepositoryError>;

    async fn count_by_parent_and_respondent(
        &self,
        parent: TrainingId,
        respondent_guid: &str,
    ) -> Result<u64, RepositoryError>;
}

/// Repository errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Uniqueness constraint violated: {0}")]
    Conflict(String),

    #[error("Invalid entity: {0}")]
    InvalidEntity(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Serialization(err.to_string())
    }
}
