// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Pipelined Services
//!
//! Public entry points. Each wrapper runs the [`InterceptionPipeline`] phases
//! around its plain service:
//!
//! | Call shape | Before | After |
//! |------------|--------|-------|
//! | `add*` | `before_create` | `after_create` |
//! | `update` | | `after_update`, then not-found check |
//! | `update_field` | | `after_update_field` |
//! | single-entity reads | | `require` |
//! | `get_all` / `search` | `apply_default_sort` | |

use std::collections::BTreeMap;
use std::sync::Arc;

use bytes::Bytes;

use crate::application::attachment::AttachmentService;
use crate::application::comment::CommentService;
use crate::application::employee::EmployeeService;
use crate::application::error::ServiceResult;
use crate::application::feedback::FeedbackService;
use crate::application::pipeline::InterceptionPipeline;
use crate::application::topic::TopicService;
use crate::application::training::TrainingService;
use crate::domain::attachment::{FileAttachmentInfo, StoredFile};
use crate::domain::caller::Caller;
use crate::domain::comment::{Comment, CommentId};
use crate::domain::employee::{Employee, TrainingRole};
use crate::domain::entity::{DomainEntity, EntityKind};
use crate::domain::events::ChangeEvent;
use crate::domain::feedback::{Feedback, FeedbackId};
use crate::domain::field::FieldEntry;
use crate::domain::page::{Page, PageRequest};
use crate::domain::topic::{Topic, TopicId};
use crate::domain::training::{LikeType, Training, TrainingId, TrainingRef, TrainingStatus};

// ============================================================================
// Training
// ============================================================================

pub struct PipelinedTrainingService {
    inner: Arc<dyn TrainingService>,
    pipeline: Arc<InterceptionPipeline>,
}

impl PipelinedTrainingService {
    pub fn new(inner: Arc<dyn TrainingService>, pipeline: Arc<InterceptionPipeline>) -> Self {
        Self { inner, pipeline }
    }

    pub async fn add(&self, caller: &Caller, mut training: Training) -> ServiceResult<Training> {
        self.pipeline
            .before_create(caller, training.as_entity_mut())
            .await?;
        let created = self.inner.add(caller, training).await?;
        self.pipeline.after_create(Some(created.as_entity()), None);
        Ok(created)
    }

    pub async fn update(&self, caller: &Caller, training: Training) -> ServiceResult<Training> {
        let updated = self.inner.update(caller, training).await?;
        self.pipeline.after_update(updated.as_ref().map(DomainEntity::as_entity));
        self.pipeline.require(updated)
    }

    pub async fn update_field(
        &self,
        caller: &Caller,
        id: TrainingId,
        entry: FieldEntry,
    ) -> ServiceResult<Option<ChangeEvent>> {
        let change = self.inner.update_field(caller, id, entry).await?;
        self.pipeline.after_update_field(change.as_ref());
        Ok(change)
    }

    pub async fn get_training(&self, caller: &Caller, id: TrainingId) -> ServiceResult<Training> {
        self.pipeline.require(self.inner.get_training(caller, id).await?)
    }

    pub async fn get_training_by_name(&self, caller: &Caller, name: &str) -> ServiceResult<Training> {
        self.pipeline
            .require(self.inner.get_training_by_name(caller, name).await?)
    }

    pub async fn get_all(
        &self,
        caller: &Caller,
        page: PageRequest,
        status: Option<TrainingStatus>,
    ) -> ServiceResult<Page<Training>> {
        let page = self.pipeline.apply_default_sort(None, page);
        self.inner.get_all(caller, page, status).await
    }

    pub async fn search(
        &self,
        caller: &Caller,
        term: &str,
        page: PageRequest,
        status: Option<TrainingStatus>,
    ) -> ServiceResult<Page<Training>> {
        let page = self.pipeline.apply_default_sort(Some(term), page);
        self.inner.search(caller, term, page, status).await
    }

    pub async fn get_all_by_ids(&self, caller: &Caller, ids: &[TrainingId]) -> ServiceResult<Vec<Training>> {
        self.inner.get_all_by_ids(caller, ids).await
    }

    pub async fn count(&self, caller: &Caller) -> ServiceResult<u64> {
        self.inner.count(caller).await
    }

    pub async fn delete(&self, caller: &Caller, id: TrainingId) -> ServiceResult<bool> {
        self.inner.delete(caller, id).await
    }

    pub async fn update_likes(&self, caller: &Caller, id: TrainingId, like: LikeType) -> ServiceResult<Training> {
        self.pipeline
            .require(self.inner.update_likes(caller, id, like).await?)
    }

    pub async fn get_topics(&self, caller: &Caller, id: TrainingId) -> ServiceResult<BTreeMap<TopicId, String>> {
        self.pipeline
            .require_parent(EntityKind::Training, self.inner.get_topics(caller, id).await?)
    }

    pub async fn get_trainees(&self, caller: &Caller, id: TrainingId) -> ServiceResult<BTreeMap<String, String>> {
        self.pipeline
            .require_parent(EntityKind::Training, self.inner.get_trainees(caller, id).await?)
    }

    pub async fn set_training_status(
        &self,
        caller: &Caller,
        id: TrainingId,
        status: TrainingStatus,
    ) -> ServiceResult<Training> {
        self.pipeline
            .require(self.inner.set_training_status(caller, id, status).await?)
    }
}

// ============================================================================
// Topic
// ============================================================================

pub struct PipelinedTopicService {
    inner: Arc<dyn TopicService>,
    pipeline: Arc<InterceptionPipeline>,
}

impl PipelinedTopicService {
    pub fn new(inner: Arc<dyn TopicService>, pipeline: Arc<InterceptionPipeline>) -> Self {
        Self { inner, pipeline }
    }

    pub async fn add(&self, caller: &Caller, mut topic: Topic) -> ServiceResult<Topic> {
        self.pipeline.before_create(caller, topic.as_entity_mut()).await?;
        let created = self.inner.add(caller, topic).await?;
        self.pipeline.after_create(Some(created.as_entity()), None);
        Ok(created)
    }

    pub async fn update(&self, caller: &Caller, topic: Topic) -> ServiceResult<Topic> {
        let updated = self.inner.update(caller, topic).await?;
        self.pipeline.after_update(updated.as_ref().map(DomainEntity::as_entity));
        self.pipeline.require(updated)
    }

    pub async fn update_field(
        &self,
        caller: &Caller,
        id: TopicId,
        entry: FieldEntry,
    ) -> ServiceResult<Option<ChangeEvent>> {
        let change = self.inner.update_field(caller, id, entry).await?;
        self.pipeline.after_update_field(change.as_ref());
        Ok(change)
    }

    pub async fn get_topic(&self, caller: &Caller, id: TopicId) -> ServiceResult<Topic> {
        self.pipeline.require(self.inner.get_topic(caller, id).await?)
    }

    pub async fn get_all(&self, caller: &Caller, page: PageRequest) -> ServiceResult<Page<Topic>> {
        let page = self.pipeline.apply_default_sort(None, page);
        self.inner.get_all(caller, page).await
    }

    pub async fn search(&self, caller: &Caller, term: &str, page: PageRequest) -> ServiceResult<Page<Topic>> {
        let page = self.pipeline.apply_default_sort(Some(term), page);
        self.inner.search(caller, term, page).await
    }

    pub async fn count(&self, caller: &Caller) -> ServiceResult<u64> {
        self.inner.count(caller).await
    }

    pub async fn delete(&self, caller: &Caller, id: TopicId) -> ServiceResult<bool> {
        self.inner.delete(caller, id).await
    }

    pub async fn add_training_to(
        &self,
        caller: &Caller,
        topic_ids: &[TopicId],
        training: &TrainingRef,
    ) -> ServiceResult<usize> {
        self.inner.add_training_to(caller, topic_ids, training).await
    }
}

// ============================================================================
// Employee
// ============================================================================

pub struct PipelinedEmployeeService {
    inner: Arc<dyn EmployeeService>,
    pipeline: Arc<InterceptionPipeline>,
}

impl PipelinedEmployeeService {
    pub fn new(inner: Arc<dyn EmployeeService>, pipeline: Arc<InterceptionPipeline>) -> Self {
        Self { inner, pipeline }
    }

    pub async fn add(&self, caller: &Caller, mut employee: Employee) -> ServiceResult<Employee> {
        self.pipeline
            .before_create(caller, employee.as_entity_mut())
            .await?;
        let created = self.inner.add(caller, employee).await?;
        self.pipeline.after_create(Some(created.as_entity()), None);
        Ok(created)
    }

    pub async fn update(&self, caller: &Caller, employee: Employee) -> ServiceResult<Employee> {
        let updated = self.inner.update(caller, employee).await?;
        self.pipeline.after_update(updated.as_ref().map(DomainEntity::as_entity));
        self.pipeline.require(updated)
    }

    pub async fn update_field(
        &self,
        caller: &Caller,
        guid: &str,
        entry: FieldEntry,
    ) -> ServiceResult<Option<ChangeEvent>> {
        let change = self.inner.update_field(caller, guid, entry).await?;
        self.pipeline.after_update_field(change.as_ref());
        Ok(change)
    }

    pub async fn get_employee(&self, caller: &Caller, guid: &str) -> ServiceResult<Employee> {
        self.pipeline.require(self.inner.get_employee(caller, guid).await?)
    }

    pub async fn get_all(&self, caller: &Caller, page: PageRequest) -> ServiceResult<Page<Employee>> {
        let page = self.pipeline.apply_default_sort(None, page);
        self.inner.get_all(caller, page).await
    }

    pub async fn search(&self, caller: &Caller, term: &str, page: PageRequest) -> ServiceResult<Page<Employee>> {
        let page = self.pipeline.apply_default_sort(Some(term), page);
        self.inner.search(caller, term, page).await
    }

    pub async fn delete(&self, caller: &Caller, guid: &str) -> ServiceResult<bool> {
        self.inner.delete(caller, guid).await
    }

    pub async fn add_training_to(
        &self,
        caller: &Caller,
        guids: &[String],
        training: &TrainingRef,
        role: TrainingRole,
    ) -> ServiceResult<usize> {
        self.inner.add_training_to(caller, guids, training, role).await
    }

    pub async fn update_training_name(
        &self,
        caller: &Caller,
        training_id: TrainingId,
        name: &str,
    ) -> ServiceResult<usize> {
        self.inner.update_training_name(caller, training_id, name).await
    }
}

// ============================================================================
// Comment
// ============================================================================

pub struct PipelinedCommentService {
    inner: Arc<dyn CommentService>,
    pipeline: Arc<InterceptionPipeline>,
}

impl PipelinedCommentService {
    pub fn new(inner: Arc<dyn CommentService>, pipeline: Arc<InterceptionPipeline>) -> Self {
        Self { inner, pipeline }
    }

    pub async fn add(&self, caller: &Caller, training_id: TrainingId, mut comment: Comment) -> ServiceResult<Comment> {
        self.pipeline.before_create(caller, comment.as_entity_mut()).await?;
        let created = self.inner.add(caller, training_id, comment).await?;
        self.pipeline
            .after_create(created.as_ref().map(DomainEntity::as_entity), Some(training_id));
        self.pipeline.require_parent(EntityKind::Training, created)
    }

    pub async fn add_reply(
        &self,
        caller: &Caller,
        training_id: TrainingId,
        parent: CommentId,
        mut reply: Comment,
    ) -> ServiceResult<Comment> {
        self.pipeline.before_create(caller, reply.as_entity_mut()).await?;
        let created = self.inner.add_reply(caller, training_id, parent, reply).await?;
        self.pipeline
            .after_create(created.as_ref().map(DomainEntity::as_entity), Some(training_id));
        self.pipeline.require(created)
    }

    pub async fn get_comments(&self, caller: &Caller, training_id: TrainingId) -> ServiceResult<Vec<Comment>> {
        self.pipeline.require_parent(
            EntityKind::Training,
            self.inner.get_comments(caller, training_id).await?,
        )
    }

    pub async fn remove(&self, caller: &Caller, training_id: TrainingId, comment: CommentId) -> ServiceResult<bool> {
        self.inner.remove(caller, training_id, comment).await
    }

    pub async fn remove_reply(
        &self,
        caller: &Caller,
        training_id: TrainingId,
        comment: CommentId,
        reply: CommentId,
    ) -> ServiceResult<bool> {
        self.inner.remove_reply(caller, training_id, comment, reply).await
    }
}

// ============================================================================
// Feedback
// ============================================================================

pub struct PipelinedFeedbackService {
    inner: Arc<dyn FeedbackService>,
    pipeline: Arc<InterceptionPipeline>,
}

impl PipelinedFeedbackService {
    pub fn new(inner: Arc<dyn FeedbackService>, pipeline: Arc<InterceptionPipeline>) -> Self {
        Self { inner, pipeline }
    }

    pub async fn add(&self, caller: &Caller, mut feedback: Feedback) -> ServiceResult<Feedback> {
        self.pipeline
            .before_create(caller, feedback.as_entity_mut())
            .await?;
        let created = self.inner.add(caller, feedback).await?;
        self.pipeline.after_create(Some(created.as_entity()), None);
        Ok(created)
    }

    pub async fn get_feedback(&self, caller: &Caller, id: FeedbackId) -> ServiceResult<Feedback> {
        self.pipeline.require(self.inner.get_feedback(caller, id).await?)
    }

    pub async fn get_feedbacks(&self, caller: &Caller, training_id: TrainingId) -> ServiceResult<Vec<Feedback>> {
        self.inner.get_feedbacks(caller, training_id).await
    }
}

// ============================================================================
// Attachment
// ============================================================================

pub struct PipelinedAttachmentService {
    inner: Arc<dyn AttachmentService>,
    pipeline: Arc<InterceptionPipeline>,
}

impl PipelinedAttachmentService {
    pub fn new(inner: Arc<dyn AttachmentService>, pipeline: Arc<InterceptionPipeline>) -> Self {
        Self { inner, pipeline }
    }

    pub async fn add(
        &self,
        caller: &Caller,
        training_id: TrainingId,
        file_name: &str,
        content_type: &str,
        content: Bytes,
    ) -> ServiceResult<FileAttachmentInfo> {
        let mut file = StoredFile::new(training_id, file_name, content_type, content);
        self.pipeline
            .before_create(caller, file.info.as_entity_mut())
            .await?;
        let attached = self.inner.add(caller, file).await?;
        self.pipeline
            .after_create(attached.as_ref().map(DomainEntity::as_entity), Some(training_id));
        self.pipeline.require_parent(EntityKind::Training, attached)
    }

    pub async fn get_attached_files(
        &self,
        caller: &Caller,
        training_id: TrainingId,
    ) -> ServiceResult<Vec<FileAttachmentInfo>> {
        self.inner.get_attached_files(caller, training_id).await
    }

    pub async fn get_attachment(
        &self,
        caller: &Caller,
        training_id: TrainingId,
        file_name: &str,
    ) -> ServiceResult<StoredFile> {
        self.pipeline
            .require(self.inner.get_attachment(caller, training_id, file_name).await?)
    }

    pub async fn remove_attached_file(
        &self,
        caller: &Caller,
        training_id: TrainingId,
        file_name: &str,
    ) -> ServiceResult<bool> {
        self.inner
            .remove_attached_file(caller, training_id, file_name)
            .await
    }
}
