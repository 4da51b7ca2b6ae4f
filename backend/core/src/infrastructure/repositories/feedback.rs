// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::feedback::{Feedback, FeedbackId};
use crate::domain::repository::{FeedbackRepository, RepositoryError};
use crate::domain::training::TrainingId;

#[derive(Clone, Default)]
pub struct InMemoryFeedbackRepository {
    feedbacks: Arc<RwLock<BTreeMap<FeedbackId, Feedback>>>,
}

impl InMemoryFeedbackRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FeedbackRepository for InMemoryFeedbackRepository {
    async fn insert(&self, feedback: Feedback) -> Result<Feedback, RepositoryError> {
        let id = feedback
            .id
            .ok_or_else(|| RepositoryError::InvalidEntity("Feedback has no id".to_string()))?;
        let mut feedbacks = self.feedbacks.write();
        // Unique (parent, respondent), checked under the write lock
        let duplicate = feedbacks.values().any(|f| {
            f.parent_id == feedback.parent_id && f.respondent_guid == feedback.respondent_guid
        });
        if duplicate || feedbacks.contains_key(&id) {
            return Err(RepositoryError::Conflict(format!(
                "feedback for training {} by {}",
                feedback.parent_id, feedback.respondent_guid
            )));
        }
        feedbacks.insert(id, feedback.clone());
        Ok(feedback)
    }

    async fn find_by_id(&self, id: FeedbackId) -> Result<Option<Feedback>, RepositoryError> {
        Ok(self.feedbacks.read().get(&id).cloned())
    }

    async fn find_all_by_parent(&self, parent: TrainingId) -> Result<Vec<Feedback>, RepositoryError> {
        Ok(self
            .feedbacks
            .read()
            .values()
            .filter(|f| f.parent_id == parent)
            .cloned()
            .collect())
    }

    async fn find_all_by_parent_and_respondent(
        &self,
        parent: TrainingId,
        respondent_guid: &str,
    ) -> Result<Vec<Feedback>, RepositoryError> {
        Ok(self
            .feedbacks
            .read()
            .values()
            .filter(|f| f.parent_id == parent && f.respondent_guid == respondent_guid)
            .cloned()
            .collect())
    }

    async fn count_by_parent_and_respondent(
        &self,
        parent: TrainingId,
        respondent_guid: &str,
    ) -> Result<u64, RepositoryError> {
        Ok(self
            .feedbacks
            .read()
            .values()
            .filter(|f| f.parent_id == parent && f.respondent_guid == respondent_guid)
            .count() as u64)
    }
}
