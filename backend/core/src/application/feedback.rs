// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::application::error::{ServiceError, ServiceResult};
use crate::domain::caller::Caller;
use crate::domain::feedback::{Feedback, FeedbackId};
use crate::domain::repository::{FeedbackRepository, RepositoryError};
use crate::domain::training::TrainingId;

#[async_trait]
pub trait FeedbackService: Send + Sync {
    async fn add(&self, caller: &Caller, feedback: Feedback) -> ServiceResult<Feedback>;
    async fn get_feedback(&self, caller: &Caller, id: FeedbackId) -> ServiceResult<Option<Feedback>>;
    /// Admins see every response; anyone else only their own
    async fn get_feedbacks(&self, caller: &Caller, training_id: TrainingId) -> ServiceResult<Vec<Feedback>>;
}

pub struct StandardFeedbackService {
    repository: Arc<dyn FeedbackRepository>,
}

impl StandardFeedbackService {
    pub fn new(repository: Arc<dyn FeedbackRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl FeedbackService for StandardFeedbackService {
    async fn add(&self, _caller: &Caller, feedback: Feedback) -> ServiceResult<Feedback> {
        match self.repository.insert(feedback).await {
            Ok(feedback) => {
                info!(training_id = %feedback.parent_id, respondent = %feedback.respondent_guid, "Feedback recorded");
                Ok(feedback)
            }
            // Lost the race against a concurrent submission
            Err(RepositoryError::Conflict(_)) => {
                Err(ServiceError::DuplicateResource("Feedback already exist".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_feedback(&self, _caller: &Caller, id: FeedbackId) -> ServiceResult<Option<Feedback>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    async fn get_feedbacks(&self, caller: &Caller, training_id: TrainingId) -> ServiceResult<Vec<Feedback>> {
        let feedbacks = if caller.is_admin {
            self.repository.find_all_by_parent(training_id).await?
        } else {
            self.repository
                .find_all_by_parent_and_respondent(training_id, &caller.guid)
                .await?
        };
        Ok(feedbacks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::repositories::InMemoryFeedbackRepository;

    fn response(id: i64, training: i64, guid: &str) -> Feedback {
        let mut feedback = Feedback::new(TrainingId(training)).with_answer("rating", "5");
        feedback.id = Some(FeedbackId(id));
        feedback.respondent_guid = guid.to_string();
        feedback
    }

    #[tokio::test]
    async fn test_visibility_depends_on_role() {
        let service = StandardFeedbackService::new(Arc::new(InMemoryFeedbackRepository::new()));
        let ada = Caller::new("G1", "Ada");
        service.add(&ada, response(1, 7, "G1")).await.unwrap();
        service.add(&ada, response(2, 7, "G2")).await.unwrap();
        service.add(&ada, response(3, 8, "G1")).await.unwrap();

        let own = service.get_feedbacks(&ada, TrainingId(7)).await.unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].respondent_guid, "G1");

        let all = service
            .get_feedbacks(&Caller::admin("ROOT", "Admin"), TrainingId(7))
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_store_conflict_maps_to_duplicate() {
        let service = StandardFeedbackService::new(Arc::new(InMemoryFeedbackRepository::new()));
        let ada = Caller::new("G1", "Ada");
        service.add(&ada, response(1, 7, "G1")).await.unwrap();

        let err = service.add(&ada, response(2, 7, "G1")).await.unwrap_err();
        assert_eq!(err, ServiceError::DuplicateResource("Feedback already exist".to_string()));
    }
}
