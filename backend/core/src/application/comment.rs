// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::application::error::ServiceResult;
use crate::domain::caller::Caller;
use crate::domain::comment::{Comment, CommentId};
use crate::domain::repository::TrainingRepository;
use crate::domain::training::TrainingId;

/// Comments live inside their training; every operation is addressed by the
/// owning training id. `None` means the training (or parent comment) does
/// not exist.
#[async_trait]
pub trait CommentService: Send + Sync {
    async fn add(&self, caller: &Caller, training_id: TrainingId, comment: Comment) -> ServiceResult<Option<Comment>>;
    async fn add_reply(
        &self,
        caller: &Caller,
        training_id: TrainingId,
        parent: CommentId,
        reply: Comment,
    ) -> ServiceResult<Option<Comment>>;
    async fn get_comments(&self, caller: &Caller, training_id: TrainingId) -> ServiceResult<Option<Vec<Comment>>>;
    async fn remove(&self, caller: &Caller, training_id: TrainingId, comment: CommentId) -> ServiceResult<bool>;
    async fn remove_reply(
        &self,
        caller: &Caller,
        training_id: TrainingId,
        comment: CommentId,
        reply: CommentId,
    ) -> ServiceResult<bool>;
}

pub struct StandardCommentService {
    trainings: Arc<dyn TrainingRepository>,
}

impl StandardCommentService {
    pub fn new(trainings: Arc<dyn TrainingRepository>) -> Self {
        Self { trainings }
    }
}

#[async_trait]
impl CommentService for StandardCommentService {
    async fn add(&self, _caller: &Caller, training_id: TrainingId, comment: Comment) -> ServiceResult<Option<Comment>> {
        let added = self.trainings.add_comment(training_id, comment).await?;
        debug!(training_id = %training_id, added = added.is_some(), "Comment add");
        Ok(added)
    }

    async fn add_reply(
        &self,
        _caller: &Caller,
        training_id: TrainingId,
        parent: CommentId,
        mut reply: Comment,
    ) -> ServiceResult<Option<Comment>> {
        // One level of nesting only
        reply.replies.clear();
        Ok(self.trainings.add_comment_reply(training_id, parent, reply).await?)
    }

    async fn get_comments(&self, _caller: &Caller, training_id: TrainingId) -> ServiceResult<Option<Vec<Comment>>> {
        Ok(self.trainings.find_comments(training_id).await?)
    }

    async fn remove(&self, _caller: &Caller, training_id: TrainingId, comment: CommentId) -> ServiceResult<bool> {
        Ok(self.trainings.remove_comment(training_id, comment).await?)
    }

    async fn remove_reply(
        &self,
        _caller: &Caller,
        training_id: TrainingId,
        comment: CommentId,
        reply: CommentId,
    ) -> ServiceResult<bool> {
        Ok(self
            .trainings
            .remove_comment_reply(training_id, comment, reply)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::training::Training;
    use crate::infrastructure::repositories::InMemoryTrainingRepository;

    async fn service_with_training() -> StandardCommentService {
        let repository = Arc::new(InMemoryTrainingRepository::new());
        let mut training = Training::new("Macros");
        training.id = Some(TrainingId(1));
        repository.insert(training).await.unwrap();
        StandardCommentService::new(repository)
    }

    fn comment(id: i64, text: &str) -> Comment {
        let mut comment = Comment::new(text);
        comment.id = Some(CommentId(id));
        comment
    }

    #[tokio::test]
    async fn test_comment_and_reply_thread() {
        let service = service_with_training().await;
        let caller = Caller::new("G1", "Ada");

        service.add(&caller, TrainingId(1), comment(1, "Slides?")).await.unwrap();
        let reply = service
            .add_reply(&caller, TrainingId(1), CommentId(1), comment(2, "Posted"))
            .await
            .unwrap();
        assert!(reply.is_some());

        let thread = service.get_comments(&caller, TrainingId(1)).await.unwrap().unwrap();
        assert_eq!(thread.len(), 1);
        assert_eq!(thread[0].replies[0].text, "Posted");

        assert!(service
            .remove_reply(&caller, TrainingId(1), CommentId(1), CommentId(2))
            .await
            .unwrap());
        assert!(service.remove(&caller, TrainingId(1), CommentId(1)).await.unwrap());
        assert!(!service.remove(&caller, TrainingId(1), CommentId(1)).await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_training_or_parent() {
        let service = service_with_training().await;
        let caller = Caller::new("G1", "Ada");

        assert!(service.add(&caller, TrainingId(2), comment(1, "?")).await.unwrap().is_none());
        assert!(service
            .add_reply(&caller, TrainingId(1), CommentId(42), comment(2, "?"))
            .await
            .unwrap()
            .is_none());
        assert!(service.get_comments(&caller, TrainingId(2)).await.unwrap().is_none());
    }
}
