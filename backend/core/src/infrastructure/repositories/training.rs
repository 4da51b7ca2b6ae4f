// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;

use super::query::{list_page, search_page};
use crate::domain::attachment::{FileAttachmentInfo, StoredFile};
use crate::domain::caller::UserStamp;
use crate::domain::comment::{Comment, CommentId};
use crate::domain::field::TrainingField;
use crate::domain::page::{Page, PageRequest};
use crate::domain::repository::{RepositoryError, StatusWrite, TrainingRepository};
use crate::domain::training::{LikeType, Training, TrainingId, TrainingStatus};

#[derive(Default)]
struct TrainingStore {
    trainings: BTreeMap<TrainingId, Training>,
    files: HashMap<(TrainingId, String), Bytes>,
}

/// Trainings together with their comments and attached file contents.
#[derive(Clone, Default)]
pub struct InMemoryTrainingRepository {
    store: Arc<RwLock<TrainingStore>>,
}

impl InMemoryTrainingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn filtered(&self, status: Option<TrainingStatus>) -> Vec<Training> {
        let store = self.store.read();
        store
            .trainings
            .values()
            .filter(|t| status.is_none_or(|s| t.status == s))
            .cloned()
            .collect()
    }
}

fn require_id(training: &Training) -> Result<TrainingId, RepositoryError> {
    training
        .id
        .ok_or_else(|| RepositoryError::InvalidEntity("Training has no id".to_string()))
}

#[async_trait]
impl TrainingRepository for InMemoryTrainingRepository {
    async fn insert(&self, training: Training) -> Result<Training, RepositoryError> {
        let id = require_id(&training)?;
        let mut store = self.store.write();
        if store.trainings.contains_key(&id) {
            return Err(RepositoryError::Conflict(format!("training {}", id)));
        }
        store.trainings.insert(id, training.clone());
        Ok(training)
    }

    async fn save(&self, training: Training) -> Result<Training, RepositoryError> {
        let id = require_id(&training)?;
        self.store.write().trainings.insert(id, training.clone());
        Ok(training)
    }

    async fn find_by_id(&self, id: TrainingId) -> Result<Option<Training>, RepositoryError> {
        Ok(self.store.read().trainings.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Training>, RepositoryError> {
        Ok(self
            .store
            .read()
            .trainings
            .values()
            .find(|t| t.name == name)
            .cloned())
    }

    async fn find_all_by_ids(&self, ids: &[TrainingId]) -> Result<Vec<Training>, RepositoryError> {
        let store = self.store.read();
        Ok(ids
            .iter()
            .filter_map(|id| store.trainings.get(id).cloned())
            .collect())
    }

    async fn find_all(
        &self,
        page: &PageRequest,
        status: Option<TrainingStatus>,
    ) -> Result<Page<Training>, RepositoryError> {
        Ok(list_page(self.filtered(status), page))
    }

    async fn search(
        &self,
        term: &str,
        page: &PageRequest,
        status: Option<TrainingStatus>,
    ) -> Result<Page<Training>, RepositoryError> {
        Ok(search_page(self.filtered(status), term, page))
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self.store.read().trainings.len() as u64)
    }

    async fn delete(&self, id: TrainingId) -> Result<bool, RepositoryError> {
        let mut store = self.store.write();
        store.files.retain(|(training_id, _), _| *training_id != id);
        Ok(store.trainings.remove(&id).is_some())
    }

    async fn update_field(
        &self,
        id: TrainingId,
        field: TrainingField,
        modified_by: &UserStamp,
    ) -> Result<bool, RepositoryError> {
        let mut store = self.store.write();
        let Some(training) = store.trainings.get_mut(&id) else {
            return Ok(false);
        };
        match field {
            TrainingField::Name(name) => training.name = name,
            TrainingField::Description(description) => training.description = description,
            TrainingField::Status(status) => {
                // Conditional write: the transition is re-checked under the lock
                if !training.status.can_transition_to(status) {
                    return Ok(false);
                }
                training.status = status;
            }
            TrainingField::ScheduledOn(scheduled_on) => training.scheduled_on = scheduled_on,
            TrainingField::Trainers(trainers) => training.trainers = trainers,
            TrainingField::Trainees(trainees) => training.trainees = trainees,
        }
        training.last_modified_by = Some(modified_by.clone());
        Ok(true)
    }

    async fn find_status(&self, id: TrainingId) -> Result<Option<TrainingStatus>, RepositoryError> {
        Ok(self.store.read().trainings.get(&id).map(|t| t.status))
    }

    async fn set_status(
        &self,
        id: TrainingId,
        status: TrainingStatus,
    ) -> Result<Option<StatusWrite>, RepositoryError> {
        let mut store = self.store.write();
        let Some(training) = store.trainings.get_mut(&id) else {
            return Ok(None);
        };
        if !training.status.can_transition_to(status) {
            return Ok(Some(StatusWrite::Refused(training.status)));
        }
        training.status = status;
        Ok(Some(StatusWrite::Applied(training.clone())))
    }

    async fn update_likes(
        &self,
        id: TrainingId,
        like: LikeType,
        user: &UserStamp,
    ) -> Result<Option<Training>, RepositoryError> {
        let mut store = self.store.write();
        let Some(training) = store.trainings.get_mut(&id) else {
            return Ok(None);
        };
        training.apply_like(like, &user.guid, &user.name);
        Ok(Some(training.clone()))
    }

    async fn add_comment(
        &self,
        id: TrainingId,
        comment: Comment,
    ) -> Result<Option<Comment>, RepositoryError> {
        let mut store = self.store.write();
        let Some(training) = store.trainings.get_mut(&id) else {
            return Ok(None);
        };
        training.comments.push(comment.clone());
        Ok(Some(comment))
    }

    async fn add_comment_reply(
        &self,
        id: TrainingId,
        parent: CommentId,
        reply: Comment,
    ) -> Result<Option<Comment>, RepositoryError> {
        let mut store = self.store.write();
        let Some(thread) = store
            .trainings
            .get_mut(&id)
            .and_then(|t| t.comments.iter_mut().find(|c| c.id == Some(parent)))
        else {
            return Ok(None);
        };
        thread.replies.push(reply.clone());
        Ok(Some(reply))
    }

    async fn find_comments(&self, id: TrainingId) -> Result<Option<Vec<Comment>>, RepositoryError> {
        Ok(self
            .store
            .read()
            .trainings
            .get(&id)
            .map(|t| t.comments.clone()))
    }

    async fn remove_comment(&self, id: TrainingId, comment: CommentId) -> Result<bool, RepositoryError> {
        let mut store = self.store.write();
        let Some(training) = store.trainings.get_mut(&id) else {
            return Ok(false);
        };
        let before = training.comments.len();
        training.comments.retain(|c| c.id != Some(comment));
        Ok(training.comments.len() != before)
    }

    async fn remove_comment_reply(
        &self,
        id: TrainingId,
        comment: CommentId,
        reply: CommentId,
    ) -> Result<bool, RepositoryError> {
        let mut store = self.store.write();
        let Some(thread) = store
            .trainings
            .get_mut(&id)
            .and_then(|t| t.comments.iter_mut().find(|c| c.id == Some(comment)))
        else {
            return Ok(false);
        };
        let before = thread.replies.len();
        thread.replies.retain(|r| r.id != Some(reply));
        Ok(thread.replies.len() != before)
    }

    async fn attachment_exists(&self, id: TrainingId, file_name: &str) -> Result<bool, RepositoryError> {
        Ok(self
            .store
            .read()
            .files
            .contains_key(&(id, file_name.to_string())))
    }

    async fn attach_file(&self, file: StoredFile) -> Result<Option<FileAttachmentInfo>, RepositoryError> {
        let id = file.info.training_id;
        let key = (id, file.info.file_name.clone());
        let mut store = self.store.write();
        if store.files.contains_key(&key) {
            return Err(RepositoryError::Conflict(format!("file {} on training {}", key.1, id)));
        }
        let Some(training) = store.trainings.get_mut(&id) else {
            return Ok(None);
        };
        training.attachments.push(file.info.clone());
        store.files.insert(key, file.content);
        Ok(Some(file.info))
    }

    async fn find_attachments(&self, id: TrainingId) -> Result<Vec<FileAttachmentInfo>, RepositoryError> {
        Ok(self
            .store
            .read()
            .trainings
            .get(&id)
            .map(|t| t.attachments.clone())
            .unwrap_or_default())
    }

    async fn find_attachment(
        &self,
        id: TrainingId,
        file_name: &str,
    ) -> Result<Option<StoredFile>, RepositoryError> {
        let store = self.store.read();
        let Some(content) = store.files.get(&(id, file_name.to_string())) else {
            return Ok(None);
        };
        let info = store
            .trainings
            .get(&id)
            .and_then(|t| t.attachments.iter().find(|a| a.file_name == file_name))
            .cloned()
            .ok_or_else(|| {
                RepositoryError::Storage(format!("Attachment {} has content but no metadata", file_name))
            })?;
        Ok(Some(StoredFile {
            info,
            content: content.clone(),
        }))
    }

    async fn remove_attachment(&self, id: TrainingId, file_name: &str) -> Result<bool, RepositoryError> {
        let mut store = self.store.write();
        let removed = store.files.remove(&(id, file_name.to_string())).is_some();
        if let Some(training) = store.trainings.get_mut(&id) {
            training.attachments.retain(|a| a.file_name != file_name);
        }
        Ok(removed)
    }
}
