// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::application::error::{ServiceError, ServiceResult};
use crate::application::training::parse_people;
use crate::domain::caller::Caller;
use crate::domain::events::ChangeEvent;
use crate::domain::field::{FieldEntry, TopicField};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repository::TopicRepository;
use crate::domain::topic::{Topic, TopicId};
use crate::domain::training::TrainingRef;

#[async_trait]
pub trait TopicService: Send + Sync {
    async fn add(&self, caller: &Caller, topic: Topic) -> ServiceResult<Topic>;
    async fn update(&self, caller: &Caller, topic: Topic) -> ServiceResult<Option<Topic>>;
    async fn update_field(
        &self,
        caller: &Caller,
        id: TopicId,
        entry: FieldEntry,
    ) -> ServiceResult<Option<ChangeEvent>>;
    async fn get_topic(&self, caller: &Caller, id: TopicId) -> ServiceResult<Option<Topic>>;
    async fn get_all(&self, caller: &Caller, page: PageRequest) -> ServiceResult<Page<Topic>>;
    async fn search(&self, caller: &Caller, term: &str, page: PageRequest) -> ServiceResult<Page<Topic>>;
    async fn count(&self, caller: &Caller) -> ServiceResult<u64>;
    async fn delete(&self, caller: &Caller, id: TopicId) -> ServiceResult<bool>;
    /// File `training` under each of `topic_ids`
    async fn add_training_to(
        &self,
        caller: &Caller,
        topic_ids: &[TopicId],
        training: &TrainingRef,
    ) -> ServiceResult<usize>;
}

pub struct StandardTopicService {
    repository: Arc<dyn TopicRepository>,
}

impl StandardTopicService {
    pub fn new(repository: Arc<dyn TopicRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl TopicService for StandardTopicService {
    async fn add(&self, _caller: &Caller, topic: Topic) -> ServiceResult<Topic> {
        let topic = self.repository.insert(topic).await?;
        info!(topic_id = ?topic.id, name = %topic.name, "Topic added");
        Ok(topic)
    }

    async fn update(&self, caller: &Caller, mut topic: Topic) -> ServiceResult<Option<Topic>> {
        let Some(id) = topic.id else {
            return Err(ServiceError::InvalidOperation(
                "Topic id is required for update".to_string(),
            ));
        };
        let Some(existing) = self.repository.find_by_id(id).await? else {
            return Ok(None);
        };
        topic.created_by = existing.created_by;
        // Training links are maintained by `add_training_to` only
        topic.trainings = existing.trainings;
        topic.last_modified_by = Some(caller.stamp());
        Ok(Some(self.repository.save(topic).await?))
    }

    async fn update_field(
        &self,
        caller: &Caller,
        id: TopicId,
        entry: FieldEntry,
    ) -> ServiceResult<Option<ChangeEvent>> {
        let field = parse_topic_field(&entry)?;
        let name = field.name();
        if !self.repository.update_field(id, field, &caller.stamp()).await? {
            debug!(topic_id = %id, field = name, "Topic patch not applied");
            return Ok(None);
        }
        Ok(Some(ChangeEvent::TopicUpdated {
            topic_id: id,
            field: name.to_string(),
        }))
    }

    async fn get_topic(&self, _caller: &Caller, id: TopicId) -> ServiceResult<Option<Topic>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    async fn get_all(&self, _caller: &Caller, page: PageRequest) -> ServiceResult<Page<Topic>> {
        Ok(self.repository.find_all(&page).await?)
    }

    async fn search(&self, _caller: &Caller, term: &str, page: PageRequest) -> ServiceResult<Page<Topic>> {
        Ok(self.repository.search(term, &page).await?)
    }

    async fn count(&self, _caller: &Caller) -> ServiceResult<u64> {
        Ok(self.repository.count().await?)
    }

    async fn delete(&self, _caller: &Caller, id: TopicId) -> ServiceResult<bool> {
        Ok(self.repository.delete(id).await?)
    }

    async fn add_training_to(
        &self,
        _caller: &Caller,
        topic_ids: &[TopicId],
        training: &TrainingRef,
    ) -> ServiceResult<usize> {
        Ok(self.repository.add_training(topic_ids, training).await?)
    }
}

fn parse_topic_field(entry: &FieldEntry) -> ServiceResult<TopicField> {
    if entry.is("name") {
        return match entry.value_text() {
            Some(name) if !name.trim().is_empty() => Ok(TopicField::Name(name)),
            _ => Err(ServiceError::InvalidOperation("Topic name cannot be empty".to_string())),
        };
    }
    if entry.is("description") {
        return Ok(TopicField::Description(entry.value_text()));
    }
    if entry.is("managers") {
        return Ok(TopicField::Managers(parse_people(entry)?));
    }
    Err(ServiceError::InvalidOperation(format!(
        "Field {} can't be updated",
        entry.name
    )))
}
