// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::query::{list_page, search_page};
use crate::domain::caller::UserStamp;
use crate::domain::field::TopicField;
use crate::domain::page::{Page, PageRequest};
use crate::domain::repository::{RepositoryError, TopicRepository};
use crate::domain::topic::{Topic, TopicId};
use crate::domain::training::TrainingRef;

#[derive(Clone, Default)]
pub struct InMemoryTopicRepository {
    topics: Arc<RwLock<BTreeMap<TopicId, Topic>>>,
}

impl InMemoryTopicRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn require_id(topic: &Topic) -> Result<TopicId, RepositoryError> {
    topic
        .id
        .ok_or_else(|| RepositoryError::InvalidEntity("Topic has no id".to_string()))
}

#[async_trait]
impl TopicRepository for InMemoryTopicRepository {
    async fn insert(&self, topic: Topic) -> Result<Topic, RepositoryError> {
        let id = require_id(&topic)?;
        let mut topics = self.topics.write();
        if topics.contains_key(&id) {
            return Err(RepositoryError::Conflict(format!("topic {}", id)));
        }
        topics.insert(id, topic.clone());
        Ok(topic)
    }

    async fn save(&self, topic: Topic) -> Result<Topic, RepositoryError> {
        let id = require_id(&topic)?;
        self.topics.write().insert(id, topic.clone());
        Ok(topic)
    }

    async fn find_by_id(&self, id: TopicId) -> Result<Option<Topic>, RepositoryError> {
        Ok(self.topics.read().get(&id).cloned())
    }

    async fn find_all(&self, page: &PageRequest) -> Result<Page<Topic>, RepositoryError> {
        let topics: Vec<Topic> = self.topics.read().values().cloned().collect();
        Ok(list_page(topics, page))
    }

    async fn search(&self, term: &str, page: &PageRequest) -> Result<Page<Topic>, RepositoryError> {
        let topics: Vec<Topic> = self.topics.read().values().cloned().collect();
        Ok(search_page(topics, term, page))
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self.topics.read().len() as u64)
    }

    async fn delete(&self, id: TopicId) -> Result<bool, RepositoryError> {
        Ok(self.topics.write().remove(&id).is_some())
    }

    async fn update_field(
        &self,
        id: TopicId,
        field: TopicField,
        modified_by: &UserStamp,
    ) -> Result<bool, RepositoryError> {
        let mut topics = self.topics.write();
        let Some(topic) = topics.get_mut(&id) else {
            return Ok(false);
        };
        match field {
            TopicField::Name(name) => topic.name = name,
            TopicField::Description(description) => topic.description = description,
            TopicField::Managers(managers) => topic.managers = managers,
        }
        topic.last_modified_by = Some(modified_by.clone());
        Ok(true)
    }

    async fn add_training(&self, topics: &[TopicId], training: &TrainingRef) -> Result<usize, RepositoryError> {
        let mut store = self.topics.write();
        let mut linked = 0;
        for id in topics {
            if let Some(topic) = store.get_mut(id) {
                topic.trainings.insert(training.id, training.name.clone());
                linked += 1;
            }
        }
        Ok(linked)
    }
}
