// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::caller::UserStamp;
use crate::domain::training::TrainingId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TopicId(pub i64);

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Subject area that trainings are filed under
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: Option<TopicId>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserStamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<UserStamp>,
    /// guid -> display name
    #[serde(default)]
    pub managers: BTreeMap<String, String>,
    /// Trainings filed under this topic (id -> name)
    #[serde(default)]
    pub trainings: BTreeMap<TrainingId, String>,
}

impl Topic {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_manager(mut self, guid: impl Into<String>, name: impl Into<String>) -> Self {
        self.managers.insert(guid.into(), name.into());
        self
    }
}
