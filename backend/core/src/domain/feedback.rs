// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::training::TrainingId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FeedbackId(pub i64);

impl fmt::Display for FeedbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A respondent's feedback on one training.
///
/// At most one feedback exists per `(parent_id, respondent_guid)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: Option<FeedbackId>,
    pub parent_id: TrainingId,
    pub respondent_guid: String,
    pub respondent_name: String,
    /// question -> answer
    #[serde(default)]
    pub answers: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl Feedback {
    /// New feedback for `parent_id`; the respondent is filled in on creation.
    pub fn new(parent_id: TrainingId) -> Self {
        Self {
            id: None,
            parent_id,
            respondent_guid: String::new(),
            respondent_name: String::new(),
            answers: BTreeMap::new(),
            submitted_at: None,
        }
    }

    pub fn with_answer(mut self, question: impl Into<String>, answer: impl Into<String>) -> Self {
        self.answers.insert(question.into(), answer.into());
        self
    }
}
