// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Single-field patch requests.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::training::TrainingStatus;

/// A transient `(name, value)` pair describing a one-field update.
///
/// Consumed once by an `update_field` operation; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub name: String,
    pub value: Value,
}

impl FieldEntry {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Value rendered as plain text (strings unquoted, null as `None`)
    pub fn value_text(&self) -> Option<String> {
        match &self.value {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Typed training patch handed to the store
#[derive(Debug, Clone, PartialEq)]
pub enum TrainingField {
    Name(String),
    Description(Option<String>),
    Status(TrainingStatus),
    ScheduledOn(Option<DateTime<Utc>>),
    Trainers(BTreeMap<String, String>),
    Trainees(BTreeMap<String, String>),
}

impl TrainingField {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::Description(_) => "description",
            Self::Status(_) => "status",
            Self::ScheduledOn(_) => "scheduledOn",
            Self::Trainers(_) => "trainers",
            Self::Trainees(_) => "trainees",
        }
    }
}

/// Typed topic patch handed to the store
#[derive(Debug, Clone, PartialEq)]
pub enum TopicField {
    Name(String),
    Description(Option<String>),
    Managers(BTreeMap<String, String>),
}

impl TopicField {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::Description(_) => "description",
            Self::Managers(_) => "managers",
        }
    }
}

/// Typed employee patch handed to the store
#[derive(Debug, Clone, PartialEq)]
pub enum EmployeeField {
    Name(String),
    Email(Option<String>),
    Managers(BTreeMap<String, String>),
}

impl EmployeeField {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::Email(_) => "email",
            Self::Managers(_) => "managers",
        }
    }
}
