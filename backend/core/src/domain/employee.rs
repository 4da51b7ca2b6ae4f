// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::training::TrainingId;

/// Organization-wide employee identifier.
///
/// Always held in canonical upper-case form; construct through
/// [`EmployeeGuid::normalized`] when the value comes from outside.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EmployeeGuid(pub String);

impl EmployeeGuid {
    pub fn normalized(raw: &str) -> Self {
        Self(raw.trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_normalized(&self) -> bool {
        self.0 == self.0.trim().to_uppercase()
    }
}

impl fmt::Display for EmployeeGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which side of a training an employee was on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingRole {
    Imparted,
    Attended,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub guid: EmployeeGuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub managers: BTreeMap<String, String>,
    #[serde(default)]
    pub trainings_imparted: BTreeMap<TrainingId, String>,
    #[serde(default)]
    pub trainings_attended: BTreeMap<TrainingId, String>,
}

impl Employee {
    pub fn new(guid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            guid: EmployeeGuid(guid.into()),
            name: name.into(),
            email: None,
            managers: BTreeMap::new(),
            trainings_imparted: BTreeMap::new(),
            trainings_attended: BTreeMap::new(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn trainings_mut(&mut self, role: TrainingRole) -> &mut BTreeMap<TrainingId, String> {
        match role {
            TrainingRole::Imparted => &mut self.trainings_imparted,
            TrainingRole::Attended => &mut self.trainings_attended,
        }
    }

    pub fn references_training(&self, id: TrainingId) -> bool {
        self.trainings_imparted.contains_key(&id) || self.trainings_attended.contains_key(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guid_normalization() {
        let guid = EmployeeGuid::normalized(" ab12cd ");
        assert_eq!(guid.as_str(), "AB12CD");
        assert!(guid.is_normalized());
        assert!(!EmployeeGuid("ab12".to_string()).is_normalized());
    }

    #[test]
    fn test_references_training() {
        let mut emp = Employee::new("E1", "Ann");
        emp.trainings_mut(TrainingRole::Attended).insert(TrainingId(4), "Intro".to_string());
        assert!(emp.references_training(TrainingId(4)));
        assert!(!emp.references_training(TrainingId(5)));
    }
}
