// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Caller identity
//!
//! The authenticated caller is passed explicitly into every service operation
//! instead of being read from an ambient security context. Authentication
//! itself happens upstream; by the time a `Caller` exists it is trusted.

use serde::{Deserialize, Serialize};

/// Identity of the user on whose behalf an operation runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub guid: String,
    pub display_name: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl Caller {
    pub fn new(guid: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            display_name: display_name.into(),
            is_admin: false,
        }
    }

    pub fn admin(guid: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            is_admin: true,
            ..Self::new(guid, display_name)
        }
    }

    /// Audit stamp for this caller
    pub fn stamp(&self) -> UserStamp {
        UserStamp {
            guid: self.guid.clone(),
            name: self.display_name.clone(),
        }
    }
}

/// Recorded authorship (created-by / last-modified-by / owner)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStamp {
    pub guid: String,
    pub name: String,
}
