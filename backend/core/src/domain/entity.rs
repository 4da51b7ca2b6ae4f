// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Entity Kinds
//!
//! Closed set of the entity kinds the service layer manages. Cross-cutting
//! code (the interception pipeline) dispatches on [`EntityMut`] / [`EntityRef`]
//! with exhaustive matches, so adding a kind is a compile error everywhere a
//! phase forgot to handle it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::attachment::{FileAttachmentInfo, StoredFile};
use crate::domain::comment::Comment;
use crate::domain::employee::Employee;
use crate::domain::feedback::Feedback;
use crate::domain::topic::Topic;
use crate::domain::training::Training;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Training,
    Topic,
    Comment,
    Feedback,
    Employee,
    Attachment,
}

impl EntityKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Training => "Training",
            Self::Topic => "Topic",
            Self::Comment => "Comment",
            Self::Feedback => "Feedback",
            Self::Employee => "Employee",
            Self::Attachment => "Attachment",
        }
    }

    /// Message carried by a not-found error for this kind
    pub fn not_found_message(self) -> String {
        format!("{} does not exist", self.label())
    }

    /// Kinds whose creator is stamped from the caller
    pub fn tracks_authorship(self) -> bool {
        matches!(self, Self::Training | Self::Topic | Self::Comment | Self::Feedback)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Mutable view of an entity about to be created
#[derive(Debug)]
pub enum EntityMut<'a> {
    Training(&'a mut Training),
    Topic(&'a mut Topic),
    Comment(&'a mut Comment),
    Feedback(&'a mut Feedback),
    Employee(&'a mut Employee),
    Attachment(&'a mut FileAttachmentInfo),
}

impl EntityMut<'_> {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Training(_) => EntityKind::Training,
            Self::Topic(_) => EntityKind::Topic,
            Self::Comment(_) => EntityKind::Comment,
            Self::Feedback(_) => EntityKind::Feedback,
            Self::Employee(_) => EntityKind::Employee,
            Self::Attachment(_) => EntityKind::Attachment,
        }
    }
}

/// Shared view of an entity returned by a create or update
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    Training(&'a Training),
    Topic(&'a Topic),
    Comment(&'a Comment),
    Feedback(&'a Feedback),
    Employee(&'a Employee),
    Attachment(&'a FileAttachmentInfo),
}

impl EntityRef<'_> {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Training(_) => EntityKind::Training,
            Self::Topic(_) => EntityKind::Topic,
            Self::Comment(_) => EntityKind::Comment,
            Self::Feedback(_) => EntityKind::Feedback,
            Self::Employee(_) => EntityKind::Employee,
            Self::Attachment(_) => EntityKind::Attachment,
        }
    }
}

/// Anything a single-entity read can return.
pub trait Resource {
    const KIND: EntityKind;
}

/// Entities that pass through the create/update advice.
pub trait DomainEntity: Resource {
    fn as_entity(&self) -> EntityRef<'_>;
    fn as_entity_mut(&mut self) -> EntityMut<'_>;
}

macro_rules! domain_entity {
    ($ty:ty, $variant:ident) => {
        impl Resource for $ty {
            const KIND: EntityKind = EntityKind::$variant;
        }

        impl DomainEntity for $ty {
            fn as_entity(&self) -> EntityRef<'_> {
                EntityRef::$variant(self)
            }

            fn as_entity_mut(&mut self) -> EntityMut<'_> {
                EntityMut::$variant(self)
            }
        }
    };
}

domain_entity!(Training, Training);
domain_entity!(Topic, Topic);
domain_entity!(Comment, Comment);
domain_entity!(Feedback, Feedback);
domain_entity!(Employee, Employee);
domain_entity!(FileAttachmentInfo, Attachment);

impl Resource for StoredFile {
    const KIND: EntityKind = EntityKind::Attachment;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_messages() {
        assert_eq!(EntityKind::Training.not_found_message(), "Training does not exist");
        assert_eq!(EntityKind::Topic.not_found_message(), "Topic does not exist");
        assert_eq!(EntityKind::Employee.not_found_message(), "Employee does not exist");
    }

    #[test]
    fn test_authorship_tracking() {
        assert!(EntityKind::Feedback.tracks_authorship());
        assert!(!EntityKind::Employee.tracks_authorship());
        assert!(!EntityKind::Attachment.tracks_authorship());
    }

    #[test]
    fn test_views_report_kind() {
        let mut topic = Topic::new("Databases");
        assert_eq!(topic.as_entity_mut().kind(), EntityKind::Topic);
        assert_eq!(topic.as_entity().kind(), EntityKind::Topic);
    }
}
