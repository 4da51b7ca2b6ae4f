// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use thiserror::Error;

use crate::domain::entity::EntityKind;
use crate::domain::repository::RepositoryError;

/// Failures surfaced by the service layer
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ServiceError {
    #[error("{0}")]
    DuplicateResource(String),

    #[error("{0}")]
    ResourceNotFound(String),

    #[error("{0}")]
    InvalidOperation(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    pub fn not_found(kind: EntityKind) -> Self {
        Self::ResourceNotFound(kind.not_found_message())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ResourceNotFound(_))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
