// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::caller::UserStamp;
use crate::domain::training::TrainingId;

/// Metadata of a file attached to a training, keyed by `(training_id, file_name)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileAttachmentInfo {
    pub training_id: TrainingId,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_by: Option<UserStamp>,
    pub uploaded_at: DateTime<Utc>,
}

/// Attachment metadata together with its stored content
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFile {
    pub info: FileAttachmentInfo,
    pub content: Bytes,
}

impl StoredFile {
    /// File about to be attached; uploader is stamped by the service.
    pub fn new(
        training_id: TrainingId,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        content: Bytes,
    ) -> Self {
        Self {
            info: FileAttachmentInfo {
                training_id,
                file_name: file_name.into(),
                content_type: content_type.into(),
                size_bytes: content.len() as u64,
                uploaded_by: None,
                uploaded_at: Utc::now(),
            },
            content,
        }
    }
}
