// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::application::error::{ServiceError, ServiceResult};
use crate::domain::attachment::{FileAttachmentInfo, StoredFile};
use crate::domain::caller::Caller;
use crate::domain::repository::TrainingRepository;
use crate::domain::training::TrainingId;

#[async_trait]
pub trait AttachmentService: Send + Sync {
    /// Store `file` against its training; `None` if the training does not exist
    async fn add(&self, caller: &Caller, file: StoredFile) -> ServiceResult<Option<FileAttachmentInfo>>;
    async fn get_attached_files(&self, caller: &Caller, training_id: TrainingId) -> ServiceResult<Vec<FileAttachmentInfo>>;
    async fn get_attachment(
        &self,
        caller: &Caller,
        training_id: TrainingId,
        file_name: &str,
    ) -> ServiceResult<Option<StoredFile>>;
    async fn remove_attached_file(
        &self,
        caller: &Caller,
        training_id: TrainingId,
        file_name: &str,
    ) -> ServiceResult<bool>;
}

pub struct StandardAttachmentService {
    trainings: Arc<dyn TrainingRepository>,
}

impl StandardAttachmentService {
    pub fn new(trainings: Arc<dyn TrainingRepository>) -> Self {
        Self { trainings }
    }
}

#[async_trait]
impl AttachmentService for StandardAttachmentService {
    async fn add(&self, caller: &Caller, mut file: StoredFile) -> ServiceResult<Option<FileAttachmentInfo>> {
        let training_id = file.info.training_id;
        if self
            .trainings
            .attachment_exists(training_id, &file.info.file_name)
            .await?
        {
            return Err(ServiceError::DuplicateResource(format!(
                "File {} already exist!",
                file.info.file_name
            )));
        }
        file.info.uploaded_by = Some(caller.stamp());
        let attached = self.trainings.attach_file(file).await?;
        if let Some(info) = &attached {
            info!(training_id = %training_id, file = %info.file_name, bytes = info.size_bytes, "File attached");
        }
        Ok(attached)
    }

    async fn get_attached_files(&self, _caller: &Caller, training_id: TrainingId) -> ServiceResult<Vec<FileAttachmentInfo>> {
        Ok(self.trainings.find_attachments(training_id).await?)
    }

    async fn get_attachment(
        &self,
        _caller: &Caller,
        training_id: TrainingId,
        file_name: &str,
    ) -> ServiceResult<Option<StoredFile>> {
        Ok(self.trainings.find_attachment(training_id, file_name).await?)
    }

    async fn remove_attached_file(
        &self,
        _caller: &Caller,
        training_id: TrainingId,
        file_name: &str,
    ) -> ServiceResult<bool> {
        Ok(self.trainings.remove_attachment(training_id, file_name).await?)
    }
}
