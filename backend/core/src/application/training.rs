// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Training Application Service
//!
//! Plain training operations. Reads hand back `Option`s and field patches
//! hand back the [`ChangeEvent`] they produced; the pipelined wrapper turns
//! those into not-found errors and notifications.
//!
//! Status patches are checked against [`TrainingStatus::can_transition_to`]
//! before the store is touched. After a status change the training is
//! re-linked into its topics, and a completed training is recorded as
//! imparted by each of its trainers. Renaming a training rewrites the
//! denormalized name held by employees.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;
use tracing::{debug, info};

use crate::application::error::{ServiceError, ServiceResult};
use crate::domain::caller::Caller;
use crate::domain::employee::{EmployeeGuid, TrainingRole};
use crate::domain::events::ChangeEvent;
use crate::domain::field::{FieldEntry, TrainingField};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repository::{
    EmployeeRepository, StatusWrite, TopicRepository, TrainingRepository,
};
use crate::domain::topic::TopicId;
use crate::domain::training::{LikeType, Training, TrainingId, TrainingRef, TrainingStatus};

#[async_trait]
pub trait TrainingService: Send + Sync {
    async fn add(&self, caller: &Caller, training: Training) -> ServiceResult<Training>;
    async fn update(&self, caller: &Caller, training: Training) -> ServiceResult<Option<Training>>;
    async fn update_field(
        &self,
        caller: &Caller,
        id: TrainingId,
        entry: FieldEntry,
    ) -> ServiceResult<Option<ChangeEvent>>;
    async fn get_training(&self, caller: &Caller, id: TrainingId) -> ServiceResult<Option<Training>>;
    async fn get_training_by_name(&self, caller: &Caller, name: &str) -> ServiceResult<Option<Training>>;
    async fn get_all(
        &self,
        caller: &Caller,
        page: PageRequest,
        status: Option<TrainingStatus>,
    ) -> ServiceResult<Page<Training>>;
    async fn search(
        &self,
        caller: &Caller,
        term: &str,
        page: PageRequest,
        status: Option<TrainingStatus>,
    ) -> ServiceResult<Page<Training>>;
    async fn get_all_by_ids(&self, caller: &Caller, ids: &[TrainingId]) -> ServiceResult<Vec<Training>>;
    async fn count(&self, caller: &Caller) -> ServiceResult<u64>;
    async fn delete(&self, caller: &Caller, id: TrainingId) -> ServiceResult<bool>;
    async fn update_likes(
        &self,
        caller: &Caller,
        id: TrainingId,
        like: LikeType,
    ) -> ServiceResult<Option<Training>>;
    async fn get_topics(
        &self,
        caller: &Caller,
        id: TrainingId,
    ) -> ServiceResult<Option<BTreeMap<TopicId, String>>>;
    async fn get_trainees(
        &self,
        caller: &Caller,
        id: TrainingId,
    ) -> ServiceResult<Option<BTreeMap<String, String>>>;
    /// Write `status` directly; fails if the current status does not allow it
    async fn set_training_status(
        &self,
        caller: &Caller,
        id: TrainingId,
        status: TrainingStatus,
    ) -> ServiceResult<Option<Training>>;
}

pub struct StandardTrainingService {
    trainings: Arc<dyn TrainingRepository>,
    topics: Arc<dyn TopicRepository>,
    employees: Arc<dyn EmployeeRepository>,
}

impl StandardTrainingService {
    pub fn new(
        trainings: Arc<dyn TrainingRepository>,
        topics: Arc<dyn TopicRepository>,
        employees: Arc<dyn EmployeeRepository>,
    ) -> Self {
        Self {
            trainings,
            topics,
            employees,
        }
    }

    async fn link_topics(&self, training: &Training) -> ServiceResult<()> {
        let Some(reference) = training.as_ref_entry() else {
            return Ok(());
        };
        let topic_ids: Vec<TopicId> = training.topics.keys().copied().collect();
        if topic_ids.is_empty() {
            return Ok(());
        }
        let linked = self.topics.add_training(&topic_ids, &reference).await?;
        debug!(training_id = %reference.id, linked, "Linked training into topics");
        Ok(())
    }

    async fn after_status_change(&self, id: TrainingId, status: TrainingStatus) -> ServiceResult<()> {
        let Some(training) = self.trainings.find_by_id(id).await? else {
            return Ok(());
        };
        self.link_topics(&training).await?;

        if status == TrainingStatus::Completed {
            if let Some(reference) = training.as_ref_entry() {
                let trainers: Vec<EmployeeGuid> = training
                    .trainers
                    .keys()
                    .map(|guid| EmployeeGuid::normalized(guid))
                    .collect();
                let updated = self
                    .employees
                    .add_training(&trainers, &reference, TrainingRole::Imparted)
                    .await?;
                info!(training_id = %id, trainers = updated, "Recorded completed training for trainers");
            }
        }
        Ok(())
    }
}

#[async_trait]
impl TrainingService for StandardTrainingService {
    async fn add(&self, _caller: &Caller, training: Training) -> ServiceResult<Training> {
        let training = self.trainings.insert(training).await?;
        self.link_topics(&training).await?;
        info!(training_id = ?training.id, name = %training.name, "Training added");
        Ok(training)
    }

    async fn update(&self, caller: &Caller, mut training: Training) -> ServiceResult<Option<Training>> {
        let Some(id) = training.id else {
            return Err(ServiceError::InvalidOperation(
                "Training id is required for update".to_string(),
            ));
        };
        let Some(existing) = self.trainings.find_by_id(id).await? else {
            return Ok(None);
        };
        training.created_by = existing.created_by;
        training.created_at = existing.created_at;
        // Status moves only through the state machine; likes, comments and
        // attachments have their own operations
        training.status = existing.status;
        training.likes_count = existing.likes_count;
        training.liked_by = existing.liked_by;
        training.comments = existing.comments;
        training.attachments = existing.attachments;
        training.last_modified_by = Some(caller.stamp());
        Ok(Some(self.trainings.save(training).await?))
    }

    async fn update_field(
        &self,
        caller: &Caller,
        id: TrainingId,
        entry: FieldEntry,
    ) -> ServiceResult<Option<ChangeEvent>> {
        let Some(current) = self.trainings.find_status(id).await? else {
            return Ok(None);
        };
        let field = parse_training_field(&entry)?;

        if let TrainingField::Status(target) = field {
            if !current.can_transition_to(target) {
                return Err(ServiceError::InvalidOperation(format!(
                    "Status can't be set to {}",
                    target
                )));
            }
        }

        let applied = self
            .trainings
            .update_field(id, field.clone(), &caller.stamp())
            .await?;
        if !applied {
            if let TrainingField::Status(target) = field {
                // Refused under the lock: another writer moved the status first
                if self.trainings.find_status(id).await?.is_some() {
                    return Err(ServiceError::InvalidOperation(format!(
                        "Status can't be set to {}",
                        target
                    )));
                }
            }
            debug!(training_id = %id, field = field.name(), "Training patch not applied");
            return Ok(None);
        }

        let change = match field {
            TrainingField::Name(name) => {
                let renamed = self
                    .employees
                    .rename_training(&TrainingRef { id, name })
                    .await?;
                debug!(training_id = %id, employees = renamed, "Propagated training name");
                ChangeEvent::TrainingFieldUpdated {
                    training_id: id,
                    field: "name".to_string(),
                }
            }
            TrainingField::Status(to) => {
                self.after_status_change(id, to).await?;
                info!(training_id = %id, from = %current, to = %to, "Training status changed");
                ChangeEvent::TrainingStatusChanged {
                    training_id: id,
                    from: current,
                    to,
                }
            }
            other => ChangeEvent::TrainingFieldUpdated {
                training_id: id,
                field: other.name().to_string(),
            },
        };
        Ok(Some(change))
    }

    async fn get_training(&self, _caller: &Caller, id: TrainingId) -> ServiceResult<Option<Training>> {
        Ok(self.trainings.find_by_id(id).await?)
    }

    async fn get_training_by_name(&self, _caller: &Caller, name: &str) -> ServiceResult<Option<Training>> {
        Ok(self.trainings.find_by_name(name).await?)
    }

    async fn get_all(
        &self,
        _caller: &Caller,
        page: PageRequest,
        status: Option<TrainingStatus>,
    ) -> ServiceResult<Page<Training>> {
        Ok(self.trainings.find_all(&page, status).await?)
    }

    async fn search(
        &self,
        _caller: &Caller,
        term: &str,
        page: PageRequest,
        status: Option<TrainingStatus>,
    ) -> ServiceResult<Page<Training>> {
        Ok(self.trainings.search(term, &page, status).await?)
    }

    async fn get_all_by_ids(&self, _caller: &Caller, ids: &[TrainingId]) -> ServiceResult<Vec<Training>> {
        Ok(self.trainings.find_all_by_ids(ids).await?)
    }

    async fn count(&self, _caller: &Caller) -> ServiceResult<u64> {
        Ok(self.trainings.count().await?)
    }

    async fn delete(&self, _caller: &Caller, id: TrainingId) -> ServiceResult<bool> {
        let deleted = self.trainings.delete(id).await?;
        if deleted {
            info!(training_id = %id, "Training deleted");
        }
        Ok(deleted)
    }

    async fn update_likes(
        &self,
        caller: &Caller,
        id: TrainingId,
        like: LikeType,
    ) -> ServiceResult<Option<Training>> {
        Ok(self.trainings.update_likes(id, like, &caller.stamp()).await?)
    }

    async fn get_topics(
        &self,
        _caller: &Caller,
        id: TrainingId,
    ) -> ServiceResult<Option<BTreeMap<TopicId, String>>> {
        Ok(self.trainings.find_by_id(id).await?.map(|t| t.topics))
    }

    async fn get_trainees(
        &self,
        _caller: &Caller,
        id: TrainingId,
    ) -> ServiceResult<Option<BTreeMap<String, String>>> {
        Ok(self.trainings.find_by_id(id).await?.map(|t| t.trainees))
    }

    async fn set_training_status(
        &self,
        _caller: &Caller,
        id: TrainingId,
        status: TrainingStatus,
    ) -> ServiceResult<Option<Training>> {
        match self.trainings.set_status(id, status).await? {
            None => Ok(None),
            Some(StatusWrite::Applied(training)) => Ok(Some(training)),
            Some(StatusWrite::Refused(current)) => Err(ServiceError::InvalidOperation(format!(
                "Training can't set to status: {}",
                current
            ))),
        }
    }
}

/// Convert a raw patch into the typed form the store accepts.
pub fn parse_training_field(entry: &FieldEntry) -> ServiceResult<TrainingField> {
    if entry.is("name") {
        let name = required_text(entry)?;
        return Ok(TrainingField::Name(name));
    }
    if entry.is("description") {
        return Ok(TrainingField::Description(entry.value_text()));
    }
    if entry.is("status") {
        let raw = required_text(entry)?;
        let status = raw
            .parse::<TrainingStatus>()
            .map_err(|e| ServiceError::InvalidOperation(e.to_string()))?;
        return Ok(TrainingField::Status(status));
    }
    if entry.is("scheduledOn") {
        return Ok(TrainingField::ScheduledOn(parse_schedule(&entry.value)?));
    }
    if entry.is("trainers") {
        return Ok(TrainingField::Trainers(parse_people(entry)?));
    }
    if entry.is("trainees") {
        return Ok(TrainingField::Trainees(parse_people(entry)?));
    }
    Err(ServiceError::InvalidOperation(format!(
        "Field {} can't be updated",
        entry.name
    )))
}

/// Accepts RFC 3339, a bare `YYYY-MM-DD` date, or epoch milliseconds.
pub fn parse_schedule(value: &Value) -> ServiceResult<Option<DateTime<Utc>>> {
    let invalid = || ServiceError::InvalidOperation(format!("Invalid date: {}", value));
    match value {
        Value::Null => Ok(None),
        Value::String(raw) => {
            let raw = raw.trim();
            if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
                return Ok(Some(ts.with_timezone(&Utc)));
            }
            let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid())?;
            let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(invalid)?;
            Ok(Some(Utc.from_utc_datetime(&midnight)))
        }
        Value::Number(n) => {
            let millis = n.as_i64().ok_or_else(invalid)?;
            Utc.timestamp_millis_opt(millis).single().map(Some).ok_or_else(invalid)
        }
        _ => Err(invalid()),
    }
}

fn required_text(entry: &FieldEntry) -> ServiceResult<String> {
    match entry.value_text() {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ServiceError::InvalidOperation(format!(
            "Field {} requires a value",
            entry.name
        ))),
    }
}

pub(crate) fn parse_people(entry: &FieldEntry) -> ServiceResult<BTreeMap<String, String>> {
    match &entry.value {
        Value::Null => Ok(BTreeMap::new()),
        Value::Object(map) => map
            .iter()
            .map(|(guid, name)| match name {
                Value::String(name) => Ok((guid.clone(), name.clone())),
                other => Err(ServiceError::InvalidOperation(format!(
                    "Field {} expects names, got {}",
                    entry.name, other
                ))),
            })
            .collect(),
        other => Err(ServiceError::InvalidOperation(format!(
            "Field {} expects an object, got {}",
            entry.name, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::employee::Employee;
    use crate::domain::topic::Topic;
    use crate::infrastructure::repositories::{
        InMemoryEmployeeRepository, InMemoryTopicRepository, InMemoryTrainingRepository,
    };
    use crate::domain::attachment::{FileAttachmentInfo, StoredFile};
    use crate::domain::caller::UserStamp;
    use crate::domain::comment::{Comment, CommentId};
    use crate::domain::repository::RepositoryError;
    use bytes::Bytes;
    use chrono::Datelike;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct Fixture {
        service: StandardTrainingService,
        trainings: Arc<InMemoryTrainingRepository>,
        topics: Arc<InMemoryTopicRepository>,
        employees: Arc<InMemoryEmployeeRepository>,
    }

    fn fixture() -> Fixture {
        let trainings = Arc::new(InMemoryTrainingRepository::new());
        let topics = Arc::new(InMemoryTopicRepository::new());
        let employees = Arc::new(InMemoryEmployeeRepository::new());
        let service =
            StandardTrainingService::new(trainings.clone(), topics.clone(), employees.clone());
        Fixture {
            service,
            trainings,
            topics,
            employees,
        }
    }

    fn caller() -> Caller {
        Caller::new("G1", "Ada")
    }

    async fn seed(f: &Fixture, status: TrainingStatus) -> TrainingId {
        let mut training = Training::new("Ownership in practice")
            .with_topic(TopicId(1), "Rust")
            .with_trainer("g7", "Grace");
        training.id = Some(TrainingId(10));
        training.status = status;
        f.trainings.insert(training).await.unwrap();
        TrainingId(10)
    }

    #[tokio::test]
    async fn test_add_links_topics() {
        let f = fixture();
        let mut topic = Topic::new("Rust");
        topic.id = Some(TopicId(1));
        f.topics.insert(topic).await.unwrap();

        let mut training = Training::new("Lifetimes").with_topic(TopicId(1), "Rust");
        training.id = Some(TrainingId(3));
        f.service.add(&caller(), training).await.unwrap();

        let topic = f.topics.find_by_id(TopicId(1)).await.unwrap().unwrap();
        assert_eq!(topic.trainings.get(&TrainingId(3)).map(String::as_str), Some("Lifetimes"));
    }

    #[tokio::test]
    async fn test_schedule_from_nominated() {
        let f = fixture();
        let id = seed(&f, TrainingStatus::Nominated).await;

        let change = f
            .service
            .update_field(&caller(), id, FieldEntry::new("status", "SCHEDULED"))
            .await
            .unwrap();

        assert_eq!(
            change,
            Some(ChangeEvent::TrainingStatusChanged {
                training_id: id,
                from: TrainingStatus::Nominated,
                to: TrainingStatus::Scheduled,
            })
        );
        let stored = f.trainings.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.status, TrainingStatus::Scheduled);
    }

    #[tokio::test]
    async fn test_invalid_transitions_rejected() {
        let f = fixture();
        let id = seed(&f, TrainingStatus::Scheduled).await;

        let err = f
            .service
            .update_field(&caller(), id, FieldEntry::new("status", "SCHEDULED"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ServiceError::InvalidOperation("Status can't be set to SCHEDULED".to_string())
        );

        f.trainings
            .update_field(id, TrainingField::Status(TrainingStatus::Completed), &caller().stamp())
            .await
            .unwrap();
        let err = f
            .service
            .update_field(&caller(), id, FieldEntry::new("status", "CANCELLED"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidOperation(_)));
        let stored = f.trainings.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.status, TrainingStatus::Completed);
    }

    #[tokio::test]
    async fn test_completion_marks_trainers() {
        let f = fixture();
        f.employees.insert(Employee::new("G7", "Grace")).await.unwrap();
        let id = seed(&f, TrainingStatus::Scheduled).await;

        f.service
            .update_field(&caller(), id, FieldEntry::new("status", "completed"))
            .await
            .unwrap();

        let grace = f
            .employees
            .find_by_guid(&EmployeeGuid::normalized("g7"))
            .await
            .unwrap()
            .unwrap();
        assert!(grace.trainings_imparted.contains_key(&id));
    }

    #[tokio::test]
    async fn test_rename_propagates_to_employees() {
        let f = fixture();
        let id = seed(&f, TrainingStatus::Nominated).await;
        let mut grace = Employee::new("G7", "Grace");
        grace.trainings_imparted.insert(id, "Ownership in practice".to_string());
        f.employees.insert(grace).await.unwrap();

        f.service
            .update_field(&caller(), id, FieldEntry::new("name", "Borrowing in practice"))
            .await
            .unwrap();

        let grace = f
            .employees
            .find_by_guid(&EmployeeGuid::normalized("G7"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            grace.trainings_imparted.get(&id).map(String::as_str),
            Some("Borrowing in practice")
        );
    }

    #[tokio::test]
    async fn test_patch_on_missing_training_is_none() {
        let f = fixture();
        let change = f
            .service
            .update_field(&caller(), TrainingId(404), FieldEntry::new("name", "x"))
            .await
            .unwrap();
        assert!(change.is_none());
    }

    #[tokio::test]
    async fn test_unknown_field_rejected() {
        let f = fixture();
        let id = seed(&f, TrainingStatus::Nominated).await;
        let err = f
            .service
            .update_field(&caller(), id, FieldEntry::new("likesCount", 99))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ServiceError::InvalidOperation("Field likesCount can't be updated".to_string())
        );
    }

    #[tokio::test]
    async fn test_set_training_status() {
        let f = fixture();
        let id = seed(&f, TrainingStatus::Completed).await;

        let err = f
            .service
            .set_training_status(&caller(), id, TrainingStatus::Cancelled)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ServiceError::InvalidOperation("Training can't set to status: COMPLETED".to_string())
        );

        let missing = f
            .service
            .set_training_status(&caller(), TrainingId(99), TrainingStatus::Cancelled)
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_set_training_status_rejects_same_status() {
        let f = fixture();
        let id = seed(&f, TrainingStatus::Scheduled).await;

        let err = f
            .service
            .set_training_status(&caller(), id, TrainingStatus::Scheduled)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ServiceError::InvalidOperation("Training can't set to status: SCHEDULED".to_string())
        );

        let done = f
            .service
            .set_training_status(&caller(), id, TrainingStatus::Completed)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(done.status, TrainingStatus::Completed);
    }

    #[tokio::test]
    async fn test_full_update_keeps_server_owned_fields() {
        let f = fixture();
        let id = seed(&f, TrainingStatus::Scheduled).await;
        f.trainings
            .update_field(id, TrainingField::Status(TrainingStatus::Completed), &caller().stamp())
            .await
            .unwrap();
        f.trainings.update_likes(id, LikeType::Like, &caller().stamp()).await.unwrap();
        let mut comment = Comment::new("Great session");
        comment.id = Some(CommentId(1));
        f.trainings.add_comment(id, comment).await.unwrap();
        let file = StoredFile::new(id, "slides.pdf", "application/pdf", Bytes::from_static(b"%PDF"));
        f.trainings.attach_file(file).await.unwrap();

        let mut edited = f.trainings.find_by_id(id).await.unwrap().unwrap();
        edited.name = "Ownership revisited".to_string();
        edited.status = TrainingStatus::Nominated;
        edited.likes_count = 999;
        edited.liked_by.clear();
        edited.comments.clear();
        edited.attachments.clear();

        let updated = f.service.update(&caller(), edited).await.unwrap().unwrap();
        assert_eq!(updated.name, "Ownership revisited");
        assert_eq!(updated.status, TrainingStatus::Completed);
        assert_eq!(updated.likes_count, 1);
        assert_eq!(updated.liked_by.len(), 1);
        assert_eq!(updated.comments.len(), 1);
        assert_eq!(updated.attachments.len(), 1);

        let stored = f.trainings.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn test_status_patch_losing_a_race_is_rejected() {
        let trainings = InMemoryTrainingRepository::new();
        let mut training = Training::new("Ownership in practice");
        training.id = Some(TrainingId(10));
        training.status = TrainingStatus::Scheduled;
        trainings.insert(training).await.unwrap();

        let racing = Arc::new(CompletingOnRead {
            inner: trainings.clone(),
            fired: AtomicBool::new(false),
        });
        let service = StandardTrainingService::new(
            racing,
            Arc::new(InMemoryTopicRepository::new()),
            Arc::new(InMemoryEmployeeRepository::new()),
        );

        let err = service
            .update_field(&caller(), TrainingId(10), FieldEntry::new("status", "CANCELLED"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ServiceError::InvalidOperation("Status can't be set to CANCELLED".to_string())
        );
        assert_eq!(
            trainings.find_status(TrainingId(10)).await.unwrap(),
            Some(TrainingStatus::Completed)
        );
    }

    /// Completes the training right after the first status read, as a
    /// concurrent writer would.
    struct CompletingOnRead {
        inner: InMemoryTrainingRepository,
        fired: AtomicBool,
    }

    #[async_trait]
    impl TrainingRepository for CompletingOnRead {
        async fn insert(&self, training: Training) -> Result<Training, RepositoryError> {
            self.inner.insert(training).await
        }

        async fn save(&self, training: Training) -> Result<Training, RepositoryError> {
            self.inner.save(training).await
        }

        async fn find_by_id(&self, id: TrainingId) -> Result<Option<Training>, RepositoryError> {
            self.inner.find_by_id(id).await
        }

        async fn find_by_name(&self, name: &str) -> Result<Option<Training>, RepositoryError> {
            self.inner.find_by_name(name).await
        }

        async fn find_all_by_ids(&self, ids: &[TrainingId]) -> Result<Vec<Training>, RepositoryError> {
            self.inner.find_all_by_ids(ids).await
        }

        async fn find_all(
            &self,
            page: &PageRequest,
            status: Option<TrainingStatus>,
        ) -> Result<Page<Training>, RepositoryError> {
            self.inner.find_all(page, status).await
        }

        async fn search(
            &self,
            term: &str,
            page: &PageRequest,
            status: Option<TrainingStatus>,
        ) -> Result<Page<Training>, RepositoryError> {
            self.inner.search(term, page, status).await
        }

        async fn count(&self) -> Result<u64, RepositoryError> {
            self.inner.count().await
        }

        async fn delete(&self, id: TrainingId) -> Result<bool, RepositoryError> {
            self.inner.delete(id).await
        }

        async fn update_field(
            &self,
            id: TrainingId,
            field: TrainingField,
            modified_by: &UserStamp,
        ) -> Result<bool, RepositoryError> {
            self.inner.update_field(id, field, modified_by).await
        }

        async fn find_status(&self, id: TrainingId) -> Result<Option<TrainingStatus>, RepositoryError> {
            let status = self.inner.find_status(id).await?;
            if !self.fired.swap(true, Ordering::SeqCst) {
                self.inner
                    .update_field(id, TrainingField::Status(TrainingStatus::Completed), &caller().stamp())
                    .await?;
            }
            Ok(status)
        }

        async fn set_status(
            &self,
            id: TrainingId,
            status: TrainingStatus,
        ) -> Result<Option<StatusWrite>, RepositoryError> {
            self.inner.set_status(id, status).await
        }

        async fn update_likes(
            &self,
            id: TrainingId,
            like: LikeType,
            user: &UserStamp,
        ) -> Result<Option<Training>, RepositoryError> {
            self.inner.update_likes(id, like, user).await
        }

        async fn add_comment(
            &self,
            id: TrainingId,
            comment: Comment,
        ) -> Result<Option<Comment>, RepositoryError> {
            self.inner.add_comment(id, comment).await
        }

        async fn add_comment_reply(
            &self,
            id: TrainingId,
            parent: CommentId,
            reply: Comment,
        ) -> Result<Option<Comment>, RepositoryError> {
            self.inner.add_comment_reply(id, parent, reply).await
        }

        async fn find_comments(&self, id: TrainingId) -> Result<Option<Vec<Comment>>, RepositoryError> {
            self.inner.find_comments(id).await
        }

        async fn remove_comment(&self, id: TrainingId, comment: CommentId) -> Result<bool, RepositoryError> {
            self.inner.remove_comment(id, comment).await
        }

        async fn remove_comment_reply(
            &self,
            id: TrainingId,
            comment: CommentId,
            reply: CommentId,
        ) -> Result<bool, RepositoryError> {
            self.inner.remove_comment_reply(id, comment, reply).await
        }

        async fn attachment_exists(&self, id: TrainingId, file_name: &str) -> Result<bool, RepositoryError> {
            self.inner.attachment_exists(id, file_name).await
        }

        async fn attach_file(&self, file: StoredFile) -> Result<Option<FileAttachmentInfo>, RepositoryError> {
            self.inner.attach_file(file).await
        }

        async fn find_attachments(&self, id: TrainingId) -> Result<Vec<FileAttachmentInfo>, RepositoryError> {
            self.inner.find_attachments(id).await
        }

        async fn find_attachment(
            &self,
            id: TrainingId,
            file_name: &str,
        ) -> Result<Option<StoredFile>, RepositoryError> {
            self.inner.find_attachment(id, file_name).await
        }

        async fn remove_attachment(&self, id: TrainingId, file_name: &str) -> Result<bool, RepositoryError> {
            self.inner.remove_attachment(id, file_name).await
        }
    }

    #[test]
    fn test_parse_schedule_formats() {
        let ts = parse_schedule(&json!("2026-03-14T12:30:00+02:00")).unwrap().unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-03-14T10:30:00+00:00");

        let day = parse_schedule(&json!("2026-03-14")).unwrap().unwrap();
        assert_eq!((day.year(), day.month(), day.day()), (2026, 3, 14));

        assert_eq!(parse_schedule(&Value::Null).unwrap(), None);
        assert!(parse_schedule(&json!("next tuesday")).is_err());
        assert!(parse_schedule(&json!(true)).is_err());
    }

    #[test]
    fn test_parse_people() {
        let entry = FieldEntry::new("trainers", json!({"G1": "Ada", "G2": "Alan"}));
        let people = parse_people(&entry).unwrap();
        assert_eq!(people.len(), 2);

        let entry = FieldEntry::new("trainers", json!(["G1"]));
        assert!(parse_people(&entry).is_err());
    }
}
