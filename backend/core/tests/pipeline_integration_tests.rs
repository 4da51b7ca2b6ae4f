// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::collections::HashSet;

use bytes::Bytes;
use lunchlearn_core::application::service_factory::{build_in_memory_services, LunchLearnServices};
use lunchlearn_core::application::ServiceError;
use lunchlearn_core::domain::caller::Caller;
use lunchlearn_core::domain::comment::Comment;
use lunchlearn_core::domain::config::LunchLearnConfig;
use lunchlearn_core::domain::employee::{Employee, EmployeeGuid};
use lunchlearn_core::domain::events::{ChangeEvent, NotificationEvent, NotificationKind};
use lunchlearn_core::domain::feedback::Feedback;
use lunchlearn_core::domain::field::FieldEntry;
use lunchlearn_core::domain::page::{Direction, PageRequest, Sort};
use lunchlearn_core::domain::repository::EmployeeRepository;
use lunchlearn_core::domain::topic::{Topic, TopicId};
use lunchlearn_core::domain::training::{Training, TrainingId, TrainingStatus};
use lunchlearn_core::infrastructure::event_bus::EventReceiver;

fn ada() -> Caller {
    Caller::new("g-ada", "Ada")
}

fn bob() -> Caller {
    Caller::new("g-bob", "Bob")
}

fn setup() -> (LunchLearnServices, EventReceiver) {
    let services = build_in_memory_services(&LunchLearnConfig::default());
    let receiver = services.event_bus.subscribe();
    (services, receiver)
}

fn kinds(receiver: &mut EventReceiver) -> Vec<NotificationKind> {
    receiver.drain().iter().map(NotificationEvent::kind).collect()
}

async fn nominate(services: &LunchLearnServices, name: &str) -> TrainingId {
    services
        .trainings
        .add(&ada(), Training::new(name).with_trainer("g-grace", "Grace"))
        .await
        .unwrap()
        .id
        .unwrap()
}

#[tokio::test]
async fn test_created_entities_get_unique_ids_and_creator() {
    let (services, mut receiver) = setup();

    let mut ids = HashSet::new();
    for name in ["Ownership", "Lifetimes", "Async"] {
        let training = services.trainings.add(&ada(), Training::new(name)).await.unwrap();
        assert_eq!(training.status, TrainingStatus::Nominated);
        assert_eq!(training.created_by.as_ref().map(|s| s.guid.as_str()), Some("g-ada"));
        assert!(training.created_at.is_some());
        assert!(ids.insert(training.id.unwrap()));
    }

    let topic = services.topics.add(&bob(), Topic::new("Rust")).await.unwrap();
    assert_eq!(topic.id, Some(TopicId(1)));
    assert_eq!(topic.created_by.map(|s| s.name), Some("Bob".to_string()));

    assert_eq!(
        kinds(&mut receiver),
        vec![
            NotificationKind::TrainingAdded,
            NotificationKind::TrainingAdded,
            NotificationKind::TrainingAdded,
            NotificationKind::TopicAdded,
        ]
    );
}

#[tokio::test]
async fn test_client_supplied_audit_fields_are_overwritten() {
    let (services, _receiver) = setup();

    let mut forged = Training::new("Forged");
    forged.id = Some(TrainingId(999));
    forged.status = TrainingStatus::Completed;
    forged.likes_count = 42;

    let training = services.trainings.add(&ada(), forged).await.unwrap();
    assert_eq!(training.id, Some(TrainingId(1)));
    assert_eq!(training.status, TrainingStatus::Nominated);
    assert_eq!(training.likes_count, 0);
}

#[tokio::test]
async fn test_second_feedback_from_same_respondent_is_rejected() {
    let (services, mut receiver) = setup();
    let first = nominate(&services, "Ownership").await;
    let second = nominate(&services, "Lifetimes").await;
    receiver.drain();

    services
        .feedback
        .add(&bob(), Feedback::new(first).with_answer("Useful?", "Yes"))
        .await
        .unwrap();

    let err = services
        .feedback
        .add(&bob(), Feedback::new(first).with_answer("Useful?", "Still yes"))
        .await
        .unwrap_err();
    assert_eq!(err, ServiceError::DuplicateResource("Feedback already exist".to_string()));

    // Same respondent on another training, another respondent on the same one
    services.feedback.add(&bob(), Feedback::new(second)).await.unwrap();
    services.feedback.add(&ada(), Feedback::new(first)).await.unwrap();

    assert_eq!(
        kinds(&mut receiver),
        vec![NotificationKind::FeedbackAdded; 3]
    );
    assert_eq!(services.id_allocator.current("feedback"), 3);
}

#[tokio::test]
async fn test_status_transitions_through_field_patches() {
    let (services, mut receiver) = setup();
    let id = nominate(&services, "Ownership").await;
    receiver.drain();

    let change = services
        .trainings
        .update_field(&ada(), id, FieldEntry::new("status", "SCHEDULED"))
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
    assert_eq!(kinds(&mut receiver), vec![NotificationKind::TrainingScheduled]);

    let err = services
        .trainings
        .update_field(&ada(), id, FieldEntry::new("status", "SCHEDULED"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ServiceError::InvalidOperation("Status can't be set to SCHEDULED".to_string())
    );

    services
        .trainings
        .update_field(&ada(), id, FieldEntry::new("status", "COMPLETED"))
        .await
        .unwrap();
    let err = services
        .trainings
        .update_field(&ada(), id, FieldEntry::new("status", "CANCELLED"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidOperation(_)));

    let stored = services.trainings.get_training(&ada(), id).await.unwrap();
    assert_eq!(stored.status, TrainingStatus::Completed);
    assert!(receiver.drain().is_empty());
}

#[tokio::test]
async fn test_cancel_and_postpone_notify_exactly_once() {
    let (services, mut receiver) = setup();
    let cancelled = nominate(&services, "Ownership").await;
    let postponed = nominate(&services, "Lifetimes").await;
    receiver.drain();

    services
        .trainings
        .update_field(&ada(), cancelled, FieldEntry::new("status", "CANCELLED"))
        .await
        .unwrap();
    services
        .trainings
        .update_field(&ada(), postponed, FieldEntry::new("status", "POSTPONED"))
        .await
        .unwrap();

    let events = receiver.drain();
    assert_eq!(events.len(), 2);
    assert!(matches!(
        events[0],
        NotificationEvent::TrainingCancelled { training_id, status: TrainingStatus::Cancelled, .. }
            if training_id == cancelled
    ));
    assert!(matches!(
        events[1],
        NotificationEvent::TrainingCancelled { training_id, status: TrainingStatus::Postponed, .. }
            if training_id == postponed
    ));
}

#[tokio::test]
async fn test_completion_marks_trainers_as_imparted() {
    let (services, _receiver) = setup();
    services
        .employees
        .add(&ada(), Employee::new("g-grace", "Grace"))
        .await
        .unwrap();
    let id = nominate(&services, "Ownership").await;

    services
        .trainings
        .update_field(&ada(), id, FieldEntry::new("status", "SCHEDULED"))
        .await
        .unwrap();
    services
        .trainings
        .update_field(&ada(), id, FieldEntry::new("status", "COMPLETED"))
        .await
        .unwrap();

    let grace = services
        .employee_repository
        .find_by_guid(&EmployeeGuid::normalized("g-grace"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        grace.trainings_imparted.get(&id).map(String::as_str),
        Some("Ownership")
    );
}

#[tokio::test]
async fn test_set_training_status_rejects_invalid_transition() {
    let (services, _receiver) = setup();
    let id = nominate(&services, "Ownership").await;

    let training = services
        .trainings
        .set_training_status(&ada(), id, TrainingStatus::Scheduled)
        .await
        .unwrap();
    assert_eq!(training.status, TrainingStatus::Scheduled);

    let err = services
        .trainings
        .set_training_status(&ada(), id, TrainingStatus::Scheduled)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ServiceError::InvalidOperation("Training can't set to status: SCHEDULED".to_string())
    );
}

#[tokio::test]
async fn test_full_update_cannot_reopen_completed_training() {
    let (services, _receiver) = setup();
    let id = nominate(&services, "Ownership").await;
    services
        .trainings
        .set_training_status(&ada(), id, TrainingStatus::Completed)
        .await
        .unwrap();
    services
        .comments
        .add(&bob(), id, Comment::new("Loved it"))
        .await
        .unwrap();

    let mut edited = services.trainings.get_training(&ada(), id).await.unwrap();
    edited.description = Some("Moves and borrows".to_string());
    edited.status = TrainingStatus::Nominated;
    edited.comments.clear();
    edited.likes_count = 999;

    let updated = services.trainings.update(&ada(), edited).await.unwrap();
    assert_eq!(updated.description.as_deref(), Some("Moves and borrows"));
    assert_eq!(updated.status, TrainingStatus::Completed);
    assert_eq!(updated.comments.len(), 1);
    assert_eq!(updated.likes_count, 0);
}

#[tokio::test]
async fn test_missing_entities_read_as_not_found() {
    let (services, _receiver) = setup();

    let err = services.trainings.get_training(&ada(), TrainingId(7)).await.unwrap_err();
    assert_eq!(err, ServiceError::ResourceNotFound("Training does not exist".to_string()));

    let err = services.topics.get_topic(&ada(), TopicId(7)).await.unwrap_err();
    assert_eq!(err, ServiceError::ResourceNotFound("Topic does not exist".to_string()));

    let err = services.employees.get_employee(&ada(), "nobody").await.unwrap_err();
    assert_eq!(err, ServiceError::ResourceNotFound("Employee does not exist".to_string()));

    // Children of a missing training report the training
    let err = services
        .comments
        .add(&ada(), TrainingId(7), Comment::new("Hello"))
        .await
        .unwrap_err();
    assert_eq!(err, ServiceError::ResourceNotFound("Training does not exist".to_string()));

    let err = services
        .attachments
        .add(&ada(), TrainingId(7), "slides.pdf", "application/pdf", Bytes::from_static(b"%PDF"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    // Present results pass through
    let id = nominate(&services, "Ownership").await;
    let found = services.trainings.get_training(&ada(), id).await.unwrap();
    assert_eq!(found.name, "Ownership");
}

#[tokio::test]
async fn test_listings_fall_back_to_configured_sort() {
    let (services, _receiver) = setup();
    for name in ["Conference recap", "Borrow checker", "Async conference"] {
        nominate(&services, name).await;
    }

    // No term matches everything
    let page = services
        .trainings
        .search(&ada(), "", PageRequest::new(0, 10), None)
        .await
        .unwrap();
    assert_eq!(page.total_elements, 3);

    let page = services
        .trainings
        .search(&ada(), "conference", PageRequest::new(0, 10), None)
        .await
        .unwrap();
    assert_eq!(page.total_elements, 2);

    // An explicit sort is kept as given
    let page = services
        .trainings
        .get_all(
            &ada(),
            PageRequest::sorted(0, 10, Sort::by("name", Direction::Asc)),
            None,
        )
        .await
        .unwrap();
    let names: Vec<&str> = page.content.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Async conference", "Borrow checker", "Conference recap"]);
}

#[tokio::test]
async fn test_comments_and_attachments_flow_through_pipeline() {
    let (services, mut receiver) = setup();
    let id = nominate(&services, "Ownership").await;
    receiver.drain();

    let comment = services
        .comments
        .add(&bob(), id, Comment::new("Can't wait"))
        .await
        .unwrap();
    assert_eq!(comment.owner.as_ref().map(|o| o.guid.as_str()), Some("g-bob"));

    let reply = services
        .comments
        .add_reply(&ada(), id, comment.id.unwrap(), Comment::new("Me neither"))
        .await
        .unwrap();
    assert_ne!(reply.id, comment.id);

    let info = services
        .attachments
        .add(&ada(), id, "slides.pdf", "application/pdf", Bytes::from_static(b"%PDF-1.7"))
        .await
        .unwrap();
    assert_eq!(info.size_bytes, 8);

    let err = services
        .attachments
        .add(&ada(), id, "slides.pdf", "application/pdf", Bytes::from_static(b"%PDF"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::DuplicateResource(_)));

    let file = services
        .attachments
        .get_attachment(&ada(), id, "slides.pdf")
        .await
        .unwrap();
    assert_eq!(file.content, Bytes::from_static(b"%PDF-1.7"));

    assert_eq!(
        kinds(&mut receiver),
        vec![
            NotificationKind::CommentAdded,
            NotificationKind::CommentAdded,
            NotificationKind::AttachmentAdded,
        ]
    );
}

#[tokio::test]
async fn test_renaming_training_updates_employee_history() {
    let (services, mut receiver) = setup();
    services
        .employees
        .add(&ada(), Employee::new("g-grace", "Grace"))
        .await
        .unwrap();
    let id = nominate(&services, "Ownership").await;
    services
        .employees
        .add_training_to(
            &ada(),
            &["g-grace".to_string()],
            &lunchlearn_core::domain::training::TrainingRef {
                id,
                name: "Ownership".to_string(),
            },
            lunchlearn_core::domain::employee::TrainingRole::Attended,
        )
        .await
        .unwrap();
    receiver.drain();

    let change = services
        .trainings
        .update_field(&ada(), id, FieldEntry::new("name", "Ownership in practice"))
        .await
        .unwrap();
    assert!(matches!(change, Some(ChangeEvent::TrainingFieldUpdated { .. })));
    // Plain field edits carry no notification
    assert!(receiver.drain().is_empty());

    let grace = services.employees.get_employee(&ada(), "G-GRACE").await.unwrap();
    assert_eq!(
        grace.trainings_attended.get(&id).map(String::as_str),
        Some("Ownership in practice")
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_never_share_an_id() {
    let (services, mut receiver) = setup();

    let adds = (0..25).map(|i| {
        let services = &services;
        async move {
            services
                .trainings
                .add(&ada(), Training::new(format!("Session {}", i)))
                .await
        }
    });
    let created = futures::future::join_all(adds).await;

    let ids: HashSet<TrainingId> = created
        .into_iter()
        .map(|result| result.unwrap().id.unwrap())
        .collect();
    assert_eq!(ids.len(), 25);
    assert_eq!(receiver.drain().len(), 25);
}
