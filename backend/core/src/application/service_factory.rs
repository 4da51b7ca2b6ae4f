// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Service Factory - Application Layer
//!
//! Wires repositories, the interception pipeline and the pipelined services
//! from a [`LunchLearnConfig`].
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Composition root for the in-memory stack

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::info;

use crate::application::attachment::StandardAttachmentService;
use crate::application::comment::StandardCommentService;
use crate::application::employee::StandardEmployeeService;
use crate::application::feedback::StandardFeedbackService;
use crate::application::mail_dispatcher::MailDispatcher;
use crate::application::notifier::{DisabledNotifier, Notifier};
use crate::application::pipeline::InterceptionPipeline;
use crate::application::pipelined::{
    PipelinedAttachmentService, PipelinedCommentService, PipelinedEmployeeService,
    PipelinedFeedbackService, PipelinedTopicService, PipelinedTrainingService,
};
use crate::application::topic::StandardTopicService;
use crate::application::training::StandardTrainingService;
use crate::domain::config::LunchLearnConfig;
use crate::infrastructure::event_bus::EventBus;
use crate::infrastructure::mail::MailTransport;
use crate::infrastructure::repositories::{
    InMemoryEmployeeRepository, InMemoryFeedbackRepository, InMemoryIdAllocator,
    InMemoryTopicRepository, InMemoryTrainingRepository,
};

/// Creates the notifier the pipeline dispatches through
pub fn create_notifier(config: &LunchLearnConfig, event_bus: &EventBus) -> Arc<dyn Notifier> {
    if config.spec.notifications.enabled {
        Arc::new(event_bus.clone())
    } else {
        info!("Notifications disabled by configuration");
        Arc::new(DisabledNotifier)
    }
}

/// The public services plus the stores behind them
pub struct LunchLearnServices {
    pub trainings: PipelinedTrainingService,
    pub topics: PipelinedTopicService,
    pub employees: PipelinedEmployeeService,
    pub comments: PipelinedCommentService,
    pub feedback: PipelinedFeedbackService,
    pub attachments: PipelinedAttachmentService,
    pub event_bus: EventBus,
    pub config: LunchLearnConfig,
    pub training_repository: Arc<InMemoryTrainingRepository>,
    pub topic_repository: Arc<InMemoryTopicRepository>,
    pub employee_repository: Arc<InMemoryEmployeeRepository>,
    pub feedback_repository: Arc<InMemoryFeedbackRepository>,
    pub id_allocator: Arc<InMemoryIdAllocator>,
}

impl LunchLearnServices {
    /// Mail every notification published from now on through `transport`
    pub fn start_mail_dispatcher(&self, transport: Arc<dyn MailTransport>) -> JoinHandle<()> {
        let dispatcher = MailDispatcher::new(
            transport,
            self.training_repository.clone(),
            self.config.spec.notifications.mail.clone(),
        );
        Arc::new(dispatcher).start(&self.event_bus)
    }
}

pub fn build_in_memory_services(config: &LunchLearnConfig) -> LunchLearnServices {
    let event_bus = EventBus::new(config.spec.notifications.event_bus_capacity);
    let notifier = create_notifier(config, &event_bus);

    let training_repository = Arc::new(InMemoryTrainingRepository::new());
    let topic_repository = Arc::new(InMemoryTopicRepository::new());
    let employee_repository = Arc::new(InMemoryEmployeeRepository::new());
    let feedback_repository = Arc::new(InMemoryFeedbackRepository::new());
    let id_allocator = Arc::new(InMemoryIdAllocator::new());

    let pipeline = Arc::new(InterceptionPipeline::from_config(
        config,
        id_allocator.clone(),
        feedback_repository.clone(),
        notifier,
    ));

    let trainings = PipelinedTrainingService::new(
        Arc::new(StandardTrainingService::new(
            training_repository.clone(),
            topic_repository.clone(),
            employee_repository.clone(),
        )),
        pipeline.clone(),
    );
    let topics = PipelinedTopicService::new(
        Arc::new(StandardTopicService::new(topic_repository.clone())),
        pipeline.clone(),
    );
    let employees = PipelinedEmployeeService::new(
        Arc::new(StandardEmployeeService::new(employee_repository.clone())),
        pipeline.clone(),
    );
    let comments = PipelinedCommentService::new(
        Arc::new(StandardCommentService::new(training_repository.clone())),
        pipeline.clone(),
    );
    let feedback = PipelinedFeedbackService::new(
        Arc::new(StandardFeedbackService::new(feedback_repository.clone())),
        pipeline.clone(),
    );
    let attachments = PipelinedAttachmentService::new(
        Arc::new(StandardAttachmentService::new(training_repository.clone())),
        pipeline,
    );

    info!(
        config = %config.metadata.name,
        notifications = config.spec.notifications.enabled,
        "In-memory services ready"
    );

    LunchLearnServices {
        trainings,
        topics,
        employees,
        comments,
        feedback,
        attachments,
        event_bus,
        config: config.clone(),
        training_repository,
        topic_repository,
        employee_repository,
        feedback_repository,
        id_allocator,
    }
}
