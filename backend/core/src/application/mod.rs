// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod attachment;
pub mod comment;
pub mod employee;
pub mod error;
pub mod feedback;
pub mod mail_dispatcher;
pub mod notifier;
pub mod pipeline;
pub mod pipelined;
pub mod service_factory;
pub mod topic;
pub mod training;

// Re-export the public entry points for convenience
pub use error::{ServiceError, ServiceResult};
pub use notifier::{DisabledNotifier, Notifier};
pub use pipeline::InterceptionPipeline;
pub use pipelined::{
    PipelinedAttachmentService, PipelinedCommentService, PipelinedEmployeeService,
    PipelinedFeedbackService, PipelinedTopicService, PipelinedTrainingService,
};
pub use service_factory::{build_in_memory_services, create_notifier, LunchLearnServices};
