// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Scripted lifecycle demo
//!
//! Wires the in-memory stack from configuration and walks one training from
//! nomination to completion, printing every step and the notifications the
//! pipeline produced along the way.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use bytes::Bytes;
use clap::Args;
use colored::Colorize;
use tracing::info;

use lunchlearn_core::application::service_factory::{build_in_memory_services, LunchLearnServices};
use lunchlearn_core::application::ServiceError;
use lunchlearn_core::domain::caller::Caller;
use lunchlearn_core::domain::comment::Comment;
use lunchlearn_core::domain::config::LunchLearnConfig;
use lunchlearn_core::domain::employee::Employee;
use lunchlearn_core::domain::events::NotificationEvent;
use lunchlearn_core::domain::feedback::Feedback;
use lunchlearn_core::domain::field::FieldEntry;
use lunchlearn_core::domain::page::PageRequest;
use lunchlearn_core::domain::topic::Topic;
use lunchlearn_core::domain::training::{LikeType, Training, TrainingId};
use lunchlearn_core::infrastructure::event_bus::EventReceiver;
use lunchlearn_core::infrastructure::mail::LoggingMailTransport;

#[derive(Args)]
pub struct DemoArgs {
    /// Also mail notifications through the logging transport
    #[arg(long)]
    pub mail: bool,

    /// Print notifications as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: DemoArgs, config_override: Option<PathBuf>) -> Result<()> {
    let config = LunchLearnConfig::load_or_default(config_override)
        .context("Failed to load configuration")?;
    config
        .validate()
        .context("Configuration validation failed")?;

    info!(config = %config.metadata.name, mail = args.mail, "Running lifecycle demo");
    let services = build_in_memory_services(&config);
    let mut receiver = services.event_bus.subscribe();
    let dispatcher = args
        .mail
        .then(|| services.start_mail_dispatcher(Arc::new(LoggingMailTransport)));

    let mut demo = Demo {
        services: &services,
        receiver: &mut receiver,
        json: args.json,
        step: 0,
    };
    demo.run().await?;

    if let Some(handle) = dispatcher {
        // Let the dispatcher drain what was published, then stop it
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.abort();
    }

    Ok(())
}

struct Demo<'a> {
    services: &'a LunchLearnServices,
    receiver: &'a mut EventReceiver,
    json: bool,
    step: usize,
}

impl Demo<'_> {
    async fn run(&mut self) -> Result<()> {
        let admin = Caller::admin("g-admin", "Alex Admin");
        let grace = Caller::new("g-grace", "Grace");
        let eve = Caller::new("g-eve", "Eve");
        let services = self.services;

        self.heading("Register employees");
        for (guid, name) in [("g-grace", "Grace"), ("g-eve", "Eve")] {
            let employee = services
                .employees
                .add(&admin, Employee::new(guid, name))
                .await?;
            self.detail(format!("{} ({})", employee.name, employee.guid));
        }
        self.notifications()?;

        self.heading("Create a topic");
        let topic = services.topics.add(&admin, Topic::new("Rust")).await?;
        let topic_id = topic.id.context("topic was stored without an id")?;
        self.detail(format!("Topic #{} {}", topic_id, topic.name));
        self.notifications()?;

        self.heading("Nominate a training");
        let training = services
            .trainings
            .add(
                &grace,
                Training::new("Ownership in practice")
                    .with_description("Borrowing, moves and lifetimes on real code")
                    .with_topic(topic_id, topic.name.clone())
                    .with_trainer("g-grace", "Grace")
                    .with_trainee("g-eve", "Eve"),
            )
            .await?;
        let id = training.id.context("training was stored without an id")?;
        self.detail(format!(
            "Training #{} {} is {}",
            id, training.name, training.status
        ));
        self.notifications()?;

        self.heading("Like and comment");
        let liked = services.trainings.update_likes(&eve, id, LikeType::Like).await?;
        self.detail(format!("{} like(s)", liked.likes_count));
        let comment = services
            .comments
            .add(&eve, id, Comment::new("Will there be exercises?"))
            .await?;
        let comment_id = comment.id.context("comment was stored without an id")?;
        services
            .comments
            .add_reply(&grace, id, comment_id, Comment::new("Yes, bring a laptop"))
            .await?;
        self.detail(format!("Comment #{} with one reply", comment_id));
        self.notifications()?;

        self.heading("Attach slides");
        let info = services
            .attachments
            .add(
                &grace,
                id,
                "ownership.pdf",
                "application/pdf",
                Bytes::from_static(b"%PDF-1.7 demo"),
            )
            .await?;
        self.detail(format!("{} ({} bytes)", info.file_name, info.size_bytes));
        self.notifications()?;

        self.heading("Schedule");
        self.patch(&grace, id, FieldEntry::new("scheduledOn", "2026-11-05")).await?;
        self.patch(&grace, id, FieldEntry::new("status", "SCHEDULED")).await?;
        self.notifications()?;

        self.heading("Try to schedule again");
        self.patch(&grace, id, FieldEntry::new("status", "SCHEDULED")).await?;

        self.heading("Collect feedback");
        services
            .feedback
            .add(&eve, Feedback::new(id).with_answer("Useful?", "Very"))
            .await?;
        self.detail("Eve left feedback".to_string());
        match services
            .feedback
            .add(&eve, Feedback::new(id).with_answer("Useful?", "Again"))
            .await
        {
            Err(ServiceError::DuplicateResource(message)) => self.rejected(&message),
            Err(e) => return Err(e.into()),
            Ok(_) => self.detail("Second feedback accepted".to_string()),
        }
        self.notifications()?;

        self.heading("Complete");
        self.patch(&grace, id, FieldEntry::new("status", "COMPLETED")).await?;
        let trainer = services.employees.get_employee(&admin, "g-grace").await?;
        self.detail(format!(
            "{} has imparted {} training(s)",
            trainer.name,
            trainer.trainings_imparted.len()
        ));
        self.notifications()?;

        self.heading("Look up a training that does not exist");
        match services.trainings.get_training(&admin, TrainingId(404)).await {
            Err(e) if e.is_not_found() => self.rejected(&e.to_string()),
            Err(e) => return Err(e.into()),
            Ok(_) => self.detail("Unexpectedly found".to_string()),
        }

        self.heading("Search");
        let page = services
            .trainings
            .search(&admin, "ownership", PageRequest::new(0, 10), None)
            .await?;
        for training in &page.content {
            self.detail(format!("#{} {}", training.id.map_or(0, |id| id.0), training.name));
        }

        println!();
        println!("{}", "✓ Demo finished".green());
        Ok(())
    }

    async fn patch(&mut self, caller: &Caller, id: TrainingId, entry: FieldEntry) -> Result<()> {
        let label = format!("{} = {}", entry.name, entry.value);
        match self.services.trainings.update_field(caller, id, entry).await {
            Ok(Some(_)) => self.detail(format!("set {}", label)),
            Ok(None) => self.detail(format!("{} not applied", label)),
            Err(ServiceError::InvalidOperation(message)) => self.rejected(&message),
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    fn heading(&mut self, title: &str) {
        self.step += 1;
        println!();
        println!("{}", format!("{}. {}", self.step, title).bold());
    }

    fn detail(&self, line: String) {
        println!("   {}", line);
    }

    fn rejected(&self, message: &str) {
        println!("   {} {}", "rejected:".yellow(), message);
    }

    fn notifications(&mut self) -> Result<()> {
        for event in self.receiver.drain() {
            if self.json {
                println!("   {} {}", "→".cyan(), serde_json::to_string(&event)?);
            } else {
                println!("   {} {}", "→".cyan(), summarize(&event).dimmed());
            }
        }
        Ok(())
    }
}

fn summarize(event: &NotificationEvent) -> String {
    match event.training_id() {
        Some(id) => format!("{:?} (training #{})", event.kind(), id),
        None => format!("{:?}", event.kind()),
    }
}
