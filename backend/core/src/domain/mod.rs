// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain
//!
//! Aggregates, value objects, events and repository ports for the
//! Lunch & Learn training catalogue.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Pure types and rules; no I/O

pub mod attachment;
pub mod caller;
pub mod comment;
pub mod config;
pub mod employee;
pub mod entity;
pub mod events;
pub mod feedback;
pub mod field;
pub mod page;
pub mod repository;
pub mod topic;
pub mod training;
