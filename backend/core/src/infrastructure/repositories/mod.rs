// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Repository Implementations
//!
//! In-memory implementations of the repository traits defined in the domain
//! layer, plus the identifier allocator.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Persist and retrieve domain aggregates
//! - **Pattern:** Repository (DDD), Adapter (Hexagonal Architecture)
//!
//! Every store keeps its state behind an `Arc<RwLock<..>>`, so clones share
//! the same data and are cheap to hand to several services.

mod allocator;
mod employee;
mod feedback;
pub mod query;
mod topic;
mod training;

pub use allocator::InMemoryIdAllocator;
pub use employee::InMemoryEmployeeRepository;
pub use feedback::InMemoryFeedbackRepository;
pub use topic::InMemoryTopicRepository;
pub use training::InMemoryTrainingRepository;
