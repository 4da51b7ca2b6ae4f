// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Lib
//!
//! Lunch & Learn core: training catalogue services wrapped in a
//! cross-cutting interception pipeline.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Re-exports the domain, application and infrastructure layers

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use domain::*;
