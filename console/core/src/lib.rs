// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! FieldOps Console Core
//!
//! Assignment and appointment-intake workflows for the scheduling console.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** State machines, use cases, and service adapters behind the console

pub mod domain;
pub mod application;
pub mod infrastructure;

pub use domain::*;
