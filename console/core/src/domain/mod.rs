// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain
//!
//! Pure types and state machines for agent assignment and appointment intake.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Owns every transition rule; no I/O happens here

pub mod agent;
pub mod booking;
pub mod assignment;
pub mod intake;
pub mod services;
pub mod events;
pub mod console_config;
