// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the FieldOps CLI

pub mod assign;
pub mod book;
pub mod config;

pub use self::assign::AssignArgs;
pub use self::book::BookArgs;
pub use self::config::ConfigCommand;
