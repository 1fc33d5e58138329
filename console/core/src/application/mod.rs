// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod agent_search;
pub mod coordinate_resolver;
pub mod assignment_workflow;
pub mod intake_workflow;

// Re-export use cases for convenience
pub use agent_search::AgentSearchOrchestrator;
pub use coordinate_resolver::CoordinateResolver;
pub use assignment_workflow::AssignmentWorkflow;
pub use intake_workflow::{IntakeWorkflow, SubmitOutcome};
