// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Assignment Workflow
//!
//! Runtime host for one booking's [`AssignmentMachine`].
//!
//! # DDD Pattern: Application Service
//!
//! - **Layer:** Application
//! - **Responsibility:** Carry out the machine's effects
//! - **Collaborators:**
//!   - Domain: AssignmentMachine, AssignmentNotifier
//!   - Application: AgentSearchOrchestrator
//!
//! # Flow
//!
//! 1. `open` feeds `Open` to the machine
//! 2. A `Search` effect runs the orchestrator inline and feeds the outcome
//!    back, tagged with the generation that issued it
//! 3. `select` / `unassign` forward the notification to the booking list
//!    and close the control; the outcome is not observed
//!
//! The machine lock is never held across an `.await`, so `close`, `reset`
//! and the accessors stay usable while a search is outstanding. Nothing
//! cancels an outstanding search; `reset` only makes its answer stale.

use crate::application::agent_search::AgentSearchOrchestrator;
use crate::domain::agent::{Agent, AgentId};
use crate::domain::assignment::{
    AssignmentEffect, AssignmentEvent, AssignmentMachine, AssignmentSearchState, SearchErrorPolicy,
};
use crate::domain::booking::{BookingId, BookingSchedule, Coordinates};
use crate::domain::events::AssignmentNotifier;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::debug;

pub struct AssignmentWorkflow {
    machine: Mutex<AssignmentMachine>,
    search: Arc<AgentSearchOrchestrator>,
    notifier: Arc<dyn AssignmentNotifier>,
}

impl AssignmentWorkflow {
    pub fn new(
        booking_id: BookingId,
        policy: SearchErrorPolicy,
        search: Arc<AgentSearchOrchestrator>,
        notifier: Arc<dyn AssignmentNotifier>,
    ) -> Self {
        Self {
            machine: Mutex::new(AssignmentMachine::new(booking_id, policy)),
            search,
            notifier,
        }
    }

    /// Open the control. The first call for this lifetime runs the agent
    /// search to completion before returning.
    ///
    /// Returns the error message to show, which only happens under
    /// `SearchErrorPolicy::Surface`.
    pub async fn open(&self, coordinates: Coordinates, schedule: BookingSchedule) -> Option<String> {
        let effects = self
            .machine
            .lock()
            .handle(AssignmentEvent::Open { coordinates, schedule });
        self.run(effects).await
    }

    pub fn close(&self) {
        self.machine.lock().handle(AssignmentEvent::Close);
    }

    pub fn select(&self, agent_id: AgentId) {
        let effects = self.machine.lock().handle(AssignmentEvent::Select(agent_id));
        for effect in effects {
            self.emit(effect);
        }
    }

    pub fn unassign(&self) {
        let effects = self.machine.lock().handle(AssignmentEvent::Unassign);
        for effect in effects {
            self.emit(effect);
        }
    }

    /// Rebuild the control: back to `Idle`, outstanding answers become stale.
    pub fn reset(&self) {
        self.machine.lock().handle(AssignmentEvent::Reset);
    }

    pub fn booking_id(&self) -> BookingId {
        self.machine.lock().booking_id()
    }

    pub fn state(&self) -> AssignmentSearchState {
        self.machine.lock().state().clone()
    }

    pub fn is_open(&self) -> bool {
        self.machine.lock().is_open()
    }

    pub fn agents(&self) -> Vec<Agent> {
        self.machine.lock().display_agents().to_vec()
    }

    pub fn shows_no_agents(&self) -> bool {
        self.machine.lock().shows_no_agents()
    }

    async fn run(&self, effects: Vec<AssignmentEffect>) -> Option<String> {
        let mut pending: VecDeque<AssignmentEffect> = effects.into();
        let mut reported = None;

        while let Some(effect) = pending.pop_front() {
            match effect {
                AssignmentEffect::Search { generation, request } => {
                    let event = match self.search.search(&request).await {
                        Ok(agents) => AssignmentEvent::SearchCompleted { generation, agents },
                        Err(e) => AssignmentEvent::SearchFailed {
                            generation,
                            error: e.to_string(),
                        },
                    };
                    let next = self.machine.lock().handle(event);
                    pending.extend(next);
                }
                other => {
                    if let Some(message) = self.emit(other) {
                        reported = Some(message);
                    }
                }
            }
        }

        reported
    }

    fn emit(&self, effect: AssignmentEffect) -> Option<String> {
        match effect {
            AssignmentEffect::AssignAgent { booking_id, agent_id } => {
                debug!(booking_id = %booking_id, agent_id = %agent_id, "Requesting agent assignment");
                self.notifier.assign_agent(booking_id, &agent_id);
                None
            }
            AssignmentEffect::ClosePresentation => None,
            AssignmentEffect::ReportError(message) => Some(message),
            AssignmentEffect::Search { generation, .. } => {
                debug!(generation = %generation, "Search effect outside of open; ignored");
                None
            }
        }
    }
}
