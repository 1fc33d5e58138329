// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Agent Assignment State Machine
//!
//! Per-booking state behind the assignment control. The first time the
//! control opens it asks for one proximity search; the result (or the lack
//! of one) is kept for the rest of the control's lifetime.
//!
//! ## States
//!
//! | State | Meaning |
//! |-------|---------|
//! | `Idle` | Control created, never opened |
//! | `Searching` | One search in flight, tagged with its generation |
//! | `Loaded` | Search answered, possibly with zero agents |
//! | `Empty` | No usable answer: coordinates missing or search failed |
//!
//! Transitions only move forward (`Idle → Searching → Loaded | Empty`, or
//! `Idle → Empty`). `Reset` is the one way back to `Idle`; it stands for
//! rebuilding the control and bumps the generation so any response still in
//! flight is discarded on arrival.
//!
//! `handle` performs no I/O. It returns the effects the caller must carry
//! out, which keeps the machine testable without a runtime.

use crate::domain::agent::{Agent, AgentId};
use crate::domain::booking::{BookingId, BookingSchedule, Coordinates};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Monotonic tag identifying which lifetime of the control issued a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct SearchGeneration(pub u64);

impl SearchGeneration {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for SearchGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What to do with a failed agent search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchErrorPolicy {
    /// Log the failure and show "no agents found".
    #[default]
    Swallow,
    /// Same as `Swallow`, plus hand the error message to the operator.
    Surface,
}

impl FromStr for SearchErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "swallow" => Ok(Self::Swallow),
            "surface" => Ok(Self::Surface),
            other => Err(format!(
                "unknown search error policy '{}', expected 'swallow' or 'surface'",
                other
            )),
        }
    }
}

impl fmt::Display for SearchErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Swallow => f.write_str("swallow"),
            Self::Surface => f.write_str("surface"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmptyReason {
    /// The booking has no coordinates; no search was attempted.
    LocationUnavailable,
    /// The search service reported an error.
    SearchFailed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AssignmentSearchState {
    Idle,
    Searching { generation: SearchGeneration },
    Loaded(Vec<Agent>),
    Empty { reason: EmptyReason },
}

/// Input to the agent-search orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSearchRequest {
    pub latitude: f64,
    pub longitude: f64,
    /// `YYYY-MM-DD`
    pub date: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentEvent {
    Open {
        coordinates: Coordinates,
        schedule: BookingSchedule,
    },
    Close,
    SearchCompleted {
        generation: SearchGeneration,
        agents: Vec<Agent>,
    },
    SearchFailed {
        generation: SearchGeneration,
        error: String,
    },
    Select(AgentId),
    Unassign,
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentEffect {
    /// Run one agent search and feed the outcome back tagged with `generation`.
    Search {
        generation: SearchGeneration,
        request: AgentSearchRequest,
    },
    /// Notify the booking list. Never awaited.
    AssignAgent {
        booking_id: BookingId,
        agent_id: AgentId,
    },
    ClosePresentation,
    /// Only produced under `SearchErrorPolicy::Surface`.
    ReportError(String),
}

#[derive(Debug, Clone)]
pub struct AssignmentMachine {
    booking_id: BookingId,
    state: AssignmentSearchState,
    generation: SearchGeneration,
    open: bool,
    policy: SearchErrorPolicy,
}

impl AssignmentMachine {
    pub fn new(booking_id: BookingId, policy: SearchErrorPolicy) -> Self {
        Self {
            booking_id,
            state: AssignmentSearchState::Idle,
            generation: SearchGeneration::default(),
            open: false,
            policy,
        }
    }

    pub fn booking_id(&self) -> BookingId {
        self.booking_id
    }

    pub fn state(&self) -> &AssignmentSearchState {
        &self.state
    }

    pub fn generation(&self) -> SearchGeneration {
        self.generation
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn policy(&self) -> SearchErrorPolicy {
        self.policy
    }

    pub fn is_searching(&self) -> bool {
        matches!(self.state, AssignmentSearchState::Searching { .. })
    }

    /// Agents to list, in service order.
    pub fn display_agents(&self) -> &[Agent] {
        match &self.state {
            AssignmentSearchState::Loaded(agents) => agents,
            _ => &[],
        }
    }

    /// `Loaded([])` and `Empty` look the same to the operator.
    pub fn shows_no_agents(&self) -> bool {
        match &self.state {
            AssignmentSearchState::Loaded(agents) => agents.is_empty(),
            AssignmentSearchState::Empty { .. } => true,
            _ => false,
        }
    }

    pub fn handle(&mut self, event: AssignmentEvent) -> Vec<AssignmentEffect> {
        match event {
            AssignmentEvent::Open { coordinates, schedule } => {
                self.open = true;
                self.on_open(coordinates, schedule)
            }
            AssignmentEvent::Close => {
                self.open = false;
                Vec::new()
            }
            AssignmentEvent::SearchCompleted { generation, agents } => {
                if !self.is_current(generation) {
                    return Vec::new();
                }
                info!(
                    booking_id = %self.booking_id,
                    count = agents.len(),
                    "Found available agents"
                );
                self.state = AssignmentSearchState::Loaded(agents);
                Vec::new()
            }
            AssignmentEvent::SearchFailed { generation, error } => {
                if !self.is_current(generation) {
                    return Vec::new();
                }
                warn!(
                    booking_id = %self.booking_id,
                    error = %error,
                    policy = %self.policy,
                    "Agent search failed; showing no agents"
                );
                self.state = AssignmentSearchState::Empty {
                    reason: EmptyReason::SearchFailed,
                };
                match self.policy {
                    SearchErrorPolicy::Swallow => Vec::new(),
                    SearchErrorPolicy::Surface => vec![AssignmentEffect::ReportError(error)],
                }
            }
            AssignmentEvent::Select(agent_id) => self.assign(agent_id),
            AssignmentEvent::Unassign => self.assign(AgentId::unassigned()),
            AssignmentEvent::Reset => {
                self.generation = self.generation.next();
                self.state = AssignmentSearchState::Idle;
                self.open = false;
                debug!(
                    booking_id = %self.booking_id,
                    generation = %self.generation,
                    "Assignment control reset"
                );
                Vec::new()
            }
        }
    }

    fn on_open(&mut self, coordinates: Coordinates, schedule: BookingSchedule) -> Vec<AssignmentEffect> {
        if self.state != AssignmentSearchState::Idle {
            return Vec::new();
        }

        let Some((latitude, longitude)) = coordinates.pair() else {
            warn!(
                booking_id = %self.booking_id,
                "Customer coordinates not available; skipping agent search"
            );
            self.state = AssignmentSearchState::Empty {
                reason: EmptyReason::LocationUnavailable,
            };
            return Vec::new();
        };

        info!(
            booking_id = %self.booking_id,
            latitude,
            longitude,
            "Searching agents near booking"
        );
        self.state = AssignmentSearchState::Searching {
            generation: self.generation,
        };
        vec![AssignmentEffect::Search {
            generation: self.generation,
            request: AgentSearchRequest {
                latitude,
                longitude,
                date: schedule.date,
                time: schedule.time,
            },
        }]
    }

    fn assign(&mut self, agent_id: AgentId) -> Vec<AssignmentEffect> {
        self.open = false;
        vec![
            AssignmentEffect::AssignAgent {
                booking_id: self.booking_id,
                agent_id,
            },
            AssignmentEffect::ClosePresentation,
        ]
    }

    fn is_current(&self, generation: SearchGeneration) -> bool {
        match self.state {
            AssignmentSearchState::Searching { generation: current } if current == generation => true,
            _ => {
                debug!(
                    booking_id = %self.booking_id,
                    stale = %generation,
                    current = %self.generation,
                    "Discarding stale agent search response"
                );
                false
            }
        }
    }
}
