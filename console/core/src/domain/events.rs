// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::agent::AgentId;
use crate::domain::booking::BookingId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upward notifications raised by the console workflows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConsoleEvent {
    /// An operator picked an agent for a booking. An empty `agent_id` asks
    /// the booking list to unassign.
    AgentAssignmentRequested {
        booking_id: BookingId,
        agent_id: AgentId,
        requested_at: DateTime<Utc>,
    },
    /// A new booking was persisted; the booking list should refresh.
    BookingSaved {
        saved_at: DateTime<Utc>,
    },
    /// The booking service rejected the session.
    LogoutRequested {
        requested_at: DateTime<Utc>,
    },
    /// The intake form was dismissed.
    IntakeClosed {
        closed_at: DateTime<Utc>,
    },
}

/// Receives assignment notifications. Delivery is fire-and-forget: the
/// assignment control never waits on, or reacts to, the outcome.
pub trait AssignmentNotifier: Send + Sync {
    fn assign_agent(&self, booking_id: BookingId, agent_id: &AgentId);
}

/// Receives intake-form notifications.
pub trait IntakeNotifier: Send + Sync {
    /// Post-success refresh hook.
    fn on_save(&self);
    /// Authentication-failure hook.
    fn on_logout(&self);
    /// Dismiss hook.
    fn on_close(&self);
}
