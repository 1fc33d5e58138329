// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Event Bus Implementation - Pub/Sub for Console Events
//
// Provides in-memory event streaming using tokio broadcast channels.
// Carries the workflows' upward notifications to the booking list,
// the session handler, and any other observer.
//
// In-memory only: events published with no subscriber are dropped.

use crate::domain::agent::AgentId;
use crate::domain::booking::BookingId;
use crate::domain::events::{AssignmentNotifier, ConsoleEvent, IntakeNotifier};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Event bus for publishing and subscribing to console events
#[derive(Clone)]
pub struct EventBus {
    sender: Arc<broadcast::Sender<ConsoleEvent>>,
}

impl EventBus {
    /// Create a new event bus with specified channel capacity
    /// Capacity determines how many events can be buffered before dropping old ones
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Create event bus with default capacity (256)
    pub fn with_default_capacity() -> Self {
        Self::new(256)
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: ConsoleEvent) {
        debug!("Publishing event: {:?}", event);

        // send() fails only when nobody is listening
        let receiver_count = self.sender.send(event).unwrap_or(0);

        if receiver_count == 0 {
            debug!("No subscribers listening to event");
        }
    }

    /// Subscribe to all console events
    pub fn subscribe(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.sender.subscribe(),
        }
    }

    /// Subscribe to assignment requests for a single booking
    pub fn subscribe_booking(&self, booking_id: BookingId) -> BookingEventReceiver {
        BookingEventReceiver {
            receiver: self.sender.subscribe(),
            booking_id,
        }
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl AssignmentNotifier for EventBus {
    fn assign_agent(&self, booking_id: BookingId, agent_id: &AgentId) {
        self.publish(ConsoleEvent::AgentAssignmentRequested {
            booking_id,
            agent_id: agent_id.clone(),
            requested_at: Utc::now(),
        });
    }
}

impl IntakeNotifier for EventBus {
    fn on_save(&self) {
        self.publish(ConsoleEvent::BookingSaved { saved_at: Utc::now() });
    }

    fn on_logout(&self) {
        self.publish(ConsoleEvent::LogoutRequested { requested_at: Utc::now() });
    }

    fn on_close(&self) {
        self.publish(ConsoleEvent::IntakeClosed { closed_at: Utc::now() });
    }
}

fn map_recv_error(e: broadcast::error::RecvError) -> EventBusError {
    match e {
        broadcast::error::RecvError::Closed => EventBusError::Closed,
        broadcast::error::RecvError::Lagged(n) => {
            warn!("Event receiver lagged by {} events", n);
            EventBusError::Lagged(n)
        }
    }
}

/// Receiver for all console events
pub struct EventReceiver {
    receiver: broadcast::Receiver<ConsoleEvent>,
}

impl EventReceiver {
    /// Receive the next event (waits until one is available)
    pub async fn recv(&mut self) -> Result<ConsoleEvent, EventBusError> {
        self.receiver.recv().await.map_err(map_recv_error)
    }

    /// Try to receive an event without blocking
    pub fn try_recv(&mut self) -> Result<ConsoleEvent, EventBusError> {
        self.receiver.try_recv().map_err(|e| match e {
            broadcast::error::TryRecvError::Empty => EventBusError::Empty,
            broadcast::error::TryRecvError::Closed => EventBusError::Closed,
            broadcast::error::TryRecvError::Lagged(n) => {
                warn!("Event receiver lagged by {} events", n);
                EventBusError::Lagged(n)
            }
        })
    }

    /// Drain every event currently buffered
    pub fn drain(&mut self) -> Vec<ConsoleEvent> {
        let mut events = Vec::new();
        loop {
            match self.try_recv() {
                Ok(event) => events.push(event),
                Err(EventBusError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }
        events
    }
}

/// Receiver for one booking's assignment requests (filtered)
pub struct BookingEventReceiver {
    receiver: broadcast::Receiver<ConsoleEvent>,
    booking_id: BookingId,
}

impl BookingEventReceiver {
    /// Receive the next agent id requested for this booking
    pub async fn recv(&mut self) -> Result<AgentId, EventBusError> {
        loop {
            let event = self.receiver.recv().await.map_err(map_recv_error)?;

            if let ConsoleEvent::AgentAssignmentRequested { booking_id, agent_id, .. } = event {
                if booking_id == self.booking_id {
                    return Ok(agent_id);
                }
            }
        }
    }
}

/// Errors that can occur when receiving events
#[derive(Debug, thiserror::Error)]
pub enum EventBusError {
    #[error("Event bus is closed")]
    Closed,

    #[error("No events available")]
    Empty,

    #[error("Receiver lagged by {0} events (events were dropped)")]
    Lagged(u64),
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}
