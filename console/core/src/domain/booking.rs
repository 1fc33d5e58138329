// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Booking
//!
//! Value types describing a service booking as the console sees it: where it
//! is, when it is, and who holds it.

use crate::domain::agent::AgentId;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(pub i64);

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Current holder of a booking. Owned by the booking list; the console only
/// proposes changes through the assignment notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingAssignment {
    pub booking_id: BookingId,
    pub current_agent_id: Option<AgentId>,
}

impl BookingAssignment {
    pub fn new(booking_id: BookingId) -> Self {
        Self {
            booking_id,
            current_agent_id: None,
        }
    }

    /// Apply an assignment notification. The unassign sentinel clears the
    /// current holder.
    pub fn apply(&mut self, agent_id: &AgentId) {
        self.current_agent_id = if agent_id.is_unassigned() {
            None
        } else {
            Some(agent_id.clone())
        };
    }
}

/// Location of a booking. Either side may be missing when the address was
/// never geocoded.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
        }
    }

    pub fn missing() -> Self {
        Self::default()
    }

    /// Both components, when present.
    pub fn pair(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.pair().is_some()
    }
}

/// Geocoder output. `{None, None}` means "unresolved", never a transport
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResolvedCoordinates {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

impl ResolvedCoordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat: Some(lat),
            lon: Some(lon),
        }
    }

    pub fn unresolved() -> Self {
        Self::default()
    }

    pub fn pair(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.pair().is_some()
    }
}

impl From<ResolvedCoordinates> for Coordinates {
    fn from(value: ResolvedCoordinates) -> Self {
        Self {
            latitude: value.lat,
            longitude: value.lon,
        }
    }
}

/// Scheduled date (`YYYY-MM-DD`) and time of a booking.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BookingSchedule {
    pub date: String,
    pub time: String,
}

impl BookingSchedule {
    pub fn new(date: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            time: time.into(),
        }
    }
}

/// Partial postal address handed to the geocoder.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AddressQuery {
    pub street_number: String,
    pub street_name: String,
    pub postal_code: String,
}
