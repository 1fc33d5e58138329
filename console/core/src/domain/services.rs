// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Services
//!
//! Domain interfaces for the external collaborators the workflows talk to.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Anti-corruption boundary; HTTP adapters live in
//!   `infrastructure/`, test doubles live next to the tests

use crate::domain::agent::Agent;
use crate::domain::booking::{AddressQuery, ResolvedCoordinates};
use crate::domain::intake::BookingPayload;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Query sent to the agent-search service. Coordinates travel as decimal
/// strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSearchQuery {
    pub latitude: String,
    pub longitude: String,
    pub booking_date: String,
    pub booking_time: String,
}

/// Agent-search service. Results come back in the order the service ranks
/// them, typically ascending distance.
#[async_trait]
pub trait AgentSearchService: Send + Sync {
    async fn search_agents(&self, query: &AgentSearchQuery) -> Result<Vec<Agent>, ApiError>;
}

/// Geocoding service.
#[async_trait]
pub trait GeocodingService: Send + Sync {
    async fn find_lat_long(&self, address: &AddressQuery) -> Result<ResolvedCoordinates, ApiError>;
}

/// Booking-persistence service.
#[async_trait]
pub trait BookingService: Send + Sync {
    async fn create_booking(&self, payload: &BookingPayload) -> Result<(), ApiError>;
}

/// Phone-number validity check, normally owned by the phone input widget.
pub trait PhoneValidator: Send + Sync {
    fn is_valid(&self, phone: &str) -> bool;
}

/// Errors reported by external services.
///
/// The display form is what operators see, so `Rejected` renders only the
/// service's own message and `Authentication` always carries the
/// `"Authentication required"` prefix the intake workflow keys on.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication required: {0}")]
    Authentication(String),

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Failure of the agent-search call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Agent search failed: {0}")]
pub struct SearchError(#[from] pub ApiError);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_error_carries_marker() {
        let err = ApiError::Authentication("token expired".to_string());
        assert_eq!(err.to_string(), "Authentication required: token expired");
    }

    #[test]
    fn test_rejected_error_renders_service_message_only() {
        let err = ApiError::Rejected {
            status: 409,
            message: "Duplicate booking".to_string(),
        };
        assert_eq!(err.to_string(), "Duplicate booking");
    }

    #[test]
    fn test_search_error_wraps_api_error() {
        let err = SearchError::from(ApiError::Network("connection refused".to_string()));
        assert!(err.to_string().contains("connection refused"));
    }
}
