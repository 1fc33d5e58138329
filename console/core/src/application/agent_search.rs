// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Agent Search Use Case
//!
//! Turns a booking location and schedule into a ranked list of candidate
//! agents.
//!
//! # DDD Pattern: Application Service
//!
//! - **Layer:** Application
//! - **Responsibility:** Shape the query for the external search service
//! - **Collaborators:**
//!   - Domain: AgentSearchRequest, Agent
//!   - Infrastructure: AgentSearchService (HTTP)
//!
//! Coordinates are sent as decimal strings. The result order is the
//! service's own ranking; nothing here re-sorts it.

use crate::domain::agent::Agent;
use crate::domain::assignment::AgentSearchRequest;
use crate::domain::services::{AgentSearchQuery, AgentSearchService, SearchError};
use std::sync::Arc;
use tracing::debug;

pub struct AgentSearchOrchestrator {
    service: Arc<dyn AgentSearchService>,
}

impl AgentSearchOrchestrator {
    pub fn new(service: Arc<dyn AgentSearchService>) -> Self {
        Self { service }
    }

    pub fn query_for(request: &AgentSearchRequest) -> AgentSearchQuery {
        AgentSearchQuery {
            latitude: request.latitude.to_string(),
            longitude: request.longitude.to_string(),
            booking_date: request.date.clone(),
            booking_time: request.time.clone(),
        }
    }

    pub async fn search(&self, request: &AgentSearchRequest) -> Result<Vec<Agent>, SearchError> {
        let query = Self::query_for(request);
        debug!(
            latitude = %query.latitude,
            longitude = %query.longitude,
            date = %query.booking_date,
            time = %query.booking_time,
            "Querying agent search service"
        );

        let agents = self.service.search_agents(&query).await?;
        Ok(agents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::ApiError;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    struct RecordingSearch {
        queries: Mutex<Vec<AgentSearchQuery>>,
        result: Result<Vec<Agent>, ApiError>,
    }

    #[async_trait]
    impl AgentSearchService for RecordingSearch {
        async fn search_agents(&self, query: &AgentSearchQuery) -> Result<Vec<Agent>, ApiError> {
            self.queries.lock().push(query.clone());
            self.result.clone()
        }
    }

    fn request() -> AgentSearchRequest {
        AgentSearchRequest {
            latitude: 44.6488,
            longitude: -63.5752,
            date: "2026-02-10".to_string(),
            time: "08:00:00".to_string(),
        }
    }

    #[tokio::test]
    async fn test_coordinates_are_sent_as_decimal_strings() {
        let service = Arc::new(RecordingSearch {
            queries: Mutex::new(Vec::new()),
            result: Ok(vec![]),
        });
        let orchestrator = AgentSearchOrchestrator::new(service.clone());

        orchestrator.search(&request()).await.unwrap();

        let queries = service.queries.lock();
        assert_eq!(
            queries.as_slice(),
            &[AgentSearchQuery {
                latitude: "44.6488".to_string(),
                longitude: "-63.5752".to_string(),
                booking_date: "2026-02-10".to_string(),
                booking_time: "08:00:00".to_string(),
            }]
        );
    }

    #[test]
    fn test_whole_coordinates_have_no_trailing_fraction() {
        let mut req = request();
        req.latitude = 45.0;
        let query = AgentSearchOrchestrator::query_for(&req);
        assert_eq!(query.latitude, "45");
    }

    #[tokio::test]
    async fn test_service_order_is_preserved() {
        let agents = vec![
            Agent::new("far", "Far", "9.0"),
            Agent::new("near", "Near", "0.5"),
        ];
        let service = Arc::new(RecordingSearch {
            queries: Mutex::new(Vec::new()),
            result: Ok(agents.clone()),
        });
        let orchestrator = AgentSearchOrchestrator::new(service);

        assert_eq!(orchestrator.search(&request()).await.unwrap(), agents);
    }

    #[tokio::test]
    async fn test_service_failure_becomes_search_error() {
        let service = Arc::new(RecordingSearch {
            queries: Mutex::new(Vec::new()),
            result: Err(ApiError::Network("timed out".to_string())),
        });
        let orchestrator = AgentSearchOrchestrator::new(service);

        let err = orchestrator.search(&request()).await.unwrap_err();
        assert_eq!(err, SearchError(ApiError::Network("timed out".to_string())));
    }
}
