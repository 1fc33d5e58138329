// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Scheduling API Client
//!
//! HTTP adapter for the scheduling backend: agent proximity search and
//! booking creation.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Implements `AgentSearchService` and `BookingService`
//! - **Integration:** Console workflows → REST API
//!
//! # Usage
//!
//! ```ignore
//! let client = SchedulingApiClient::new("https://api.example.com")
//!     .with_auth_token("secret");
//! let agents = client.search_agents(&query).await?;
//! ```

use crate::domain::agent::Agent;
use crate::domain::console_config::{ApiConfig, ConfigError};
use crate::domain::intake::BookingPayload;
use crate::domain::services::{AgentSearchQuery, AgentSearchService, ApiError, BookingService};
use crate::infrastructure::http::{error_from_response, join_url, network_error};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use tracing::debug;

pub struct SchedulingApiClient {
    client: Client,
    base_url: String,
    search_agents_path: String,
    bookings_path: String,
    auth_token: Option<String>,
}

impl SchedulingApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let defaults = ApiConfig::default();
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            search_agents_path: defaults.search_agents_path,
            bookings_path: defaults.bookings_path,
            auth_token: None,
        }
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ConfigError> {
        let mut client = Self::new(config.base_url.clone())
            .with_paths(config.search_agents_path.clone(), config.bookings_path.clone());
        client.auth_token = config.resolve_auth_token()?;
        Ok(client)
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_paths(mut self, search_agents_path: impl Into<String>, bookings_path: impl Into<String>) -> Self {
        self.search_agents_path = search_agents_path.into();
        self.bookings_path = bookings_path.into();
        self
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl AgentSearchService for SchedulingApiClient {
    async fn search_agents(&self, query: &AgentSearchQuery) -> Result<Vec<Agent>, ApiError> {
        let url = join_url(&self.base_url, &self.search_agents_path);
        debug!(url = %url, "Searching agents");

        let response = self
            .authorize(self.client.get(&url).query(query))
            .send()
            .await
            .map_err(network_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        response
            .json::<Vec<Agent>>()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse agent list: {}", e)))
    }
}

#[async_trait]
impl BookingService for SchedulingApiClient {
    async fn create_booking(&self, payload: &BookingPayload) -> Result<(), ApiError> {
        let url = join_url(&self.base_url, &self.bookings_path);
        debug!(url = %url, "Creating booking");

        let response = self
            .authorize(self.client.post(&url).json(payload))
            .send()
            .await
            .map_err(network_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::intake::{BookingDetails, CustomerDetails, LocationDetails};
    use mockito::Matcher;

    fn query() -> AgentSearchQuery {
        AgentSearchQuery {
            latitude: "44.65".to_string(),
            longitude: "-63.57".to_string(),
            booking_date: "2026-04-02".to_string(),
            booking_time: "10:00:00".to_string(),
        }
    }

    fn payload() -> BookingPayload {
        BookingPayload {
            customer: CustomerDetails {
                name: "Bob".to_string(),
                email: "bob@example.com".to_string(),
                phone: "".to_string(),
            },
            location: LocationDetails {
                latitude: 44.7,
                longitude: -63.6,
                postal_code: "B4A 3J7".to_string(),
                street_name: "Lacklon Lane".to_string(),
                street_number: "5580".to_string(),
                city: "Bedford".to_string(),
                state_province: "NS".to_string(),
                country: "Canada".to_string(),
            },
            booking: BookingDetails {
                booking_date: "2026-04-02".to_string(),
                booking_time: "10:00:00".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_search_agents_sends_query_and_keeps_order() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/agents/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("latitude".into(), "44.65".into()),
                Matcher::UrlEncoded("longitude".into(), "-63.57".into()),
                Matcher::UrlEncoded("booking_date".into(), "2026-04-02".into()),
                Matcher::UrlEncoded("booking_time".into(), "10:00:00".into()),
            ]))
            .match_header("authorization", "Bearer secret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"agentId":"b","name":"Blair","distance":"1.5"},
                    {"agentId":"a","name":"Alex","distance":"0.4"}]"#,
            )
            .create_async()
            .await;

        let client = SchedulingApiClient::new(server.url()).with_auth_token("secret");
        let agents = client.search_agents(&query()).await.unwrap();

        assert_eq!(
            agents,
            vec![Agent::new("b", "Blair", "1.5"), Agent::new("a", "Alex", "0.4")]
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_agents_server_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/agents/search")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("internal error")
            .create_async()
            .await;

        let client = SchedulingApiClient::new(server.url());
        let err = client.search_agents(&query()).await.unwrap_err();

        assert_eq!(
            err,
            ApiError::Rejected {
                status: 500,
                message: "internal error".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_search_agents_rejects_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/agents/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = SchedulingApiClient::new(server.url());
        let err = client.search_agents(&query()).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_create_booking_posts_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/bookings")
            .match_body(Matcher::Json(serde_json::to_value(payload()).unwrap()))
            .with_status(201)
            .with_body(r#"{"booking_id": 91}"#)
            .create_async()
            .await;

        let client = SchedulingApiClient::new(format!("{}/", server.url()))
            .with_paths("/api/agents/search", "/api/bookings");
        client.create_booking(&payload()).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_booking_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/bookings")
            .with_status(401)
            .with_body(r#"{"detail":"token expired"}"#)
            .create_async()
            .await;

        let client = SchedulingApiClient::new(server.url());
        let err = client.create_booking(&payload()).await.unwrap_err();
        assert_eq!(err.to_string(), "Authentication required: token expired");
    }

    #[tokio::test]
    async fn test_create_booking_conflict_keeps_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/bookings")
            .with_status(409)
            .with_body(r#"{"detail":"Duplicate booking"}"#)
            .create_async()
            .await;

        let client = SchedulingApiClient::new(server.url());
        let err = client.create_booking(&payload()).await.unwrap_err();
        assert_eq!(err.to_string(), "Duplicate booking");
    }

    #[test]
    fn test_from_config_resolves_literal_token() {
        let config = ApiConfig {
            auth_token: Some("literal".to_string()),
            ..ApiConfig::default()
        };
        let client = SchedulingApiClient::from_config(&config).unwrap();
        assert_eq!(client.auth_token.as_deref(), Some("literal"));
        assert_eq!(client.bookings_path, "/bookings");
    }
}
