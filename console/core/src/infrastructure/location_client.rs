// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Location Client
//!
//! HTTP adapter for the geocoding endpoint. Takes the partial address the
//! intake form collects and returns `{lat, lon}`, either of which may be
//! null when the address cannot be placed.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Implements `GeocodingService`

use crate::domain::booking::{AddressQuery, ResolvedCoordinates};
use crate::domain::console_config::GeocodingConfig;
use crate::domain::services::{ApiError, GeocodingService};
use crate::infrastructure::http::{error_from_response, join_url, network_error};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

pub struct LocationClient {
    client: Client,
    base_url: String,
    path: String,
}

impl LocationClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            path: GeocodingConfig::default().path,
        }
    }

    pub fn from_config(config: &GeocodingConfig) -> Self {
        Self::new(config.base_url.clone()).with_path(config.path.clone())
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }
}

#[async_trait]
impl GeocodingService for LocationClient {
    async fn find_lat_long(&self, address: &AddressQuery) -> Result<ResolvedCoordinates, ApiError> {
        let url = join_url(&self.base_url, &self.path);
        debug!(url = %url, postal_code = %address.postal_code, "Resolving coordinates");

        let response = self
            .client
            .get(&url)
            .query(address)
            .send()
            .await
            .map_err(network_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        response
            .json::<ResolvedCoordinates>()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse coordinates: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn address() -> AddressQuery {
        AddressQuery {
            street_number: "5580".to_string(),
            street_name: "Lacklon Lane".to_string(),
            postal_code: "B4A 3J7".to_string(),
        }
    }

    #[tokio::test]
    async fn test_find_lat_long_sends_address() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/location/lat-long")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("street_number".into(), "5580".into()),
                Matcher::UrlEncoded("street_name".into(), "Lacklon Lane".into()),
                Matcher::UrlEncoded("postal_code".into(), "B4A 3J7".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"lat": 44.7, "lon": -63.6}"#)
            .create_async()
            .await;

        let client = LocationClient::new(server.url());
        let resolved = client.find_lat_long(&address()).await.unwrap();

        assert_eq!(resolved, ResolvedCoordinates::new(44.7, -63.6));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_find_lat_long_null_components() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/geo")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"lat": null, "lon": null}"#)
            .create_async()
            .await;

        let client = LocationClient::new(server.url()).with_path("geo");
        let resolved = client.find_lat_long(&address()).await.unwrap();
        assert!(!resolved.is_complete());
    }

    #[tokio::test]
    async fn test_find_lat_long_service_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/location/lat-long")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"detail":"Address not found"}"#)
            .create_async()
            .await;

        let client = LocationClient::new(server.url());
        let err = client.find_lat_long(&address()).await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Rejected {
                status: 404,
                message: "Address not found".to_string(),
            }
        );
    }
}
