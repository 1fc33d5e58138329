// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Coordinate Resolver
//!
//! Wraps the geocoding service so that every failure reads as "unresolved"
//! (`{None, None}`) instead of an error. No retries.

use crate::domain::booking::{AddressQuery, ResolvedCoordinates};
use crate::domain::services::GeocodingService;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct CoordinateResolver {
    geocoder: Arc<dyn GeocodingService>,
}

impl CoordinateResolver {
    pub fn new(geocoder: Arc<dyn GeocodingService>) -> Self {
        Self { geocoder }
    }

    pub async fn resolve(&self, address: &AddressQuery) -> ResolvedCoordinates {
        match self.geocoder.find_lat_long(address).await {
            Ok(coordinates) => {
                debug!(lat = ?coordinates.lat, lon = ?coordinates.lon, "Address resolved");
                coordinates
            }
            Err(e) => {
                warn!(error = %e, "Error getting coordinates");
                ResolvedCoordinates::unresolved()
            }
        }
    }
}
