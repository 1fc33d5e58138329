// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Service wiring
//!
//! Builds the HTTP adapters and the event bus from a loaded
//! [`ConsoleConfigManifest`] and hands out workflows bound to them.

use anyhow::{Context, Result};
use std::sync::Arc;

use fieldops_core::application::{
    AgentSearchOrchestrator, AssignmentWorkflow, CoordinateResolver, IntakeWorkflow,
};
use fieldops_core::domain::assignment::SearchErrorPolicy;
use fieldops_core::domain::booking::BookingId;
use fieldops_core::domain::console_config::ConsoleConfigManifest;
use fieldops_core::infrastructure::{
    DigitCountPhoneValidator, EventBus, LocationClient, SchedulingApiClient,
};

pub struct ConsoleServices {
    pub event_bus: Arc<EventBus>,
    scheduling: Arc<SchedulingApiClient>,
    search: Arc<AgentSearchOrchestrator>,
    resolver: Arc<CoordinateResolver>,
    policy: SearchErrorPolicy,
}

impl ConsoleServices {
    pub fn from_manifest(manifest: &ConsoleConfigManifest) -> Result<Self> {
        manifest
            .validate()
            .context("Configuration validation failed")?;

        let scheduling = Arc::new(
            SchedulingApiClient::from_config(&manifest.spec.api)
                .context("Failed to configure scheduling API client")?,
        );
        let geocoder = Arc::new(LocationClient::from_config(&manifest.spec.geocoding));

        Ok(Self {
            event_bus: Arc::new(EventBus::with_default_capacity()),
            search: Arc::new(AgentSearchOrchestrator::new(scheduling.clone())),
            resolver: Arc::new(CoordinateResolver::new(geocoder)),
            scheduling,
            policy: manifest.spec.assignment.search_error_policy,
        })
    }

    pub fn policy(&self) -> SearchErrorPolicy {
        self.policy
    }

    pub fn assignment_workflow(&self, booking_id: BookingId) -> AssignmentWorkflow {
        AssignmentWorkflow::new(
            booking_id,
            self.policy,
            self.search.clone(),
            self.event_bus.clone(),
        )
    }

    pub fn intake_workflow(&self) -> IntakeWorkflow {
        IntakeWorkflow::new(
            self.resolver.clone(),
            self.scheduling.clone(),
            self.event_bus.clone(),
        )
        .with_phone_validator(Arc::new(DigitCountPhoneValidator))
    }
}
