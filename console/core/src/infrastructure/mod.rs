// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod http;
pub mod scheduling_api;
pub mod location_client;
pub mod phone;
pub mod event_bus;

pub use event_bus::{EventBus, EventBusError};
pub use location_client::LocationClient;
pub use phone::DigitCountPhoneValidator;
pub use scheduling_api::SchedulingApiClient;
