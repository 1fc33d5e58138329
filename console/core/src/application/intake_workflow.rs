// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Intake Workflow
//!
//! Application service behind the new-appointment form.
//!
//! # DDD Pattern: Application Service
//!
//! - **Layer:** Application
//! - **Responsibility:** Drive one submit attempt through its gates
//! - **Collaborators:**
//!   - Domain: IntakeMachine, IntakeNotifier, PhoneValidator
//!   - Application: CoordinateResolver
//!   - Infrastructure: BookingService (HTTP)
//!
//! # Flow
//!
//! 1. Phone gate (no network calls when it fails)
//! 2. Resolve coordinates unless a complete pair is cached
//! 3. Build the payload and create the booking
//! 4. Success → `on_save` then `on_close`; auth failure → `on_logout`;
//!    anything else → the machine's `ShowMessage` is returned in
//!    [`SubmitOutcome::Rejected`], form kept
//!
//! # Error Handling
//!
//! Failures come back as [`SubmitOutcome`]; nothing is retried. Each submit
//! runs under its own [`SubmitAttempt`](crate::domain::intake::SubmitAttempt):
//! once the form is cancelled or resubmitted, answers to the earlier
//! attempt's calls are dropped and that `submit()` reports
//! [`SubmitOutcome::Ignored`].

use crate::application::coordinate_resolver::CoordinateResolver;
use crate::domain::events::IntakeNotifier;
use crate::domain::intake::{
    IntakeEffect, IntakeError, IntakeEvent, IntakeField, IntakeForm, IntakeMachine, IntakePhase,
};
use crate::domain::services::{BookingService, PhoneValidator};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info};

/// Result of one submit attempt
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Booking persisted; the form has been discarded.
    Saved,
    /// The session was rejected and the logout hook fired.
    LoggedOut,
    /// The attempt stopped at a gate; the form is unchanged and `message`
    /// is what the operator should see.
    Rejected { error: IntakeError, message: String },
    /// Another attempt was in flight, or the form was cancelled or
    /// resubmitted meanwhile.
    Ignored,
}

pub struct IntakeWorkflow {
    machine: Mutex<IntakeMachine>,
    resolver: Arc<CoordinateResolver>,
    bookings: Arc<dyn BookingService>,
    notifier: Arc<dyn IntakeNotifier>,
    phone_validator: Option<Arc<dyn PhoneValidator>>,
}

impl IntakeWorkflow {
    pub fn new(
        resolver: Arc<CoordinateResolver>,
        bookings: Arc<dyn BookingService>,
        notifier: Arc<dyn IntakeNotifier>,
    ) -> Self {
        Self {
            machine: Mutex::new(IntakeMachine::new()),
            resolver,
            bookings,
            notifier,
            phone_validator: None,
        }
    }

    /// Validate phone edits with `validator`, the way the phone input
    /// widget reports validity on every change.
    pub fn with_phone_validator(mut self, validator: Arc<dyn PhoneValidator>) -> Self {
        self.phone_validator = Some(validator);
        self
    }

    pub fn edit(&self, field: IntakeField, value: impl Into<String>) {
        let value = value.into();
        let validity = match (field, &self.phone_validator) {
            (IntakeField::Phone, Some(validator)) => Some(validator.is_valid(&value)),
            _ => None,
        };

        let mut machine = self.machine.lock();
        machine.handle(IntakeEvent::Edit { field, value });
        if let Some(valid) = validity {
            machine.handle(IntakeEvent::PhoneValidityChanged(valid));
        }
    }

    /// Validity report from an external phone widget.
    pub fn set_phone_validity(&self, valid: bool) {
        self.machine
            .lock()
            .handle(IntakeEvent::PhoneValidityChanged(valid));
    }

    pub async fn submit(&self) -> SubmitOutcome {
        let (effects, attempt) = {
            let mut machine = self.machine.lock();
            let effects = machine.handle(IntakeEvent::Submit);
            (effects, machine.attempt())
        };
        if effects.is_empty() {
            return SubmitOutcome::Ignored;
        }

        let shown = self.run(effects).await;

        let machine = self.machine.lock();
        if machine.attempt() != attempt {
            debug!(attempt = %attempt, "Submit attempt abandoned");
            return SubmitOutcome::Ignored;
        }
        if machine.phase() == IntakePhase::Succeeded {
            return SubmitOutcome::Saved;
        }
        match (machine.last_error(), shown) {
            (Some(IntakeError::AuthFailure(_)), _) => SubmitOutcome::LoggedOut,
            (Some(error), Some(message)) => SubmitOutcome::Rejected {
                error: error.clone(),
                message,
            },
            _ => SubmitOutcome::Ignored,
        }
    }

    /// Dismiss the form, discarding what was entered.
    pub fn cancel(&self) {
        let effects = self.machine.lock().handle(IntakeEvent::Cancel);
        for effect in effects {
            self.emit(effect);
        }
    }

    pub fn form(&self) -> IntakeForm {
        self.machine.lock().form().clone()
    }

    pub fn phase(&self) -> IntakePhase {
        self.machine.lock().phase()
    }

    pub fn last_error(&self) -> Option<IntakeError> {
        self.machine.lock().last_error().cloned()
    }

    /// Carry out `effects` and whatever they lead to. Returns the last
    /// message raised for the operator.
    async fn run(&self, effects: Vec<IntakeEffect>) -> Option<String> {
        let mut pending: VecDeque<IntakeEffect> = effects.into();
        let mut shown = None;

        while let Some(effect) = pending.pop_front() {
            match effect {
                IntakeEffect::ResolveCoordinates { attempt, address } => {
                    let coordinates = self.resolver.resolve(&address).await;
                    let next = self
                        .machine
                        .lock()
                        .handle(IntakeEvent::CoordinatesResolved { attempt, coordinates });
                    pending.extend(next);
                }
                IntakeEffect::SubmitBooking { attempt, payload } => {
                    let event = match self.bookings.create_booking(&payload).await {
                        Ok(()) => IntakeEvent::SubmissionSucceeded { attempt },
                        Err(e) => IntakeEvent::SubmissionFailed {
                            attempt,
                            message: e.to_string(),
                        },
                    };
                    let next = self.machine.lock().handle(event);
                    pending.extend(next);
                }
                IntakeEffect::ShowMessage(message) => {
                    debug!(message = %message, "Intake message for operator");
                    shown = Some(message);
                }
                other => self.emit(other),
            }
        }

        shown
    }

    fn emit(&self, effect: IntakeEffect) {
        match effect {
            IntakeEffect::NotifySaved => self.notifier.on_save(),
            IntakeEffect::NotifyClosed => self.notifier.on_close(),
            IntakeEffect::NotifyLogout => {
                info!("Booking service requires authentication; logging out");
                self.notifier.on_logout();
            }
            IntakeEffect::ShowMessage(_)
            | IntakeEffect::ResolveCoordinates { .. }
            | IntakeEffect::SubmitBooking { .. } => {
                debug!("Effect outside of submit; ignored");
            }
        }
    }
}
