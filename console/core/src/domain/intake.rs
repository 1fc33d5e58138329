// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Appointment Intake
//!
//! Form model and submission state machine for creating a booking.
//!
//! One submit attempt walks `Editing → Validating → Resolving → Submitting`
//! and ends either in `Succeeded` or back in `Editing` with the form intact
//! and the failure recorded in [`IntakeMachine::last_error`]. The gates, in
//! order:
//!
//! 1. a non-empty phone must have been reported valid;
//! 2. coordinates must resolve (cached from an earlier attempt, or fetched);
//! 3. the booking service must accept the payload.
//!
//! Address fields are optional as form fields, yet an address that does not
//! geocode blocks submission at gate 2. Both layers are kept as they are.

use crate::domain::booking::{AddressQuery, ResolvedCoordinates};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, error, info, warn};

/// Marker the booking service puts in errors caused by an expired or
/// missing session.
pub const AUTH_REQUIRED_MARKER: &str = "Authentication required";

pub const INVALID_PHONE_MESSAGE: &str = "Please enter a valid phone number";
pub const UNRESOLVED_LOCATION_MESSAGE: &str =
    "Unable to get location coordinates. Please check your address and try again.";
pub const GENERIC_SAVE_ERROR_MESSAGE: &str = "Error saving appointment";

/// Normalise a time of day to `HH:MM:SS`. Exactly five characters (`HH:MM`)
/// gain `:00`; anything else passes through.
pub fn format_time(time: &str) -> String {
    if time.chars().count() == 5 {
        format!("{}:00", time)
    } else {
        time.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeField {
    Name,
    Email,
    Phone,
    StreetNumber,
    StreetName,
    PostalCode,
    City,
    StateProvince,
    Country,
    Date,
    Time,
    Type,
}

impl IntakeField {
    pub const ALL: [IntakeField; 12] = [
        IntakeField::Name,
        IntakeField::Email,
        IntakeField::Phone,
        IntakeField::StreetNumber,
        IntakeField::StreetName,
        IntakeField::PostalCode,
        IntakeField::City,
        IntakeField::StateProvince,
        IntakeField::Country,
        IntakeField::Date,
        IntakeField::Time,
        IntakeField::Type,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            IntakeField::Name => "name",
            IntakeField::Email => "email",
            IntakeField::Phone => "phone",
            IntakeField::StreetNumber => "street_number",
            IntakeField::StreetName => "street_name",
            IntakeField::PostalCode => "postal_code",
            IntakeField::City => "city",
            IntakeField::StateProvince => "state_province",
            IntakeField::Country => "country",
            IntakeField::Date => "date",
            IntakeField::Time => "time",
            IntakeField::Type => "type",
        }
    }

    /// Fields the geocoder reads.
    pub fn is_geocoded(&self) -> bool {
        matches!(
            self,
            IntakeField::StreetNumber | IntakeField::StreetName | IntakeField::PostalCode
        )
    }
}

impl fmt::Display for IntakeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IntakeField {
    type Err = String;

    /// Accepts a bare field name or a form control id (`f-street_name`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.strip_prefix("f-").unwrap_or(s);
        IntakeField::ALL
            .iter()
            .copied()
            .find(|field| field.name() == key)
            .ok_or_else(|| format!("unknown intake field: {}", s))
    }
}

/// Flat field model of the new-appointment form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IntakeForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub street_number: String,
    pub street_name: String,
    pub postal_code: String,
    pub city: String,
    pub state_province: String,
    pub country: String,
    pub date: String,
    pub time: String,
    #[serde(rename = "type")]
    pub booking_type: String,
}

impl IntakeForm {
    pub fn get(&self, field: IntakeField) -> &str {
        match field {
            IntakeField::Name => &self.name,
            IntakeField::Email => &self.email,
            IntakeField::Phone => &self.phone,
            IntakeField::StreetNumber => &self.street_number,
            IntakeField::StreetName => &self.street_name,
            IntakeField::PostalCode => &self.postal_code,
            IntakeField::City => &self.city,
            IntakeField::StateProvince => &self.state_province,
            IntakeField::Country => &self.country,
            IntakeField::Date => &self.date,
            IntakeField::Time => &self.time,
            IntakeField::Type => &self.booking_type,
        }
    }

    pub fn set(&mut self, field: IntakeField, value: impl Into<String>) {
        let value = value.into();
        match field {
            IntakeField::Name => self.name = value,
            IntakeField::Email => self.email = value,
            IntakeField::Phone => self.phone = value,
            IntakeField::StreetNumber => self.street_number = value,
            IntakeField::StreetName => self.street_name = value,
            IntakeField::PostalCode => self.postal_code = value,
            IntakeField::City => self.city = value,
            IntakeField::StateProvince => self.state_province = value,
            IntakeField::Country => self.country = value,
            IntakeField::Date => self.date = value,
            IntakeField::Time => self.time = value,
            IntakeField::Type => self.booking_type = value,
        }
    }

    pub fn address_query(&self) -> AddressQuery {
        AddressQuery {
            street_number: self.street_number.clone(),
            street_name: self.street_name.clone(),
            postal_code: self.postal_code.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationDetails {
    pub latitude: f64,
    pub longitude: f64,
    pub postal_code: String,
    pub street_name: String,
    pub street_number: String,
    pub city: String,
    pub state_province: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingDetails {
    pub booking_date: String,
    /// Always `HH:MM:SS` when the form held `HH:MM` or `HH:MM:SS`.
    pub booking_time: String,
}

/// Normalized body sent to the booking service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingPayload {
    pub customer: CustomerDetails,
    pub location: LocationDetails,
    pub booking: BookingDetails,
}

impl BookingPayload {
    /// Pure mapping from the form and resolved coordinates. Values are copied
    /// as entered; only the time is normalised.
    pub fn build(form: &IntakeForm, latitude: f64, longitude: f64) -> Self {
        Self {
            customer: CustomerDetails {
                name: form.name.clone(),
                email: form.email.clone(),
                phone: form.phone.clone(),
            },
            location: LocationDetails {
                latitude,
                longitude,
                postal_code: form.postal_code.clone(),
                street_name: form.street_name.clone(),
                street_number: form.street_number.clone(),
                city: form.city.clone(),
                state_province: form.state_province.clone(),
                country: form.country.clone(),
            },
            booking: BookingDetails {
                booking_date: form.date.clone(),
                booking_time: format_time(&form.time),
            },
        }
    }
}

/// Why a submit attempt ended without saving.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    #[error("{}", INVALID_PHONE_MESSAGE)]
    ValidationFailure,

    #[error("{}", UNRESOLVED_LOCATION_MESSAGE)]
    ResolutionFailure,

    /// Redirected to the logout hook instead of being shown.
    #[error("{0}")]
    AuthFailure(String),

    #[error("{0}")]
    SubmissionFailure(String),
}

impl IntakeError {
    /// Message for the operator; `None` when the error is handled by logging
    /// out instead.
    pub fn user_message(&self) -> Option<String> {
        match self {
            IntakeError::AuthFailure(_) => None,
            other => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntakePhase {
    Editing,
    Validating,
    Resolving,
    Submitting,
    Succeeded,
}

/// Tag identifying the submit attempt that issued a geocode or booking call.
/// Every accepted `Submit` and every `Cancel` moves to a new attempt, so a
/// call that completes afterwards no longer matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct SubmitAttempt(pub u64);

impl SubmitAttempt {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for SubmitAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IntakeEvent {
    Edit { field: IntakeField, value: String },
    PhoneValidityChanged(bool),
    Submit,
    CoordinatesResolved {
        attempt: SubmitAttempt,
        coordinates: ResolvedCoordinates,
    },
    SubmissionSucceeded { attempt: SubmitAttempt },
    SubmissionFailed { attempt: SubmitAttempt, message: String },
    Cancel,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IntakeEffect {
    /// Geocode `address` and feed the answer back tagged with `attempt`.
    ResolveCoordinates {
        attempt: SubmitAttempt,
        address: AddressQuery,
    },
    /// Persist `payload` and feed the outcome back tagged with `attempt`.
    SubmitBooking {
        attempt: SubmitAttempt,
        payload: BookingPayload,
    },
    NotifySaved,
    NotifyClosed,
    NotifyLogout,
    /// Message for the operator; the form stays open.
    ShowMessage(String),
}

#[derive(Debug, Clone)]
pub struct IntakeMachine {
    form: IntakeForm,
    phone_valid: bool,
    coordinates: ResolvedCoordinates,
    phase: IntakePhase,
    last_error: Option<IntakeError>,
    attempt: SubmitAttempt,
}

impl Default for IntakeMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl IntakeMachine {
    pub fn new() -> Self {
        Self {
            form: IntakeForm::default(),
            phone_valid: false,
            coordinates: ResolvedCoordinates::unresolved(),
            phase: IntakePhase::Editing,
            last_error: None,
            attempt: SubmitAttempt::default(),
        }
    }

    pub fn form(&self) -> &IntakeForm {
        &self.form
    }

    pub fn phase(&self) -> IntakePhase {
        self.phase
    }

    pub fn phone_valid(&self) -> bool {
        self.phone_valid
    }

    pub fn cached_coordinates(&self) -> ResolvedCoordinates {
        self.coordinates
    }

    pub fn last_error(&self) -> Option<&IntakeError> {
        self.last_error.as_ref()
    }

    pub fn attempt(&self) -> SubmitAttempt {
        self.attempt
    }

    pub fn handle(&mut self, event: IntakeEvent) -> Vec<IntakeEffect> {
        match event {
            IntakeEvent::Edit { field, value } => {
                if self.phase == IntakePhase::Succeeded {
                    self.phase = IntakePhase::Editing;
                }
                if field.is_geocoded() && self.form.get(field) != value {
                    self.coordinates = ResolvedCoordinates::unresolved();
                }
                self.form.set(field, value);
                Vec::new()
            }
            IntakeEvent::PhoneValidityChanged(valid) => {
                self.phone_valid = valid;
                Vec::new()
            }
            IntakeEvent::Submit => self.on_submit(),
            IntakeEvent::CoordinatesResolved { attempt, coordinates } => {
                if !self.is_current(attempt, IntakePhase::Resolving) {
                    return Vec::new();
                }
                self.coordinates = coordinates;
                match coordinates.pair() {
                    Some((lat, lon)) => self.begin_submission(lat, lon),
                    None => {
                        warn!(
                            street_number = %self.form.street_number,
                            street_name = %self.form.street_name,
                            postal_code = %self.form.postal_code,
                            "Address did not resolve to coordinates"
                        );
                        self.reject(IntakeError::ResolutionFailure)
                    }
                }
            }
            IntakeEvent::SubmissionSucceeded { attempt } => {
                if !self.is_current(attempt, IntakePhase::Submitting) {
                    return Vec::new();
                }
                info!(attempt = %attempt, "Appointment saved");
                self.form = IntakeForm::default();
                self.phone_valid = false;
                self.coordinates = ResolvedCoordinates::unresolved();
                self.last_error = None;
                self.phase = IntakePhase::Succeeded;
                vec![IntakeEffect::NotifySaved, IntakeEffect::NotifyClosed]
            }
            IntakeEvent::SubmissionFailed { attempt, message } => {
                if !self.is_current(attempt, IntakePhase::Submitting) {
                    return Vec::new();
                }
                error!(error = %message, "Error saving appointment");
                if message.contains(AUTH_REQUIRED_MARKER) {
                    self.reject(IntakeError::AuthFailure(message))
                } else if message.trim().is_empty() {
                    self.reject(IntakeError::SubmissionFailure(
                        GENERIC_SAVE_ERROR_MESSAGE.to_string(),
                    ))
                } else {
                    self.reject(IntakeError::SubmissionFailure(message))
                }
            }
            IntakeEvent::Cancel => {
                let attempt = self.attempt.next();
                *self = Self::new();
                self.attempt = attempt;
                vec![IntakeEffect::NotifyClosed]
            }
        }
    }

    fn on_submit(&mut self) -> Vec<IntakeEffect> {
        if !matches!(self.phase, IntakePhase::Editing | IntakePhase::Succeeded) {
            debug!(phase = ?self.phase, "Submission already in progress");
            return Vec::new();
        }
        self.attempt = self.attempt.next();
        self.last_error = None;

        self.phase = IntakePhase::Validating;
        if !self.form.phone.is_empty() && !self.phone_valid {
            return self.reject(IntakeError::ValidationFailure);
        }

        if let Some((lat, lon)) = self.coordinates.pair() {
            return self.begin_submission(lat, lon);
        }

        self.phase = IntakePhase::Resolving;
        vec![IntakeEffect::ResolveCoordinates {
            attempt: self.attempt,
            address: self.form.address_query(),
        }]
    }

    fn begin_submission(&mut self, latitude: f64, longitude: f64) -> Vec<IntakeEffect> {
        self.phase = IntakePhase::Submitting;
        let payload = BookingPayload::build(&self.form, latitude, longitude);
        debug!(
            payload = %serde_json::to_string(&payload).unwrap_or_default(),
            "Submitting booking"
        );
        vec![IntakeEffect::SubmitBooking {
            attempt: self.attempt,
            payload,
        }]
    }

    fn reject(&mut self, error: IntakeError) -> Vec<IntakeEffect> {
        self.phase = IntakePhase::Editing;
        let effect = match error.user_message() {
            Some(message) => IntakeEffect::ShowMessage(message),
            None => IntakeEffect::NotifyLogout,
        };
        self.last_error = Some(error);
        vec![effect]
    }

    fn is_current(&self, attempt: SubmitAttempt, expected: IntakePhase) -> bool {
        if attempt == self.attempt && self.phase == expected {
            return true;
        }
        debug!(
            stale = %attempt,
            current = %self.attempt,
            phase = ?self.phase,
            "Discarding result of an abandoned submit attempt"
        );
        false
    }
}
