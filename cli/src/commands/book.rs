// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! New-appointment command
//!
//! Fills the intake form from flags and submits it once. Exits non-zero
//! whenever the booking is not saved.

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use tracing::info;

use fieldops_core::application::SubmitOutcome;
use fieldops_core::domain::intake::{IntakeField, GENERIC_SAVE_ERROR_MESSAGE};

use crate::services::ConsoleServices;

#[derive(Args, Debug, Clone)]
pub struct BookArgs {
    /// Customer name
    #[arg(long)]
    pub name: String,

    /// Customer email
    #[arg(long)]
    pub email: String,

    /// Customer phone number
    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub street_number: Option<String>,

    #[arg(long)]
    pub street_name: Option<String>,

    #[arg(long)]
    pub postal_code: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    /// State or province
    #[arg(long)]
    pub province: Option<String>,

    #[arg(long)]
    pub country: Option<String>,

    /// Booking date (YYYY-MM-DD)
    #[arg(long)]
    pub date: String,

    /// Booking time (HH:MM or HH:MM:SS)
    #[arg(long)]
    pub time: String,

    /// Appointment type
    #[arg(long = "type", value_name = "TYPE")]
    pub booking_type: Option<String>,
}

impl BookArgs {
    /// Form edits in field order. Unset optional flags leave the field empty.
    pub fn edits(&self) -> Vec<(IntakeField, String)> {
        let optional = |value: &Option<String>| value.clone().unwrap_or_default();

        vec![
            (IntakeField::Name, self.name.clone()),
            (IntakeField::Email, self.email.clone()),
            (IntakeField::Phone, optional(&self.phone)),
            (IntakeField::StreetNumber, optional(&self.street_number)),
            (IntakeField::StreetName, optional(&self.street_name)),
            (IntakeField::PostalCode, optional(&self.postal_code)),
            (IntakeField::City, optional(&self.city)),
            (IntakeField::StateProvince, optional(&self.province)),
            (IntakeField::Country, optional(&self.country)),
            (IntakeField::Date, self.date.clone()),
            (IntakeField::Time, self.time.clone()),
            (IntakeField::Type, optional(&self.booking_type)),
        ]
    }
}

pub async fn execute(args: BookArgs, services: &ConsoleServices) -> Result<()> {
    let workflow = services.intake_workflow();
    for (field, value) in args.edits() {
        workflow.edit(field, value);
    }

    info!(date = %args.date, time = %args.time, "Submitting appointment");
    match workflow.submit().await {
        SubmitOutcome::Saved => {
            println!("{}", "✓ Appointment saved".green());
            Ok(())
        }
        SubmitOutcome::LoggedOut => {
            bail!("Session is no longer valid; log in again and retry")
        }
        SubmitOutcome::Rejected { message, .. } => bail!("{}", message),
        SubmitOutcome::Ignored => bail!("{}", GENERIC_SAVE_ERROR_MESSAGE),
    }
}
