// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Agent assignment command
//!
//! Opens the assignment control for one booking, lists the agents the
//! search service ranks for it, and optionally records a selection.

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use tracing::info;

use fieldops_core::domain::agent::{Agent, AgentId};
use fieldops_core::domain::booking::{BookingAssignment, BookingId, BookingSchedule, Coordinates};
use fieldops_core::domain::events::ConsoleEvent;

use crate::services::ConsoleServices;

#[derive(Args, Debug, Clone)]
pub struct AssignArgs {
    /// Booking to assign
    #[arg(long, value_name = "ID")]
    pub booking_id: i64,

    /// Customer latitude (omit when the address was never geocoded)
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Customer longitude (omit when the address was never geocoded)
    #[arg(long, allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Booking date (YYYY-MM-DD)
    #[arg(long)]
    pub date: String,

    /// Booking time (HH:MM or HH:MM:SS)
    #[arg(long)]
    pub time: String,

    /// Assign this agent from the search results
    #[arg(long, value_name = "AGENT_ID", conflicts_with = "unassign")]
    pub agent: Option<String>,

    /// Clear the current assignment
    #[arg(long)]
    pub unassign: bool,

    /// Agent currently holding the booking, if any
    #[arg(long, value_name = "AGENT_ID")]
    pub current_agent: Option<String>,
}

pub async fn execute(args: AssignArgs, services: &ConsoleServices) -> Result<()> {
    info!(booking_id = args.booking_id, policy = %services.policy(), "Opening assignment control");
    let workflow = services.assignment_workflow(BookingId(args.booking_id));
    let mut events = services.event_bus.subscribe();
    let mut assignment = BookingAssignment {
        booking_id: BookingId(args.booking_id),
        current_agent_id: args.current_agent.clone().map(AgentId::new),
    };

    let coordinates = Coordinates {
        latitude: args.lat,
        longitude: args.lon,
    };
    let schedule = BookingSchedule::new(args.date, args.time);

    if let Some(message) = workflow.open(coordinates, schedule).await {
        eprintln!("{}", format!("⚠ {}", message).yellow());
    }

    print!("{}", agent_listing(workflow.shows_no_agents(), &workflow.agents()));

    if args.unassign {
        workflow.unassign();
    } else if let Some(agent_id) = args.agent {
        let agent_id = AgentId::new(agent_id);
        if !workflow.agents().iter().any(|a| a.agent_id == agent_id) {
            bail!("Agent {} is not among the available agents for booking {}", agent_id, args.booking_id);
        }
        workflow.select(agent_id);
    } else {
        return Ok(());
    }

    for event in events.drain() {
        if let ConsoleEvent::AgentAssignmentRequested { booking_id, agent_id, .. } = event {
            if booking_id != assignment.booking_id {
                continue;
            }
            assignment.apply(&agent_id);
            if agent_id.is_unassigned() {
                println!("{}", format!("✓ Unassignment requested for booking {}", booking_id).green());
            } else {
                println!(
                    "{}",
                    format!("✓ Assignment requested: booking {} → agent {}", booking_id, agent_id).green()
                );
            }
        }
    }

    match &assignment.current_agent_id {
        Some(agent_id) => println!("Current agent: {}", agent_id),
        None => println!("Current agent: {}", "(unassigned)".dimmed()),
    }

    Ok(())
}

/// Agent table, or the empty notice. A booking without coordinates reads
/// the same as a search that found nobody.
fn agent_listing(shows_no_agents: bool, agents: &[Agent]) -> String {
    if shows_no_agents {
        return format!("{}\n", "No agents found".yellow());
    }

    let mut out = format!("{} agents found:\n", agents.len());
    out.push_str(&format!("{:<24} {:<28} {}\n", "AGENT ID", "NAME", "DISTANCE"));
    for agent in agents {
        out.push_str(&format!(
            "{:<24} {:<28} {} km\n",
            agent.agent_id.as_str(),
            agent.name.bold(),
            agent.distance_km
        ));
    }
    out
}
