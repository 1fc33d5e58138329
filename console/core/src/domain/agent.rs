// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identifier of a field agent as issued by the agent-search service.
///
/// The empty identifier is the unassign sentinel: notifying an assignment
/// with it removes whichever agent currently holds the booking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn unassigned() -> Self {
        Self(String::new())
    }

    pub fn is_unassigned(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AgentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Snapshot of a candidate agent returned by one search cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    #[serde(rename = "agentId")]
    pub agent_id: AgentId,

    pub name: String,

    /// Distance from the booking location in kilometres, exactly as the
    /// search service formatted it.
    #[serde(rename = "distance", deserialize_with = "distance_as_string")]
    pub distance_km: String,
}

impl Agent {
    pub fn new(agent_id: impl Into<String>, name: impl Into<String>, distance_km: impl Into<String>) -> Self {
        Self {
            agent_id: AgentId::new(agent_id),
            name: name.into(),
            distance_km: distance_km.into(),
        }
    }
}

// Some deployments of the search service emit the distance as a JSON number.
fn distance_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "invalid distance value: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unassign_sentinel_is_empty_string() {
        let id = AgentId::unassigned();
        assert!(id.is_unassigned());
        assert_eq!(id.as_str(), "");
        assert!(!AgentId::from("agent-7").is_unassigned());
    }

    #[test]
    fn test_agent_deserializes_service_shape() {
        let json = r#"{"agentId":"a-1","name":"Dana","distance":"3.2"}"#;
        let agent: Agent = serde_json::from_str(json).unwrap();
        assert_eq!(agent, Agent::new("a-1", "Dana", "3.2"));
    }

    #[test]
    fn test_agent_accepts_numeric_distance() {
        let json = r#"{"agentId":"a-2","name":"Lee","distance":12.5}"#;
        let agent: Agent = serde_json::from_str(json).unwrap();
        assert_eq!(agent.distance_km, "12.5");
    }
}
