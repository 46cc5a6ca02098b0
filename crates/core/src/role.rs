//! The fixed set of agent roles.
//!
//! Six roles participate in a run. Four of them (Planner, Reasoning,
//! Tool Executor, Critic) take a step in every round; Memory acts once
//! during priming; the Orchestrator is the resting role between runs and
//! the addressee of every step's primary message.

use serde::{Deserialize, Serialize};

/// A participant in the orchestration. Fixed set, no dynamic roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Coordinates the team and owns the run lifecycle
    Orchestrator,
    /// Breaks the problem into steps
    Planner,
    /// Decides the approach for the current step
    Reasoning,
    /// Drives tools; the only role that touches tool status
    ToolExecutor,
    /// Recalls prior notes during priming
    Memory,
    /// Scores progress and gates convergence
    Critic,
}

impl Role {
    /// The four roles that step within a round, in execution order.
    pub const ROUND_SEQUENCE: [Role; 4] = [
        Role::Planner,
        Role::Reasoning,
        Role::ToolExecutor,
        Role::Critic,
    ];
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Role::Orchestrator => "Orchestrator",
            Role::Planner => "Planner",
            Role::Reasoning => "Reasoning",
            Role::ToolExecutor => "Tool Executor",
            Role::Memory => "Memory",
            Role::Critic => "Critic",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_sequence_ends_with_critic() {
        assert_eq!(Role::ROUND_SEQUENCE.len(), 4);
        assert_eq!(Role::ROUND_SEQUENCE[0], Role::Planner);
        assert_eq!(Role::ROUND_SEQUENCE[3], Role::Critic);
    }

    #[test]
    fn display_names() {
        assert_eq!(Role::ToolExecutor.to_string(), "Tool Executor");
        assert_eq!(Role::Orchestrator.to_string(), "Orchestrator");
    }

    #[test]
    fn serde_snake_case() {
        let json = serde_json::to_string(&Role::ToolExecutor).unwrap();
        assert_eq!(json, "\"tool_executor\"");
        let role: Role = serde_json::from_str("\"critic\"").unwrap();
        assert_eq!(role, Role::Critic);
    }
}
