//! Tool registry — a fixed set of named tools with observable status.
//!
//! Tools here are a status board, not an execution surface: the orchestration
//! loop brackets the Tool Executor's step by flipping the relevant tool to
//! `Executing` and back to `Idle`. Identity is by name; status is the only
//! mutable field.

use serde::{Deserialize, Serialize};

/// Sentinel name accepted by [`ToolRegistry::set_status`]: paired with
/// [`ToolStatus::Idle`] it resets every tool in one call.
pub const ALL_TOOLS: &str = "all";

/// The lifecycle status of a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    Idle,
    Executing,
    Active,
}

/// A named tool. The set is fixed at registry construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    /// Unique key
    pub name: String,

    /// What the tool does
    pub description: String,

    /// Current status
    pub status: ToolStatus,
}

impl Tool {
    /// Create a tool in the `Idle` state.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            status: ToolStatus::Idle,
        }
    }
}

/// A registry over a fixed set of tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolRegistry {
    tools: Vec<Tool>,
}

impl ToolRegistry {
    /// Create a registry over the given tools.
    pub fn new(tools: Vec<Tool>) -> Self {
        Self { tools }
    }

    /// Set a tool's status by exact name match.
    ///
    /// The [`ALL_TOOLS`] sentinel paired with `Idle` resets every tool.
    /// Unknown names are a silent no-op — mirrors permissive external
    /// control.
    pub fn set_status(&mut self, name: &str, status: ToolStatus) {
        for tool in &mut self.tools {
            if tool.name == name || (name == ALL_TOOLS && status == ToolStatus::Idle) {
                tool.status = status;
            }
        }
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// All tools, in registration order.
    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    /// List all registered tool names.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }
}

impl Default for ToolRegistry {
    /// The built-in tool set the roles work with.
    fn default() -> Self {
        Self::new(vec![
            Tool::new("memory_search", "Looks up prior notes and past fixes"),
            Tool::new("web_connector", "Dispatches calls to external services"),
            Tool::new("server_control", "Manages and restarts managed systems"),
            Tool::new("price_tracker", "Watches market and inventory trends"),
        ])
    }
}
