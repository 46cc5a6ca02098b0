//! Read-only view of the observable orchestration state.
//!
//! A presentation layer (UI, CLI transcript printer) consumes snapshots and
//! the event stream; it never touches the session's mutable state.

use serde::{Deserialize, Serialize};

use crate::memory::MemoryEntry;
use crate::message::Message;
use crate::role::Role;
use crate::tool::Tool;

/// Everything an external observer may see, captured at one point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// The role currently acting (Orchestrator when at rest)
    pub current_role: Role,

    /// Full message log in append order
    pub messages: Vec<Message>,

    /// Memory entries, most-recent-first
    pub memories: Vec<MemoryEntry>,

    /// All tools with their statuses
    pub tools: Vec<Tool>,

    /// Whether a run is in progress
    pub run_active: bool,
}
