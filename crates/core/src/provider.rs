//! ReasoningProvider trait — the abstraction over the reasoning backend.
//!
//! The orchestration loop calls `reason()` once per role step without
//! knowing whether the backend is a live model endpoint or a scripted
//! simulation. The provider is treated as opaque, possibly slow, and
//! possibly failing; the loop bounds each call with a timeout.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::memory::MemoryKind;
use crate::message::Message;
use crate::role::Role;

/// Geographic context forwarded to the provider when available.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// A reasoning request for one role step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasonRequest {
    /// Title of the task being worked
    pub task_title: String,

    /// The acting role
    pub role: Role,

    /// The most recent messages from the log (at most 10)
    pub recent_messages: Vec<Message>,

    /// Optional location context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

/// The provider's output for one role step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    /// The role's reasoning text
    pub thought: String,

    /// A concrete action to hand to the Tool Executor, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    /// Classification under which to store the thought, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryKind>,

    /// Certainty of current progress, in [0, 1]
    pub confidence: f32,
}

impl StepResult {
    /// Create a step result. Confidence is clamped into [0, 1];
    /// a non-finite value collapses to 0.
    pub fn new(thought: impl Into<String>, confidence: f32) -> Self {
        Self {
            thought: thought.into(),
            action: None,
            memory: None,
            confidence: clamp_confidence(confidence),
        }
    }

    /// Attach an action string.
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Attach a memory classification.
    pub fn with_memory(mut self, kind: MemoryKind) -> Self {
        self.memory = Some(kind);
        self
    }
}

/// Clamp a raw confidence score into [0, 1].
pub fn clamp_confidence(raw: f32) -> f32 {
    if raw.is_finite() { raw.clamp(0.0, 1.0) } else { 0.0 }
}

/// The reasoning capability the orchestration loop depends on.
#[async_trait]
pub trait ReasoningProvider: Send + Sync {
    /// A human-readable name for this provider (e.g. "scripted", "openrouter").
    fn name(&self) -> &str;

    /// Produce the step result for one acting role.
    async fn reason(&self, request: ReasonRequest) -> Result<StepResult, ProviderError>;
}
