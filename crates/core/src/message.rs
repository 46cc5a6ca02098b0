//! Inter-role messages and the append-only message log.
//!
//! Messages are the observable trace of a run: every role step, critique,
//! and terminal narration lands here. Messages are immutable once created;
//! ordering is append order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::role::Role;

/// The kind of an inter-role message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Announces the task being worked (presentation use)
    Goal,
    /// A role's reasoning output for the step
    Thought,
    /// A concrete action handed to the Tool Executor
    Action,
    /// Low-confidence output, retry notices, and terminal narration
    Feedback,
    /// Priming lookups and the convergence announcement
    Observation,
}

/// A single message between two roles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Run-unique message ID
    pub id: String,

    /// Who sent this message
    pub from: Role,

    /// Who it is addressed to
    pub to: Role,

    /// The text content
    pub content: String,

    /// Timestamp
    pub timestamp: DateTime<Utc>,

    /// Message kind
    pub kind: MessageKind,
}

impl Message {
    /// Create a new message.
    pub fn new(from: Role, to: Role, content: impl Into<String>, kind: MessageKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            from,
            to,
            content: content.into(),
            timestamp: Utc::now(),
            kind,
        }
    }
}

/// An append-only ordered sequence of messages.
///
/// Unbounded for the duration of one run; cleared at run start. The log is
/// owned by the session — nothing outside the orchestration flow mutates it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    /// Create a new empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// All messages in append order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The most recent `n` messages, oldest of the window first.
    pub fn recent(&self, n: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    /// The most recently appended message.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Drop all messages.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_message() {
        let msg = Message::new(
            Role::Planner,
            Role::Orchestrator,
            "Break the outage into checks",
            MessageKind::Thought,
        );
        assert_eq!(msg.from, Role::Planner);
        assert_eq!(msg.to, Role::Orchestrator);
        assert!(!msg.id.is_empty());
    }

    #[test]
    fn log_preserves_append_order() {
        let mut log = MessageLog::new();
        for i in 0..5 {
            log.append(Message::new(
                Role::Planner,
                Role::Orchestrator,
                format!("step {i}"),
                MessageKind::Thought,
            ));
        }
        assert_eq!(log.len(), 5);
        assert_eq!(log.messages()[0].content, "step 0");
        assert_eq!(log.last().unwrap().content, "step 4");
    }

    #[test]
    fn recent_window_caps_at_len() {
        let mut log = MessageLog::new();
        log.append(Message::new(
            Role::Memory,
            Role::Planner,
            "only one",
            MessageKind::Observation,
        ));
        assert_eq!(log.recent(10).len(), 1);
    }

    #[test]
    fn recent_returns_last_n_in_order() {
        let mut log = MessageLog::new();
        for i in 0..15 {
            log.append(Message::new(
                Role::Reasoning,
                Role::Orchestrator,
                format!("{i}"),
                MessageKind::Thought,
            ));
        }
        let window = log.recent(10);
        assert_eq!(window.len(), 10);
        assert_eq!(window[0].content, "5");
        assert_eq!(window[9].content, "14");
    }

    #[test]
    fn clear_empties_log() {
        let mut log = MessageLog::new();
        log.append(Message::new(
            Role::Critic,
            Role::Planner,
            "retry",
            MessageKind::Feedback,
        ));
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn message_serialization_roundtrip() {
        let msg = Message::new(
            Role::Critic,
            Role::Orchestrator,
            "confidence too low",
            MessageKind::Feedback,
        );
        let json = serde_json::to_string(&msg).unwrap();
        let deserialized: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.content, "confidence too low");
        assert_eq!(deserialized.kind, MessageKind::Feedback);
    }
}
