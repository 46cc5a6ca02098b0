//! Domain event system — decoupled observation of a run.
//!
//! The session publishes an event after each mutation so a presentation
//! layer can mirror the run live without reaching into the stores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::memory::MemoryEntry;
use crate::message::Message;
use crate::role::Role;
use crate::run::{RunOutcome, RunPhase};
use crate::tool::ToolStatus;

/// All domain events in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DomainEvent {
    /// A run began on the named scenario
    RunStarted {
        scenario_id: String,
        title: String,
        timestamp: DateTime<Utc>,
    },

    /// The state machine moved to a new phase
    PhaseChanged {
        phase: RunPhase,
        round: u32,
        timestamp: DateTime<Utc>,
    },

    /// A role became the acting role
    RoleActivated { role: Role, timestamp: DateTime<Utc> },

    /// A message was appended to the log
    MessageAppended { message: Message },

    /// A memory entry was stored
    MemoryStored { entry: MemoryEntry },

    /// A single tool's status changed
    ToolStatusChanged {
        name: String,
        status: ToolStatus,
        timestamp: DateTime<Utc>,
    },

    /// Every tool was reset to idle
    ToolsReset { timestamp: DateTime<Utc> },

    /// The run reached a terminal state
    RunFinished {
        outcome: RunOutcome,
        rounds: u32,
        solved: bool,
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based event bus for domain events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub. Components
/// subscribe to receive all events and filter for what they care about.
pub struct EventBus {
    sender: broadcast::Sender<Arc<DomainEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: DomainEvent) {
        // Ignore send errors (no subscribers = that's fine)
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<DomainEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn event_bus_publish_subscribe() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(DomainEvent::RoleActivated {
            role: Role::Planner,
            timestamp: Utc::now(),
        });

        let event = rx.recv().await.unwrap();
        match event.as_ref() {
            DomainEvent::RoleActivated { role, .. } => assert_eq!(*role, Role::Planner),
            _ => panic!("Expected RoleActivated event"),
        }
    }

    #[test]
    fn event_bus_no_subscribers_doesnt_panic() {
        let bus = EventBus::new(16);
        bus.publish(DomainEvent::ToolsReset {
            timestamp: Utc::now(),
        });
    }
}
