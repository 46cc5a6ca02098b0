//! Per-run session state.
//!
//! A `Session` bundles everything one run mutates: the message log, the
//! memory store, the tool registry, and the transient run state. A fresh
//! value is constructed at run start (discarding the previous run's state)
//! so there is no process-wide mutable singleton to reset. Every mutation
//! publishes a domain event for external observers.

use std::sync::Arc;

use chrono::Utc;
use roundtable_core::event::{DomainEvent, EventBus};
use roundtable_core::memory::{MemoryKind, MemoryStore};
use roundtable_core::message::{Message, MessageKind, MessageLog};
use roundtable_core::role::Role;
use roundtable_core::run::{RunPhase, RunState};
use roundtable_core::snapshot::Snapshot;
use roundtable_core::tool::{ALL_TOOLS, ToolRegistry, ToolStatus};

/// The mutable state of one run, plus the event bus it narrates to.
pub struct Session {
    pub(crate) log: MessageLog,
    pub(crate) memory: MemoryStore,
    pub(crate) tools: ToolRegistry,
    pub(crate) state: RunState,
    pub(crate) phase: RunPhase,
    events: Arc<EventBus>,
}

impl Session {
    /// A resting session — no run active, empty stores.
    pub fn at_rest(tools: ToolRegistry, events: Arc<EventBus>) -> Self {
        Self {
            log: MessageLog::new(),
            memory: MemoryStore::new(),
            tools,
            state: RunState::default(),
            phase: RunPhase::Idle,
            events,
        }
    }

    /// A fresh session for a new run: empty log and memory, the given tool
    /// registry carried over, run state active.
    pub fn start(tools: ToolRegistry, events: Arc<EventBus>) -> Self {
        Self {
            log: MessageLog::new(),
            memory: MemoryStore::new(),
            tools,
            state: RunState::started(),
            phase: RunPhase::Idle,
            events,
        }
    }

    /// Append a message to the log and publish it.
    pub(crate) fn append(
        &mut self,
        from: Role,
        to: Role,
        content: impl Into<String>,
        kind: MessageKind,
    ) {
        let message = Message::new(from, to, content, kind);
        self.log.append(message.clone());
        self.events.publish(DomainEvent::MessageAppended { message });
    }

    /// Store a classified memory entry and publish it.
    pub(crate) fn store_memory(&mut self, kind: MemoryKind, data: impl Into<String>) {
        self.memory.insert(kind, data);
        if let Some(entry) = self.memory.head() {
            self.events.publish(DomainEvent::MemoryStored {
                entry: entry.clone(),
            });
        }
    }

    /// Mark a role as the acting role.
    pub(crate) fn set_role(&mut self, role: Role) {
        self.state.current_role = role;
        self.events.publish(DomainEvent::RoleActivated {
            role,
            timestamp: Utc::now(),
        });
    }

    /// Move the state machine to a new phase.
    pub(crate) fn set_phase(&mut self, phase: RunPhase, round: u32) {
        self.phase = phase;
        self.events.publish(DomainEvent::PhaseChanged {
            phase,
            round,
            timestamp: Utc::now(),
        });
    }

    /// Set a tool's status. The [`ALL_TOOLS`] sentinel with `Idle` resets
    /// every tool and publishes a single reset event.
    pub(crate) fn set_tool_status(&mut self, name: &str, status: ToolStatus) {
        self.tools.set_status(name, status);
        if name == ALL_TOOLS {
            self.events.publish(DomainEvent::ToolsReset {
                timestamp: Utc::now(),
            });
        } else {
            self.events.publish(DomainEvent::ToolStatusChanged {
                name: name.to_string(),
                status,
                timestamp: Utc::now(),
            });
        }
    }

    /// Record that a new round began.
    pub(crate) fn begin_round(&mut self, round: u32) {
        self.state.round_count = round;
    }

    /// Record that the critic accepted the solution.
    pub(crate) fn mark_solved(&mut self) {
        self.state.solved = true;
    }

    /// Mark the run inactive.
    pub(crate) fn finish(&mut self) {
        self.state.active = false;
    }

    /// The message log.
    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    /// The memory store.
    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    /// The tool registry.
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// The transient run state.
    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// The state machine's current phase.
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Capture the observable state for an external consumer.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            current_role: self.state.current_role,
            messages: self.log.messages().to_vec(),
            memories: self.memory.entries().cloned().collect(),
            tools: self.tools.tools().to_vec(),
            run_active: self.state.active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::start(ToolRegistry::default(), Arc::new(EventBus::default()))
    }

    #[test]
    fn fresh_session_has_empty_stores() {
        let session = session();
        assert!(session.log().is_empty());
        assert!(session.memory().is_empty());
        assert!(session.state().active);
        assert_eq!(session.phase(), RunPhase::Idle);
    }

    #[test]
    fn append_publishes_event() {
        let events = Arc::new(EventBus::default());
        let mut rx = events.subscribe();
        let mut session = Session::start(ToolRegistry::default(), events);

        session.append(
            Role::Memory,
            Role::Planner,
            "checking notes",
            MessageKind::Observation,
        );

        let event = rx.try_recv().unwrap();
        match event.as_ref() {
            DomainEvent::MessageAppended { message } => {
                assert_eq!(message.from, Role::Memory);
                assert_eq!(message.content, "checking notes");
            }
            other => panic!("Expected MessageAppended, got {other:?}"),
        }
        assert_eq!(session.log().len(), 1);
    }

    #[test]
    fn memory_store_publishes_entry() {
        let events = Arc::new(EventBus::default());
        let mut rx = events.subscribe();
        let mut session = Session::start(ToolRegistry::default(), events);

        session.store_memory(MemoryKind::LongTerm, "past fix: restart gateway");

        let event = rx.try_recv().unwrap();
        assert!(matches!(event.as_ref(), DomainEvent::MemoryStored { .. }));
        assert_eq!(session.memory().len(), 1);
    }

    #[test]
    fn all_sentinel_publishes_single_reset() {
        let events = Arc::new(EventBus::default());
        let mut rx = events.subscribe();
        let mut session = Session::start(ToolRegistry::default(), events);

        session.set_tool_status("web_connector", ToolStatus::Executing);
        session.set_tool_status(ALL_TOOLS, ToolStatus::Idle);

        let first = rx.try_recv().unwrap();
        assert!(matches!(
            first.as_ref(),
            DomainEvent::ToolStatusChanged { .. }
        ));
        let second = rx.try_recv().unwrap();
        assert!(matches!(second.as_ref(), DomainEvent::ToolsReset { .. }));
        assert!(
            session
                .tools()
                .tools()
                .iter()
                .all(|t| t.status == ToolStatus::Idle)
        );
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut session = session();
        session.append(Role::Planner, Role::Orchestrator, "plan", MessageKind::Thought);
        session.store_memory(MemoryKind::ShortTerm, "note");
        session.set_role(Role::Critic);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.messages.len(), 1);
        assert_eq!(snapshot.memories.len(), 1);
        assert_eq!(snapshot.current_role, Role::Critic);
        assert!(snapshot.run_active);
    }
}
