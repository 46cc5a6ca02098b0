//! # Roundtable Core
//!
//! Domain types, traits, and error definitions for the Roundtable
//! orchestration engine. This crate has **zero framework dependencies** — it
//! defines the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The reasoning capability is defined as a trait here; implementations live
//! in `roundtable-providers`. The orchestration loop in
//! `roundtable-orchestrator` drives the stores defined here and publishes
//! domain events so a presentation layer can mirror a run without touching
//! any of the mutable state.

pub mod error;
pub mod event;
pub mod memory;
pub mod message;
pub mod provider;
pub mod role;
pub mod run;
pub mod scenario;
pub mod snapshot;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProviderError, Result};
pub use event::{DomainEvent, EventBus};
pub use memory::{MEMORY_CAPACITY, MemoryEntry, MemoryKind, MemoryStore};
pub use message::{Message, MessageKind, MessageLog};
pub use provider::{Location, ReasonRequest, ReasoningProvider, StepResult};
pub use role::Role;
pub use run::{RunOutcome, RunPhase, RunReport, RunState};
pub use scenario::{Scenario, catalog};
pub use snapshot::Snapshot;
pub use tool::{ALL_TOOLS, Tool, ToolRegistry, ToolStatus};
