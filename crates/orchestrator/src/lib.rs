//! The Roundtable orchestration loop.
//!
//! A run works one scenario through bounded rounds:
//!
//! 1. **Priming** — the Memory role consults prior notes
//! 2. **Rounds** — up to the round budget, each a strict
//!    Planner → Reasoning → Tool Executor → Critic sequence
//! 3. **Gate** — after the Critic's step, its confidence either converges
//!    the run (≥ threshold) or sends feedback to the Planner for another
//!    round
//!
//! A round always completes all four steps before the gate is evaluated.
//! Provider faults abort the run with a narrated recovery message; no error
//! ever escapes to the caller.

pub mod runner;
pub mod session;

pub use runner::{
    DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_EXECUTOR_TOOL, DEFAULT_ROUND_BUDGET, FEEDBACK_CUTOFF,
    Orchestrator, RECENT_WINDOW,
};
pub use session::Session;
