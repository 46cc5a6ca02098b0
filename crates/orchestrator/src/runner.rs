//! The orchestration loop implementation.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use roundtable_core::error::ProviderError;
use roundtable_core::event::{DomainEvent, EventBus};
use roundtable_core::message::MessageKind;
use roundtable_core::provider::{Location, ReasonRequest, ReasoningProvider, StepResult};
use roundtable_core::role::Role;
use roundtable_core::memory::MemoryKind;
use roundtable_core::run::{RunOutcome, RunPhase, RunReport};
use roundtable_core::scenario::Scenario;
use roundtable_core::snapshot::Snapshot;
use roundtable_core::tool::{ALL_TOOLS, ToolRegistry, ToolStatus};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::session::Session;

/// Rounds attempted before the run is declared exhausted.
pub const DEFAULT_ROUND_BUDGET: u32 = 3;

/// Critic confidence at which the run converges.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.8;

/// Below this, a step's thought is logged as feedback instead of a thought.
pub const FEEDBACK_CUTOFF: f32 = 0.5;

/// Number of recent messages handed to the provider per step.
pub const RECENT_WINDOW: usize = 10;

/// The tool the Tool Executor brackets around its step.
pub const DEFAULT_EXECUTOR_TOOL: &str = "web_connector";

const DEFAULT_TOOL_LATENCY: Duration = Duration::from_millis(800);
const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Drives one scenario at a time through primed, bounded rounds of
/// Planner → Reasoning → Tool Executor → Critic.
pub struct Orchestrator {
    /// The reasoning backend
    provider: Arc<dyn ReasoningProvider>,

    /// Event bus shared with observers
    events: Arc<EventBus>,

    /// Mutable run state; replaced wholesale at each run start
    session: Session,

    /// The selected task
    scenario: Scenario,

    round_budget: u32,
    confidence_threshold: f32,
    tool_latency: Duration,
    provider_timeout: Duration,
    executor_tool: String,
    location: Option<Location>,
}

impl Orchestrator {
    /// Create a new orchestrator over the given provider and scenario.
    pub fn new(
        provider: Arc<dyn ReasoningProvider>,
        scenario: Scenario,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            provider,
            session: Session::at_rest(ToolRegistry::default(), events.clone()),
            events,
            scenario,
            round_budget: DEFAULT_ROUND_BUDGET,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            tool_latency: DEFAULT_TOOL_LATENCY,
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
            executor_tool: DEFAULT_EXECUTOR_TOOL.into(),
            location: None,
        }
    }

    /// Set the round budget.
    pub fn with_round_budget(mut self, budget: u32) -> Self {
        self.round_budget = budget.max(1);
        self
    }

    /// Set the convergence threshold.
    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the simulated tool latency.
    pub fn with_tool_latency(mut self, latency: Duration) -> Self {
        self.tool_latency = latency;
        self
    }

    /// Set the per-call provider timeout.
    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    /// Set which tool the Tool Executor brackets.
    pub fn with_executor_tool(mut self, name: impl Into<String>) -> Self {
        self.executor_tool = name.into();
        self
    }

    /// Attach location context forwarded to the provider.
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Select a new scenario. Rejected (returns `false`) while a run is
    /// in progress.
    pub fn select_scenario(&mut self, scenario: Scenario) -> bool {
        if self.session.state().active {
            debug!(id = %scenario.id, "Scenario selection rejected: run in progress");
            return false;
        }
        info!(id = %scenario.id, title = %scenario.title, "Scenario selected");
        self.scenario = scenario;
        true
    }

    /// The currently selected scenario.
    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// Whether a run is in progress.
    pub fn is_running(&self) -> bool {
        self.session.state().active
    }

    /// Capture the observable state.
    pub fn snapshot(&self) -> Snapshot {
        self.session.snapshot()
    }

    /// Subscribe to domain events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<DomainEvent>> {
        self.events.subscribe()
    }

    /// Execute one run of the selected scenario.
    ///
    /// A no-op (`RunOutcome::NotStarted`) when a run is already active.
    /// Never returns an error: provider faults end the run in the `Failed`
    /// state with a narrated recovery message.
    pub async fn run(&mut self) -> RunReport {
        if self.session.state().active {
            debug!("Run request ignored: already active");
            return RunReport::not_started();
        }

        // Fresh session: empty log and memory, previous registry carried over.
        let tools = self.session.tools().clone();
        self.session = Session::start(tools, self.events.clone());
        self.events.publish(DomainEvent::RunStarted {
            scenario_id: self.scenario.id.clone(),
            title: self.scenario.title.clone(),
            timestamp: Utc::now(),
        });
        self.session.set_tool_status(ALL_TOOLS, ToolStatus::Idle);
        info!(scenario = %self.scenario.id, title = %self.scenario.title, "Run started");

        let outcome = match self.drive().await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "Run failed; recovering automatically");
                self.session.append(
                    Role::Critic,
                    Role::Orchestrator,
                    "Fault detected. Recovering automatically and standing down.",
                    MessageKind::Feedback,
                );
                RunOutcome::Failed
            }
        };

        let rounds = self.session.state().round_count;
        let terminal = match outcome {
            RunOutcome::Converged => RunPhase::Converged,
            RunOutcome::Exhausted => RunPhase::Exhausted,
            _ => RunPhase::Failed,
        };
        self.session.set_phase(terminal, rounds);

        // Unwind: the same postconditions on every path.
        self.session.set_tool_status(ALL_TOOLS, ToolStatus::Idle);
        self.session.set_role(Role::Orchestrator);
        self.session.finish();

        let solved = self.session.state().solved;
        self.events.publish(DomainEvent::RunFinished {
            outcome,
            rounds,
            solved,
            timestamp: Utc::now(),
        });
        info!(%outcome, rounds, solved, "Run finished");
        self.session.set_phase(RunPhase::Idle, rounds);

        RunReport {
            outcome,
            rounds,
            solved,
        }
    }

    /// Priming plus the round loop. Any provider fault aborts the run.
    async fn drive(&mut self) -> Result<RunOutcome, ProviderError> {
        // ── Priming ──
        self.session.set_phase(RunPhase::Priming, 0);
        self.session.set_role(Role::Memory);
        self.session.append(
            Role::Memory,
            Role::Planner,
            "Consulting prior notes for a workable approach...",
            MessageKind::Observation,
        );
        self.session.store_memory(
            MemoryKind::LongTerm,
            format!("Recalled prior approaches for '{}'.", self.scenario.id),
        );

        // ── Round loop ──
        for round in 1..=self.round_budget {
            self.session.begin_round(round);
            self.session.set_phase(RunPhase::Round, round);
            debug!(round, "Round started");

            self.role_step(Role::Planner).await?;
            self.role_step(Role::Reasoning).await?;
            self.role_step(Role::ToolExecutor).await?;
            let critique = self.role_step(Role::Critic).await?;

            // The gate runs only after a complete round.
            if critique.confidence >= self.confidence_threshold {
                self.session.mark_solved();
                self.session.append(
                    Role::Orchestrator,
                    Role::Orchestrator,
                    "Verified: the solution holds. Work complete.",
                    MessageKind::Observation,
                );
                info!(round, confidence = critique.confidence, "Run converged");
                return Ok(RunOutcome::Converged);
            }

            if round < self.round_budget {
                self.session.append(
                    Role::Critic,
                    Role::Planner,
                    format!(
                        "Confidence {:.2} is below the bar. Revising the plan.",
                        critique.confidence
                    ),
                    MessageKind::Feedback,
                );
            }
        }

        self.session.append(
            Role::Orchestrator,
            Role::Orchestrator,
            "Round budget exhausted. Escalating to a human operator.",
            MessageKind::Feedback,
        );
        Ok(RunOutcome::Exhausted)
    }

    /// One role step: mark the role, bracket the tool if acting as the
    /// Tool Executor, invoke the provider, and record the outputs.
    async fn role_step(&mut self, role: Role) -> Result<StepResult, ProviderError> {
        self.session.set_role(role);
        debug!(%role, "Role step started");

        if role == Role::ToolExecutor {
            self.session
                .set_tool_status(&self.executor_tool, ToolStatus::Executing);
            tokio::time::sleep(self.tool_latency).await;
        }

        let request = ReasonRequest {
            task_title: self.scenario.title.clone(),
            role,
            recent_messages: self.session.log().recent(RECENT_WINDOW).to_vec(),
            location: self.location,
        };

        let result =
            match tokio::time::timeout(self.provider_timeout, self.provider.reason(request)).await
            {
                Ok(result) => result?,
                Err(_) => return Err(ProviderError::Timeout(self.provider_timeout.as_secs())),
            };

        let kind = if result.confidence < FEEDBACK_CUTOFF {
            MessageKind::Feedback
        } else {
            MessageKind::Thought
        };
        self.session
            .append(role, Role::Orchestrator, result.thought.clone(), kind);

        if let Some(action) = result.action.as_deref().filter(|a| !a.is_empty()) {
            self.session.append(
                role,
                Role::ToolExecutor,
                format!("Action: {action}"),
                MessageKind::Action,
            );
        }
        if role == Role::ToolExecutor {
            self.session
                .set_tool_status(&self.executor_tool, ToolStatus::Idle);
        }

        if let Some(memory_kind) = result.memory {
            self.session.store_memory(memory_kind, result.thought.clone());
        }

        Ok(result)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
