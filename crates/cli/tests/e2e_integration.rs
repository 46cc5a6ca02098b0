//! End-to-end integration tests for the Roundtable orchestration runtime.
//!
//! These tests exercise the full pipeline from configuration to run report:
//! provider construction, the orchestration loop, and the observable
//! snapshot a presentation layer would render.

use std::sync::Arc;
use std::time::Duration;

use roundtable_config::AppConfig;
use roundtable_core::error::ProviderError;
use roundtable_core::event::EventBus;
use roundtable_core::message::MessageKind;
use roundtable_core::provider::StepResult;
use roundtable_core::role::Role;
use roundtable_core::run::RunOutcome;
use roundtable_core::scenario;
use roundtable_core::snapshot::Snapshot;
use roundtable_core::tool::ToolStatus;
use roundtable_orchestrator::Orchestrator;
use roundtable_providers::{ScriptedProvider, build_from_config};

fn fast(orchestrator: Orchestrator) -> Orchestrator {
    orchestrator.with_tool_latency(Duration::ZERO)
}

// ── E2E: configured pipeline ─────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn e2e_default_config_runs_offline_and_converges() {
    // The default config selects the scripted provider, so a fresh checkout
    // works with no API key. Its critic confidence rises across rounds and
    // crosses the threshold on round 3.
    let config = AppConfig::default();
    let provider = build_from_config(&config).unwrap();

    let events = Arc::new(EventBus::default());
    let mut orchestrator = fast(Orchestrator::new(
        provider,
        scenario::find("syslog").unwrap(),
        events,
    ));

    let report = orchestrator.run().await;
    assert_eq!(report.outcome, RunOutcome::Converged);
    assert_eq!(report.rounds, 3);
    assert!(report.solved);

    let snapshot = orchestrator.snapshot();
    assert!(!snapshot.messages.is_empty());
    assert!(snapshot.memories.len() <= 10);
    assert!(!snapshot.run_active);
}

#[tokio::test(start_paused = true)]
async fn e2e_every_catalog_scenario_runs() {
    for entry in scenario::catalog() {
        let events = Arc::new(EventBus::default());
        let mut orchestrator = fast(Orchestrator::new(
            Arc::new(ScriptedProvider::constant(0.9)),
            entry.clone(),
            events,
        ));

        let report = orchestrator.run().await;
        assert_eq!(report.outcome, RunOutcome::Converged, "scenario {}", entry.id);
        assert_eq!(report.rounds, 1);
    }
}

// ── E2E: failure narration ───────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn e2e_provider_fault_is_narrated_not_raised() {
    let provider = ScriptedProvider::from_results(vec![
        Ok(StepResult::new("planning", 0.7)),
        Err(ProviderError::Network("upstream gone".into())),
    ]);

    let events = Arc::new(EventBus::default());
    let mut orchestrator = fast(Orchestrator::new(
        Arc::new(provider),
        scenario::find("weather").unwrap(),
        events,
    ));

    // run() itself never fails — the fault becomes a narrated outcome.
    let report = orchestrator.run().await;
    assert_eq!(report.outcome, RunOutcome::Failed);

    let snapshot = orchestrator.snapshot();
    let last = snapshot.messages.last().unwrap();
    assert_eq!(last.from, Role::Critic);
    assert_eq!(last.to, Role::Orchestrator);
    assert_eq!(last.kind, MessageKind::Feedback);

    // The loop is ready for a new run immediately
    assert!(!orchestrator.is_running());
    assert!(snapshot.tools.iter().all(|t| t.status == ToolStatus::Idle));
}

// ── E2E: presentation payload ────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn e2e_snapshot_serializes_for_a_ui() {
    let events = Arc::new(EventBus::default());
    let mut orchestrator = fast(Orchestrator::new(
        Arc::new(ScriptedProvider::constant(0.9)),
        scenario::find("ecommerce").unwrap(),
        events,
    ));
    orchestrator.run().await;

    let snapshot = orchestrator.snapshot();
    let json = serde_json::to_string(&snapshot).unwrap();
    assert!(json.contains("\"run_active\":false"));

    let decoded: Snapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded.messages.len(), snapshot.messages.len());
    assert_eq!(decoded.current_role, Role::Orchestrator);
}

// ── E2E: consecutive runs ────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn e2e_back_to_back_runs_with_reselection() {
    let events = Arc::new(EventBus::default());
    let mut orchestrator = fast(Orchestrator::new(
        Arc::new(ScriptedProvider::constant(0.9)),
        scenario::find("weather").unwrap(),
        events,
    ));

    let first = orchestrator.run().await;
    assert_eq!(first.outcome, RunOutcome::Converged);

    // Selection is allowed between runs
    assert!(orchestrator.select_scenario(scenario::find("syslog").unwrap()));
    let second = orchestrator.run().await;
    assert_eq!(second.outcome, RunOutcome::Converged);

    // The transcript belongs to the second run only
    let snapshot = orchestrator.snapshot();
    assert_eq!(snapshot.messages.len(), 6);
}
