//! `roundtable run` — execute one orchestration run and print the transcript.

use std::sync::Arc;
use std::time::Duration;

use roundtable_config::AppConfig;
use roundtable_core::error::Error;
use roundtable_core::event::{DomainEvent, EventBus};
use roundtable_core::memory::MemoryKind;
use roundtable_core::message::MessageKind;
use roundtable_core::provider::Location;
use roundtable_core::run::RunPhase;
use roundtable_core::scenario;
use roundtable_orchestrator::Orchestrator;
use tracing::info;

pub async fn run(scenario_id: String, provider_override: Option<String>) -> Result<(), Error> {
    let mut config = AppConfig::load().map_err(|e| Error::Config {
        message: e.to_string(),
    })?;
    if let Some(kind) = provider_override {
        config.provider.kind = kind;
        config.validate().map_err(|e| Error::Config {
            message: e.to_string(),
        })?;
    }

    let scenario = scenario::find(&scenario_id).ok_or_else(|| Error::Config {
        message: format!("unknown scenario '{scenario_id}' (see `roundtable scenarios`)"),
    })?;

    let provider = roundtable_providers::build_from_config(&config)?;
    let provider_name = provider.name().to_string();

    let events = Arc::new(EventBus::default());
    let mut orchestrator = Orchestrator::new(provider, scenario, events.clone())
        .with_round_budget(config.orchestrator.round_budget)
        .with_confidence_threshold(config.orchestrator.confidence_threshold)
        .with_tool_latency(Duration::from_millis(config.orchestrator.tool_latency_ms))
        .with_provider_timeout(Duration::from_secs(config.orchestrator.provider_timeout_secs));
    if let Some(loc) = config.location {
        orchestrator = orchestrator.with_location(Location {
            latitude: loc.latitude,
            longitude: loc.longitude,
        });
    }

    println!();
    println!("  Scenario:  {}", orchestrator.scenario().title);
    println!("  Problem:   {}", orchestrator.scenario().problem_definition);
    println!("  Provider:  {provider_name}");
    println!();

    info!(scenario = %scenario_id, provider = %provider_name, "Starting run");

    // Subscribe before the run so the whole narration is buffered.
    let mut rx = events.subscribe();
    let report = orchestrator.run().await;

    while let Ok(event) = rx.try_recv() {
        match event.as_ref() {
            DomainEvent::PhaseChanged {
                phase: RunPhase::Round,
                round,
                ..
            } => {
                println!("  ── Round {round} ──");
            }
            DomainEvent::MessageAppended { message } => {
                println!(
                    "  {} -> {} [{}] {}",
                    message.from,
                    message.to,
                    kind_label(message.kind),
                    message.content
                );
            }
            DomainEvent::MemoryStored { entry } => {
                println!("      (memory/{}: {})", memory_label(entry.kind), entry.data);
            }
            _ => {}
        }
    }

    let snapshot = orchestrator.snapshot();
    println!();
    println!(
        "  Outcome:   {} ({} rounds, solved: {})",
        report.outcome, report.rounds, report.solved
    );
    println!("  Memories:  {} stored", snapshot.memories.len());
    println!();

    Ok(())
}

fn kind_label(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Goal => "goal",
        MessageKind::Thought => "thought",
        MessageKind::Action => "action",
        MessageKind::Feedback => "feedback",
        MessageKind::Observation => "observation",
    }
}

fn memory_label(kind: MemoryKind) -> &'static str {
    match kind {
        MemoryKind::ShortTerm => "short-term",
        MemoryKind::LongTerm => "long-term",
        MemoryKind::Episodic => "episodic",
    }
}
