//! Scripted provider — deterministic reasoning without a model endpoint.
//!
//! Three modes:
//! - a finite script of step results (tests drive exact run shapes with it,
//!   including injected provider errors),
//! - a constant-confidence mode,
//! - a generated narrative that produces role-appropriate thoughts and a
//!   rising critic confidence, converging on the third round. This is the
//!   offline default the CLI runs with.

use std::sync::Mutex;

use async_trait::async_trait;
use roundtable_core::error::ProviderError;
use roundtable_core::memory::MemoryKind;
use roundtable_core::provider::{ReasonRequest, ReasoningProvider, StepResult};
use roundtable_core::role::Role;

/// Critic confidence per round in generated mode; the final value crosses
/// the default convergence threshold.
const CRITIC_SCHEDULE: [f32; 3] = [0.55, 0.72, 0.9];

enum Mode {
    Sequence(std::collections::VecDeque<Result<StepResult, ProviderError>>),
    Constant(f32),
    Generated { calls: u64, critic_calls: u64 },
}

/// A deterministic, in-process reasoning provider.
pub struct ScriptedProvider {
    mode: Mutex<Mode>,
}

impl ScriptedProvider {
    /// Play back a finite script of step results, in order.
    ///
    /// Once the script is exhausted, further calls fail with
    /// [`ProviderError::NotConfigured`].
    pub fn from_steps(steps: Vec<StepResult>) -> Self {
        Self::from_results(steps.into_iter().map(Ok).collect())
    }

    /// Play back a finite script that may include provider errors.
    pub fn from_results(results: Vec<Result<StepResult, ProviderError>>) -> Self {
        Self {
            mode: Mutex::new(Mode::Sequence(results.into())),
        }
    }

    /// Return the same confidence on every call, with a role-stamped
    /// thought and no action or memory classification.
    pub fn constant(confidence: f32) -> Self {
        Self {
            mode: Mutex::new(Mode::Constant(confidence)),
        }
    }

    /// Endless role-aware narration with a rising critic confidence.
    pub fn generated() -> Self {
        Self {
            mode: Mutex::new(Mode::Generated {
                calls: 0,
                critic_calls: 0,
            }),
        }
    }

    fn generated_step(
        request: &ReasonRequest,
        calls: u64,
        critic_calls: &mut u64,
    ) -> StepResult {
        let title = &request.task_title;
        match request.role {
            Role::Planner => StepResult::new(
                format!("Breaking '{title}' into diagnose, act, and verify stages."),
                0.82,
            )
            .with_memory(MemoryKind::ShortTerm),
            Role::Reasoning => StepResult::new(
                format!("The fastest path for '{title}' is to inspect recent signals first."),
                0.78,
            )
            .with_action("query recent error signals"),
            Role::ToolExecutor => StepResult::new(
                "Dispatched the remediation call through the connector.".to_string(),
                0.85,
            )
            .with_action("web_connector: apply remediation")
            .with_memory(MemoryKind::Episodic),
            Role::Critic => {
                let idx = (*critic_calls as usize).min(CRITIC_SCHEDULE.len() - 1);
                *critic_calls += 1;
                let confidence = CRITIC_SCHEDULE[idx];
                let mut result = StepResult::new(
                    format!(
                        "Verification pass {}: checked the outcome against '{title}'.",
                        *critic_calls
                    ),
                    confidence,
                );
                if confidence >= 0.8 {
                    result = result.with_memory(MemoryKind::LongTerm);
                }
                result
            }
            Role::Memory | Role::Orchestrator => {
                StepResult::new(format!("Reviewing prior notes for '{title}' (pass {calls})."), 0.9)
            }
        }
    }
}

#[async_trait]
impl ReasoningProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn reason(&self, request: ReasonRequest) -> Result<StepResult, ProviderError> {
        let mut mode = self.mode.lock().unwrap_or_else(|e| e.into_inner());
        match &mut *mode {
            Mode::Sequence(queue) => queue.pop_front().unwrap_or_else(|| {
                Err(ProviderError::NotConfigured(
                    "scripted provider exhausted its script".into(),
                ))
            }),
            Mode::Constant(confidence) => Ok(StepResult::new(
                format!("{} assessment of '{}'.", request.role, request.task_title),
                *confidence,
            )),
            Mode::Generated { calls, critic_calls } => {
                *calls += 1;
                Ok(Self::generated_step(&request, *calls, critic_calls))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(role: Role) -> ReasonRequest {
        ReasonRequest {
            task_title: "Automatic Computer Fixer".into(),
            role,
            recent_messages: vec![],
            location: None,
        }
    }

    #[tokio::test]
    async fn sequence_plays_in_order_then_exhausts() {
        let provider = ScriptedProvider::from_steps(vec![
            StepResult::new("first", 0.5),
            StepResult::new("second", 0.6),
        ]);

        let a = provider.reason(request(Role::Planner)).await.unwrap();
        let b = provider.reason(request(Role::Reasoning)).await.unwrap();
        assert_eq!(a.thought, "first");
        assert_eq!(b.thought, "second");

        let err = provider.reason(request(Role::Critic)).await.unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }

    #[tokio::test]
    async fn sequence_surfaces_scripted_errors() {
        let provider = ScriptedProvider::from_results(vec![
            Ok(StepResult::new("fine", 0.9)),
            Err(ProviderError::Network("connection reset".into())),
        ]);

        provider.reason(request(Role::Planner)).await.unwrap();
        let err = provider.reason(request(Role::Reasoning)).await.unwrap_err();
        assert!(matches!(err, ProviderError::Network(_)));
    }

    #[tokio::test]
    async fn constant_returns_fixed_confidence() {
        let provider = ScriptedProvider::constant(0.3);
        for role in Role::ROUND_SEQUENCE {
            let result = provider.reason(request(role)).await.unwrap();
            assert!((result.confidence - 0.3).abs() < f32::EPSILON);
            assert!(result.action.is_none());
            assert!(result.memory.is_none());
        }
    }

    #[tokio::test]
    async fn generated_critic_converges_on_third_pass() {
        let provider = ScriptedProvider::generated();

        let first = provider.reason(request(Role::Critic)).await.unwrap();
        let second = provider.reason(request(Role::Critic)).await.unwrap();
        let third = provider.reason(request(Role::Critic)).await.unwrap();

        assert!(first.confidence < 0.8);
        assert!(second.confidence < 0.8);
        assert!(third.confidence >= 0.8);
        assert_eq!(third.memory, Some(MemoryKind::LongTerm));
    }

    #[tokio::test]
    async fn generated_executor_carries_action() {
        let provider = ScriptedProvider::generated();
        let result = provider.reason(request(Role::ToolExecutor)).await.unwrap();
        assert!(result.action.is_some());
        assert_eq!(result.memory, Some(MemoryKind::Episodic));
    }
}
