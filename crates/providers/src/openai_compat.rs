//! OpenAI-compatible provider implementation.
//!
//! Works with: OpenAI, OpenRouter, Ollama, vLLM, Together AI, and any other
//! endpoint exposing an OpenAI-compatible `/chat/completions` route.
//!
//! Each role step becomes one chat completion: a role-specific system prompt
//! plus the rendered recent transcript, asking the model for a strict JSON
//! object `{thought, action, memory, confidence}`.

use async_trait::async_trait;
use roundtable_core::error::ProviderError;
use roundtable_core::memory::MemoryKind;
use roundtable_core::message::Message;
use roundtable_core::provider::{ReasonRequest, ReasoningProvider, StepResult};
use roundtable_core::role::Role;
use serde::Deserialize;
use tracing::{debug, warn};

/// An OpenAI-compatible reasoning provider.
pub struct OpenAiCompatProvider {
    name: String,
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    /// Create a new OpenAI-compatible provider.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            client,
        }
    }

    /// Create an OpenRouter provider (convenience constructor).
    pub fn openrouter(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::new("openrouter", "https://openrouter.ai/api/v1", api_key, model)
    }

    /// Create an OpenAI provider (convenience constructor).
    pub fn openai(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::new("openai", "https://api.openai.com/v1", api_key, model)
    }

    /// Create an Ollama provider (convenience constructor).
    pub fn ollama(base_url: Option<&str>, model: impl Into<String>) -> Self {
        Self::new(
            "ollama",
            base_url.unwrap_or("http://localhost:11434/v1"),
            "ollama", // Ollama doesn't need a real key
            model,
        )
    }

    /// The system prompt for one acting role.
    fn system_prompt(role: Role) -> String {
        let charter = match role {
            Role::Orchestrator => "You coordinate the team and summarize overall progress.",
            Role::Planner => "You break the task into small concrete steps.",
            Role::Reasoning => "You pick the most promising next approach and justify it briefly.",
            Role::ToolExecutor => {
                "You carry out one concrete action against the systems involved and report it."
            }
            Role::Memory => "You recall prior notes and past fixes relevant to the task.",
            Role::Critic => {
                "You verify the work so far and score how close the team is to a correct solution."
            }
        };
        format!(
            "You are the {role} in a six-role problem-solving team. {charter}\n\
             Respond with a single JSON object and nothing else:\n\
             {{\"thought\": string, \"action\": string or null, \
             \"memory\": \"short-term\" | \"long-term\" | \"episodic\" or null, \
             \"confidence\": number between 0 and 1}}"
        )
    }

    /// Render recent messages into a compact transcript block.
    fn render_transcript(messages: &[Message]) -> String {
        messages
            .iter()
            .map(|m| format!("{} -> {} [{:?}]: {}", m.from, m.to, m.kind, m.content))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The user prompt for one request.
    fn user_prompt(request: &ReasonRequest) -> String {
        let mut prompt = format!("Task: {}\n", request.task_title);
        if let Some(loc) = &request.location {
            prompt.push_str(&format!(
                "Current location: {:.2}, {:.2}\n",
                loc.latitude, loc.longitude
            ));
        }
        if request.recent_messages.is_empty() {
            prompt.push_str("No conversation yet — this is the first step.\n");
        } else {
            prompt.push_str("Recent team conversation:\n");
            prompt.push_str(&Self::render_transcript(&request.recent_messages));
            prompt.push('\n');
        }
        prompt.push_str("Produce your step result now.");
        prompt
    }

    /// Parse the model's content into a step result.
    fn parse_step_result(content: &str) -> Result<StepResult, ProviderError> {
        let trimmed = strip_code_fences(content);
        let api: ApiStepResult = serde_json::from_str(trimmed)
            .map_err(|e| ProviderError::Parse(format!("{e}: {trimmed}")))?;

        let action = api.action.filter(|a| !a.trim().is_empty());
        let memory = api.memory.as_deref().and_then(parse_memory_kind);
        if api.memory.is_some() && memory.is_none() {
            warn!(value = ?api.memory, "Ignoring unknown memory classification");
        }

        let mut result = StepResult::new(api.thought, api.confidence);
        if let Some(action) = action {
            result = result.with_action(action);
        }
        if let Some(memory) = memory {
            result = result.with_memory(memory);
        }
        Ok(result)
    }
}

/// Strip a surrounding Markdown code fence, if present.
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

fn parse_memory_kind(value: &str) -> Option<MemoryKind> {
    match value {
        "short-term" => Some(MemoryKind::ShortTerm),
        "long-term" => Some(MemoryKind::LongTerm),
        "episodic" => Some(MemoryKind::Episodic),
        _ => None,
    }
}

#[async_trait]
impl ReasoningProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn reason(&self, request: ReasonRequest) -> Result<StepResult, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": Self::system_prompt(request.role) },
                { "role": "user", "content": Self::user_prompt(&request) },
            ],
            "temperature": 0.7,
            "response_format": { "type": "json_object" },
            "stream": false,
        });

        debug!(provider = %self.name, model = %self.model, role = %request.role, "Sending reasoning request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(ProviderError::RateLimited { retry_after_secs: 5 });
        }

        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Provider returned error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status_code: 200,
                message: format!("Failed to parse response: {e}"),
            })?;

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::ApiError {
                status_code: 200,
                message: "No choices in response".into(),
            })?;

        Self::parse_step_result(&choice.message.content.unwrap_or_default())
    }
}

// --- API wire types ---

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ApiChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiStepResult {
    thought: String,
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    memory: Option<String>,
    confidence: f32,
}
