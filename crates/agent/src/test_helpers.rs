//! Shared test helpers for agent loop tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use stepwise_core::error::{ProviderError, ToolError};
use stepwise_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use stepwise_core::session::SessionContext;
use stepwise_core::tool::{Tool, ToolResult, string_input};

/// A mock provider that returns a sequence of scripted replies.
///
/// Each call to `complete` pops the next reply and records the request.
/// Panics if more calls are made than replies provided.
pub struct SequentialMockProvider {
    replies: Mutex<VecDeque<Result<String, ProviderError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl SequentialMockProvider {
    pub fn new(replies: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Script a list of successful raw replies.
    pub fn texts(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Provider for SequentialMockProvider {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let call = requests.len();
        requests.push(request);

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("SequentialMockProvider: no reply scripted for call #{call}"));

        reply.map(|text| ProviderResponse {
            text,
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model: "mock-model".into(),
        })
    }
}

/// A weather tool with a fixed answer, so loop tests stay offline.
pub struct FixedWeatherTool;

#[async_trait::async_trait]
impl Tool for FixedWeatherTool {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "Get the weather for a city."
    }

    fn input_description(&self) -> &str {
        "the city name"
    }

    async fn execute(
        &self,
        input: serde_json::Value,
        _session: &mut SessionContext,
    ) -> Result<ToolResult, ToolError> {
        let city = string_input(self.name(), &input, "city")?;
        Ok(ToolResult::ok(format!("The weather in {city} is Sunny +21°C.")))
    }
}

pub fn plan(content: &str) -> String {
    serde_json::json!({"step": "plan", "content": content}).to_string()
}

pub fn action(function: &str, input: serde_json::Value) -> String {
    serde_json::json!({"step": "action", "function": function, "input": input}).to_string()
}

pub fn output(content: &str) -> String {
    serde_json::json!({"step": "output", "content": content}).to_string()
}
