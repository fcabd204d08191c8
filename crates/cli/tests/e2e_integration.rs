//! End-to-end integration tests for the Stepwise agent.
//!
//! These tests exercise the full pipeline from user query to final answer:
//! provider wire format, reply decoding, tool dispatch against the real
//! tool registry, and session state carried between tool calls.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use axum::extract::Path;
use axum::routing::{get, post};
use axum::{Json, Router};
use stepwise_agent::{AgentEvent, AgentLoop, NullSink};
use stepwise_config::ToolsConfig;
use stepwise_core::error::ProviderError;
use stepwise_core::message::Role;
use stepwise_core::provider::{Provider, ProviderRequest, ProviderResponse};
use stepwise_core::session::{ProcessStatus, SessionContext};
use stepwise_providers::GeminiProvider;
use stepwise_tools::default_registry;
use tokio::sync::mpsc;

// ── Mock Provider ────────────────────────────────────────────────────────

/// A mock provider that returns scripted replies in sequence.
struct ScriptedProvider {
    replies: Mutex<VecDeque<String>>,
    calls: Mutex<usize>,
}

impl ScriptedProvider {
    fn new(replies: Vec<serde_json::Value>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| r.to_string()).collect()),
            calls: Mutex::new(0),
        }
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        *self.calls.lock().unwrap() += 1;
        let text = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("ScriptedProvider exhausted");
        Ok(ProviderResponse {
            text,
            usage: None,
            model: "mock".into(),
        })
    }
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn observation(text: &str) -> String {
    let value: serde_json::Value = serde_json::from_str(text).unwrap();
    assert_eq!(value["step"], "observe");
    value["output"].as_str().unwrap().to_string()
}

// ── E2E: Weather over the real wire formats ──────────────────────────────

#[tokio::test]
async fn e2e_weather_query_through_gemini_wire_format() {
    // Weather service stub.
    let weather = Router::new().route(
        "/{city}",
        get(|Path(city): Path<String>| async move {
            assert_eq!(city, "Paris");
            "Partly cloudy +18°C"
        }),
    );
    let weather_url = serve(weather).await;

    // Gemini stub that replays a scripted conversation and records bodies.
    let script: Arc<Mutex<VecDeque<String>>> = Arc::new(Mutex::new(
        [
            serde_json::json!({"step": "plan", "content": "I should look up the weather in Paris."}),
            serde_json::json!({"step": "action", "function": "get_weather", "input": "Paris"}),
            serde_json::json!({"step": "output", "content": "It is partly cloudy and 18°C in Paris."}),
        ]
        .iter()
        .map(|v| v.to_string())
        .collect(),
    ));
    let bodies: Arc<Mutex<Vec<serde_json::Value>>> = Arc::new(Mutex::new(Vec::new()));

    let gemini = {
        let script = script.clone();
        let bodies = bodies.clone();
        Router::new().route(
            "/models/{model}",
            post(move |Json(body): Json<serde_json::Value>| {
                let script = script.clone();
                let bodies = bodies.clone();
                async move {
                    bodies.lock().unwrap().push(body);
                    let text = script.lock().unwrap().pop_front().unwrap();
                    Json(serde_json::json!({
                        "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}],
                        "usageMetadata": {"promptTokenCount": 50, "candidatesTokenCount": 10, "totalTokenCount": 60}
                    }))
                }
            }),
        )
    };
    let gemini_url = serve(gemini).await;

    let tools = Arc::new(default_registry(&ToolsConfig {
        weather_url,
        ..ToolsConfig::default()
    }));
    let provider = Arc::new(GeminiProvider::with_base_url("test-key", gemini_url));
    let mut agent = AgentLoop::new(provider, "gemini-2.0-flash", 0.7, tools);
    let mut conv = agent.new_conversation(None);
    let dir = tempfile::tempdir().unwrap();
    let mut session = SessionContext::new(dir.path());
    let (tx, mut rx) = mpsc::unbounded_channel();

    let answer = agent
        .process_query(&mut conv, &mut session, "What is the weather in Paris?", &tx)
        .await
        .expect("query should succeed");

    assert_eq!(answer, "It is partly cloudy and 18°C in Paris.");
    assert_eq!(
        observation(&conv.turns()[4].text),
        "The weather in Paris is Partly cloudy +18°C."
    );
    assert_eq!(agent.state().total_tokens, 180);

    // Every request asked for JSON and carried the full history.
    let bodies = bodies.lock().unwrap();
    assert_eq!(bodies.len(), 3);
    assert_eq!(
        bodies[0]["generationConfig"]["responseMimeType"],
        "application/json"
    );
    let last_contents = bodies[2]["contents"].as_array().unwrap();
    assert_eq!(last_contents.len(), 5);
    assert_eq!(last_contents[2]["role"], "model");

    let mut kinds = Vec::new();
    while let Ok(event) = rx.try_recv() {
        kinds.push(event.event_type());
    }
    assert_eq!(kinds, vec!["plan", "tool_call", "observation", "answer"]);
}

// ── E2E: Project scaffolding with directory changes ─────────────────────

#[tokio::test]
async fn e2e_scaffold_project_in_changed_directory() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        serde_json::json!({"step": "plan", "content": "Create the project folder first."}),
        serde_json::json!({"step": "action", "function": "create_folder", "input": "todo-app/src"}),
        serde_json::json!({"step": "action", "function": "run_command", "input": "cd todo-app"}),
        serde_json::json!({"step": "action", "function": "create_file", "input": {
            "file_path": "src/index.html",
            "content": "<h1>Todo</h1>"
        }}),
        serde_json::json!({"step": "action", "function": "list_folder_contents", "input": "src"}),
        serde_json::json!({"step": "action", "function": "read_file", "input": {"file_path": "src/index.html"}}),
        serde_json::json!({"step": "output", "content": "Your todo app is scaffolded."}),
    ]));
    let tools = Arc::new(default_registry(&ToolsConfig::default()));
    let mut agent = AgentLoop::new(provider.clone(), "mock", 0.7, tools);
    let mut conv = agent.new_conversation(None);
    let dir = tempfile::tempdir().unwrap();
    let mut session = SessionContext::new(dir.path());

    let answer = agent
        .process_query(&mut conv, &mut session, "Build me a todo app", &NullSink)
        .await
        .unwrap();

    assert_eq!(answer, "Your todo app is scaffolded.");
    assert_eq!(provider.calls(), 7);
    assert_eq!(agent.state().tool_calls, 5);

    let index = dir.path().join("todo-app/src/index.html");
    assert_eq!(std::fs::read_to_string(index).unwrap(), "<h1>Todo</h1>");

    // Turns: instruction, query, then model/observation pairs.
    let turns = conv.turns();
    assert_eq!(turns.len(), 2 + 1 + 5 * 2 + 1);
    assert_eq!(turns.last().unwrap().role, Role::Model);
    assert_eq!(observation(&turns[10].text).lines().last(), Some("index.html"));
    assert!(observation(&turns[12].text).ends_with("<h1>Todo</h1>"));
}

// ── E2E: Shell command limits ────────────────────────────────────────────

#[cfg(unix)]
#[tokio::test]
async fn e2e_command_timeout_is_reported_to_model() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        serde_json::json!({"step": "action", "function": "run_command", "input": "sleep 5"}),
        serde_json::json!({"step": "output", "content": "The command hung."}),
    ]));
    let tools = Arc::new(default_registry(&ToolsConfig {
        command_timeout_secs: 1,
        ..ToolsConfig::default()
    }));
    let mut agent = AgentLoop::new(provider, "mock", 0.7, tools);
    let mut conv = agent.new_conversation(None);
    let dir = tempfile::tempdir().unwrap();
    let mut session = SessionContext::new(dir.path());

    let start = std::time::Instant::now();
    agent
        .process_query(&mut conv, &mut session, "run sleep", &NullSink)
        .await
        .unwrap();

    assert!(start.elapsed() < std::time::Duration::from_secs(4));
    assert_eq!(
        observation(&conv.turns()[3].text),
        "Command 'sleep 5' timed out after 1 seconds."
    );
}

#[cfg(unix)]
#[tokio::test]
async fn e2e_dev_server_runs_in_background() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        serde_json::json!({"step": "action", "function": "run_command", "input": "sleep 30 # dev-server"}),
        serde_json::json!({"step": "output", "content": "Dev server started."}),
    ]));
    let tools = Arc::new(default_registry(&ToolsConfig {
        dev_server_patterns: vec!["dev-server".into()],
        ..ToolsConfig::default()
    }));
    let mut agent = AgentLoop::new(provider, "mock", 0.7, tools);
    let mut conv = agent.new_conversation(None);
    let dir = tempfile::tempdir().unwrap();
    let mut session = SessionContext::new(dir.path());

    agent
        .process_query(&mut conv, &mut session, "start the server", &NullSink)
        .await
        .unwrap();

    assert_eq!(
        observation(&conv.turns()[3].text),
        "Started background process for: `sleep 30 # dev-server`"
    );
    assert_eq!(session.background().len(), 1);

    let process = &mut session.background_mut()[0];
    assert_eq!(process.status(), ProcessStatus::Running);
    process.terminate().await.unwrap();
}

// ── E2E: Interactive loop over a query channel ───────────────────────────

#[tokio::test]
async fn e2e_run_serves_queries_until_channel_closes() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        serde_json::json!({"step": "action", "function": "summon_dragon", "input": "now"}),
        serde_json::json!({"step": "output", "content": "I have no such tool."}),
        serde_json::json!({"step": "output", "content": "Hello again."}),
    ]));
    let tools = Arc::new(default_registry(&ToolsConfig::default()));
    let mut agent = AgentLoop::new(provider, "mock", 0.7, tools);
    let mut conv = agent.new_conversation(None);
    let mut session = SessionContext::new(".");
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();

    let (query_tx, mut query_rx) = mpsc::channel(4);
    query_tx.send("summon a dragon".to_string()).await.unwrap();
    query_tx.send("hi".to_string()).await.unwrap();
    drop(query_tx);

    agent
        .run(&mut conv, &mut session, &mut query_rx, &events_tx)
        .await;

    let mut events = Vec::new();
    while let Ok(event) = events_rx.try_recv() {
        events.push(event);
    }
    assert!(events.contains(&AgentEvent::ToolNotFound {
        name: "summon_dragon".into()
    }));
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, AgentEvent::Answer { .. }))
            .count(),
        2
    );
    assert_eq!(agent.state().queries_processed, 2);
    assert_eq!(
        observation(&conv.turns()[3].text),
        "Tool 'summon_dragon' not found."
    );
}
