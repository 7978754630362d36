//! End-to-end ReAct state machine scenario (spec §8 scenario 3): a tool call
//! round trip transitions `thinking` -> `tool_pending` -> `thinking` ->
//! `done`, exercised entirely through the public crate API.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use genx::agent::{AgentState, Message, ProviderError, ReActRunner, StepOutcome};
use genx::agentcfg::{GeneratorRef, GeneratorTool, ReactAgentDef, ToolDef, ToolGenerateMode};
use genx::registry::{GenerateRequest, GenerateResponse, Generator};

struct ScriptedGenerator {
    responses: Mutex<Vec<GenerateResponse>>,
}

#[async_trait]
impl Generator for ScriptedGenerator {
    fn model_id(&self) -> &str {
        "mock/v1"
    }
    async fn generate(&self, _req: GenerateRequest) -> Result<GenerateResponse, ProviderError> {
        let mut r = self.responses.lock().unwrap();
        if r.is_empty() {
            return Err(ProviderError::Network("exhausted script".into()));
        }
        Ok(r.remove(0))
    }
}

fn weather_agent_def() -> ReactAgentDef {
    ReactAgentDef {
        name: "weather-agent".into(),
        prompt: "You are a weather bot.".into(),
        context_layers: Vec::new(),
        generator: GeneratorRef::Inline("qwen/turbo".into()),
        tools: vec![ToolDef::Generator(GeneratorTool {
            name: "get_weather".into(),
            model: "qwen/turbo".into(),
            mode: ToolGenerateMode::Generate,
            prompt: None,
            context_layers: Vec::new(),
            output_schema: None,
            quit: false,
        })],
    }
}

#[tokio::test]
async fn tool_round_trip_reaches_done_with_no_unmatched_calls() {
    let generator = Arc::new(ScriptedGenerator {
        responses: Mutex::new(vec![
            GenerateResponse {
                messages: vec![Message::model_tool_call("c1", "get_weather", "{\"city\":\"NYC\"}", 1)],
            },
            GenerateResponse {
                messages: vec![Message::model_text("it is sunny", 3)],
            },
        ]),
    });
    let runner = ReActRunner::new(Arc::new(weather_agent_def()), generator);
    let mut state = AgentState::new_react("s1", "weather-agent");
    if let AgentState::React { common, .. } = &mut state {
        common.messages.push(Message::user("what's the weather", 0));
    }

    let outcome = runner.step(&mut state, None).await.unwrap();
    let requests = match outcome {
        StepOutcome::ToolRequests(r) => r,
        StepOutcome::Done { .. } => panic!("expected tool requests, got done"),
    };
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].name, "get_weather");

    runner
        .resume_with_results(&mut state, vec![("c1".to_string(), "sunny".to_string())])
        .unwrap();

    let outcome = runner.step(&mut state, None).await.unwrap();
    match outcome {
        StepOutcome::Done { reply } => assert_eq!(reply, "it is sunny"),
        StepOutcome::ToolRequests(_) => panic!("expected done"),
    }

    state.validate().unwrap();
}

#[tokio::test]
async fn step_on_finished_state_is_rejected() {
    let generator = Arc::new(ScriptedGenerator {
        responses: Mutex::new(vec![GenerateResponse {
            messages: vec![Message::model_text("ok", 1)],
        }]),
    });
    let runner = ReActRunner::new(Arc::new(weather_agent_def()), generator);
    let mut state = AgentState::new_react("s1", "weather-agent");
    if let AgentState::React { common, .. } = &mut state {
        common.messages.push(Message::user("hi", 0));
    }
    runner.step(&mut state, None).await.unwrap();
    assert!(runner.step(&mut state, None).await.is_err());
}
