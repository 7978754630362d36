//! ReAct agent runtime: the `thinking` / `tool_pending` / `done` state
//! machine (spec §4.3).
//!
//! One [`ReActRunner::step`] call consumes either the initial user input or
//! accumulated tool results, renders context layers into a prompt prefix,
//! appends message history, and invokes the generator. Ordering guarantees
//! (spec §4.3): the message sequence is strict append-only across steps; a
//! tool-call is only observable after the generator has committed it (no
//! partial tool-call events mid-stream).

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::agentcfg::{ReactAgentDef, ToolDef};
use crate::registry::{GenerateMode, GenerateRequest, GenerateResponse, Generator};

use super::context::ContextRenderer;
use super::error::AgentError;
use super::message::Message;
use super::state::{AgentState, PendingToolCall, ReActData};

fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Host-observable event emitted when the runtime suspends waiting for tool
/// results (spec §4.3: "emits a host-observable 'tool request' event, and
/// suspends").
#[derive(Debug, Clone, PartialEq)]
pub struct ToolRequest {
    pub id: String,
    pub name: String,
    pub args: String,
}

/// Outcome of one `ReActRunner::step` call.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// The generator emitted tool call(s); the runtime is now suspended in
    /// `tool_pending` until [`ReActRunner::resume_with_results`] is called.
    ToolRequests(Vec<ToolRequest>),
    /// The generator emitted a final message; the state is now `done`.
    Done { reply: String },
}

/// Drives one `react` agent definition against a generator handle.
pub struct ReActRunner {
    def: Arc<ReactAgentDef>,
    generator: Arc<dyn Generator>,
}

impl ReActRunner {
    pub fn new(def: Arc<ReactAgentDef>, generator: Arc<dyn Generator>) -> Self {
        ReActRunner { def, generator }
    }

    fn tool_by_name<'a>(&'a self, name: &str) -> Option<&'a ToolDef> {
        self.def.tools.iter().find(|t| t.name() == name)
    }

    /// Runs one step. On the first call (`state.messages` empty apart from
    /// the rendered prefix) this should be called after the caller has
    /// pushed the user's `Message::user(..)` onto `state`; on later calls it
    /// is invoked after `resume_with_results` has appended `tool` messages.
    /// `context` renders `context_layers[]` into the request's
    /// `system_prompt` (spec §4.3); pass `None` when the agent has none.
    pub async fn step(
        &self,
        state: &mut AgentState,
        context: Option<&ContextRenderer<'_>>,
    ) -> Result<StepOutcome, AgentError> {
        let AgentState::React { common, data } = state else {
            return Err(AgentError::Validation(
                "ReActRunner::step called with non-react state".into(),
            ));
        };
        if data.finished {
            return Err(AgentError::Validation("step called on finished state".into()));
        }
        tracing::debug!(agent = %common.agent_def, phase = %data.phase, "react: step start");

        let tool_specs: Vec<serde_json::Value> =
            self.def.tools.iter().map(ToolDef::to_json_schema_entry).collect();

        let system_prompt = match context {
            Some(renderer) => renderer.render(&self.def.context_layers).await?,
            None => String::new(),
        };

        let request = GenerateRequest {
            messages: common.messages.clone(),
            mode: GenerateMode::Generate,
            tools: tool_specs,
            system_prompt,
        };
        let response: GenerateResponse = self.generator.generate(request).await?;
        if response.messages.is_empty() {
            return Err(AgentError::Validation(
                "generator returned no messages".into(),
            ));
        }

        let mut tool_requests = Vec::new();
        for msg in &response.messages {
            common.messages.push(msg.clone());
            if msg.is_tool_call() {
                let id = msg.tool_call_id.clone().unwrap_or_default();
                let name = msg.tool_call_name.clone().unwrap_or_default();
                let args = msg.tool_call_args.clone().unwrap_or_default();
                if self.tool_by_name(&name).is_none() {
                    return Err(AgentError::ToolNotFound(name));
                }
                data.tool_results.push(PendingToolCall {
                    id: id.clone(),
                    name: name.clone(),
                    args: args.clone(),
                });
                tool_requests.push(ToolRequest { id, name, args });
            }
        }

        if !tool_requests.is_empty() {
            data.phase = "tool_pending".to_string();
            tracing::debug!(agent = %common.agent_def, "react: thinking -> tool_pending");
            return Ok(StepOutcome::ToolRequests(tool_requests));
        }

        data.phase = "done".to_string();
        data.finished = true;
        let reply = common
            .messages
            .iter()
            .rev()
            .find(|m| m.role == super::message::Role::Model && !m.is_tool_call())
            .map(|m| m.content.clone())
            .unwrap_or_default();
        tracing::debug!(agent = %common.agent_def, "react: thinking -> done");
        Ok(StepOutcome::Done { reply })
    }

    /// Supplies results for all pending tool calls, appending `tool`
    /// messages and transitioning `tool_pending` back to `thinking`. A
    /// `quit` tool's result still flows through here; the caller is
    /// responsible for checking [`ReActRunner::is_quit_tool`] and, if true,
    /// finishing the agent once the next generator response lands (spec
    /// §4.3 state table: "any -> done on quit tool invoked").
    pub fn resume_with_results(
        &self,
        state: &mut AgentState,
        results: Vec<(String, String)>,
    ) -> Result<(), AgentError> {
        let AgentState::React { common, data } = state else {
            return Err(AgentError::Validation(
                "resume_with_results called with non-react state".into(),
            ));
        };
        if data.phase != "tool_pending" {
            return Err(AgentError::Validation(format!(
                "resume_with_results called outside tool_pending (phase={})",
                data.phase
            )));
        }
        for (call_id, content) in results {
            let pending_idx = data.tool_results.iter().position(|p| p.id == call_id);
            match pending_idx {
                Some(i) => {
                    data.tool_results.remove(i);
                }
                None => {
                    return Err(AgentError::Validation(format!(
                        "no pending tool call for id {call_id}"
                    )));
                }
            }
            common.messages.push(Message::tool_result(call_id, content, now()));
        }
        if data.tool_results.is_empty() {
            data.phase = "thinking".to_string();
            tracing::debug!(agent = %common.agent_def, "react: tool_pending -> thinking");
        }
        Ok(())
    }

    /// Whether invoking `tool_name` should terminate the agent after the
    /// next generator response (spec §3 Tool `quit` flag, §4.3 state table).
    pub fn is_quit_tool(&self, tool_name: &str) -> bool {
        self.def
            .tools
            .iter()
            .find(|t| t.name() == tool_name)
            .map(|t| t.quit())
            .unwrap_or(false)
    }
}
