//! Agent state: the serializable record persisted across steps of an agent
//! loop (spec §3 "Agent state"). Every decoder runs [`AgentState::validate`]
//! before returning decoded state to the caller.

use serde::{Deserialize, Serialize};

use super::error::AgentError;
use super::message::Message;
use crate::codec::{CodecError, TaggedEnvelope};

/// A pending tool call the runtime is waiting on a result for, keyed by
/// `id` + `name` (spec §3 "tool_results[] (pending results keyed by id +
/// name)").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingToolCall {
    pub id: String,
    pub name: String,
    pub args: String,
}

/// State specific to a `react` agent (spec §3, §4.3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ReActData {
    /// Free-form label for the current phase, e.g. `"thinking"` or
    /// `"tool_pending"` (spec §4.3 state machine).
    pub phase: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_results: Vec<PendingToolCall>,
    #[serde(default)]
    pub finished: bool,
}

impl ReActData {
    pub fn initial() -> Self {
        ReActData {
            phase: "thinking".to_string(),
            tool_results: Vec::new(),
            finished: false,
        }
    }
}

/// One rule match recorded by a `match` agent, in priority order (spec §3
/// "matches[]").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleMatch {
    pub rule_name: String,
    pub agent_name: String,
}

/// State specific to a `match` agent (spec §3, §4.4).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MatchData {
    pub input: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matches: Vec<RuleMatch>,
    #[serde(default)]
    pub current_index: usize,
    #[serde(default)]
    pub matched: bool,
    /// The sub-agent's full recursive state, once routing has selected one
    /// (spec §4.4 step 3: "instantiated ... its state becomes
    /// `calling_state`").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calling_state: Option<Box<AgentState>>,
}

/// Fields common to both agent kinds (spec §3 "Agent state: Common").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StateCommon {
    pub id: String,
    pub agent_def: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

/// The serializable state of one agent instance: either a `react` runner or
/// a `match` router (spec §3 "Agent state"). JSON encodes this with an
/// internal `state_type` tag; MsgPack uses the wrapping-envelope shape
/// described in [`crate::codec`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state_type", rename_all = "snake_case")]
pub enum AgentState {
    React {
        #[serde(flatten)]
        common: StateCommon,
        #[serde(flatten)]
        data: ReActData,
    },
    Match {
        #[serde(flatten)]
        common: StateCommon,
        #[serde(flatten)]
        data: MatchData,
    },
}

impl AgentState {
    pub fn new_react(id: impl Into<String>, agent_def: impl Into<String>) -> Self {
        AgentState::React {
            common: StateCommon {
                id: id.into(),
                agent_def: agent_def.into(),
                messages: Vec::new(),
                summary: String::new(),
                properties: serde_json::Map::new(),
            },
            data: ReActData::initial(),
        }
    }

    pub fn new_match(
        id: impl Into<String>,
        agent_def: impl Into<String>,
        input: impl Into<String>,
    ) -> Self {
        AgentState::Match {
            common: StateCommon {
                id: id.into(),
                agent_def: agent_def.into(),
                messages: Vec::new(),
                summary: String::new(),
                properties: serde_json::Map::new(),
            },
            data: MatchData {
                input: input.into(),
                matches: Vec::new(),
                current_index: 0,
                matched: false,
                calling_state: None,
            },
        }
    }

    pub fn common(&self) -> &StateCommon {
        match self {
            AgentState::React { common, .. } => common,
            AgentState::Match { common, .. } => common,
        }
    }

    pub fn common_mut(&mut self) -> &mut StateCommon {
        match self {
            AgentState::React { common, .. } => common,
            AgentState::Match { common, .. } => common,
        }
    }

    /// Validates cross-message invariants (spec §3, §8): every model
    /// tool-call message has at most one later matching tool-result message
    /// with the same id, and — for a `react` state in the `finished`
    /// (`done`) phase — no tool-call is left unmatched.
    pub fn validate(&self) -> Result<(), AgentError> {
        let common = self.common();
        for msg in &common.messages {
            msg.validate()?;
        }
        validate_tool_call_pairing(&common.messages)?;
        if let AgentState::React { data, .. } = self {
            if data.finished {
                let mut open: std::collections::HashSet<&str> = std::collections::HashSet::new();
                for msg in &common.messages {
                    if let Some(id) = &msg.tool_call_id {
                        open.insert(id.as_str());
                    }
                    if let Some(id) = &msg.tool_result_id {
                        open.remove(id.as_str());
                    }
                }
                if !open.is_empty() {
                    return Err(AgentError::Validation(format!(
                        "finished react state has unmatched tool calls: {:?}",
                        open
                    )));
                }
            }
        }
        if let AgentState::Match { data, .. } = self {
            if let Some(calling) = &data.calling_state {
                calling.validate()?;
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, CodecError> {
        crate::codec::to_json(self)
    }

    pub fn from_json(text: &str) -> Result<Self, AgentError> {
        let state: AgentState =
            crate::codec::from_json(text).map_err(|e| AgentError::Validation(e.to_string()))?;
        state.validate()?;
        Ok(state)
    }

    /// MsgPack encoding using the wrapping-envelope shape (spec §6, §9):
    /// `{tag: "react"|"match", payload: <msgpack of the flattened fields>}`.
    pub fn to_msgpack(&self) -> Result<Vec<u8>, CodecError> {
        let env = match self {
            AgentState::React { common, data } => {
                TaggedEnvelope::encode("react", &(common, data))?
            }
            AgentState::Match { common, data } => {
                TaggedEnvelope::encode("match", &(common, data))?
            }
        };
        env.to_msgpack()
    }

    pub fn from_msgpack(bytes: &[u8]) -> Result<Self, AgentError> {
        let map_err = |e: CodecError| AgentError::Validation(e.to_string());
        let env = TaggedEnvelope::from_msgpack(bytes).map_err(map_err)?;
        let state = match env.tag.as_str() {
            "react" => {
                let (common, data): (StateCommon, ReActData) =
                    env.decode_payload().map_err(map_err)?;
                AgentState::React { common, data }
            }
            "match" => {
                let (common, data): (StateCommon, MatchData) =
                    env.decode_payload().map_err(map_err)?;
                AgentState::Match { common, data }
            }
            other => {
                return Err(AgentError::Validation(format!("unknown state_type tag: {other}")))
            }
        };
        state.validate()?;
        Ok(state)
    }
}

/// Spec §3 invariant / §8 testable property: for every model message with a
/// `tool_call_id`, there exists at most one later `tool` message with the
/// same `tool_result_id`.
pub fn validate_tool_call_pairing(messages: &[Message]) -> Result<(), AgentError> {
    use std::collections::HashMap;
    let mut seen_results: HashMap<&str, usize> = HashMap::new();
    for (idx, msg) in messages.iter().enumerate() {
        if let Some(id) = &msg.tool_result_id {
            *seen_results.entry(id.as_str()).or_insert(0) += 1;
            if seen_results[id.as_str()] > 1 {
                return Err(AgentError::Validation(format!(
                    "duplicate tool_result for call id {id}"
                )));
            }
            // The matching tool_call must appear earlier in the sequence.
            let has_earlier_call = messages[..idx]
                .iter()
                .any(|m| m.tool_call_id.as_deref() == Some(id.as_str()));
            if !has_earlier_call {
                return Err(AgentError::Validation(format!(
                    "tool_result_id {id} has no preceding tool_call_id"
                )));
            }
        }
    }
    Ok(())
}
