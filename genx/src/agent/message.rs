//! Message type shared by ReAct and Match agent states (spec §3 "Message").
//!
//! Validation runs on every decode: `Message` implements `Deserialize` via a
//! shadow `RawMessage` and `TryFrom`, so a malformed message (e.g. a `tool`
//! message missing `tool_result_id`) fails at decode time rather than
//! silently propagating — spec §3 "Agent state is valid by construction".

use serde::{Deserialize, Serialize};

use super::error::AgentError;

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Model,
    Tool,
}

/// One message in an agent's conversation history.
///
/// Field combinations are constrained by role (see [`Message::validate`]):
/// - `user`: no tool-call or tool-result fields.
/// - `tool`: requires `tool_result_id`; must not carry tool-call fields.
/// - `model` with `tool_call_id` set: must also carry `tool_call_name`, and
///   must not carry `tool_result_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMessage", into = "RawMessage")]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub unix_epoch: i64,
    pub tool_call_id: Option<String>,
    pub tool_call_name: Option<String>,
    pub tool_call_args: Option<String>,
    pub tool_result_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawMessage {
    role: Role,
    content: String,
    unix_epoch: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_args: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_result_id: Option<String>,
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl TryFrom<RawMessage> for Message {
    type Error = AgentError;

    fn try_from(raw: RawMessage) -> Result<Self, AgentError> {
        let msg = Message {
            role: raw.role,
            content: raw.content,
            unix_epoch: raw.unix_epoch,
            tool_call_id: raw.tool_call_id,
            tool_call_name: raw.tool_call_name,
            tool_call_args: raw.tool_call_args,
            tool_result_id: raw.tool_result_id,
        };
        msg.validate()?;
        Ok(msg)
    }
}

impl From<Message> for RawMessage {
    fn from(m: Message) -> Self {
        RawMessage {
            role: m.role,
            content: m.content,
            unix_epoch: m.unix_epoch,
            tool_call_id: m.tool_call_id,
            tool_call_name: m.tool_call_name,
            tool_call_args: m.tool_call_args,
            tool_result_id: m.tool_result_id,
        }
    }
}

impl Message {
    pub fn user(content: impl Into<String>, unix_epoch: i64) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            unix_epoch,
            tool_call_id: None,
            tool_call_name: None,
            tool_call_args: None,
            tool_result_id: None,
        }
    }

    pub fn model_text(content: impl Into<String>, unix_epoch: i64) -> Self {
        Self {
            role: Role::Model,
            content: content.into(),
            unix_epoch,
            tool_call_id: None,
            tool_call_name: None,
            tool_call_args: None,
            tool_result_id: None,
        }
    }

    pub fn model_tool_call(
        tool_call_id: impl Into<String>,
        tool_call_name: impl Into<String>,
        tool_call_args: impl Into<String>,
        unix_epoch: i64,
    ) -> Self {
        Self {
            role: Role::Model,
            content: String::new(),
            unix_epoch,
            tool_call_id: Some(tool_call_id.into()),
            tool_call_name: Some(tool_call_name.into()),
            tool_call_args: Some(tool_call_args.into()),
            tool_result_id: None,
        }
    }

    pub fn tool_result(
        tool_result_id: impl Into<String>,
        content: impl Into<String>,
        unix_epoch: i64,
    ) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
            unix_epoch,
            tool_call_id: None,
            tool_call_name: None,
            tool_call_args: None,
            tool_result_id: Some(tool_result_id.into()),
        }
    }

    /// Whether this message is a model tool-call (as opposed to final text).
    pub fn is_tool_call(&self) -> bool {
        self.role == Role::Model && self.tool_call_id.is_some()
    }

    /// Runs the field-combination rules from spec §3. Called automatically
    /// on every decode via `TryFrom<RawMessage>`.
    pub fn validate(&self) -> Result<(), AgentError> {
        match self.role {
            Role::User => {
                if self.tool_call_id.is_some()
                    || self.tool_call_name.is_some()
                    || self.tool_call_args.is_some()
                    || self.tool_result_id.is_some()
                {
                    return Err(AgentError::Validation(
                        "user message must not carry tool-call/result fields".into(),
                    ));
                }
            }
            Role::Tool => {
                if self.tool_result_id.is_none() {
                    return Err(AgentError::Validation(
                        "tool message requires tool_result_id".into(),
                    ));
                }
                if self.tool_call_id.is_some() || self.tool_call_name.is_some() {
                    return Err(AgentError::Validation(
                        "tool message must not carry tool-call fields".into(),
                    ));
                }
            }
            Role::Model => {
                if self.tool_call_id.is_some() {
                    if self.tool_call_name.is_none() {
                        return Err(AgentError::Validation(
                            "model message with tool_call_id requires tool_call_name".into(),
                        ));
                    }
                    if self.tool_result_id.is_some() {
                        return Err(AgentError::Validation(
                            "model message must not carry tool_result_id".into(),
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}
