//! Agent runtime: ReAct tool-use loop, Match routing, shared state/message
//! types, and the error surface both share (spec §3, §4.3, §4.4, §7).

mod context;
mod error;
mod match_agent;
mod message;
mod react;
mod state;

pub use context::{ContextRenderer, RefResolver};
pub use error::{AgentError, ProviderError};
pub use match_agent::{nesting_depth, AgentDefRegistry, MatchRunner, RuleEvaluator, SubstringRuleEvaluator};
pub use message::{Message, Role};
pub use react::{ReActRunner, StepOutcome, ToolRequest};
pub use state::{
    validate_tool_call_pairing, AgentState, MatchData, PendingToolCall, ReActData, RuleMatch,
    StateCommon,
};
