//! Agent and tool configuration: the typed, validated form of agent/tool
//! definitions once resolved from YAML/JSON (spec §3, §9).

mod agent_def;
mod context_layer;
mod jq;
mod jsonschema;
mod refs;
mod tool;

pub use agent_def::{AgentDef, MatchAgentDef, ReactAgentDef, Route, Rule};
pub use context_layer::{ContextLayer, MemLayer};
pub use jq::JqExpr;
pub use jsonschema::JsonSchema;
pub use refs::{AgentRef, GeneratorRef, RefOrInline, RefOrInlineGenerator, RuleRef, ToolRef};
pub use tool::{
    BuiltInTool, CompositeStep, CompositeTool, GeneratorTool, HttpAuth, HttpMethod, HttpTool,
    TextProcessorTool, ToolDef, ToolGenerateMode,
};
