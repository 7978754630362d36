//! # GenX core
//!
//! The content-addressable model registry, the ReAct/Match agent runtime,
//! and the per-persona memory engine that sit behind GenX's declarative
//! configuration surface (spec §1).
//!
//! This crate is deliberately scoped to those three subsystems plus the
//! device port/audio bridge interface; provider HTTP/WebSocket clients,
//! the CLI surface, and on-disk context/credential persistence are host
//! concerns layered on top (spec §1 "Deliberately OUT OF SCOPE").

pub mod agent;
pub mod agentcfg;
pub mod codec;
pub mod device;
pub mod memory;
pub mod modelcfg;
pub mod registry;

pub use agent::{AgentError, AgentState, Message, ProviderError};
pub use agentcfg::{AgentDef, MatchAgentDef, ReactAgentDef, ToolDef};
pub use codec::{from_json, from_msgpack, to_json, to_msgpack, CodecError, TaggedEnvelope};
pub use memory::{Host, Memory, MemoryError};
pub use modelcfg::{load_from_dir, ConfigError, ModelConfigDoc, Registrar};
pub use registry::{default_registries, MuxError, Registries};
