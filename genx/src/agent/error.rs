//! Agent execution error types (spec §7).

use thiserror::Error;

/// Error from a concrete generator/TTS/ASR provider call. Distinguishes
/// retryable kinds (network, 5xx) from non-retryable ones (4xx, auth) per
/// spec §7 "Provider errors".
#[derive(Debug, Error, Clone)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("rate limited")]
    RateLimited,

    #[error("server error ({0})")]
    Server(u16),

    #[error("client error ({0})")]
    Client(u16),

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("request cancelled")]
    Cancelled,
}

impl ProviderError {
    /// Whether this error kind is retried by the runtime's retry policy.
    /// Per spec §7: "retried at most N=3 times with exponential backoff
    /// only for network and 5xx; 4xx are never retried".
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProviderError::Network(_) | ProviderError::Server(_) | ProviderError::RateLimited)
    }
}

/// Error surfaced by the agent runtime (ReAct or Match). Distinguishes
/// *recoverable* cases the runtime already folded into a tool-result message
/// from *fatal* ones that terminate the step (spec §7 "Propagation policy").
#[derive(Debug, Error)]
pub enum AgentError {
    /// A `$ref` in the agent/tool tree did not resolve at the point it was
    /// instantiated (spec §3 invariants: "fatal at first use, not load time").
    #[error("unresolved reference: {0}")]
    UnresolvedRef(String),

    /// A state or message invariant was violated (spec §3 "Agent state is
    /// valid by construction").
    #[error("validation failed: {0}")]
    Validation(String),

    /// A ReAct tool call named a tool absent from the agent's `tools[]`.
    #[error("unknown tool: {0}")]
    ToolNotFound(String),

    /// Match/ReAct sub-agent nesting exceeded the configured depth limit
    /// (spec §4.4 "Nesting").
    #[error("sub-agent nesting depth exceeded (limit {limit})")]
    DepthExceeded { limit: u32 },

    /// The underlying generator/transformer call failed terminally (already
    /// exhausted retries, or was a non-retryable kind).
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// A registration name referenced by a tool/agent was never registered.
    #[error("resolution error: no such registration {0}")]
    ResolutionError(String),

    /// The step's cancellation token fired before the operation completed.
    #[error("operation cancelled")]
    Cancelled,
}
