//! Renders an agent's `context_layers[]` into one prompt prefix (spec
//! §4.3 "renders context layers into a prompt prefix").

use async_trait::async_trait;

use crate::agentcfg::ContextLayer;
use crate::memory::{Memory, RecallQuery};

use super::error::AgentError;

/// Resolves `$ref` context layers against whatever external resource store
/// the host maintains (spec §3: "`$ref: <ref>` (external resource)"; the
/// core "does not assume a specific lookup strategy", spec §6).
#[async_trait]
pub trait RefResolver: Send + Sync {
    async fn resolve_ref(&self, reference: &str) -> Result<String, AgentError>;
}

/// Renders one agent's `context_layers[]` against its own prompt, an
/// optional memory view, and an optional `$ref` resolver.
pub struct ContextRenderer<'a> {
    pub agent_prompt: &'a str,
    pub memory: Option<&'a Memory<'a>>,
    pub refs: Option<&'a dyn RefResolver>,
}

impl<'a> ContextRenderer<'a> {
    async fn render_one(&self, layer: &ContextLayer) -> Result<String, AgentError> {
        match layer {
            ContextLayer::Literal(text) => Ok(text.clone()),
            ContextLayer::This(field) => {
                if field == "prompt" {
                    Ok(self.agent_prompt.to_string())
                } else {
                    Err(AgentError::Validation(format!("unknown $this field: {field}")))
                }
            }
            ContextLayer::Env(var) => Ok(std::env::var(var).unwrap_or_default()),
            ContextLayer::Ref(reference) => match self.refs {
                Some(resolver) => resolver.resolve_ref(reference).await,
                None => Err(AgentError::ResolutionError(reference.clone())),
            },
            ContextLayer::Mem(mem) => match self.memory {
                Some(memory) => {
                    let query = RecallQuery {
                        text: mem.query.clone(),
                        labels: Vec::new(),
                        limit: mem.recent.unwrap_or(5) as usize,
                        hops: 1,
                    };
                    let result = memory
                        .recall(query)
                        .await
                        .map_err(|e| AgentError::Validation(e.to_string()))?;
                    let mut lines = Vec::new();
                    if mem.summary.unwrap_or(false) {
                        lines.extend(result.summaries.into_iter());
                    }
                    lines.extend(result.segments.into_iter().map(|s| s.summary));
                    Ok(lines.join("\n"))
                }
                None => Ok(String::new()),
            },
        }
    }

    /// Renders every layer in order and joins the non-empty pieces with
    /// newlines, prefixed by the agent's own prompt.
    pub async fn render(&self, layers: &[ContextLayer]) -> Result<String, AgentError> {
        let mut pieces = Vec::new();
        if !self.agent_prompt.is_empty() {
            pieces.push(self.agent_prompt.to_string());
        }
        for layer in layers {
            let rendered = self.render_one(layer).await?;
            if !rendered.is_empty() {
                pieces.push(rendered);
            }
        }
        Ok(pieces.join("\n"))
    }
}
