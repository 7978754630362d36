//! The handler contracts the registry binds names to.
//!
//! Spec §1 keeps concrete provider clients (OpenAI, DashScope, Doubao, …)
//! out of scope; this module specifies only the trait surface those
//! clients implement, matching the teacher's `LlmClient`/`Tool` trait shape
//! (async, `Send + Sync`, a small typed request/response pair).

use async_trait::async_trait;
use futures::stream::{self, BoxStream};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::agent::{Message, ProviderError};

/// One token/event of a streamed generate call (spec §4.3 "generator output
/// is streamed token-by-token"). Reuses the teacher's wire protocol rather
/// than inventing a new chunk type: `MessageChunk` carries incremental
/// text, `Usage` the token accounting a provider reports once the stream
/// ends.
pub type GenerateChunk = stream_event::ProtocolEvent;

/// One round-trip request to a generator: the rendered message history plus
/// whether the caller wants free text or schema-constrained JSON (spec §3
/// Tool definition, `generator` variant, `mode`).
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub messages: Vec<Message>,
    pub mode: GenerateMode,
    /// Tool specs the model may call, if this generator is driving a ReAct
    /// step (spec §4.3). Empty when used as a plain text/JSON generator.
    pub tools: Vec<Value>,
    /// The agent's rendered context layers, joined into one prefix (spec
    /// §4.3 "renders context layers into a prompt prefix"). Empty when the
    /// generator is called outside an agent runtime.
    pub system_prompt: String,
}

/// Output mode for a single generate call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateMode {
    Generate,
    JsonOutput,
}

/// What a generator call produced: either text/tool-call messages, or the
/// provider failed. Kept deliberately close to a `Message` so the ReAct loop
/// can append it directly (spec §4.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub messages: Vec<Message>,
}

/// Contract implemented by every concrete generator/chat-completion client
/// (OpenAI-shaped, Gemini-shaped, …). The registry resolves a registration
/// name to a `Arc<dyn Generator>`; the agent runtime never constructs one
/// directly.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Backend model id this handle was registered for (not the registration
    /// name — see spec §3 "backend model id" vs "registration name").
    fn model_id(&self) -> &str;

    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, ProviderError>;

    /// Streams the same call token-by-token (spec §4.3 ordering guarantee:
    /// "tool-call events are observable only after the generator has
    /// committed them — no partial tool-call events"). Providers with a
    /// native streaming API override this; the default synthesizes one
    /// `MessageChunk` per response message from the non-streaming call, so
    /// every `Generator` is usable from a streaming caller without having
    /// to implement both paths.
    async fn generate_stream(
        &self,
        request: GenerateRequest,
    ) -> Result<BoxStream<'static, Result<GenerateChunk, ProviderError>>, ProviderError> {
        let response = self.generate(request).await?;
        let chunks: Vec<Result<GenerateChunk, ProviderError>> = response
            .messages
            .into_iter()
            .filter(|m| !m.is_tool_call())
            .map(|m| {
                Ok(GenerateChunk::MessageChunk {
                    content: m.content,
                    id: m.unix_epoch.to_string(),
                })
            })
            .collect();
        Ok(Box::pin(stream::iter(chunks)))
    }
}

/// Contract for a text-to-speech handler. `synthesize` returns raw audio
/// bytes in a provider-defined encoding; the core does not interpret them.
#[async_trait]
pub trait TtsTransformer: Send + Sync {
    fn voice_id(&self) -> &str;
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, ProviderError>;
}

/// Contract for a speech-to-text handler.
#[async_trait]
pub trait AsrTransformer: Send + Sync {
    fn model_id(&self) -> &str;
    async fn transcribe(&self, audio: &[u8]) -> Result<String, ProviderError>;
}

/// A pipeline stage stacked on top of a generator pattern (spec §4.2 step 3):
/// segmentors, labelers, and profilers are all "a high-level pipeline on top
/// of a generator", differing only in how they shape the generator's output.
#[async_trait]
pub trait Segmentor: Send + Sync {
    async fn segment(&self, text: &str) -> Result<Vec<String>, ProviderError>;
}

#[async_trait]
pub trait Labeler: Send + Sync {
    async fn label(&self, text: &str) -> Result<Vec<String>, ProviderError>;
}

#[async_trait]
pub trait Profiler: Send + Sync {
    async fn profile(&self, text: &str) -> Result<Value, ProviderError>;
}

pub type GeneratorHandle = Arc<dyn Generator>;
pub type TtsHandle = Arc<dyn TtsTransformer>;
pub type AsrHandle = Arc<dyn AsrTransformer>;
pub type SegmentorHandle = Arc<dyn Segmentor>;
pub type LabelerHandle = Arc<dyn Labeler>;
pub type ProfilerHandle = Arc<dyn Profiler>;

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    struct EchoGenerator;

    #[async_trait]
    impl Generator for EchoGenerator {
        fn model_id(&self) -> &str {
            "echo/v1"
        }
        async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, ProviderError> {
            Ok(GenerateResponse {
                messages: vec![Message::model_text(
                    request.messages.last().map(|m| m.content.clone()).unwrap_or_default(),
                    0,
                )],
            })
        }
    }

    #[tokio::test]
    async fn default_generate_stream_synthesizes_one_chunk_per_message() {
        let generator = EchoGenerator;
        let request = GenerateRequest {
            messages: vec![Message::user("hello", 0)],
            mode: GenerateMode::Generate,
            tools: vec![],
            system_prompt: String::new(),
        };
        let mut stream = generator.generate_stream(request).await.unwrap();
        let chunk = stream.next().await.unwrap().unwrap();
        assert!(stream.next().await.is_none());
        match chunk {
            GenerateChunk::MessageChunk { content, .. } => assert_eq!(content, "hello"),
            other => panic!("unexpected chunk: {other:?}"),
        }
    }
}
