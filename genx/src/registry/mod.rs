//! # Registry — the GenX pattern-matching muxer
//!
//! Binds symbolic registration names (`qwen/turbo`, `doubao/cancan`) to
//! concrete handlers (generator, TTS, ASR, segmentor, labeler, profiler
//! implementations). See spec §4.1.
//!
//! Each subsystem owns one [`Mux`]. A process-wide [`Registries`] instance is
//! available via [`default_registries`] for callers that want the
//! convenience of a single global, but every constructor also accepts an
//! injected `Registries` so tests never touch global state (spec §9 "Global
//! registry").

mod error;
mod handlers;
mod mux;
mod pattern;

pub use error::MuxError;
pub use handlers::{
    AsrHandle, AsrTransformer, GenerateChunk, GenerateMode, GenerateRequest, GenerateResponse,
    Generator, GeneratorHandle, Labeler, LabelerHandle, Profiler, ProfilerHandle, Segmentor, SegmentorHandle,
    TtsHandle, TtsTransformer,
};
pub use mux::Mux;
pub use pattern::Pattern;

use std::sync::Arc;

/// The full set of muxers one host process needs: one `DefaultMux` per
/// handler kind, plus the TTS/ASR muxers are additionally typed/specialized
/// (spec §4.1: "typed specialized muxers for TTS/ASR").
#[derive(Clone, Default)]
pub struct Registries {
    pub generators: Mux<GeneratorHandle>,
    pub tts: Mux<TtsHandle>,
    pub asr: Mux<AsrHandle>,
    pub segmentors: Mux<SegmentorHandle>,
    pub labelers: Mux<LabelerHandle>,
    pub profilers: Mux<ProfilerHandle>,
}

impl Registries {
    pub fn new() -> Self {
        Self::default()
    }
}

static DEFAULT_REGISTRIES: once_cell::sync::Lazy<Registries> =
    once_cell::sync::Lazy::new(Registries::new);

/// The process-wide default registry set. A thin convenience wrapper around
/// an ordinary, injectable [`Registries`] — prefer constructing and passing
/// your own `Registries` in tests and in any host that runs more than one
/// independent config load (spec §9).
pub fn default_registries() -> &'static Registries {
    &DEFAULT_REGISTRIES
}

/// Reference-counted handler pointer convenience alias used by every muxer
/// in this crate, matching the teacher's `Arc<dyn Trait>` registry idiom.
pub type Handler<T> = Arc<T>;
