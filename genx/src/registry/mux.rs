//! The pattern-matching registry (muxer).
//!
//! Each [`Mux`] is an independent keyed collection mapping a [`Pattern`] to a
//! handler. Registration is exclusive (write lock); resolution is shared
//! (read lock) and lock-free in effect once registration has quiesced, since
//! readers never block each other. See spec §4.1 and §5 "Shared-resource
//! policy: Registry".

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::error::MuxError;
use super::pattern::Pattern;

struct Entry<H> {
    pattern: Pattern,
    handler: H,
    /// Monotonically increasing registration order; used to break ties
    /// between patterns of equal literal length (earlier registration wins).
    seq: u64,
}

/// A keyed pattern registry with longest-literal-prefix resolution.
///
/// `H` is typically an `Arc<dyn SomeTrait>` (e.g. a generator or transformer
/// handler). Cloning a `Mux` is cheap: the inner table is shared behind an
/// `Arc<RwLock<_>>`, mirroring the teacher crate's preference for
/// `Arc`-shared, injectable state over process-wide globals.
#[derive(Clone)]
pub struct Mux<H> {
    inner: Arc<RwLock<MuxInner<H>>>,
}

struct MuxInner<H> {
    entries: Vec<Entry<H>>,
    next_seq: u64,
}

impl<H> Default for Mux<H> {
    fn default() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MuxInner {
                entries: Vec::new(),
                next_seq: 0,
            })),
        }
    }
}

impl<H: Clone> Mux<H> {
    /// Creates an empty muxer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `pattern`. Fails with
    /// [`MuxError::Conflict`] if `pattern` conflicts with an existing
    /// registration (see [`Pattern::conflicts_with`]); the existing
    /// registration is left intact.
    pub fn handle(&self, pattern: &str, handler: H) -> Result<(), MuxError> {
        let parsed = Pattern::parse(pattern);
        let mut inner = self.inner.write().expect("mux lock poisoned");
        if let Some(existing) = inner
            .entries
            .iter()
            .find(|e| e.pattern.conflicts_with(&parsed))
        {
            tracing::warn!(pattern, existing = existing.pattern.literal(), "registry: registration conflict");
            return Err(MuxError::Conflict {
                pattern: pattern.to_string(),
                existing: existing.pattern.literal().to_string(),
            });
        }
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.entries.push(Entry {
            pattern: parsed,
            handler,
            seq,
        });
        tracing::debug!(pattern, "registry: handler registered");
        Ok(())
    }

    /// Resolves `name` to the winning handler: the registered pattern with
    /// the longest matching literal prefix; ties broken by earlier
    /// registration. Returns [`MuxError::NotFound`] if nothing matches.
    pub fn resolve(&self, name: &str) -> Result<H, MuxError> {
        let inner = self.inner.read().expect("mux lock poisoned");
        let winner = inner
            .entries
            .iter()
            .filter(|e| e.pattern.matches(name))
            .max_by(|a, b| {
                a.pattern
                    .literal_len()
                    .cmp(&b.pattern.literal_len())
                    .then(b.seq.cmp(&a.seq))
            });
        match winner {
            Some(e) => Ok(e.handler.clone()),
            None => {
                tracing::debug!(name, "registry: resolve miss");
                Err(MuxError::NotFound(name.to_string()))
            }
        }
    }

    /// Number of registered patterns. Mostly useful for tests and diagnostics.
    pub fn len(&self) -> usize {
        self.inner.read().expect("mux lock poisoned").entries.len()
    }

    /// Whether the muxer has no registrations.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_then_resolve_returns_handler() {
        let mux: Mux<&'static str> = Mux::new();
        mux.handle("qwen/turbo", "H1").unwrap();
        assert_eq!(mux.resolve("qwen/turbo").unwrap(), "H1");
    }

    #[test]
    fn resolve_miss_is_not_found_with_queried_name() {
        let mux: Mux<&'static str> = Mux::new();
        let err = mux.resolve("nope").unwrap_err();
        assert_eq!(err, MuxError::NotFound("nope".to_string()));
    }

    #[test]
    fn longest_literal_prefix_wins() {
        let mux: Mux<&'static str> = Mux::new();
        mux.handle("qwen/*", "H1").unwrap();
        mux.handle("qwen/turbo", "H2").unwrap();
        assert_eq!(mux.resolve("qwen/turbo").unwrap(), "H2");
        assert_eq!(mux.resolve("qwen/plus").unwrap(), "H1");
        assert!(mux.resolve("other").is_err());
    }

    #[test]
    fn equal_literal_length_ties_break_by_earlier_registration() {
        let mux: Mux<&'static str> = Mux::new();
        mux.handle("a/*", "first").unwrap();
        // Same literal+wildcard would conflict; use a distinct exact pattern
        // of identical literal length to exercise the tie-break comparator
        // without hitting the conflict path.
        mux.handle("b/*", "second").unwrap();
        assert_eq!(mux.resolve("a/x").unwrap(), "first");
        assert_eq!(mux.resolve("b/x").unwrap(), "second");
    }

    #[test]
    fn conflicting_registration_leaves_first_intact() {
        let mux: Mux<&'static str> = Mux::new();
        mux.handle("qwen/turbo", "H1").unwrap();
        let err = mux.handle("qwen/turbo", "H2").unwrap_err();
        assert!(matches!(err, MuxError::Conflict { .. }));
        assert_eq!(mux.resolve("qwen/turbo").unwrap(), "H1");
    }

    #[test]
    fn duplicate_registration_across_two_muxers_is_allowed() {
        // Spec §4.1: duplicate registration across muxers is allowed and
        // intentional (config loaders register into both DefaultMux and a
        // specialized one).
        let default_mux: Mux<&'static str> = Mux::new();
        let specialized_mux: Mux<&'static str> = Mux::new();
        default_mux.handle("doubao/cancan", "H").unwrap();
        specialized_mux.handle("doubao/cancan", "H").unwrap();
        assert_eq!(default_mux.resolve("doubao/cancan").unwrap(), "H");
        assert_eq!(specialized_mux.resolve("doubao/cancan").unwrap(), "H");
    }
}
