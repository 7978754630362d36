//! Pattern parsing for the registry muxer.
//!
//! A pattern is a literal prefix with an optional trailing `*` wildcard, e.g.
//! `"qwen/turbo"` (exact) or `"qwen/*"` (prefix). The muxer never interprets
//! the slash; it is opaque to pattern matching.

/// A parsed registration pattern: the literal text plus whether it ends in `*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    literal: String,
    wildcard: bool,
}

impl Pattern {
    /// Parses `raw` into a `Pattern`. A trailing `*` is stripped and recorded;
    /// everything before it is the literal prefix.
    pub fn parse(raw: &str) -> Self {
        match raw.strip_suffix('*') {
            Some(literal) => Pattern {
                literal: literal.to_string(),
                wildcard: true,
            },
            None => Pattern {
                literal: raw.to_string(),
                wildcard: false,
            },
        }
    }

    /// The literal (non-wildcard) portion of the pattern.
    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// Whether this pattern ends in a wildcard.
    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    /// Number of bytes in the literal portion; used for longest-prefix tie-breaking.
    pub fn literal_len(&self) -> usize {
        self.literal.len()
    }

    /// Whether `name` matches this pattern: exact patterns require equality;
    /// wildcard patterns require `name` to start with the literal prefix.
    pub fn matches(&self, name: &str) -> bool {
        if self.wildcard {
            name.starts_with(&self.literal)
        } else {
            name == self.literal
        }
    }

    /// Two patterns conflict when either's literal prefix matches the other's
    /// literal content, i.e. one would shadow the other's resolution for some
    /// input. `qwen/*` and `qwen/turbo` do not conflict in the "identical
    /// registration" sense, but they **do** compete for the same names; per
    /// spec §4.1 that competition is resolved by longest-literal-prefix, not
    /// by rejecting the registration — so `conflicts_with` only flags the
    /// cases that cannot be resolved by that tie-break: two patterns with the
    /// *same* literal prefix and the *same* wildcard-ness (exact duplicate,
    /// or duplicate wildcard prefix).
    pub fn conflicts_with(&self, other: &Pattern) -> bool {
        self.literal == other.literal && self.wildcard == other.wildcard
    }
}
