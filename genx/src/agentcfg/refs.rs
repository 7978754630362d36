//! Reference-or-inline types (spec §9): each is a discriminated pair where
//! exactly one of `$ref` or an inline value is populated. JSON represents
//! this as `{"$ref": "..."}` or the inline object directly (tried in that
//! order on decode); re-serialization always emits whichever variant is
//! held.

use serde::{Deserialize, Serialize};

/// A reference to a named registered entity, or an inline definition of the
/// same type. See spec §3 "Agent definition: generator (inline Generator or
/// `$ref`)" and §9.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RefOrInline<T> {
    Ref {
        #[serde(rename = "$ref")]
        reference: String,
    },
    Inline(T),
}

impl<T> RefOrInline<T> {
    pub fn as_ref_name(&self) -> Option<&str> {
        match self {
            RefOrInline::Ref { reference } => Some(reference.as_str()),
            RefOrInline::Inline(_) => None,
        }
    }

    pub fn as_inline(&self) -> Option<&T> {
        match self {
            RefOrInline::Inline(v) => Some(v),
            RefOrInline::Ref { .. } => None,
        }
    }
}

pub type ToolRef = RefOrInline<Box<super::tool::ToolDef>>;
pub type AgentRef = RefOrInline<Box<super::agent_def::AgentDef>>;
pub type GeneratorRef = RefOrInlineGenerator;
pub type RuleRef = RefOrInline<super::agent_def::Rule>;

/// `GeneratorRef` is special-cased rather than `RefOrInline<GeneratorSpec>`:
/// spec §3 describes an agent's `generator` as "inline Generator or `$ref`",
/// and the common case is simply naming an already-registered model, so the
/// inline form carries just the fields a generator tool needs to override
/// (currently none beyond the registration name) — represented here as a
/// plain registration-name string for the inline case, keeping the type a
/// simple enum rather than a one-field struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RefOrInlineGenerator {
    Ref(String),
    Inline(String),
}

impl RefOrInlineGenerator {
    pub fn registration_name(&self) -> &str {
        match self {
            RefOrInlineGenerator::Ref(reference) => reference,
            RefOrInlineGenerator::Inline(name) => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ref_variant_decodes_from_dollar_ref() {
        let json = r#"{"$ref": "tool:search"}"#;
        let parsed: RefOrInline<String> = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.as_ref_name(), Some("tool:search"));
    }

    #[test]
    fn inline_variant_decodes_directly() {
        let json = r#""literal value""#;
        let parsed: RefOrInline<String> = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.as_inline(), Some(&"literal value".to_string()));
    }

    #[test]
    fn generator_ref_roundtrip() {
        let g = RefOrInlineGenerator::Ref("generator:main".into());
        let json = serde_json::to_string(&g).unwrap();
        let back: RefOrInlineGenerator = serde_json::from_str(&json).unwrap();
        assert_eq!(g, back);
    }
}
