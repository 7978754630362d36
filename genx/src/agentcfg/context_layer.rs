//! Context layer: one composable element of an agent's prompt prefix
//! (spec §3 "Context layer", GLOSSARY).

use serde::{Deserialize, Serialize};

use crate::modelcfg::ConfigError;

/// Memory-injection parameters for a `$mem` context layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemLayer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent: Option<u32>,
}

/// Raw wire shape: every field optional so decoding can check "exactly one
/// set" itself rather than relying on an externally-tagged enum (the spec's
/// shorthand mixes a bare string literal with tagged variants, which serde's
/// built-in enum representations cannot express directly).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
struct RawContextLayer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    literal: Option<String>,
    #[serde(rename = "$this", default, skip_serializing_if = "Option::is_none")]
    this: Option<String>,
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    reference: Option<String>,
    #[serde(rename = "$env", default, skip_serializing_if = "Option::is_none")]
    env: Option<String>,
    #[serde(rename = "$mem", default, skip_serializing_if = "Option::is_none")]
    mem: Option<MemLayer>,
}

/// One context layer. Exactly one variant; validated on decode.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextLayer {
    Literal(String),
    This(String),
    Ref(String),
    Env(String),
    Mem(MemLayer),
}

impl ContextLayer {
    fn from_raw(raw: RawContextLayer) -> Result<Self, ConfigError> {
        let mut set = Vec::new();
        if raw.literal.is_some() {
            set.push("literal");
        }
        if raw.this.is_some() {
            set.push("$this");
        }
        if raw.reference.is_some() {
            set.push("$ref");
        }
        if raw.env.is_some() {
            set.push("$env");
        }
        if raw.mem.is_some() {
            set.push("$mem");
        }
        match set.len() {
            0 => Err(ConfigError::MissingField("context layer (empty)")),
            1 => Ok(match set[0] {
                "literal" => ContextLayer::Literal(raw.literal.unwrap()),
                "$this" => ContextLayer::This(raw.this.unwrap()),
                "$ref" => ContextLayer::Ref(raw.reference.unwrap()),
                "$env" => ContextLayer::Env(raw.env.unwrap()),
                "$mem" => ContextLayer::Mem(raw.mem.unwrap()),
                _ => unreachable!(),
            }),
            _ => Err(ConfigError::InvalidEnum {
                field: "context_layer",
                value: set.join("+"),
            }),
        }
    }

    fn to_raw(&self) -> RawContextLayer {
        let mut raw = RawContextLayer::default();
        match self {
            ContextLayer::Literal(s) => raw.literal = Some(s.clone()),
            ContextLayer::This(s) => raw.this = Some(s.clone()),
            ContextLayer::Ref(s) => raw.reference = Some(s.clone()),
            ContextLayer::Env(s) => raw.env = Some(s.clone()),
            ContextLayer::Mem(m) => raw.mem = Some(m.clone()),
        }
        raw
    }
}

impl Serialize for ContextLayer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // A bare literal-string layer serializes as a plain JSON string, the
        // documented shorthand (spec §3); every other variant serializes as
        // its tagged object form.
        match self {
            ContextLayer::Literal(s) => serializer.serialize_str(s),
            other => other.to_raw().serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ContextLayer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        if let serde_json::Value::String(s) = &value {
            return Ok(ContextLayer::Literal(s.clone()));
        }
        let raw: RawContextLayer =
            serde_json::from_value(value).map_err(serde::de::Error::custom)?;
        ContextLayer::from_raw(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_string_is_literal() {
        let layer: ContextLayer = serde_json::from_str("\"you are helpful\"").unwrap();
        assert_eq!(layer, ContextLayer::Literal("you are helpful".into()));
    }

    #[test]
    fn this_ref_decodes() {
        let layer: ContextLayer = serde_json::from_str(r#"{"$this": "prompt"}"#).unwrap();
        assert_eq!(layer, ContextLayer::This("prompt".into()));
    }

    #[test]
    fn mem_layer_decodes() {
        let layer: ContextLayer =
            serde_json::from_str(r#"{"$mem": {"summary": true, "recent": 5}}"#).unwrap();
        match layer {
            ContextLayer::Mem(m) => {
                assert_eq!(m.summary, Some(true));
                assert_eq!(m.recent, Some(5));
            }
            _ => panic!("expected mem"),
        }
    }

    #[test]
    fn empty_layer_rejected() {
        let err = serde_json::from_str::<ContextLayer>("{}").unwrap_err();
        assert!(err.to_string().contains("context layer"));
    }

    #[test]
    fn multiple_fields_set_rejected() {
        let json = r#"{"$this": "a", "$env": "B"}"#;
        assert!(serde_json::from_str::<ContextLayer>(json).is_err());
    }

    #[test]
    fn roundtrip_preserves_variant() {
        let layer = ContextLayer::Env("API_KEY".into());
        let json = serde_json::to_string(&layer).unwrap();
        let back: ContextLayer = serde_json::from_str(&json).unwrap();
        assert_eq!(layer, back);
    }
}
