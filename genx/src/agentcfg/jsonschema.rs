//! Structural JSON-schema storage (spec §9 "JSON-schema storage").
//!
//! A raw struct encoding of a JSON schema inflates on-wire size roughly 25x
//! (spec §9), so schemas are kept as a `serde_json::Map` (the structural map
//! form) rather than a typed struct; [`JsonSchema::canonical`] reserializes
//! to the same map form on demand (there is, by construction, only one
//! canonical form here — the stored map itself — since we never lower it
//! into an intermediate typed representation).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonSchema {
    map: Map<String, Value>,
}

impl JsonSchema {
    pub fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Object(map) => Ok(JsonSchema { map }),
            _ => Err("json schema must be a JSON object".to_string()),
        }
    }

    pub fn empty() -> Self {
        JsonSchema { map: Map::new() }
    }

    /// The canonical schema form, for callers (e.g. a generator request)
    /// that need a plain `Value`.
    pub fn canonical(&self) -> Value {
        Value::Object(self.map.clone())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_preserves_structure() {
        let schema = JsonSchema::from_value(serde_json::json!({
            "type": "object",
            "properties": {"city": {"type": "string"}},
            "required": ["city"],
        }))
        .unwrap();
        let json = serde_json::to_string(&schema).unwrap();
        let back: JsonSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(schema, back);
        assert_eq!(back.canonical()["type"], "object");
    }

    #[test]
    fn non_object_rejected() {
        assert!(JsonSchema::from_value(serde_json::json!(["a"])).is_err());
    }
}
