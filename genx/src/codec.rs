//! Dual JSON/MsgPack codec helpers for sum types (spec §6 "State
//! serialization", §9 "Sum types").
//!
//! JSON encodes a sum type with an internal `type` tag (the usual serde
//! `#[serde(tag = "type")]` shape). MsgPack instead uses a **wrapping
//! envelope**: `{tag, payload_bytes}`, where `payload_bytes` is the variant
//! re-encoded as its own MsgPack buffer. This keeps the compact format's
//! dispatch (read the tag, then decode the nested buffer as the matching
//! variant type) independent of the variant's own field layout, which is
//! what lets decoders re-dispatch by tag without knowing every variant's
//! shape up front (spec §9).

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("msgpack encode error: {0}")]
    MsgPackEncode(#[from] rmp_serde::encode::Error),
    #[error("msgpack decode error: {0}")]
    MsgPackDecode(#[from] rmp_serde::decode::Error),
    #[error("unknown tag: {0}")]
    UnknownTag(String),
}

/// Wire envelope used by the MsgPack encoding of every sum type in this
/// crate: a discriminator tag plus the variant payload as an opaque buffer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggedEnvelope {
    pub tag: String,
    pub payload: Vec<u8>,
}

impl TaggedEnvelope {
    pub fn encode<T: Serialize>(tag: impl Into<String>, value: &T) -> Result<Self, CodecError> {
        Ok(TaggedEnvelope {
            tag: tag.into(),
            payload: rmp_serde::to_vec_named(value)?,
        })
    }

    pub fn decode_payload<T: DeserializeOwned>(&self) -> Result<T, CodecError> {
        Ok(rmp_serde::from_slice(&self.payload)?)
    }

    pub fn to_msgpack(&self) -> Result<Vec<u8>, CodecError> {
        Ok(rmp_serde::to_vec_named(self)?)
    }

    pub fn from_msgpack(bytes: &[u8]) -> Result<Self, CodecError> {
        Ok(rmp_serde::from_slice(bytes)?)
    }
}

/// Encodes any `Serialize` value to canonical JSON (field names as written
/// by `#[serde(rename_all = "snake_case")]` on the type; zero values omitted
/// via `#[serde(skip_serializing_if = ...)]` on individual fields).
pub fn to_json<T: Serialize>(value: &T) -> Result<String, CodecError> {
    Ok(serde_json::to_string(value)?)
}

/// Decodes canonical JSON. Validation (if the type implements it via
/// `#[serde(try_from = ...)]`) runs as part of this call.
pub fn from_json<T: DeserializeOwned>(text: &str) -> Result<T, CodecError> {
    Ok(serde_json::from_str(text)?)
}

pub fn to_msgpack<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    Ok(rmp_serde::to_vec_named(value)?)
}

pub fn from_msgpack<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    Ok(rmp_serde::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Foo {
        a: u32,
        b: String,
    }

    #[test]
    fn tagged_envelope_roundtrips() {
        let foo = Foo { a: 1, b: "x".into() };
        let env = TaggedEnvelope::encode("foo", &foo).unwrap();
        let bytes = env.to_msgpack().unwrap();
        let back_env = TaggedEnvelope::from_msgpack(&bytes).unwrap();
        assert_eq!(back_env.tag, "foo");
        let back: Foo = back_env.decode_payload().unwrap();
        assert_eq!(back, foo);
    }

    #[test]
    fn json_msgpack_roundtrips_agree() {
        let foo = Foo { a: 7, b: "y".into() };
        let json = to_json(&foo).unwrap();
        let from_json: Foo = from_json(&json).unwrap();
        let mp = to_msgpack(&foo).unwrap();
        let from_mp: Foo = from_msgpack(&mp).unwrap();
        assert_eq!(from_json, from_mp);
        assert_eq!(from_json, foo);
    }
}
