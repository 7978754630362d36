//! Memory segments and time buckets (spec §3 "Memory segment", GLOSSARY
//! "Bucket").

use serde::{Deserialize, Serialize};

/// One unit of recorded memory: `{id, summary, keywords[], labels[],
/// unix_epoch, vector?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemorySegment {
    pub id: String,
    pub summary: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    pub unix_epoch: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector: Option<Vec<f32>>,
}

/// Bucket resolution in seconds (spec GLOSSARY "Bucket": "default 1 hour").
pub const BUCKET_SECONDS: i64 = 3600;

/// The coarse-grained time partition a segment falls into, used as part of
/// its storage key (spec §4.5 "persists the segment under
/// `persona/segments/<bucket>/<id>`").
pub fn bucket_key(unix_epoch: i64) -> String {
    let bucket = unix_epoch.div_euclid(BUCKET_SECONDS);
    bucket.to_string()
}
