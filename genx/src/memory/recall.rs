//! Composite recall: graph seed expansion, candidate gathering, and
//! multi-signal scoring (spec §4.6).

use std::collections::HashSet;

use super::embedder::Embedder;
use super::entity::{Entity, Graph};
use super::error::MemoryError;
use super::segment::{bucket_key, MemorySegment};

const KEYWORD_WEIGHT: f32 = 0.1;
const LABEL_WEIGHT: f32 = 0.05;

#[derive(Debug, Clone, Default)]
pub struct RecallQuery {
    pub text: Option<String>,
    pub labels: Vec<String>,
    pub limit: usize,
    pub hops: u32,
}

#[derive(Debug, Clone, Default)]
pub struct RecallResult {
    pub entities: Vec<Entity>,
    pub segments: Vec<MemorySegment>,
    /// Reserved for time-bucket roll-ups (spec §4.6 step 5); filled here
    /// with the bucket keys the selected segments fell into, not a full
    /// summarization pass.
    pub summaries: Vec<String>,
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

fn tokenize(text: &str) -> HashSet<String> {
    text.split_whitespace().map(|t| t.to_lowercase()).collect()
}

fn keyword_jaccard(query_tokens: &HashSet<String>, keywords: &[String]) -> f32 {
    if query_tokens.is_empty() || keywords.is_empty() {
        return 0.0;
    }
    let kw_set: HashSet<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
    let intersection = query_tokens.intersection(&kw_set).count();
    let union = query_tokens.union(&kw_set).count();
    if union == 0 {
        0.0
    } else {
        intersection as f32 / union as f32
    }
}

fn label_overlap(seed_set: &HashSet<String>, labels: &[String]) -> usize {
    labels.iter().filter(|l| seed_set.contains(*l)).count()
}

/// Runs the recall algorithm over every stored segment for one persona
/// (spec §4.6 steps 1-5). `embedder` is optional; when absent, semantic
/// ranking contributes 0 and keyword/label signals still apply (spec §8
/// scenario 6).
pub async fn recall(
    graph: &Graph,
    segments: &[MemorySegment],
    embedder: Option<&dyn Embedder>,
    query: RecallQuery,
) -> Result<RecallResult, MemoryError> {
    let seed_set = graph.expand(&query.labels, query.hops);

    let candidates: Vec<&MemorySegment> = segments
        .iter()
        .filter(|s| s.labels.iter().any(|l| seed_set.contains(l)))
        .collect();

    let query_vector = match (&query.text, embedder) {
        (Some(text), Some(embedder)) if !text.is_empty() => {
            embedder.embed(&[text.as_str()]).await?.into_iter().next()
        }
        _ => None,
    };
    let query_tokens = query.text.as_deref().map(tokenize).unwrap_or_default();

    let mut scored: Vec<(f32, &MemorySegment)> = candidates
        .into_iter()
        .map(|segment| {
            let semantic = match (&query_vector, &segment.vector) {
                (Some(qv), Some(sv)) => cosine_similarity(qv, sv),
                _ => 0.0,
            };
            let keyword = keyword_jaccard(&query_tokens, &segment.keywords) * KEYWORD_WEIGHT;
            let label = label_overlap(&seed_set, &segment.labels) as f32 * LABEL_WEIGHT;
            (semantic + keyword + label, segment)
        })
        .collect();

    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.1.unix_epoch.cmp(&a.1.unix_epoch))
    });
    scored.truncate(query.limit);

    let summaries = scored
        .iter()
        .map(|(_, s)| bucket_key(s.unix_epoch))
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let entities = seed_set.iter().filter_map(|label| graph.get_entity(label)).collect();

    Ok(RecallResult {
        entities,
        segments: scored.into_iter().map(|(_, s)| s.clone()).collect(),
        summaries,
    })
}
