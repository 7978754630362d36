//! End-to-end recall ranking scenario (spec §8 scenario 6), driven through
//! `Host::memory().store_segment()` / `.recall()` rather than the bare
//! `recall()` function.

use std::sync::Arc;

use genx::memory::{Host, InMemoryKvStore, MemorySegment, RecallQuery};

fn segment(id: &str, summary: &str, labels: &[&str], keywords: &[&str], epoch: i64) -> MemorySegment {
    MemorySegment {
        id: id.into(),
        summary: summary.into(),
        keywords: keywords.iter().map(|s| s.to_string()).collect(),
        labels: labels.iter().map(|s| s.to_string()).collect(),
        unix_epoch: epoch,
        vector: None,
    }
}

#[tokio::test]
async fn dinosaur_segment_outranks_unrelated_dinner_segment() {
    let host = Host::new(Arc::new(InMemoryKvStore::new()), None, None, '/');
    let memory = host.memory("persona-1");
    memory.graph().set_entity("person:A", serde_json::Map::new());
    memory.graph().set_entity("topic:dino", serde_json::Map::new());
    memory.graph().set_entity("topic:food", serde_json::Map::new());

    memory
        .store_segment(segment("S1", "dinosaur chat", &["person:A", "topic:dino"], &["dino"], 100))
        .await
        .unwrap();
    memory
        .store_segment(segment("S2", "dinner recipe", &["topic:food"], &["food"], 200))
        .await
        .unwrap();

    let result = memory
        .recall(RecallQuery {
            text: Some("dino".into()),
            labels: vec!["person:A".into()],
            limit: 5,
            hops: 1,
        })
        .await
        .unwrap();

    assert_eq!(result.segments.len(), 1);
    assert_eq!(result.segments[0].id, "S1");
}

#[tokio::test]
async fn segments_outside_the_expanded_label_set_are_excluded() {
    let host = Host::new(Arc::new(InMemoryKvStore::new()), None, None, '/');
    let memory = host.memory("persona-1");
    memory.graph().set_entity("topic:a", serde_json::Map::new());
    memory.graph().set_entity("topic:b", serde_json::Map::new());

    memory
        .store_segment(segment("in-scope", "relevant", &["topic:a"], &[], 1))
        .await
        .unwrap();
    memory
        .store_segment(segment("out-of-scope", "irrelevant", &["topic:b"], &[], 2))
        .await
        .unwrap();

    let result = memory
        .recall(RecallQuery {
            text: None,
            labels: vec!["topic:a".into()],
            limit: 10,
            hops: 0,
        })
        .await
        .unwrap();

    let ids: Vec<&str> = result.segments.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["in-scope"]);
}
