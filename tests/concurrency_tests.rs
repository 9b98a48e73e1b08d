//! Concurrency behavior of the batch pipeline: ordering, in-flight bounds, shared service.

mod common;

use common::{RecordingEmbedder, service_with, test_config};
use embedgen::{BatchEmbedRequest, EmbedRequest, EmbeddingConfig, SimilarityRequest};
use std::sync::Arc;
use std::time::Duration;

fn numbered(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("text-{i}")).collect()
}

fn index_of(text: &str) -> u64 {
    text.trim_start_matches("text-").parse().unwrap_or(0)
}

#[tokio::test]
async fn results_follow_input_order_under_reversed_latency() {
    // Earlier texts take longer, so completion order is the reverse of input order.
    let embedder = Arc::new(
        RecordingEmbedder::new()
            .with_latency(|text| Duration::from_millis(5 * (10 - index_of(text)))),
    );
    let service = service_with(embedder.clone(), test_config());
    let texts = numbered(10);

    let resp = service
        .embed_batch(BatchEmbedRequest::new(texts.clone()))
        .await
        .unwrap();

    assert_eq!(resp.results.len(), texts.len());
    for (i, text) in texts.iter().enumerate() {
        assert_eq!(resp.results[i].index(), i);
        let single = service.embed(EmbedRequest::new(text.as_str())).await.unwrap();
        assert_eq!(resp.results[i].vector(), Some(&single.vector));
    }
}

#[tokio::test]
async fn in_flight_calls_never_exceed_the_limit() {
    let embedder = Arc::new(
        RecordingEmbedder::new().with_latency(|_| Duration::from_millis(15)),
    );
    let config = EmbeddingConfig {
        max_in_flight: 3,
        ..test_config()
    };
    let service = service_with(embedder.clone(), config);

    let resp = service
        .embed_batch(BatchEmbedRequest::new(numbered(20)))
        .await
        .unwrap();

    assert_eq!(resp.count, 20);
    assert_eq!(embedder.call_count(), 20);
    assert!(embedder.max_observed_in_flight() <= 3);
    assert_eq!(embedder.max_observed_in_flight(), 3);
}

#[tokio::test]
async fn small_batches_do_not_overshoot() {
    let embedder = Arc::new(
        RecordingEmbedder::new().with_latency(|_| Duration::from_millis(10)),
    );
    let service = service_with(embedder.clone(), test_config());

    service
        .embed_batch(BatchEmbedRequest::new(numbered(2)))
        .await
        .unwrap();

    assert_eq!(embedder.max_observed_in_flight(), 2);
}

#[tokio::test]
async fn similarity_embeds_both_texts_concurrently() {
    let embedder = Arc::new(
        RecordingEmbedder::new().with_latency(|_| Duration::from_millis(30)),
    );
    let service = service_with(embedder.clone(), test_config());

    service
        .similarity(SimilarityRequest::new("left", "right"))
        .await
        .unwrap();

    assert_eq!(embedder.call_count(), 2);
    assert_eq!(embedder.max_observed_in_flight(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn shared_service_serves_concurrent_requests() {
    let embedder = Arc::new(
        RecordingEmbedder::new().with_latency(|_| Duration::from_millis(2)),
    );
    let service = Arc::new(service_with(embedder.clone(), test_config()));

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                service
                    .embed_batch(BatchEmbedRequest::new([
                        format!("shared-{}", i % 4),
                        "common".to_string(),
                    ]))
                    .await
                    .expect("batch")
            })
        })
        .collect();

    let responses = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|h| h.expect("task"))
        .collect::<Vec<_>>();

    // Same text, same vector, regardless of which request it rode in.
    let shared_vector = responses[0].results[1].vector().cloned();
    for resp in &responses {
        assert_eq!(resp.failed_count, 0);
        assert_eq!(resp.results[1].vector().cloned(), shared_vector);
    }
    assert_eq!(responses[0].results[0].vector(), responses[4].results[0].vector());
    assert_eq!(embedder.call_count(), 32);
}

#[tokio::test]
async fn dropping_a_request_cancels_its_calls() {
    let embedder = Arc::new(
        RecordingEmbedder::new().with_latency(|_| Duration::from_millis(200)),
    );
    let config = EmbeddingConfig {
        max_in_flight: 2,
        ..test_config()
    };
    let service = service_with(embedder.clone(), config);

    let outcome = tokio::time::timeout(
        Duration::from_millis(50),
        service.embed_batch(BatchEmbedRequest::new(numbered(10))),
    )
    .await;

    assert!(outcome.is_err(), "batch should still be running");
    // Only the first wave was ever started.
    assert_eq!(embedder.call_count(), 2);
}
