//! Integration coverage for the `decoder_testing` stubs.

use std::time::Duration;

use decoder_testing::{StubBehaviour, StubServer, StubSource};
use fragment_decoder::{CandidateId, FetchError, FetchOutcome, FragmentSource};

#[tokio::test]
async fn stub_source_records_calls_and_failures() {
    let source = StubSource::new([(3, 0, "hi")]).failing(4, FetchError::Status(503));
    let probe = source.clone();

    assert!(matches!(
        source.fetch(CandidateId::new(3)).await,
        FetchOutcome::Found(_)
    ));
    assert_eq!(
        source.fetch(CandidateId::new(4)).await,
        FetchOutcome::Error(FetchError::Status(503))
    );
    assert_eq!(source.fetch(CandidateId::new(5)).await, FetchOutcome::Absent);
    source.fetch(CandidateId::new(5)).await;

    assert_eq!(probe.call_count(), 4);
    assert_eq!(probe.repeated_calls(), [CandidateId::new(5)]);
    assert_eq!(probe.peak_concurrency(), 1);
}

#[tokio::test]
async fn stub_server_answers_by_identifier() {
    let server = StubServer::start(
        StubBehaviour::new([(1, 0, "hello")])
            .error(2, 500)
            .malformed(3)
            .stall(4, Duration::from_millis(10)),
    )
    .await
    .expect("stub server starts");
    let client = reqwest::Client::new();
    let get = |id: u64| {
        let url = format!("{}/fragment?id={id}", server.base_url());
        let client = client.clone();
        async move { client.get(url).send().await.expect("request succeeds") }
    };

    let found = get(1).await;
    assert_eq!(found.status(), 200);
    assert_eq!(
        found.text().await.expect("body"),
        r#"{"index":0,"text":"hello"}"#
    );
    assert_eq!(get(2).await.status(), 500);
    assert_eq!(get(3).await.status(), 200);
    assert_eq!(get(4).await.status(), 404);
    assert_eq!(get(9).await.status(), 404);
    assert_eq!(server.hits(), 5);
}
