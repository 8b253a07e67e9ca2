//! Log output of decoder runs.

mod common;

use decoder_testing::{LoggerHandle, StubSource, logger};
use fragment_decoder::run_decoder_with_source;
use rstest::rstest;
use serial_test::serial;

#[rstest]
#[serial]
#[tokio::test]
async fn successful_run_logs_each_fragment(mut logger: LoggerHandle) {
    run_decoder_with_source(common::small_config(), StubSource::test_message())
        .await
        .expect("message decoded");

    let lines = logger.drain();
    for needle in [
        "phase started: phase=initial discovery",
        "fragment found: index=0, candidate=17",
        "fragment found: index=3, candidate=99",
        "message decoded",
    ] {
        assert!(
            lines.iter().any(|line| line.contains(needle)),
            "missing {needle:?} in {lines:#?}"
        );
    }
}

#[rstest]
#[serial]
#[tokio::test]
async fn exhausted_run_logs_a_warning(mut logger: LoggerHandle) {
    let config = common::small_builder()
        .phase3_request_cap(120)
        .build()
        .expect("valid configuration");
    let source = StubSource::new([(17, 0, "This"), (99, 3, "test")]);

    run_decoder_with_source(config, source)
        .await
        .expect_err("fragments 1 and 2 are missing");

    assert!(logger.saw("search exhausted"));
}

#[rstest]
#[serial]
#[tokio::test]
async fn empty_fragments_are_reported(mut logger: LoggerHandle) {
    let source = StubSource::new([(1, 0, "only"), (2, 1, "")]);

    run_decoder_with_source(common::small_config(), source)
        .await
        .expect("message decoded");

    assert!(logger.saw("fragment with empty text ignored: candidate=2"));
}
