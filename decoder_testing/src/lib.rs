//! Test support for `fragment_decoder`.
//!
//! [`StubSource`] drives the decoder in memory with call recording and
//! injected failures; [`StubServer`] serves fragments over real HTTP so
//! `HttpSource` can be tested end to end; [`LoggerHandle`] serialises log
//! capture across tests.
//!
//! ```rust
//! use decoder_testing::{StubSource, TEST_MESSAGE_TEXT};
//! use fragment_decoder::{DecoderConfig, run_decoder_with_source};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let config = DecoderConfig::builder()
//!     .initial_sample_range(1..=100)
//!     .initial_sample_size(100)
//!     .build()
//!     .expect("valid configuration");
//! let report = run_decoder_with_source(config, StubSource::test_message())
//!     .await
//!     .expect("decoded");
//! assert_eq!(report.message, TEST_MESSAGE_TEXT);
//! # }
//! ```

pub mod logging;
pub mod server;
pub mod source;

pub use logging::{LoggerHandle, logger};
pub use server::{StubBehaviour, StubServer};
pub use source::{StubSource, TEST_MESSAGE, TEST_MESSAGE_TEXT};
