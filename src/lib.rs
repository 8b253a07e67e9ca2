#![doc(html_root_url = "https://docs.rs/fragment_decoder/latest")]
//! Public API for the `fragment_decoder` library.
//!
//! This crate rebuilds a message that has been scattered across a sparse
//! numeric identifier space. Each identifier may hold one fragment carrying a
//! position index and a piece of text; the decoder probes identifiers with
//! bounded concurrency, deduplicates what it finds, and stops as soon as the
//! indices discovered form an unbroken run from zero.
//!
//! ```no_run
//! use fragment_decoder::{DecoderConfig, run_decoder};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> fragment_decoder::Result<()> {
//! let config = DecoderConfig::builder()
//!     .base_url("http://localhost:8080")
//!     .build()?;
//! let report = run_decoder(config).await?;
//! println!("{} ({} requests)", report.message, report.requests_made);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod fetch;
pub mod fragment;
pub mod limiter;
pub mod metrics;
pub mod search;

pub use config::{ConfigError, DecoderConfig, DecoderConfigBuilder, EndpointConfig, PayloadSchema};
pub use error::{DecodeError, ExhaustedSearch, ExhaustionReason, Result};
pub use fetch::{FetchError, FetchOutcome, FragmentSource, HttpSource};
pub use fragment::{
    AssembledMessage,
    AssemblyError,
    CandidateId,
    Fragment,
    FragmentIndex,
    FragmentStore,
    assemble,
    is_complete,
};
pub use limiter::ConcurrencyLimiter;
pub use metrics::{FETCHES_IN_FLIGHT, FETCHES_TOTAL, FRAGMENTS_DISCOVERED};
pub use search::{DecodeReport, Decoder, Phase, run_decoder, run_decoder_with_source};
