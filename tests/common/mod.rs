//! Shared fixtures for integration tests.
//!
//! The default configuration samples 1..=100 densely and caps the namespace at
//! 1000 so every phase finishes in milliseconds against an in-memory source.

// Items in this shared module may not be used by all test binaries that import it.
#![allow(
    dead_code,
    reason = "shared test utilities are not used by all test binaries"
)]

use fragment_decoder::{DecoderConfig, DecoderConfigBuilder};
use rstest::fixture;

/// Seed shared by every test run so sampling is reproducible.
pub const SEED: u64 = 0x5EED;

/// Builder preloaded with a small namespace and a fixed seed.
pub fn small_builder() -> DecoderConfigBuilder {
    DecoderConfig::builder()
        .max_concurrent(10)
        .initial_sample_range(1..=100)
        .initial_sample_size(100)
        .namespace_max(1000)
        .seed(SEED)
}

/// Validated configuration for a small namespace.
#[fixture]
pub fn small_config() -> DecoderConfig {
    small_builder()
        .build()
        .expect("small configuration is valid")
}
