//! `fragment-decoder` binary.
//!
//! Parses CLI arguments, runs the decoder against the configured endpoint, and
//! prints the reassembled message.

mod cli;

use std::{process::ExitCode, time::Duration};

use clap::Parser;
use fragment_decoder::{
    DecodeError,
    DecoderConfig,
    EndpointConfig,
    PayloadSchema,
    run_decoder,
};
use reqwest::Method;

const EXIT_EXHAUSTED: u8 = 1;
const EXIT_CONFIG: u8 = 2;
const EXIT_INTERRUPTED: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    // Applications embedding the library should install their own subscriber.
    tracing_subscriber::fmt::init();

    let cli = cli::Cli::parse();
    let config = match config_from_cli(&cli) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("error: {message}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    #[cfg(feature = "metrics")]
    if let Some(addr) = cli.metrics_addr
        && let Err(err) = metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()
    {
        tracing::warn!(%addr, error = %err, "metrics exporter unavailable");
    }

    let outcome = tokio::select! {
        outcome = run_decoder(config) => outcome,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("interrupted");
            return ExitCode::from(EXIT_INTERRUPTED);
        }
    };

    match outcome {
        Ok(report) => {
            println!("{}", report.message);
            ExitCode::SUCCESS
        }
        Err(err @ (DecodeError::Config(_) | DecodeError::Client(_))) => {
            eprintln!("error: {err}");
            ExitCode::from(EXIT_CONFIG)
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(EXIT_EXHAUSTED)
        }
    }
}

fn config_from_cli(cli: &cli::Cli) -> Result<DecoderConfig, String> {
    let method = Method::from_bytes(cli.method.to_ascii_uppercase().as_bytes())
        .map_err(|err| format!("invalid method {:?}: {err}", cli.method))?;
    let endpoint = EndpointConfig {
        method,
        path_template: cli.path.clone(),
        not_found_statuses: cli.not_found_statuses.clone(),
        payload: PayloadSchema {
            index_pointer: cli.index_pointer.clone(),
            text_pointer: cli.text_pointer.clone(),
        },
        ..EndpointConfig::new(cli.base_url.clone())
    };

    let Ok(time_cap) = Duration::try_from_secs_f64(cli.time_cap) else {
        return Err(format!("invalid time cap: {}", cli.time_cap));
    };

    let mut builder = DecoderConfig::builder()
        .endpoint(endpoint)
        .max_concurrent(cli.max_concurrent)
        .timeout_secs(cli.timeout)
        .initial_sample_range(cli.sample_start..=cli.sample_end)
        .initial_sample_size(cli.sample_size)
        .phase2_batch_budget(cli.gap_batches)
        .phase3_request_cap(cli.request_cap)
        .phase3_time_cap(time_cap)
        .namespace_max(cli.namespace_max)
        .rate_limit(cli.rate_limit);
    if let Some(seed) = cli.seed {
        builder = builder.seed(seed);
    }
    builder.build().map_err(|err| err.to_string())
}
