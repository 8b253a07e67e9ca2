//! Command line interface for the `fragment-decoder` binary.
//!
//! Kept free of library types so the build script can render the man page
//! from the same definition.

use std::net::SocketAddr;

use clap::Parser;

/// Command line arguments for the `fragment-decoder` binary.
#[derive(Debug, Parser)]
#[command(
    name = "fragment-decoder",
    version,
    about = "Discover and reassemble a message scattered across a sparse ID space"
)]
pub struct Cli {
    /// Base URL of the fragment service.
    #[arg(short, long, default_value = "http://localhost:8080")]
    pub base_url: String,

    /// Request path template; `{id}` is replaced by the candidate ID.
    #[arg(long, default_value = "/fragment?id={id}")]
    pub path: String,

    /// HTTP method used for fetches.
    #[arg(long, default_value = "GET")]
    pub method: String,

    /// Status codes meaning "no fragment at this ID".
    #[arg(long = "not-found-status", value_delimiter = ',', default_value = "404")]
    pub not_found_statuses: Vec<u16>,

    /// JSON pointer to the fragment index in success payloads.
    #[arg(long, default_value = "/index")]
    pub index_pointer: String,

    /// JSON pointer to the fragment text in success payloads.
    #[arg(long, default_value = "/text")]
    pub text_pointer: String,

    /// Maximum number of fetches in flight.
    #[arg(short = 'c', long, default_value_t = 25)]
    pub max_concurrent: usize,

    /// Per-request timeout in seconds.
    #[arg(short, long, default_value_t = 5.0)]
    pub timeout: f64,

    /// First ID sampled during initial discovery.
    #[arg(long, default_value_t = 1)]
    pub sample_start: u64,

    /// Last ID sampled during initial discovery.
    #[arg(long, default_value_t = 1000)]
    pub sample_end: u64,

    /// Number of IDs sampled during initial discovery.
    #[arg(long, default_value_t = 50)]
    pub sample_size: usize,

    /// Gap-filling batches before falling back to a sweep.
    #[arg(long, default_value_t = 10)]
    pub gap_batches: usize,

    /// Cap on the total number of requests.
    #[arg(long, default_value_t = 10_000)]
    pub request_cap: usize,

    /// Cap on the total run time in seconds.
    #[arg(long, default_value_t = 30.0)]
    pub time_cap: f64,

    /// Highest ID any phase may probe.
    #[arg(long, default_value_t = 10_000)]
    pub namespace_max: u64,

    /// Global request rate in requests per second.
    #[arg(long)]
    pub rate_limit: Option<usize>,

    /// Seed for candidate sampling.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Serve Prometheus metrics on this address while decoding.
    #[arg(long)]
    pub metrics_addr: Option<SocketAddr>,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::Cli;

    #[test]
    fn defaults_match_library_defaults() {
        let cli = Cli::parse_from(["fragment-decoder"]);

        assert_eq!(cli.base_url, "http://localhost:8080");
        assert_eq!(cli.path, "/fragment?id={id}");
        assert_eq!(cli.not_found_statuses, [404]);
        assert_eq!(cli.max_concurrent, 25);
        assert_eq!((cli.sample_start, cli.sample_end), (1, 1000));
        assert!(cli.metrics_addr.is_none());
    }

    #[test]
    fn parses_overrides() {
        let cli = Cli::parse_from([
            "fragment-decoder",
            "--base-url",
            "http://localhost:8888",
            "-c",
            "30",
            "--timeout",
            "0.5",
            "--not-found-status",
            "404,410",
            "--seed",
            "9",
        ]);

        assert_eq!(cli.base_url, "http://localhost:8888");
        assert_eq!(cli.max_concurrent, 30);
        assert!((cli.timeout - 0.5).abs() < f64::EPSILON);
        assert_eq!(cli.not_found_statuses, [404, 410]);
        assert_eq!(cli.seed, Some(9));
    }
}
