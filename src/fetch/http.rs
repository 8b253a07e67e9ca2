//! HTTP implementation of [`FragmentSource`].

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;

use super::{FetchError, FetchOutcome, FragmentSource, decode_fragment};
use crate::{
    config::{DecoderConfig, EndpointConfig},
    fragment::CandidateId,
};

/// Fetches fragments from an HTTP endpoint described by [`EndpointConfig`].
///
/// The underlying [`Client`] keeps a pool of keep-alive connections that is
/// shared by every concurrent fetch, so connection setup is paid once per
/// pooled connection rather than once per candidate.
///
/// # Examples
///
/// ```no_run
/// use fragment_decoder::{config::DecoderConfig, fetch::HttpSource};
///
/// let source = HttpSource::from_config(&DecoderConfig::default()).expect("client builds");
/// # drop(source);
/// ```
#[derive(Clone, Debug)]
pub struct HttpSource {
    client: Client,
    endpoint: EndpointConfig,
}

impl HttpSource {
    /// Build a source with a fresh connection pool sized for `max_concurrent`
    /// simultaneous requests.
    ///
    /// # Errors
    ///
    /// Returns any [`reqwest::Error`] raised while constructing the client.
    pub fn new(
        endpoint: EndpointConfig,
        timeout: Duration,
        max_concurrent: usize,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(max_concurrent)
            .tcp_nodelay(true)
            .build()?;
        Ok(Self::with_client(client, endpoint))
    }

    /// Build a source from the endpoint, timeout, and concurrency settings of
    /// `config`.
    ///
    /// # Errors
    ///
    /// Returns any [`reqwest::Error`] raised while constructing the client.
    pub fn from_config(config: &DecoderConfig) -> Result<Self, reqwest::Error> {
        Self::new(config.endpoint.clone(), config.timeout, config.max_concurrent)
    }

    /// Wrap an existing client, reusing its connection pool.
    #[must_use]
    pub fn with_client(client: Client, endpoint: EndpointConfig) -> Self { Self { client, endpoint } }

    /// Endpoint this source queries.
    #[must_use]
    pub fn endpoint(&self) -> &EndpointConfig { &self.endpoint }

    async fn try_fetch(&self, id: CandidateId) -> Result<FetchOutcome, FetchError> {
        let url = self.endpoint.url_for(id);
        let response = self
            .client
            .request(self.endpoint.method.clone(), url)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status().as_u16();
        if self.endpoint.is_not_found(status) {
            return Ok(FetchOutcome::Absent);
        }
        if !response.status().is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await.map_err(classify)?;
        let fragment = decode_fragment(&self.endpoint.payload, &body)?;
        Ok(FetchOutcome::Found(fragment))
    }
}

#[async_trait]
impl FragmentSource for HttpSource {
    async fn fetch(&self, id: CandidateId) -> FetchOutcome {
        match self.try_fetch(id).await {
            Ok(outcome) => outcome,
            Err(err) => {
                debug!("fetch failed: candidate={id}, error={err}");
                FetchOutcome::Error(err)
            }
        }
    }
}

fn classify(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Transport(err.to_string())
    }
}
