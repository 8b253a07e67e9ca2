//! Remote endpoint description used by [`HttpSource`](crate::fetch::HttpSource).

use reqwest::{Method, StatusCode, Url};

use super::ConfigError;
use crate::fragment::CandidateId;

/// Placeholder substituted with the candidate identifier in
/// [`EndpointConfig::path_template`].
pub const ID_PLACEHOLDER: &str = "{id}";

/// Default base URL of the fragment service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Default request path; `{id}` is replaced per candidate.
pub const DEFAULT_PATH_TEMPLATE: &str = "/fragment?id={id}";

/// Locations of the fragment fields inside a JSON success body.
///
/// Both fields are [JSON pointers](https://www.rfc-editor.org/rfc/rfc6901),
/// so nested payloads such as `{"data": {"index": 0}}` are addressed as
/// `/data/index`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PayloadSchema {
    /// Pointer to the zero-based fragment index.
    pub index_pointer: String,
    /// Pointer to the fragment text.
    pub text_pointer: String,
}

impl Default for PayloadSchema {
    fn default() -> Self {
        Self {
            index_pointer: "/index".into(),
            text_pointer: "/text".into(),
        }
    }
}

impl PayloadSchema {
    fn validate(&self) -> Result<(), ConfigError> {
        for pointer in [&self.index_pointer, &self.text_pointer] {
            if !(pointer.is_empty() || pointer.starts_with('/')) {
                return Err(ConfigError::InvalidPayloadPointer(pointer.clone()));
            }
        }
        Ok(())
    }
}

/// How a single candidate is requested and how responses are classified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndpointConfig {
    /// Scheme, host, and port of the service, e.g. `http://localhost:8888`.
    pub base_url: String,
    /// HTTP method used for every request.
    pub method: Method,
    /// Path and query appended to `base_url`, containing [`ID_PLACEHOLDER`].
    pub path_template: String,
    /// Status codes meaning "this identifier has no fragment".
    pub not_found_statuses: Vec<u16>,
    /// Where the index and text live in a success body.
    pub payload: PayloadSchema,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            method: Method::GET,
            path_template: DEFAULT_PATH_TEMPLATE.into(),
            not_found_statuses: vec![StatusCode::NOT_FOUND.as_u16()],
            payload: PayloadSchema::default(),
        }
    }
}

impl EndpointConfig {
    /// Endpoint with default path and payload layout rooted at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Render the request URL for `id`.
    ///
    /// # Examples
    ///
    /// ```
    /// use fragment_decoder::{config::EndpointConfig, fragment::CandidateId};
    ///
    /// let endpoint = EndpointConfig::new("http://localhost:8888/");
    /// assert_eq!(
    ///     endpoint.url_for(CandidateId::new(42)),
    ///     "http://localhost:8888/fragment?id=42"
    /// );
    /// ```
    #[must_use]
    pub fn url_for(&self, id: CandidateId) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = self.path_template.replace(ID_PLACEHOLDER, &id.to_string());
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    /// Whether `status` means the candidate has no fragment.
    #[must_use]
    pub fn is_not_found(&self, status: u16) -> bool { self.not_found_statuses.contains(&status) }

    /// Check that requests can be rendered and responses classified.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a missing placeholder, an unparsable URL,
    /// an invalid status code, or a malformed payload pointer.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.path_template.contains(ID_PLACEHOLDER) {
            return Err(ConfigError::MissingIdPlaceholder(self.path_template.clone()));
        }
        let probe = self.url_for(CandidateId::new(0));
        Url::parse(&probe).map_err(|err| ConfigError::InvalidUrl {
            url: probe.clone(),
            reason: err.to_string(),
        })?;
        if let Some(&status) = self
            .not_found_statuses
            .iter()
            .find(|&&status| StatusCode::from_u16(status).is_err())
        {
            return Err(ConfigError::InvalidStatus(status));
        }
        self.payload.validate()
    }
}
