//! Configuration for the translation service endpoint.
//!
//! Everything the HTTP client needs lives in [`ApiConfig`], built via its
//! [`ApiConfigBuilder`] or resolved from the environment with
//! [`ApiConfig::from_env`]. Keeping the endpoint out of the source tree is
//! deliberate: the service URL changes per deployment (a local dev server,
//! a tunnelled staging box, production), so it must arrive through
//! configuration rather than a constant.

use crate::error::TraduzoError;
use serde::{Deserialize, Serialize};

/// Environment variable naming the translation service base URL.
pub const ENV_API_URL: &str = "TRADUZO_API_URL";

/// Environment variable overriding the request timeout in seconds.
pub const ENV_API_TIMEOUT: &str = "TRADUZO_API_TIMEOUT";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Connection settings for the translation service.
///
/// # Example
/// ```rust
/// use traduzo::ApiConfig;
///
/// let config = ApiConfig::builder()
///     .base_url("http://localhost:5000/api")
///     .timeout_secs(30)
///     .build()
///     .unwrap();
/// assert_eq!(config.base_url, "http://localhost:5000/api");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the translation service, without a trailing slash.
    /// The client appends `/translate` to it. Example:
    /// `http://localhost:5000/api`.
    pub base_url: String,

    /// Whole-request timeout in seconds. Default: 60.
    ///
    /// The service runs OCR plus a translation model per document, so
    /// responses routinely take tens of seconds. Raise this before blaming
    /// the network.
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Create a config for the given base URL with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalise_base_url(&base_url.into()),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Create a new builder for `ApiConfig`.
    pub fn builder() -> ApiConfigBuilder {
        ApiConfigBuilder {
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Resolve the configuration from the environment.
    ///
    /// Reads `TRADUZO_API_URL` (required) and `TRADUZO_API_TIMEOUT`
    /// (optional). Fails with a setup hint when the URL is unset so a first
    /// run tells the user exactly what to export.
    pub fn from_env() -> Result<Self, TraduzoError> {
        let base_url = std::env::var(ENV_API_URL)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                TraduzoError::InvalidConfig(format!(
                    "{ENV_API_URL} is not set.\n\
                     Point it at the translation service base URL, e.g.:\n\
                       export {ENV_API_URL}=http://localhost:5000/api"
                ))
            })?;

        let mut builder = Self::builder().base_url(base_url);

        if let Ok(raw) = std::env::var(ENV_API_TIMEOUT) {
            if !raw.trim().is_empty() {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    TraduzoError::InvalidConfig(format!(
                        "{ENV_API_TIMEOUT} must be a whole number of seconds, got '{raw}'"
                    ))
                })?;
                builder = builder.timeout_secs(secs);
            }
        }

        builder.build()
    }
}

/// Builder for [`ApiConfig`].
#[derive(Debug)]
pub struct ApiConfigBuilder {
    base_url: Option<String>,
    timeout_secs: u64,
}

impl ApiConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(normalise_base_url(&url.into()));
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs.max(1);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ApiConfig, TraduzoError> {
        let base_url = self.base_url.filter(|u| !u.is_empty()).ok_or_else(|| {
            TraduzoError::InvalidConfig("Translation service base URL is empty".into())
        })?;

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(TraduzoError::InvalidConfig(format!(
                "Base URL must start with http:// or https://, got '{base_url}'"
            )));
        }

        Ok(ApiConfig {
            base_url,
            timeout_secs: self.timeout_secs,
        })
    }
}

/// Strip whitespace and trailing slashes so `{base_url}/translate` never
/// produces a double slash.
fn normalise_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_normalised() {
        let config = ApiConfig::new("http://localhost:5000/api/");
        assert_eq!(config.base_url, "http://localhost:5000/api");

        let config = ApiConfig::builder()
            .base_url("  http://localhost:5000/api// ")
            .build()
            .unwrap();
        assert_eq!(config.base_url, "http://localhost:5000/api");
    }

    #[test]
    fn timeout_is_clamped_to_at_least_one_second() {
        let config = ApiConfig::builder()
            .base_url("http://localhost:5000")
            .timeout_secs(0)
            .build()
            .unwrap();
        assert_eq!(config.timeout_secs, 1);
    }

    #[test]
    fn default_timeout() {
        let config = ApiConfig::new("http://localhost:5000");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn missing_base_url_is_rejected() {
        let err = ApiConfig::builder().build().unwrap_err();
        assert!(matches!(err, TraduzoError::InvalidConfig(_)));
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        let err = ApiConfig::builder()
            .base_url("ftp://example.com")
            .build()
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("http://"), "got: {msg}");
    }

    // Environment-variable behaviour is covered in a single test because
    // the test harness shares one process environment across threads.
    #[test]
    fn from_env_reads_url_and_timeout() {
        std::env::remove_var(ENV_API_URL);
        std::env::remove_var(ENV_API_TIMEOUT);

        let err = ApiConfig::from_env().unwrap_err();
        assert!(err.to_string().contains(ENV_API_URL), "got: {err}");

        std::env::set_var(ENV_API_URL, "http://localhost:5000/api/");
        std::env::set_var(ENV_API_TIMEOUT, "25");
        let config = ApiConfig::from_env().unwrap();
        assert_eq!(config.base_url, "http://localhost:5000/api");
        assert_eq!(config.timeout_secs, 25);

        std::env::set_var(ENV_API_TIMEOUT, "soon");
        let err = ApiConfig::from_env().unwrap_err();
        assert!(err.to_string().contains(ENV_API_TIMEOUT), "got: {err}");

        std::env::remove_var(ENV_API_URL);
        std::env::remove_var(ENV_API_TIMEOUT);
    }
}
