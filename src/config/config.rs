//! # Configuration
//!
//! The client needs two values: the captioning endpoint and the API key sent
//! with every request. Both have build-time defaults, read with
//! `option_env!` when the crate is compiled:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `CAPTION_API_URL` | `https://api.apiverve.com/v1/imagecaption` | Captioning endpoint |
//! | `CAPTION_API_KEY` | `your-api-key-here` (placeholder) | API key |
//!
//! Nothing is read from the environment at run time. Front ends may override
//! either value explicitly (the CLI does so with `--endpoint` and `--api-key`).
//!
//! An empty key, a whitespace-only key and the placeholder all mean the same
//! thing, [`Credential::Missing`]: captioning is refused before any request is
//! made and the user is told how to configure a key.
//!
//! ## Examples
//!
//! ```rust
//! use image_caption::config::{CaptionConfig, Credential};
//!
//! let config = CaptionConfig::new(
//!     "https://captions.example.com/v1/imagecaption",
//!     Credential::from_raw(Some("secret")),
//! );
//! assert!(config.validate().is_ok());
//! assert_eq!(config.credential.api_key(), Some("secret"));
//!
//! let placeholder = Credential::from_raw(Some("your-api-key-here"));
//! assert!(!placeholder.is_configured());
//! ```

use std::fmt;

use crate::error::{CaptionError, CaptionResult};

/// Endpoint used when none was configured at build time.
pub const DEFAULT_ENDPOINT: &str = "https://api.apiverve.com/v1/imagecaption";

/// Key value shipped in unconfigured builds.
pub const PLACEHOLDER_API_KEY: &str = "your-api-key-here";

/// Shown when captioning is attempted without a usable key.
pub const MISSING_CREDENTIAL_MESSAGE: &str =
    "Please add your API key (build with CAPTION_API_KEY set, or pass --api-key)";

/// The API key, or the explicit absence of one.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// No usable key: absent, empty, or still the placeholder.
    Missing,
    /// A key to send in the `x-api-key` header.
    ApiKey(String),
}

impl Credential {
    /// Interpret a raw key value. Surrounding whitespace is trimmed.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::Missing,
            Some(PLACEHOLDER_API_KEY) => Self::Missing,
            Some(key) => Self::ApiKey(key.to_string()),
        }
    }

    /// The key, if one is configured
    pub fn api_key(&self) -> Option<&str> {
        match self {
            Self::Missing => None,
            Self::ApiKey(key) => Some(key),
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, Self::ApiKey(_))
    }

    /// The key, or the configuration error shown to the user when there is none.
    pub fn require(&self) -> CaptionResult<&str> {
        self.api_key()
            .ok_or_else(|| CaptionError::configuration("api_key", MISSING_CREDENTIAL_MESSAGE))
    }
}

impl Default for Credential {
    fn default() -> Self {
        Self::from_raw(option_env!("CAPTION_API_KEY"))
    }
}

// Keys never end up in logs.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("Missing"),
            Self::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
        }
    }
}

/// Configuration for talking to the captioning service.
///
/// Shared by the CLI and the desktop application; both build one, validate it
/// and hand it to [`crate::session::CaptionApp`].
#[derive(Debug, Clone)]
pub struct CaptionConfig {
    /// Full URL the image is POSTed to.
    pub endpoint: String,

    /// Key sent in the `x-api-key` header.
    pub credential: Credential,
}

impl Default for CaptionConfig {
    /// Build-time defaults: `CAPTION_API_URL` / `CAPTION_API_KEY` if they were
    /// set when compiling, otherwise [`DEFAULT_ENDPOINT`] and no key.
    fn default() -> Self {
        Self {
            endpoint: option_env!("CAPTION_API_URL")
                .unwrap_or(DEFAULT_ENDPOINT)
                .to_string(),
            credential: Credential::default(),
        }
    }
}

impl CaptionConfig {
    pub fn new(endpoint: impl Into<String>, credential: Credential) -> Self {
        Self {
            endpoint: endpoint.into(),
            credential,
        }
    }

    /// Replace the endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Replace the credential from a raw key value
    pub fn with_api_key(mut self, key: &str) -> Self {
        self.credential = Credential::from_raw(Some(key));
        self
    }

    /// Validates the configuration.
    ///
    /// Only the endpoint is checked here: it must be an absolute `http` or
    /// `https` URL. A missing credential is not a configuration failure at
    /// this point; it is reported when captioning is attempted.
    pub fn validate(&self) -> CaptionResult<()> {
        let url = reqwest::Url::parse(&self.endpoint).map_err(|e| {
            CaptionError::configuration("endpoint", format!("Invalid endpoint URL: {}", e))
                .with_metadata("endpoint", self.endpoint.clone())
        })?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(CaptionError::configuration(
                "endpoint",
                format!("Endpoint must use http or https, not '{}'", other),
            )),
        }
    }
}
