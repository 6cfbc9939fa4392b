//! # Error Handling
//!
//! Every failure a captioning attempt can hit is a [`CaptionError`]. The
//! variants follow the four ways an attempt can end badly, plus file I/O for
//! front ends that read images from disk:
//!
//! - **Validation**: the picked file is not an image or is too large. Local and
//!   recoverable; the current selection and caption stay as they were.
//! - **Configuration**: no usable credential or a malformed endpoint. Blocks the
//!   action before any network traffic.
//! - **Service**: the captioning API answered but reported a failure.
//! - **Transport**: the request never produced a readable answer.
//! - **Io**: reading an image from disk failed.
//!
//! None of them is retried and none is fatal to the application. Each error
//! knows the single line of text to show the user ([`CaptionError::user_message`])
//! separately from its technical `Display` form, which is what gets traced.
//!
//! ## Usage
//!
//! ```rust
//! use image_caption::error::{CaptionError, ErrorSeverity, HasSeverity};
//!
//! let error = CaptionError::service(Some("invalid image".to_string()))
//!     .with_metadata("http_status", "200");
//!
//! assert_eq!(error.category(), "service");
//! assert_eq!(error.user_message(), "invalid image");
//! assert_eq!(error.severity(), ErrorSeverity::Error);
//! ```

use std::collections::HashMap;
use std::{error::Error as StdError, fmt, time::SystemTime};

/// Shown for every transport failure, whatever the underlying cause.
pub const TRANSPORT_FAILURE_MESSAGE: &str = "API request failed. Check your API key.";

/// Shown when the service reports failure without saying why.
pub const SERVICE_FAILURE_FALLBACK: &str = "Failed to generate caption";

/// How bad a failure is, ordered from mildest to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// The user did something the application refuses; easy to correct
    Warning,
    /// An attempt failed
    Error,
    /// The application cannot perform the action until it is reconfigured
    Critical,
}

/// Diagnostic details carried alongside every [`CaptionError`].
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub timestamp: SystemTime,
    pub severity: ErrorSeverity,
    /// Free-form diagnostics such as the endpoint or HTTP status, traced but
    /// never shown to the user.
    pub metadata: HashMap<String, String>,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            timestamp: SystemTime::now(),
            severity: ErrorSeverity::Error,
            metadata: HashMap::new(),
        }
    }
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    fn severe(severity: ErrorSeverity) -> Self {
        Self {
            severity,
            ..Self::default()
        }
    }
}

/// Error type for the captioning client
#[derive(Debug)]
pub enum CaptionError {
    /// The selected file was refused
    Validation {
        field: String,
        value: String,
        message: String,
        context: ErrorContext,
    },
    /// The client is not configured well enough to make a request
    Configuration {
        field: String,
        reason: String,
        context: ErrorContext,
    },
    /// The captioning service reported a failure
    Service {
        message: Option<String>,
        context: ErrorContext,
    },
    /// The request failed before a usable response arrived
    Transport {
        operation: String,
        source: Option<Box<dyn StdError + Send + Sync>>,
        context: ErrorContext,
    },
    /// Reading an image from disk failed
    Io {
        operation: String,
        path: Option<String>,
        source: std::io::Error,
        context: ErrorContext,
    },
}

impl CaptionError {
    /// Create a validation error. `message` is what the user sees.
    pub fn validation(
        field: impl Into<String>,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Validation {
            field: field.into(),
            value: value.into(),
            message: message.into(),
            context: ErrorContext::severe(ErrorSeverity::Warning),
        }
    }

    /// Create a configuration error. `reason` is what the user sees.
    pub fn configuration(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Configuration {
            field: field.into(),
            reason: reason.into(),
            context: ErrorContext::severe(ErrorSeverity::Critical),
        }
    }

    /// Create a service error from the message the API supplied, if any
    pub fn service(message: Option<String>) -> Self {
        Self::Service {
            message,
            context: ErrorContext::new(),
        }
    }

    /// Create a transport error caused by `source`
    pub fn transport(
        operation: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Transport {
            operation: operation.into(),
            source: Some(Box::new(source)),
            context: ErrorContext::new(),
        }
    }

    /// Create a transport error with no underlying cause
    pub fn transport_failed(operation: impl Into<String>) -> Self {
        Self::Transport {
            operation: operation.into(),
            source: None,
            context: ErrorContext::new(),
        }
    }

    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path: None,
            source,
            context: ErrorContext::new(),
        }
    }

    /// Attach the path an I/O error happened on
    pub fn with_path(mut self, new_path: impl Into<String>) -> Self {
        if let Self::Io { path, .. } = &mut self {
            *path = Some(new_path.into());
        }
        self
    }

    /// Record a diagnostic key/value pair.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context_mut().metadata.insert(key.into(), value.into());
        self
    }

    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::Validation { context, .. } => context,
            Self::Configuration { context, .. } => context,
            Self::Service { context, .. } => context,
            Self::Transport { context, .. } => context,
            Self::Io { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::Validation { context, .. } => context,
            Self::Configuration { context, .. } => context,
            Self::Service { context, .. } => context,
            Self::Transport { context, .. } => context,
            Self::Io { context, .. } => context,
        }
    }

    /// Short machine-readable name of the variant, used as a tracing field.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::Configuration { .. } => "configuration",
            Self::Service { .. } => "service",
            Self::Transport { .. } => "transport",
            Self::Io { .. } => "io",
        }
    }

    /// The text for the application's single error slot.
    ///
    /// Service messages are passed through verbatim; transport failures
    /// always collapse to [`TRANSPORT_FAILURE_MESSAGE`].
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message, .. } => message.clone(),
            Self::Configuration { reason, .. } => reason.clone(),
            Self::Service { message, .. } => message
                .clone()
                .unwrap_or_else(|| SERVICE_FAILURE_FALLBACK.to_string()),
            Self::Transport { .. } => TRANSPORT_FAILURE_MESSAGE.to_string(),
            Self::Io { .. } => self.to_string(),
        }
    }
}

impl fmt::Display for CaptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptionError::Validation {
                field,
                value,
                message,
                ..
            } => {
                write!(
                    f,
                    "Validation failed for '{}': {} (value: {})",
                    field, message, value
                )
            }
            CaptionError::Configuration { field, reason, .. } => {
                write!(f, "Configuration error in '{}': {}", field, reason)
            }
            CaptionError::Service { message, .. } => match message {
                Some(message) => write!(f, "Captioning service error: {}", message),
                None => write!(f, "Captioning service error without message"),
            },
            CaptionError::Transport {
                operation, source, ..
            } => {
                if let Some(source) = source {
                    write!(f, "Transport error during {}: {}", operation, source)
                } else {
                    write!(f, "Transport error during {}", operation)
                }
            }
            CaptionError::Io {
                operation,
                path,
                source,
                ..
            } => {
                if let Some(path) = path {
                    write!(
                        f,
                        "I/O error during {} on '{}': {}",
                        operation, path, source
                    )
                } else {
                    write!(f, "I/O error during {}: {}", operation, source)
                }
            }
        }
    }
}

impl StdError for CaptionError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Transport {
                source: Some(source),
                ..
            } => Some(source.as_ref()),
            _ => None,
        }
    }
}

pub type CaptionResult<T> = Result<T, CaptionError>;

/// Errors that can say how serious they are.
pub trait HasSeverity {
    fn severity(&self) -> ErrorSeverity;
}

impl HasSeverity for CaptionError {
    fn severity(&self) -> ErrorSeverity {
        self.context().severity
    }
}

impl From<std::io::Error> for CaptionError {
    fn from(error: std::io::Error) -> Self {
        Self::io("unknown", error)
    }
}

impl From<reqwest::Error> for CaptionError {
    fn from(error: reqwest::Error) -> Self {
        Self::transport("http", error)
    }
}

impl From<serde_json::Error> for CaptionError {
    fn from(error: serde_json::Error) -> Self {
        Self::transport("decode_response", error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_keeps_user_text() {
        let error =
            CaptionError::validation("mime_type", "text/plain", "Please select an image file");
        assert_eq!(error.category(), "validation");
        assert_eq!(error.user_message(), "Please select an image file");
        assert_eq!(error.severity(), ErrorSeverity::Warning);
        assert!(error.to_string().contains("text/plain"));
    }

    #[test]
    fn test_service_error_fallback() {
        assert_eq!(
            CaptionError::service(None).user_message(),
            SERVICE_FAILURE_FALLBACK
        );
        assert_eq!(
            CaptionError::service(Some("quota exceeded".into())).user_message(),
            "quota exceeded"
        );
    }

    #[test]
    fn test_transport_error_hides_cause_from_user() {
        let cause = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let error = CaptionError::transport("send_request", cause)
            .with_metadata("endpoint", "http://localhost:1");

        assert_eq!(error.user_message(), TRANSPORT_FAILURE_MESSAGE);
        assert!(error.to_string().contains("refused"));
        assert!(error.source().is_some());
        assert_eq!(
            error.context().metadata.get("endpoint").map(String::as_str),
            Some("http://localhost:1")
        );
    }

    #[test]
    fn test_configuration_error_is_critical() {
        let error = CaptionError::configuration("api_key", "Please add your API key");
        assert_eq!(error.severity(), ErrorSeverity::Critical);
        assert!(error.severity() > CaptionError::service(None).severity());
    }

    #[test]
    fn test_io_error_with_path() {
        let error = CaptionError::io(
            "read_image",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        )
        .with_path("photo.jpg");
        assert!(error.user_message().contains("photo.jpg"));
    }
}
