//! # Captioning Service Client
//!
//! [`CaptionService`] is the seam between the application and the network.
//! [`HttpCaptionClient`] is the real implementation: one multipart `POST` per
//! caption, no retries, no timeout beyond what the HTTP stack imposes.
//!
//! ## Wire format
//!
//! ```text
//! POST <endpoint>
//! x-api-key: <credential>
//! Content-Type: multipart/form-data; boundary=...
//!
//! --boundary
//! Content-Disposition: form-data; name="image"; filename="photo.jpg"
//! Content-Type: image/jpeg
//!
//! <bytes>
//! ```
//!
//! The response body is interpreted as JSON whatever the HTTP status code;
//! the service reports failures in the body. A body that cannot be read or
//! parsed is a transport error.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use crate::config::CaptionConfig;
use crate::core::ImageFile;
use crate::core::image_file::UNSUPPORTED_TYPE_MESSAGE;
use crate::error::{CaptionError, CaptionResult};
use crate::state::UploadRequest;

use super::response::ServiceResponse;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Multipart field holding the image.
pub const IMAGE_FIELD: &str = "image";

/// Something that turns an image into a caption.
#[async_trait]
pub trait CaptionService: Send + Sync {
    /// Issue one caption request.
    async fn caption(&self, request: &UploadRequest) -> CaptionResult<String>;
}

/// HTTP client for the captioning endpoint.
#[derive(Debug, Clone)]
pub struct HttpCaptionClient {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpCaptionClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Build a client for a validated configuration.
    pub fn from_config(config: &CaptionConfig) -> CaptionResult<Self> {
        config.validate()?;
        Ok(Self::new(config.endpoint.clone()))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Build the multipart body for `image`.
pub fn multipart_form(image: &ImageFile) -> CaptionResult<Form> {
    let part = Part::bytes(image.bytes().to_vec())
        .file_name(image.name().to_string())
        .mime_str(image.mime_type())
        .map_err(|_| {
            CaptionError::validation("mime_type", image.mime_type(), UNSUPPORTED_TYPE_MESSAGE)
        })?;
    Ok(Form::new().part(IMAGE_FIELD, part))
}

#[async_trait]
impl CaptionService for HttpCaptionClient {
    async fn caption(&self, request: &UploadRequest) -> CaptionResult<String> {
        let form = multipart_form(&request.image)?;

        tracing::debug!(
            endpoint = %self.endpoint,
            file = request.image.name(),
            size = request.image.size(),
            "sending caption request"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &request.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                CaptionError::transport("send_request", e)
                    .with_metadata("endpoint", self.endpoint.clone())
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            CaptionError::transport("read_response", e)
                .with_metadata("http_status", status.as_str())
        })?;
        tracing::debug!(http_status = %status, bytes = body.len(), "caption service responded");

        ServiceResponse::from_slice(&body)
            .map_err(|e| e.with_metadata("http_status", status.as_str()))?
            .into_caption()
    }
}
