//! # Service Response Interpretation
//!
//! The captioning API answers with JSON shaped like
//!
//! ```json
//! { "status": "ok", "data": { "caption": "a dog on a beach" } }
//! { "status": "error", "error": "invalid image" }
//! ```
//!
//! Any JSON body is a service answer, whatever its shape. A body counts as a
//! success only when `status` is `"ok"` and `data` is truthy (not `null`,
//! `false`, `0` or `""`). The caption comes from `data.caption`, then
//! `data.text`, then [`NO_CAPTION_FALLBACK`]. Anything else is a service
//! failure carrying the `error` string, if any.
//! Only bodies that are not JSON at all, or are JSON `null`, count as
//! transport failures.

use serde_json::Value;

use crate::error::{CaptionError, CaptionResult};

/// Status value the service uses for success.
pub const STATUS_OK: &str = "ok";

/// Caption used when the service succeeds without returning any text.
pub const NO_CAPTION_FALLBACK: &str = "No caption generated";

/// A parsed response body.
#[derive(Debug, Clone)]
pub struct ServiceResponse {
    body: Value,
}

impl ServiceResponse {
    /// Parse a response body.
    pub fn from_slice(body: &[u8]) -> CaptionResult<Self> {
        let body: Value = serde_json::from_slice(body)?;
        if body.is_null() {
            return Err(CaptionError::transport_failed("decode_response")
                .with_metadata("body", "null"));
        }
        Ok(Self { body })
    }

    pub fn status(&self) -> Option<&str> {
        self.body.get("status").and_then(Value::as_str)
    }

    pub fn is_ok(&self) -> bool {
        self.status() == Some(STATUS_OK)
    }

    /// Turn the response into a caption or a service error.
    pub fn into_caption(self) -> CaptionResult<String> {
        match self.body.get("data") {
            Some(data) if self.is_ok() && is_truthy(data) => {
                let caption = non_empty_str(data.get("caption"))
                    .or_else(|| non_empty_str(data.get("text")))
                    .unwrap_or(NO_CAPTION_FALLBACK);
                Ok(caption.to_string())
            }
            _ => Err(CaptionError::service(
                non_empty_str(self.body.get("error")).map(str::to_string),
            )),
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SERVICE_FAILURE_FALLBACK;

    fn caption_of(body: &str) -> CaptionResult<String> {
        ServiceResponse::from_slice(body.as_bytes())?.into_caption()
    }

    #[test]
    fn test_caption_field() {
        let caption = caption_of(r#"{"status":"ok","data":{"caption":"a dog on a beach"}}"#);
        assert_eq!(caption.unwrap(), "a dog on a beach");
    }

    #[test]
    fn test_caption_preferred_over_text() {
        let caption = caption_of(r#"{"status":"ok","data":{"text":"second","caption":"first"}}"#);
        assert_eq!(caption.unwrap(), "first");
    }

    #[test]
    fn test_text_fallback() {
        assert_eq!(
            caption_of(r#"{"status":"ok","data":{"text":"from text"}}"#).unwrap(),
            "from text"
        );
        assert_eq!(
            caption_of(r#"{"status":"ok","data":{"caption":"","text":"from text"}}"#).unwrap(),
            "from text"
        );
    }

    #[test]
    fn test_no_usable_field() {
        for body in [
            r#"{"status":"ok","data":{}}"#,
            r#"{"status":"ok","data":{"caption":null,"text":""}}"#,
            r#"{"status":"ok","data":{"caption":42}}"#,
        ] {
            assert_eq!(caption_of(body).unwrap(), NO_CAPTION_FALLBACK, "body {body}");
        }
    }

    #[test]
    fn test_service_error_message() {
        let error = caption_of(r#"{"status":"error","error":"invalid image"}"#).unwrap_err();
        assert_eq!(error.category(), "service");
        assert_eq!(error.user_message(), "invalid image");
    }

    #[test]
    fn test_service_error_without_message() {
        for body in [
            r#"{"status":"error"}"#,
            r#"{"status":"error","error":""}"#,
            r#"{"status":"ok"}"#,
            r#"{"status":"ok","data":null}"#,
            r#"{}"#,
        ] {
            let error = caption_of(body).unwrap_err();
            assert_eq!(error.user_message(), SERVICE_FAILURE_FALLBACK, "body {body}");
        }
    }

    #[test]
    fn test_unparseable_body_is_transport_error() {
        for body in ["<html>502 Bad Gateway</html>", "", "null"] {
            let error = caption_of(body).unwrap_err();
            assert_eq!(error.category(), "transport", "body {body:?}");
        }
    }

    #[test]
    fn test_non_object_json_is_service_failure() {
        for body in [r#""just a string""#, "42", "true", r#"["ok",{"caption":"x"}]"#] {
            let error = caption_of(body).unwrap_err();
            assert_eq!(error.category(), "service", "body {body}");
            assert_eq!(error.user_message(), SERVICE_FAILURE_FALLBACK, "body {body}");
        }
    }

    #[test]
    fn test_falsy_data_is_service_failure() {
        for data in ["false", "0", "0.0", r#""""#] {
            let body = format!(r#"{{"status":"ok","data":{data},"error":"no data"}}"#);
            let error = caption_of(&body).unwrap_err();
            assert_eq!(error.user_message(), "no data", "data {data}");
        }
    }

    #[test]
    fn test_truthy_scalar_data_uses_placeholder() {
        for data in ["true", "1", r#""text""#, "[]"] {
            let body = format!(r#"{{"status":"ok","data":{data}}}"#);
            assert_eq!(caption_of(&body).unwrap(), NO_CAPTION_FALLBACK, "data {data}");
        }
    }

    #[test]
    fn test_is_ok() {
        let ok = ServiceResponse::from_slice(br#"{"status":"ok"}"#).unwrap();
        assert!(ok.is_ok());
        let failed = ServiceResponse::from_slice(br#"{"status":"OK"}"#).unwrap();
        assert!(!failed.is_ok());
    }
}
