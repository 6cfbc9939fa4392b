//! # Captioning Service Module
//!
//! The outbound HTTP contract: request construction and response interpretation.

pub mod client;
pub mod response;

pub use client::{API_KEY_HEADER, CaptionService, HttpCaptionClient, IMAGE_FIELD};
pub use response::{NO_CAPTION_FALLBACK, ServiceResponse};
