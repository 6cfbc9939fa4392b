//! # Configuration Module
//!
//! Endpoint and credential configuration shared by the CLI and the desktop application.

pub mod config;

pub use config::{
    CaptionConfig, Credential, DEFAULT_ENDPOINT, MISSING_CREDENTIAL_MESSAGE, PLACEHOLDER_API_KEY,
};
