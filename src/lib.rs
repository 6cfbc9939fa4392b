//! # Image Caption Library
//!
//! A small client for a third-party image-captioning API: pick an image,
//! upload it, show the caption, keep a short history of results.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//! - `core`: Image files and their acceptance rules, previews, caption history
//! - `state`: Application state, events and the pure transition function
//! - `service`: The captioning HTTP contract (multipart upload, JSON response)
//! - `session`: The `CaptionApp` controller tying state, service and clipboard together
//! - `view`: Toolkit-independent presentation model
//! - `config`: Endpoint and credential configuration
//! - `error`: Error taxonomy and user-facing messages
//!
//! Two front ends sit on top: the `caption` CLI in this crate and the egui
//! desktop application in the `desktop-app` workspace member.
//!
//! ## Example
//!
//! ```rust,no_run
//! use image_caption::{CaptionApp, CaptionConfig, ImageFile};
//! use image_caption::state::AppEvent;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CaptionConfig::default().with_api_key("my-key");
//! let mut app = CaptionApp::builder().with_config(config).build()?;
//!
//! app.dispatch(AppEvent::FileSelected(ImageFile::from_path("photo.jpg")?));
//! let state = app.generate().await;
//!
//! match state.error() {
//!     Some(message) => eprintln!("{}", message),
//!     None => println!("{}", state.caption().unwrap_or_default()),
//! }
//! # Ok(())
//! # }
//! ```

pub mod clipboard;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod service;
pub mod session;
pub mod state;
pub mod view;

pub use crate::config::{CaptionConfig, Credential};
pub use crate::core::{History, HistoryEntry, ImageFile, Preview};
pub use crate::error::{CaptionError, CaptionResult, ErrorSeverity, HasSeverity};
pub use crate::session::{CaptionApp, CaptionAppBuilder, PendingRequest};
pub use crate::state::{AppEvent, AppState, RequestStatus};
pub use crate::view::ViewModel;
