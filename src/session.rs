//! # Caption Session
//!
//! [`CaptionApp`] is the single controller of the application. It owns the
//! [`AppState`], runs every event through the pure transition function and
//! performs the side effects the transition asks for.
//!
//! ## Request flow
//!
//! The network call is the only suspension point, and the controller never
//! awaits it while holding on to the UI. Dispatching
//! [`AppEvent::GenerateRequested`] returns a [`PendingRequest`]; the caller
//! decides how to run it:
//!
//! - the CLI and tests simply `.await` it (or use [`CaptionApp::generate`]);
//! - the desktop application spawns it on a tokio runtime and sends the
//!   result back to the UI thread over a channel.
//!
//! Either way the result comes back through [`CaptionApp::complete`], which is
//! what resets `Loading`.
//!
//! ```rust,no_run
//! use image_caption::config::CaptionConfig;
//! use image_caption::core::ImageFile;
//! use image_caption::session::CaptionApp;
//! use image_caption::state::AppEvent;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut app = CaptionApp::builder()
//!     .with_config(CaptionConfig::default().with_api_key("my-key"))
//!     .build()?;
//!
//! app.dispatch(AppEvent::FileSelected(ImageFile::from_path("photo.jpg")?));
//! let state = app.generate().await;
//! println!("{:?}", state.caption());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use crate::clipboard::{ClipboardSink, default_clipboard};
use crate::config::CaptionConfig;
use crate::error::{CaptionError, CaptionResult, HasSeverity};
use crate::service::{CaptionService, HttpCaptionClient};
use crate::state::{AppEvent, AppState, Command, UploadRequest, transition};
use crate::view::ViewModel;

/// A caption request that has been decided on but not yet sent.
///
/// Owns everything it needs, so it can be moved to another task.
pub struct PendingRequest {
    service: Arc<dyn CaptionService>,
    request: UploadRequest,
}

impl PendingRequest {
    pub fn request(&self) -> &UploadRequest {
        &self.request
    }

    /// Send the request and wait for the outcome.
    pub async fn send(self) -> CaptionResult<String> {
        self.service.caption(&self.request).await
    }
}

/// The application controller.
pub struct CaptionApp {
    state: AppState,
    config: CaptionConfig,
    service: Arc<dyn CaptionService>,
    clipboard: Box<dyn ClipboardSink>,
}

impl CaptionApp {
    /// Create a new app using the builder pattern.
    pub fn builder() -> CaptionAppBuilder {
        CaptionAppBuilder::new()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &CaptionConfig {
        &self.config
    }

    /// What to draw right now
    pub fn view(&self) -> ViewModel<'_> {
        ViewModel::from_state(&self.state)
    }

    /// Apply an event.
    ///
    /// Clipboard writes happen immediately. An upload is returned for the
    /// caller to run; until its result is passed to [`CaptionApp::complete`]
    /// the state stays `Loading`.
    pub fn dispatch(&mut self, event: AppEvent) -> Option<PendingRequest> {
        let state = std::mem::take(&mut self.state);
        let (next, command) = transition(state, event, &self.config.credential);
        self.state = next;

        match command? {
            Command::CopyToClipboard(text) => {
                if let Err(e) = self.clipboard.write_text(&text) {
                    tracing::warn!(error = %e, "copy to clipboard failed");
                }
                None
            }
            Command::Upload(request) => Some(PendingRequest {
                service: Arc::clone(&self.service),
                request,
            }),
        }
    }

    /// Feed the outcome of a [`PendingRequest`] back in.
    pub fn complete(&mut self, result: CaptionResult<String>) {
        if let Err(err) = &result {
            trace_failure(err);
        }
        // Completion never produces a command.
        let _ = self.dispatch(AppEvent::CaptionReceived(result));
    }

    /// Request a caption for the current image and wait for it.
    ///
    /// Does nothing beyond the state change when there is no image or no
    /// credential.
    pub async fn generate(&mut self) -> &AppState {
        if let Some(pending) = self.dispatch(AppEvent::GenerateRequested) {
            let result = pending.send().await;
            self.complete(result);
        }
        &self.state
    }
}

fn trace_failure(err: &CaptionError) {
    match err {
        CaptionError::Transport { .. } => tracing::error!(error = %err, "API Error"),
        _ => tracing::debug!(
            category = err.category(),
            severity = ?err.severity(),
            error = %err,
            "caption request failed"
        ),
    }
}

/// Builder for [`CaptionApp`].
pub struct CaptionAppBuilder {
    config: Option<CaptionConfig>,
    service: Option<Arc<dyn CaptionService>>,
    clipboard: Option<Box<dyn ClipboardSink>>,
}

impl Default for CaptionAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptionAppBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            service: None,
            clipboard: None,
        }
    }

    /// Use `config` instead of the build-time defaults.
    pub fn with_config(mut self, config: CaptionConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use a custom captioning service instead of the HTTP client.
    pub fn with_service(mut self, service: Arc<dyn CaptionService>) -> Self {
        self.service = Some(service);
        self
    }

    /// Use a custom clipboard sink.
    pub fn with_clipboard(mut self, clipboard: Box<dyn ClipboardSink>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    /// Validate the configuration and build the app.
    pub fn build(self) -> CaptionResult<CaptionApp> {
        let config = self.config.unwrap_or_default();
        let service: Arc<dyn CaptionService> = match self.service {
            Some(service) => {
                config.validate()?;
                service
            }
            None => Arc::new(HttpCaptionClient::from_config(&config)?),
        };
        let clipboard = self.clipboard.unwrap_or_else(default_clipboard);

        tracing::debug!(
            endpoint = %config.endpoint,
            credential_configured = config.credential.is_configured(),
            "caption app ready"
        );

        Ok(CaptionApp {
            state: AppState::default(),
            config,
            service,
            clipboard,
        })
    }
}
