//! Application state owned by [`crate::session::CaptionApp`].

use std::sync::Arc;

use crate::core::{History, ImageFile, Preview};

/// Where the current generation cycle stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestStatus {
    #[default]
    Idle,
    /// A caption request is outstanding.
    Loading,
    /// The last action failed; the message is what the user sees.
    Error(String),
    /// The last caption request succeeded.
    Success,
}

impl RequestStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The visible error message, if the status is an error.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// The image currently chosen by the user, with its preview.
#[derive(Debug, Clone)]
pub struct SelectedImage {
    file: Arc<ImageFile>,
    preview: Arc<Preview>,
}

impl SelectedImage {
    /// Take ownership of an accepted file and attach a preview to it.
    pub fn new(file: ImageFile) -> Self {
        let file = Arc::new(file);
        let preview = Arc::new(Preview::from_image(&file));
        Self { file, preview }
    }

    pub fn file(&self) -> &Arc<ImageFile> {
        &self.file
    }

    pub fn preview(&self) -> &Arc<Preview> {
        &self.preview
    }
}

/// Everything the user can see, and nothing else.
///
/// Fields are only changed by [`super::transition::transition`], which keeps
/// the invariants: at most one selected image, a bounded history, and
/// `Loading` only while a request is outstanding.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub(crate) selected: Option<SelectedImage>,
    pub(crate) caption: Option<String>,
    pub(crate) status: RequestStatus,
    pub(crate) history: History,
}

impl AppState {
    pub fn selected(&self) -> Option<&SelectedImage> {
        self.selected.as_ref()
    }

    /// The caption for the current image, if one has been generated.
    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    pub fn status(&self) -> &RequestStatus {
        &self.status
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.status.error_message()
    }
}
