//! Inputs to and outputs of the state machine.

use std::fmt;
use std::sync::Arc;

use crate::core::ImageFile;
use crate::error::{CaptionError, CaptionResult};

/// Everything that can happen to the application.
#[derive(Debug)]
pub enum AppEvent {
    /// A file was chosen through the picker.
    FileSelected(ImageFile),
    /// Files were dropped on the drop surface; only the first is used.
    FileDropped(Vec<ImageFile>),
    /// A picked or dropped file could not be read.
    IntakeFailed(CaptionError),
    /// The user asked for a caption of the current image.
    GenerateRequested,
    /// The user cleared the current image.
    ImageCleared,
    /// The user asked to copy the current caption.
    CaptionCopied,
    /// The outstanding caption request finished.
    CaptionReceived(CaptionResult<String>),
}

/// Side effects requested by a transition, performed by the caller.
#[derive(Debug)]
pub enum Command {
    /// Send the image to the captioning service.
    Upload(UploadRequest),
    /// Put the text on the system clipboard.
    CopyToClipboard(String),
}

/// Everything needed to issue one caption request.
#[derive(Clone)]
pub struct UploadRequest {
    pub image: Arc<ImageFile>,
    pub api_key: String,
}

impl fmt::Debug for UploadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadRequest")
            .field("image", &self.image)
            .field("api_key", &"<redacted>")
            .finish()
    }
}
