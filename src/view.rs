//! # Presentation Model
//!
//! Everything a front end needs to draw the application, derived from
//! [`AppState`] without reference to any UI toolkit. The desktop application
//! renders it with egui; the CLI reads the caption and error out of it.
//!
//! ## Layout
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ AI Image Caption                     │  header
//! │ Generate intelligent captions ...    │
//! ├──────────────────────────────────────┤
//! │ [ upload area ]  or  [ preview  × ]  │  one of the two
//! │ [ ✨ Generate Caption ]              │  disabled without image / while loading
//! │ error slot                           │  latest error only
//! │ Generated Caption          [Copy]    │  only with a caption
//! ├──────────────────────────────────────┤
//! │ Recent Captions: grid of history     │  only with history
//! ├──────────────────────────────────────┤
//! │ Powered by APIVerve Image Caption API│  footer
//! └──────────────────────────────────────┘
//! ```

use crate::core::Preview;
use crate::state::AppState;

pub const TITLE: &str = "AI Image Caption";
pub const SUBTITLE: &str = "Generate intelligent captions for any image";
pub const UPLOAD_PROMPT: &str = "Drop an image here or browse";
pub const UPLOAD_HINT: &str = "Supports JPG, PNG, GIF (max 5MB)";
pub const GENERATE_LABEL: &str = "✨ Generate Caption";
pub const LOADING_LABEL: &str = "Analyzing Image...";
pub const RESULT_HEADING: &str = "Generated Caption";
pub const COPY_LABEL: &str = "Copy";
pub const HISTORY_HEADING: &str = "Recent Captions";
pub const FOOTER_TEXT: &str = "Powered by APIVerve Image Caption API";
pub const FOOTER_URL: &str = "https://apiverve.com/marketplace/imagecaption";

/// One tile of the history grid.
#[derive(Debug, Clone, Copy)]
pub struct HistoryItem<'a> {
    pub id: i64,
    pub image_url: &'a str,
    pub caption: &'a str,
    /// Decoded on demand; see [`Preview::thumbnail`].
    pub preview: &'a Preview,
}

/// Snapshot of what should be on screen.
#[derive(Debug, Clone)]
pub struct ViewModel<'a> {
    /// Preview of the current image; the upload area shows when absent.
    pub preview: Option<&'a Preview>,
    /// Name of the current image
    pub file_name: Option<&'a str>,
    pub generate_enabled: bool,
    pub generate_label: &'static str,
    pub loading: bool,
    pub error: Option<&'a str>,
    pub caption: Option<&'a str>,
    pub history: Vec<HistoryItem<'a>>,
}

impl<'a> ViewModel<'a> {
    pub fn from_state(state: &'a AppState) -> Self {
        let loading = state.is_loading();
        let selected = state.selected();
        Self {
            preview: selected.map(|s| s.preview().as_ref()),
            file_name: selected.map(|s| s.file().name()),
            generate_enabled: selected.is_some() && !loading,
            generate_label: if loading { LOADING_LABEL } else { GENERATE_LABEL },
            loading,
            error: state.error(),
            caption: state.caption(),
            history: state
                .history()
                .iter()
                .map(|entry| HistoryItem {
                    id: entry.id,
                    image_url: &entry.image_url,
                    caption: &entry.caption,
                    preview: entry.preview(),
                })
                .collect(),
        }
    }

    pub fn show_upload_area(&self) -> bool {
        self.preview.is_none()
    }

    pub fn show_result(&self) -> bool {
        self.caption.is_some()
    }

    pub fn show_history(&self) -> bool {
        !self.history.is_empty()
    }
}
