//! # Core Data Model
//!
//! The values the application juggles: user-supplied image files and their
//! acceptance rules, the previews derived from them, and the bounded caption
//! history.

pub mod history;
pub mod image_file;
pub mod preview;

pub use history::{HISTORY_CAPACITY, History, HistoryEntry};
pub use image_file::{ImageFile, MAX_IMAGE_BYTES, TOO_LARGE_MESSAGE, UNSUPPORTED_TYPE_MESSAGE};
pub use preview::{Preview, THUMBNAIL_EDGE, Thumbnail};
