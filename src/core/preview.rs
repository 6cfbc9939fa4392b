//! # Image Previews
//!
//! Every accepted selection gets a [`Preview`]: a unique `preview://` URL and,
//! when the bytes decode, a small RGBA thumbnail for display. The thumbnail is
//! decoded on first request, so front ends that never draw it never pay for
//! it; the source bytes are let go once decoding has happened.
//!
//! Previews are shared through `Arc`. The current selection holds one
//! reference and every history entry generated from that selection holds
//! another, so the thumbnail memory is released exactly when the last holder
//! lets go: when the image is replaced or cleared and no history entry still
//! shows it, or when the entry is evicted from history.

use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use uuid::Uuid;

use super::image_file::ImageFile;

/// Longest edge of a decoded thumbnail, in pixels.
pub const THUMBNAIL_EDGE: u32 = 256;

/// Decoded thumbnail pixels, tightly packed RGBA8.
#[derive(Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl fmt::Debug for Thumbnail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Thumbnail({}x{})", self.width, self.height)
    }
}

/// Display handle for one selected image.
#[derive(Debug)]
pub struct Preview {
    url: String,
    /// Image to decode, until the thumbnail has been produced.
    source: Mutex<Option<Arc<ImageFile>>>,
    thumbnail: OnceLock<Option<Thumbnail>>,
}

impl Preview {
    /// Create a preview for `file`. Nothing is decoded yet.
    pub fn from_image(file: &Arc<ImageFile>) -> Self {
        Self {
            url: format!("preview://{}/{}", Uuid::new_v4(), file.name()),
            source: Mutex::new(Some(Arc::clone(file))),
            thumbnail: OnceLock::new(),
        }
    }

    /// URL identifying this preview, unique for the process lifetime.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The thumbnail, decoding it on first call.
    ///
    /// A file whose bytes do not decode has no thumbnail; front ends fall
    /// back to showing the file name. Concurrent callers wait for a single
    /// decode.
    pub fn thumbnail(&self) -> Option<&Thumbnail> {
        self.thumbnail
            .get_or_init(|| {
                let source = self.source.lock().ok().and_then(|mut source| source.take());
                let thumbnail = source.and_then(|file| decode_thumbnail(file.bytes()));
                if thumbnail.is_none() {
                    tracing::debug!(url = %self.url, "no thumbnail for preview");
                }
                thumbnail
            })
            .as_ref()
    }

    /// The thumbnail if it has already been decoded. Never blocks.
    pub fn ready_thumbnail(&self) -> Option<&Thumbnail> {
        self.thumbnail.get().and_then(Option::as_ref)
    }
}

impl Drop for Preview {
    fn drop(&mut self) {
        tracing::trace!(url = %self.url, "released preview");
    }
}

fn decode_thumbnail(bytes: &[u8]) -> Option<Thumbnail> {
    let image = image::load_from_memory(bytes).ok()?;
    let rgba = image.thumbnail(THUMBNAIL_EDGE, THUMBNAIL_EDGE).to_rgba8();
    Some(Thumbnail {
        width: rgba.width(),
        height: rgba.height(),
        rgba: rgba.into_raw(),
    })
}
