//! # Image Files
//!
//! An [`ImageFile`] is what a file picker or drop surface hands the
//! application: a file name, a MIME type and the raw bytes. Nothing is decoded
//! here; acceptance is decided on the declared type and the size alone.
//!
//! ## Acceptance rules
//!
//! 1. The MIME type must start with `image/` ("Please select an image file").
//! 2. The file must be at most [`MAX_IMAGE_BYTES`] (5 MiB) ("Image must be less than 5MB").
//!
//! The type check runs first, so an oversized text file reports the type problem.
//! [`ImageFile::from_path`] applies the same rules before reading the file body.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{CaptionError, CaptionResult};

/// Largest accepted upload: 5 MiB.
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

pub const UNSUPPORTED_TYPE_MESSAGE: &str = "Please select an image file";
pub const TOO_LARGE_MESSAGE: &str = "Image must be less than 5MB";

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Enough leading bytes for `image::guess_format` to recognise any format.
const HEADER_LEN: u64 = 64;

/// A user-supplied file, as received from a picker or drop.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, inferring its MIME type.
    ///
    /// The type comes from the extension when it names an image format, and
    /// from the file's leading bytes otherwise. The acceptance rules are
    /// applied to the type and the on-disk size before the body is read, so
    /// a rejected file is never loaded into memory.
    pub fn from_path(path: impl AsRef<Path>) -> CaptionResult<Self> {
        let path = path.as_ref();
        let io_error = |e: std::io::Error| {
            CaptionError::io("read_image", e).with_path(path.display().to_string())
        };

        let mut file = File::open(path).map_err(io_error)?;
        let size = file.metadata().map_err(io_error)?.len();

        let mut bytes = Vec::with_capacity(HEADER_LEN as usize);
        (&mut file)
            .take(HEADER_LEN)
            .read_to_end(&mut bytes)
            .map_err(io_error)?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime_type = sniff_mime_type(Some(path), &bytes);
        check_acceptance(&name, mime_type, size)?;

        bytes.reserve(size.saturating_sub(HEADER_LEN) as usize);
        file.read_to_end(&mut bytes).map_err(io_error)?;
        Ok(Self::new(name, mime_type, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size in bytes
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Check the file against the acceptance rules.
    pub fn validate(&self) -> CaptionResult<()> {
        check_acceptance(&self.name, &self.mime_type, self.size())
    }
}

fn check_acceptance(name: &str, mime_type: &str, size: u64) -> CaptionResult<()> {
    if !mime_type.starts_with("image/") {
        return Err(
            CaptionError::validation("mime_type", mime_type, UNSUPPORTED_TYPE_MESSAGE)
                .with_metadata("file_name", name),
        );
    }
    if size > MAX_IMAGE_BYTES {
        return Err(
            CaptionError::validation("size", size.to_string(), TOO_LARGE_MESSAGE)
                .with_metadata("file_name", name),
        );
    }
    Ok(())
}

impl fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Best-effort MIME type for a file: extension first, then content sniffing.
pub fn sniff_mime_type(path: Option<&Path>, bytes: &[u8]) -> &'static str {
    path.and_then(|p| image::ImageFormat::from_path(p).ok())
        .or_else(|| image::guess_format(bytes).ok())
        .map(|format| format.to_mime_type())
        .unwrap_or(FALLBACK_MIME_TYPE)
}
