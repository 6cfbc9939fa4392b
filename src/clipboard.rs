//! Clipboard sinks for the copy action.
//!
//! Copying is fire-and-forget: [`crate::session::CaptionApp`] traces a failed
//! write and carries on, so sinks just report what went wrong.

use anyhow::Result;

/// Somewhere caption text can be copied to.
pub trait ClipboardSink {
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// The operating system clipboard.
///
/// The underlying handle is opened on first use and kept for the lifetime of
/// the sink. On X11 and Wayland the copied text is only served while some
/// process owns it, so a short-lived process should use
/// [`SystemClipboard::holding`].
#[cfg(feature = "system-clipboard")]
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
    hold: bool,
}

#[cfg(feature = "system-clipboard")]
impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink for processes that exit right after copying.
    ///
    /// On X11 and Wayland each write blocks until another application takes
    /// over the clipboard. Elsewhere the clipboard keeps the text by itself
    /// and this behaves like [`SystemClipboard::new`].
    pub fn holding() -> Self {
        Self {
            hold: true,
            ..Self::default()
        }
    }

    pub fn holds_until_replaced(&self) -> bool {
        self.hold
    }
}

#[cfg(feature = "system-clipboard")]
impl ClipboardSink for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        if self.inner.is_none() {
            self.inner = Some(arboard::Clipboard::new()?);
        }
        let Some(clipboard) = self.inner.as_mut() else {
            return Ok(());
        };

        #[cfg(all(
            unix,
            not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
        ))]
        if self.hold {
            use arboard::SetExtLinux;

            tracing::debug!("holding clipboard until another application takes it");
            clipboard.set().wait().text(text.to_string())?;
            return Ok(());
        }

        clipboard.set_text(text.to_string())?;
        Ok(())
    }
}

/// Discards everything. Used when no system clipboard is compiled in.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopClipboard;

impl ClipboardSink for NoopClipboard {
    fn write_text(&mut self, _text: &str) -> Result<()> {
        tracing::debug!("clipboard support not compiled in; copy dropped");
        Ok(())
    }
}

/// The default sink for this build.
pub fn default_clipboard() -> Box<dyn ClipboardSink> {
    #[cfg(feature = "system-clipboard")]
    return Box::new(SystemClipboard::new());

    #[cfg(not(feature = "system-clipboard"))]
    return Box::new(NoopClipboard);
}
