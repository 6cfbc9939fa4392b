//! Shared helpers for the integration tests: sample images, a recording
//! clipboard and apps wired to a wiremock server.
#![allow(dead_code)]

use std::io::Cursor;
use std::sync::{Arc, Mutex};

use image::{ImageFormat, Rgb, RgbImage};
use image_caption::CaptionApp;
use image_caption::clipboard::ClipboardSink;
use image_caption::config::{CaptionConfig, Credential};
use image_caption::core::ImageFile;
use serde_json::{Value, json};
use wiremock::MockServer;

pub const API_KEY: &str = "test-key";
pub const CAPTION_PATH: &str = "/v1/imagecaption";

/// A real PNG, so previews get a thumbnail.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 128]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).expect("encode png");
    out.into_inner()
}

pub fn png_image(name: &str) -> ImageFile {
    ImageFile::new(name, "image/png", png_bytes(32, 24))
}

/// Declared as JPEG, filled with ASCII so request bodies can be matched as text.
pub fn ascii_jpeg(name: &str, size: usize) -> ImageFile {
    ImageFile::new(name, "image/jpeg", vec![b'x'; size])
}

pub fn ok_body(caption: &str) -> Value {
    json!({ "status": "ok", "data": { "caption": caption } })
}

pub fn error_body(message: &str) -> Value {
    json!({ "status": "error", "error": message })
}

pub fn endpoint(server: &MockServer) -> String {
    format!("{}{}", server.uri(), CAPTION_PATH)
}

/// Clipboard that remembers what was written to it.
#[derive(Clone, Default)]
pub struct RecordingClipboard {
    pub writes: Arc<Mutex<Vec<String>>>,
}

impl RecordingClipboard {
    pub fn last(&self) -> Option<String> {
        self.writes.lock().unwrap().last().cloned()
    }
}

impl ClipboardSink for RecordingClipboard {
    fn write_text(&mut self, text: &str) -> anyhow::Result<()> {
        self.writes.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// App talking to `server` over HTTP with `credential`.
pub fn app_with_credential(
    server: &MockServer,
    credential: Credential,
) -> (CaptionApp, RecordingClipboard) {
    let clipboard = RecordingClipboard::default();
    let app = CaptionApp::builder()
        .with_config(CaptionConfig::new(endpoint(server), credential))
        .with_clipboard(Box::new(clipboard.clone()))
        .build()
        .expect("valid test config");
    (app, clipboard)
}

pub fn app_for(server: &MockServer) -> (CaptionApp, RecordingClipboard) {
    app_with_credential(server, Credential::ApiKey(API_KEY.to_string()))
}
