//! # State Transitions
//!
//! The whole behaviour of the application as one pure function:
//! `(state, event) -> (state, optional command)`. No I/O happens here; the
//! caller performs the returned [`Command`] and, for uploads, feeds the
//! outcome back as [`AppEvent::CaptionReceived`].
//!
//! ```text
//!            GenerateRequested              CaptionReceived(Ok)
//!   Idle ───────────────────────▶ Loading ─────────────────────▶ Success
//!     ▲                              │
//!     │ FileSelected / ImageCleared  │ CaptionReceived(Err)
//!     └──────────────────────────────┴──────────────────────────▶ Error
//! ```
//!
//! Error and Success are display states only; a new generation can start from
//! either. While Loading, events that would change the image are ignored so
//! the outstanding request always completes against the image it was sent for.

use std::sync::Arc;

use crate::config::Credential;
use crate::core::{HistoryEntry, ImageFile};
use crate::error::{CaptionError, CaptionResult};

use super::event::{AppEvent, Command, UploadRequest};
use super::state::{AppState, RequestStatus, SelectedImage};

/// Apply `event` to `state`.
pub fn transition(
    state: AppState,
    event: AppEvent,
    credential: &Credential,
) -> (AppState, Option<Command>) {
    match event {
        AppEvent::FileSelected(file) => (select(state, file), None),
        AppEvent::FileDropped(files) => match files.into_iter().next() {
            Some(file) => (select(state, file), None),
            None => (state, None),
        },
        AppEvent::IntakeFailed(err) => (intake_failed(state, err), None),
        AppEvent::GenerateRequested => generate(state, credential),
        AppEvent::ImageCleared => (clear(state), None),
        AppEvent::CaptionCopied => {
            let command = state.caption.clone().map(Command::CopyToClipboard);
            (state, command)
        }
        AppEvent::CaptionReceived(result) => (receive(state, result), None),
    }
}

fn select(mut state: AppState, file: ImageFile) -> AppState {
    if state.status.is_loading() {
        tracing::debug!(file = file.name(), "ignoring selection while a request is in flight");
        return state;
    }

    match file.validate() {
        Ok(()) => {
            tracing::debug!(file = file.name(), size = file.size(), "image selected");
            state.selected = Some(SelectedImage::new(file));
            state.caption = None;
            state.status = RequestStatus::Idle;
        }
        Err(err) => {
            tracing::debug!(error = %err, "image rejected");
            state.status = RequestStatus::Error(err.user_message());
        }
    }
    state
}

fn intake_failed(mut state: AppState, err: CaptionError) -> AppState {
    if !state.status.is_loading() {
        tracing::debug!(error = %err, "image intake failed");
        state.status = RequestStatus::Error(err.user_message());
    }
    state
}

fn generate(mut state: AppState, credential: &Credential) -> (AppState, Option<Command>) {
    let image = match state.selected.as_ref() {
        Some(selected) => Arc::clone(selected.file()),
        None => return (state, None),
    };
    if state.status.is_loading() {
        return (state, None);
    }

    let api_key = match credential.require() {
        Ok(key) => key.to_string(),
        Err(err) => {
            state.status = RequestStatus::Error(err.user_message());
            return (state, None);
        }
    };

    state.caption = None;
    state.status = RequestStatus::Loading;
    (state, Some(Command::Upload(UploadRequest { image, api_key })))
}

fn clear(mut state: AppState) -> AppState {
    if state.status.is_loading() {
        tracing::debug!("ignoring clear while a request is in flight");
        return state;
    }
    state.selected = None;
    state.caption = None;
    state.status = RequestStatus::Idle;
    state
}

fn receive(mut state: AppState, result: CaptionResult<String>) -> AppState {
    if !state.status.is_loading() {
        tracing::warn!("caption result arrived with no request in flight; dropped");
        return state;
    }

    match result {
        Ok(caption) => {
            if let Some(selected) = &state.selected {
                state
                    .history
                    .push(HistoryEntry::new(Arc::clone(selected.preview()), caption.clone()));
            }
            state.caption = Some(caption);
            state.status = RequestStatus::Success;
        }
        Err(err) => {
            state.status = RequestStatus::Error(err.user_message());
        }
    }
    state
}
