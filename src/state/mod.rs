//! # Application State Machine
//!
//! State, events and the pure transition function between them.

pub mod event;
pub mod state;
pub mod transition;

pub use event::{AppEvent, Command, UploadRequest};
pub use state::{AppState, RequestStatus, SelectedImage};
pub use transition::transition;
