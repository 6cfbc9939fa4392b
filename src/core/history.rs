//! # Caption History
//!
//! A bounded, most-recent-first list of successful captions. It lives for the
//! process only. Capacity is fixed at construction and inserting into a full
//! history evicts the oldest entry, so the length never exceeds the capacity.

use std::collections::VecDeque;
use std::sync::Arc;

use serde::Serialize;

use super::preview::Preview;

/// Number of entries kept by [`History::default`].
pub const HISTORY_CAPACITY: usize = 10;

/// One successful caption.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Creation time in milliseconds since the Unix epoch.
    pub id: i64,
    /// URL of the preview the caption was generated for.
    pub image_url: String,
    pub caption: String,
    #[serde(skip)]
    preview: Arc<Preview>,
}

impl HistoryEntry {
    pub fn new(preview: Arc<Preview>, caption: impl Into<String>) -> Self {
        Self {
            id: chrono::Utc::now().timestamp_millis(),
            image_url: preview.url().to_string(),
            caption: caption.into(),
            preview,
        }
    }

    /// The preview this entry keeps alive
    pub fn preview(&self) -> &Arc<Preview> {
        &self.preview
    }
}

/// Fixed-capacity history, newest first.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl History {
    /// Create an empty history. A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert `entry` at the front, evicting the oldest entry when full.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        if self.entries.len() > self.capacity {
            if let Some(evicted) = self.entries.pop_back() {
                tracing::debug!(image_url = %evicted.image_url, "evicted history entry");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entry at `index`, 0 being the most recent
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    /// Entries from newest to oldest
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a HistoryEntry;
    type IntoIter = std::collections::vec_deque::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
