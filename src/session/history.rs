//! Per-session request history
//!
//! Append-only log of routed prompts, kept newest first and capped at a
//! configurable number of entries.

use crate::providers::ProviderId;
use crate::router::{IntentCategory, RoutingDecision};
use crate::shared::text::preview;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of entries kept per session
pub const DEFAULT_MAX_ENTRIES: usize = 10;
/// Default prompt preview length in characters
pub const DEFAULT_PREVIEW_CHARS: usize = 60;

/// One routed prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Prompt preview (truncated, with `...` when cut)
    pub prompt: String,
    /// Display name of the provider that answered
    pub agent: String,
    pub provider: ProviderId,
    pub category: IntentCategory,
    /// Local time of day (`HH:MM:SS`)
    pub timestamp: String,
    pub routing_reason: String,
    pub fallback: bool,
    /// Full timestamp with offset
    pub recorded_at: DateTime<Local>,
}

/// Bounded, newest-first history log
#[derive(Debug, Clone)]
pub struct RequestHistory {
    entries: VecDeque<HistoryEntry>,
    max_entries: usize,
    preview_chars: usize,
}

impl RequestHistory {
    pub fn new(max_entries: usize, preview_chars: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_entries),
            max_entries,
            preview_chars,
        }
    }

    /// Record a routed prompt, evicting the oldest entry when full
    pub fn append(&mut self, text: &str, decision: &RoutingDecision, at: DateTime<Local>) {
        let entry = HistoryEntry {
            prompt: preview(text, self.preview_chars),
            agent: decision.provider().display_name().to_string(),
            provider: decision.provider(),
            category: decision.category(),
            timestamp: at.format("%H:%M:%S").to_string(),
            routing_reason: decision.reason().to_string(),
            fallback: decision.is_fallback(),
            recorded_at: at,
        };

        self.entries.push_front(entry);
        self.entries.truncate(self.max_entries);
    }

    /// Entries, most recent first
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Owned copy of the entries, most recent first
    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RequestHistory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES, DEFAULT_PREVIEW_CHARS)
    }
}
