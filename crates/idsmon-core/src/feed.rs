//! Bounded, most-recent-first flow list

use std::collections::VecDeque;

use crate::types::FlowEntry;

/// Entries kept per list when no cap is configured.
pub const DEFAULT_FEED_CAPACITY: usize = 50;

/// Outcome of [`FlowFeed::insert`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedInsert {
    Inserted,
    /// An entry with the same flow number is already present; nothing changed.
    Duplicate,
}

// ── FlowFeed ─────────────────────────────────────────────────────────────────

/// Newest entry first, capped at `capacity`, never holding two entries with
/// the same `flow_number`.
#[derive(Debug, Clone)]
pub struct FlowFeed {
    buf: VecDeque<FlowEntry>,
    capacity: usize,
}

impl Default for FlowFeed {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_CAPACITY)
    }
}

impl FlowFeed {
    /// A zero capacity is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buf: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Prepend an entry, evicting the oldest when over capacity.
    pub fn insert(&mut self, entry: FlowEntry) -> FeedInsert {
        if self.contains(entry.flow_number) {
            return FeedInsert::Duplicate;
        }
        self.buf.push_front(entry);
        self.buf.truncate(self.capacity);
        FeedInsert::Inserted
    }

    pub fn contains(&self, flow_number: u64) -> bool {
        self.buf.iter().any(|e| e.flow_number == flow_number)
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate from newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &FlowEntry> {
        self.buf.iter()
    }

    pub fn newest(&self) -> Option<&FlowEntry> {
        self.buf.front()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }
}
