//! Bounded chat history replayed to newcomers.

use std::collections::VecDeque;

use roomline_proto::ChatLine;

/// Lines the relay has broadcast, oldest first.
///
/// Holds at most `capacity` lines; pushing past that drops the oldest.
#[derive(Debug, Clone)]
pub struct History {
    lines: VecDeque<ChatLine>,
    capacity: usize,
}

impl History {
    /// Empty history holding at most `capacity` lines (minimum one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { lines: VecDeque::with_capacity(capacity.min(1024)), capacity }
    }

    /// Append a line, evicting the oldest when full.
    pub fn push(&mut self, line: ChatLine) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    /// Lines in broadcast order.
    pub fn iter(&self) -> impl Iterator<Item = &ChatLine> {
        self.lines.iter()
    }

    /// Number of stored lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// No lines stored.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Maximum number of lines kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
