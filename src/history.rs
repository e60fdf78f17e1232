//! Recent searches for the interactive shell

use std::collections::VecDeque;

pub const HISTORY_LIMIT: usize = 5;

/// Most recent distinct queries, newest first
#[derive(Debug, Clone, Default)]
pub struct SearchHistory {
    entries: VecDeque<String>,
}

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a query. Blank and already-known queries are ignored.
    pub fn record(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() || self.entries.iter().any(|q| q == query) {
            return;
        }
        self.entries.push_front(query.to_string());
        self.entries.truncate(HISTORY_LIMIT);
    }

    /// 1-based lookup as shown to the user
    pub fn get(&self, n: usize) -> Option<&str> {
        n.checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
