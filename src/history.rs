//! Linear back/forward history of navigation snapshots.
//!
//! History is a line, not a tree: recording a new entry while the cursor is
//! behind the newest entry discards everything after the cursor.

use log::debug;

#[derive(Debug, Clone)]
pub struct HistoryLedger<T> {
    entries: Vec<T>,
    /// Index of the current entry; `None` only while the ledger is empty
    cursor: Option<usize>,
    /// Maximum number of retained entries, oldest dropped first
    limit: Option<usize>,
}

impl<T> HistoryLedger<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
            limit: None,
        }
    }

    /// Ledger that keeps at most `limit` entries (a limit of 0 is treated as 1)
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit.max(1)),
            ..Self::new()
        }
    }

    /// Truncate the forward branch, append `state` and make it current
    pub fn add_state(&mut self, state: T) {
        self.clear_forward();
        self.entries.push(state);

        if let Some(limit) = self.limit {
            if self.entries.len() > limit {
                let overflow = self.entries.len() - limit;
                self.entries.drain(..overflow);
                debug!("History limit {} reached, dropped {} oldest entries", limit, overflow);
            }
        }

        self.cursor = Some(self.entries.len() - 1);
    }

    /// Step back one entry, returning the new current snapshot
    pub fn go_back(&mut self) -> Option<&T> {
        if !self.can_go_back() {
            return None;
        }
        let cursor = self.cursor? - 1;
        self.cursor = Some(cursor);
        self.entries.get(cursor)
    }

    /// Step forward one entry, returning the new current snapshot
    pub fn go_forward(&mut self) -> Option<&T> {
        if !self.can_go_forward() {
            return None;
        }
        let cursor = self.cursor? + 1;
        self.cursor = Some(cursor);
        self.entries.get(cursor)
    }

    /// Drop every entry after the cursor without appending
    pub fn clear_forward(&mut self) {
        let keep = self.cursor.map_or(0, |cursor| cursor + 1);
        if self.entries.len() > keep {
            debug!("Discarding {} forward history entries", self.entries.len() - keep);
            self.entries.truncate(keep);
        }
    }

    /// Forget everything, then record `state` as the only entry
    pub fn reset(&mut self, state: T) {
        self.entries.clear();
        self.cursor = None;
        self.add_state(state);
    }

    pub fn can_go_back(&self) -> bool {
        matches!(self.cursor, Some(cursor) if cursor > 0)
    }

    pub fn can_go_forward(&self) -> bool {
        match self.cursor {
            Some(cursor) => cursor + 1 < self.entries.len(),
            None => false,
        }
    }

    pub fn current(&self) -> Option<&T> {
        self.cursor.and_then(|cursor| self.entries.get(cursor))
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for HistoryLedger<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_ledger() {
        let mut ledger: HistoryLedger<&str> = HistoryLedger::new();
        assert_eq!(ledger.cursor(), None);
        assert!(!ledger.can_go_back());
        assert!(!ledger.can_go_forward());
        assert_eq!(ledger.go_back(), None);
        assert_eq!(ledger.go_forward(), None);
        assert_eq!(ledger.current(), None);
    }

    #[test]
    fn test_new_entry_truncates_forward_branch() {
        let mut ledger = HistoryLedger::new();
        ledger.add_state("a");
        ledger.add_state("b");
        assert_eq!(ledger.go_back(), Some(&"a"));
        ledger.add_state("c");

        assert!(!ledger.can_go_forward());
        assert_eq!(ledger.entries(), &["a", "c"]);
        assert_eq!(ledger.current(), Some(&"c"));
    }

    #[test]
    fn test_back_and_forward_walk_the_line() {
        let mut ledger = HistoryLedger::new();
        for state in ["a", "b", "c"] {
            ledger.add_state(state);
        }

        assert_eq!(ledger.go_back(), Some(&"b"));
        assert_eq!(ledger.go_back(), Some(&"a"));
        assert_eq!(ledger.go_back(), None);
        assert_eq!(ledger.cursor(), Some(0));

        assert_eq!(ledger.go_forward(), Some(&"b"));
        assert_eq!(ledger.go_forward(), Some(&"c"));
        assert_eq!(ledger.go_forward(), None);
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn test_clear_forward_keeps_current() {
        let mut ledger = HistoryLedger::new();
        for state in ["a", "b", "c"] {
            ledger.add_state(state);
        }
        ledger.go_back();
        ledger.go_back();
        ledger.clear_forward();

        assert_eq!(ledger.entries(), &["a"]);
        assert_eq!(ledger.current(), Some(&"a"));
        assert!(!ledger.can_go_back());
        assert!(!ledger.can_go_forward());
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut ledger = HistoryLedger::with_limit(2);
        for state in ["a", "b", "c"] {
            ledger.add_state(state);
        }
        assert_eq!(ledger.entries(), &["b", "c"]);
        assert_eq!(ledger.cursor(), Some(1));
        assert_eq!(ledger.go_back(), Some(&"b"));
        assert!(!ledger.can_go_back());
    }

    #[test]
    fn test_reset_leaves_single_entry() {
        let mut ledger = HistoryLedger::new();
        ledger.add_state(1);
        ledger.add_state(2);
        ledger.reset(7);
        assert_eq!(ledger.entries(), &[7]);
        assert_eq!(ledger.cursor(), Some(0));
    }
}
