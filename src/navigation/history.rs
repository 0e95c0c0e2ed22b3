//! Back/forward history of visited directories

use std::path::{Path, PathBuf};

/// Linear browser-style history
///
/// `cursor` always points at the displayed entry while `entries` is
/// non-empty. Recording a new path while behind the tail drops the future.
#[derive(Clone, Debug, Default)]
pub struct History {
    entries: Vec<PathBuf>,
    cursor: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a navigation, returns false if `path` is already current
    pub fn record(&mut self, path: &Path) -> bool {
        if self.current() == Some(path) {
            return false;
        }

        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push(path.to_path_buf());
        self.cursor = self.entries.len() - 1;
        true
    }

    pub fn current(&self) -> Option<&Path> {
        self.entries.get(self.cursor).map(PathBuf::as_path)
    }

    /// Entry one step back, without moving the cursor
    pub fn peek_back(&self) -> Option<&Path> {
        if self.can_go_back() {
            self.entries.get(self.cursor - 1).map(PathBuf::as_path)
        } else {
            None
        }
    }

    /// Entry one step forward, without moving the cursor
    pub fn peek_forward(&self) -> Option<&Path> {
        if self.can_go_forward() {
            self.entries.get(self.cursor + 1).map(PathBuf::as_path)
        } else {
            None
        }
    }

    pub fn back(&mut self) -> Option<&Path> {
        if !self.can_go_back() {
            return None;
        }
        self.cursor -= 1;
        self.current()
    }

    pub fn forward(&mut self) -> Option<&Path> {
        if !self.can_go_forward() {
            return None;
        }
        self.cursor += 1;
        self.current()
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> PathBuf {
        PathBuf::from(s)
    }

    #[test]
    fn test_record_skips_current() {
        let mut history = History::new();
        assert!(history.record(&p("/a")));
        assert!(!history.record(&p("/a")));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_back_back_then_new_path_drops_future() {
        let mut history = History::new();
        history.record(&p("/a"));
        history.record(&p("/b"));
        history.record(&p("/c"));

        assert_eq!(history.back(), Some(p("/b").as_path()));
        assert_eq!(history.back(), Some(p("/a").as_path()));
        assert_eq!(history.back(), None);

        history.record(&p("/d"));
        assert_eq!(history.entries(), &[p("/a"), p("/d")]);
        assert!(!history.can_go_forward());
        assert_eq!(history.forward(), None);
        assert_eq!(history.current(), Some(p("/d").as_path()));
    }

    #[test]
    fn test_forward_replays() {
        let mut history = History::new();
        history.record(&p("/a"));
        history.record(&p("/b"));
        history.back();

        assert_eq!(history.peek_forward(), Some(p("/b").as_path()));
        assert_eq!(history.forward(), Some(p("/b").as_path()));
        assert_eq!(history.cursor(), 1);
    }

    #[test]
    fn test_recording_current_after_back_keeps_future() {
        let mut history = History::new();
        history.record(&p("/a"));
        history.record(&p("/b"));
        history.back();

        assert!(!history.record(&p("/a")));
        assert_eq!(history.len(), 2);
        assert!(history.can_go_forward());
    }

    #[test]
    fn test_empty_history() {
        let mut history = History::new();
        assert!(history.is_empty());
        assert_eq!(history.current(), None);
        assert_eq!(history.back(), None);
        assert_eq!(history.forward(), None);
        assert_eq!(history.peek_back(), None);
    }
}
