//! Linear navigation history
//!
//! Browser-style back/forward over visited items. Visiting a new item from
//! the middle of the history discards the forward entries; once the history
//! exceeds its capacity the oldest entries are dropped.

use std::collections::VecDeque;

pub const DEFAULT_HISTORY_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct NavigationHistory<T> {
    entries: VecDeque<T>,
    /// Index of the current entry; meaningless while `entries` is empty
    position: usize,
    capacity: usize,
}

impl<T> Default for NavigationHistory<T> {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl<T> NavigationHistory<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            position: 0,
            capacity: capacity.max(1),
        }
    }

    /// Make `item` current, truncating anything ahead of the current entry
    pub fn push(&mut self, item: T) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.position + 1);
        }
        self.entries.push_back(item);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.position = self.entries.len() - 1;
    }

    pub fn current(&self) -> Option<&T> {
        self.entries.get(self.position)
    }

    pub fn can_go_back(&self) -> bool {
        !self.entries.is_empty() && self.position > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.position + 1 < self.entries.len()
    }

    /// Step back; `None` (and no movement) at the oldest entry
    pub fn back(&mut self) -> Option<&T> {
        if !self.can_go_back() {
            return None;
        }
        self.position -= 1;
        self.current()
    }

    /// Step forward; `None` (and no movement) at the newest entry
    pub fn forward(&mut self) -> Option<&T> {
        if !self.can_go_forward() {
            return None;
        }
        self.position += 1;
        self.current()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_history_goes_nowhere() {
        let mut history: NavigationHistory<&str> = NavigationHistory::default();
        assert!(history.is_empty());
        assert_eq!(history.current(), None);
        assert_eq!(history.back(), None);
        assert_eq!(history.forward(), None);
    }

    #[test]
    fn back_and_forward_walk_the_list() {
        let mut history = NavigationHistory::default();
        history.push("H85");
        history.push("H87");
        history.push("G25");

        assert_eq!(history.back(), Some(&"H87"));
        assert_eq!(history.back(), Some(&"H85"));
        assert_eq!(history.back(), None);
        assert_eq!(history.current(), Some(&"H85"));
        assert_eq!(history.forward(), Some(&"H87"));
        assert_eq!(history.forward(), Some(&"G25"));
        assert_eq!(history.forward(), None);
    }

    #[test]
    fn push_after_back_truncates_forward_entries() {
        let mut history = NavigationHistory::default();
        history.push(1);
        history.push(2);
        history.push(3);
        history.back();
        history.back();
        history.push(4);

        assert_eq!(history.len(), 2);
        assert!(!history.can_go_forward());
        assert_eq!(history.back(), Some(&1));
    }

    #[test]
    fn oldest_entries_fall_off_at_capacity() {
        let mut history = NavigationHistory::with_capacity(3);
        for n in 1..=5 {
            history.push(n);
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.current(), Some(&5));
        assert_eq!(history.back(), Some(&4));
        assert_eq!(history.back(), Some(&3));
        assert_eq!(history.back(), None);
    }
}
