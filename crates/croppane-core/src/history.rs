//! Linear undo/redo history of interaction snapshots.
//!
//! The history is an ordered list of entries plus a cursor counting the
//! committed entries reachable by undo. The current entry is the one just
//! before the cursor. Pushing while the cursor is behind the end discards
//! every entry from the cursor on.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::viewport::ViewportState;

/// An immutable point in the interaction history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub viewport: ViewportState,
    pub crop: Rect,
}

/// Cursor-addressed append-only history.
#[derive(Debug, Clone)]
pub struct History<T> {
    entries: Vec<T>,
    cursor: usize,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
        }
    }
}

impl<T> History<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `entry`, discarding any redoable entries.
    pub fn push(&mut self, entry: T) {
        self.entries.truncate(self.cursor);
        self.entries.push(entry);
        self.cursor = self.entries.len();
    }

    /// Step back one entry and return the new current entry.
    ///
    /// The first entry is never undone past.
    pub fn undo(&mut self) -> Option<&T> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.current()
    }

    /// Step forward one entry and return it.
    pub fn redo(&mut self) -> Option<&T> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.current()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 1
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    /// Entry the cursor currently points at.
    pub fn current(&self) -> Option<&T> {
        self.cursor.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    /// Number of committed entries.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: N pushes and N-1 undos land on the first entry.
        #[test]
        fn prop_undo_returns_to_first(n in 1usize..=50) {
            let mut history = History::new();
            for i in 0..n {
                history.push(i);
            }
            for _ in 0..n - 1 {
                prop_assert!(history.undo().is_some());
            }
            prop_assert_eq!(history.current(), Some(&0));
            prop_assert!(!history.can_undo());
        }

        /// Property: the cursor never exceeds the length.
        #[test]
        fn prop_cursor_bounded(ops in proptest::collection::vec(0u8..3, 0..100)) {
            let mut history = History::new();
            for (i, op) in ops.into_iter().enumerate() {
                match op {
                    0 => history.push(i),
                    1 => { history.undo(); }
                    _ => { history.redo(); }
                }
                prop_assert!(history.cursor() <= history.len());
            }
        }

        /// Property: pushing after k undos leaves exactly cursor + 1 entries.
        #[test]
        fn prop_push_truncates(n in 2usize..=30, k in 0usize..=29) {
            let k = k.min(n - 1);
            let mut history = History::new();
            for i in 0..n {
                history.push(i);
            }
            for _ in 0..k {
                history.undo();
            }
            history.push(999);
            prop_assert_eq!(history.len(), n - k + 1);
            prop_assert_eq!(history.current(), Some(&999));
        }
    }
}
