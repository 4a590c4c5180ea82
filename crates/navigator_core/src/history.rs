//! Back/forward history for drill-down navigation.
//!
//! The timeline is a sequence of positions plus a cursor. Moving back or
//! forward only moves the cursor. Drilling down from the middle of the
//! timeline truncates everything after the cursor before appending, so the
//! timeline never forks.

use crate::level::{Level, ParentKey};
use crate::Fault;
use serde::{Deserialize, Serialize};

/// A point in drill-down history: which children of which node are shown.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NavigationEntry {
    pub level: Level,
    pub parent_key: ParentKey,
}

impl NavigationEntry {
    pub fn new(level: Level, parent_key: impl Into<ParentKey>) -> Self {
        Self {
            level,
            parent_key: parent_key.into(),
        }
    }

    /// The site level with no parent.
    pub fn root() -> Self {
        Self::new(Level::Site, ParentKey::root())
    }
}

impl Default for NavigationEntry {
    fn default() -> Self {
        Self::root()
    }
}

/// Cursor-addressed navigation timeline.
///
/// Never empty; the cursor always points at the current position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryTimeline {
    entries: Vec<NavigationEntry>,
    cursor: usize,
}

impl Default for HistoryTimeline {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryTimeline {
    /// A timeline holding only the root entry.
    pub fn new() -> Self {
        Self::starting_at(NavigationEntry::root())
    }

    /// A timeline holding only `entry`.
    pub fn starting_at(entry: NavigationEntry) -> Self {
        Self {
            entries: vec![entry],
            cursor: 0,
        }
    }

    /// Entry at the cursor.
    pub fn current(&self) -> &NavigationEntry {
        &self.entries[self.cursor]
    }

    /// Drop everything after the cursor, append `entry` and move onto it.
    pub fn push_new(&mut self, entry: NavigationEntry) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(entry);
        self.cursor = self.entries.len() - 1;
    }

    /// Move the cursor one step back. `None` (and no change) at the start.
    pub fn back(&mut self) -> Option<&NavigationEntry> {
        self.try_back().ok()
    }

    /// Move the cursor one step forward. `None` (and no change) at the end.
    pub fn forward(&mut self) -> Option<&NavigationEntry> {
        self.try_forward().ok()
    }

    /// Like [`back`](Self::back), reporting why nothing happened.
    pub fn try_back(&mut self) -> Result<&NavigationEntry, Fault> {
        if !self.can_go_back() {
            return Err(Fault::HistoryAtStart);
        }
        self.cursor -= 1;
        Ok(self.current())
    }

    /// Like [`forward`](Self::forward), reporting why nothing happened.
    pub fn try_forward(&mut self) -> Result<&NavigationEntry, Fault> {
        if !self.can_go_forward() {
            return Err(Fault::HistoryAtEnd);
        }
        self.cursor += 1;
        Ok(self.current())
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; kept for the `len`/`is_empty` pair.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &NavigationEntry> {
        self.entries.iter()
    }

    /// Entries up to and including the cursor, for breadcrumb display.
    pub fn breadcrumbs(&self) -> &[NavigationEntry] {
        &self.entries[..=self.cursor]
    }
}
