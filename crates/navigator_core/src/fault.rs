//! Fault types for navigation errors.
//!
//! Faults are recoverable errors raised while interpreting user input or
//! rendered markup. None of them is fatal to a navigator: callers either
//! degrade (empty identity, no-op move) or ignore the interaction.

use crate::level::ElementKind;
use thiserror::Error;

/// Navigation fault - a recoverable error in the navigator domain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    /// Level or level tag not in the known set.
    #[error("Unknown level tag: {0:?}")]
    UnknownLevel(String),

    /// Visualization mode not in the known set.
    #[error("Unknown visualization mode: {0:?}")]
    UnknownMode(String),

    /// The composite identifier lacks the segment its tag requires.
    #[error("Malformed identity {id:?} for level tag {kind}")]
    MalformedIdentity { id: String, kind: ElementKind },

    /// Cursor already at the first history entry.
    #[error("History at start: nothing to go back to")]
    HistoryAtStart,

    /// Cursor already at the last history entry.
    #[error("History at end: nothing to go forward to")]
    HistoryAtEnd,

    /// Drill-down requested on a leaf element.
    #[error("Element kind {0} has no deeper level")]
    NotDrillable(ElementKind),
}

impl Fault {
    /// Check if this fault is recoverable by trying a different action.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Fault::HistoryAtStart | Fault::HistoryAtEnd | Fault::NotDrillable(_)
        )
    }

    /// Check if this fault comes from markup the renderer produced.
    pub fn is_renderer_inconsistency(&self) -> bool {
        matches!(self, Fault::MalformedIdentity { .. } | Fault::UnknownLevel(_))
    }
}
