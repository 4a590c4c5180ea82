//! Effect flags - the output protocol from handling a navigator event.
//!
//! The controller returns an EffectSet alongside the commands it wants run.
//! The display layer checks which effects are set and redraws only those
//! parts.

use bitflags::bitflags;

bitflags! {
    /// Set of effects produced by one navigator event.
    ///
    /// Effects are additive - a single event can produce several.
    ///
    /// # Example
    ///
    /// ```
    /// use navigator_core::EffectSet;
    ///
    /// let effects = EffectSet::POSITION_CHANGED | EffectSet::DIAGRAM_REQUESTED;
    ///
    /// if effects.needs_loading_indicator() {
    ///     // Hide the stale diagram, show a spinner
    /// }
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EffectSet: u16 {
        /// No effects.
        const NONE = 0;

        // =====================================================================
        // POSITION EFFECTS
        // =====================================================================

        /// Level or parent key changed.
        const POSITION_CHANGED = 1 << 0;

        /// History timeline or its cursor changed (back/forward enablement).
        const HISTORY_CHANGED = 1 << 1;

        // =====================================================================
        // QUERY EFFECTS
        // =====================================================================

        /// Filter selection changed.
        const FILTERS_CHANGED = 1 << 2;

        /// Visualization mode changed.
        const MODE_CHANGED = 1 << 3;

        /// Filter options arrived.
        const OPTIONS_CHANGED = 1 << 4;

        // =====================================================================
        // DIAGRAM EFFECTS
        // =====================================================================

        /// A new diagram request was issued.
        const DIAGRAM_REQUESTED = 1 << 5;

        /// A diagram was installed and its elements bound.
        const DIAGRAM_INSTALLED = 1 << 6;

        /// A stale diagram response was dropped.
        const DIAGRAM_DISCARDED = 1 << 7;

        /// An error message replaced the diagram.
        const ERROR_SHOWN = 1 << 8;

        // =====================================================================
        // INTERACTION EFFECTS
        // =====================================================================

        /// Tooltip shown, moved or hidden.
        const TOOLTIP_CHANGED = 1 << 9;

        /// Unit problem overlay opened or closed.
        const OVERLAY_CHANGED = 1 << 10;

        /// Side panel collapsed or expanded.
        const PANEL_CHANGED = 1 << 11;
    }
}

impl Default for EffectSet {
    fn default() -> Self {
        EffectSet::NONE
    }
}

impl EffectSet {
    /// Check if the diagram area needs a loading indicator.
    pub fn needs_loading_indicator(&self) -> bool {
        self.contains(EffectSet::DIAGRAM_REQUESTED)
    }

    /// Check if the side panel controls need a redraw.
    pub fn has_control_effects(&self) -> bool {
        self.intersects(
            EffectSet::HISTORY_CHANGED
                | EffectSet::FILTERS_CHANGED
                | EffectSet::MODE_CHANGED
                | EffectSet::OPTIONS_CHANGED
                | EffectSet::PANEL_CHANGED,
        )
    }

    /// Check if the diagram area content was replaced.
    pub fn diagram_replaced(&self) -> bool {
        self.intersects(EffectSet::DIAGRAM_INSTALLED | EffectSet::ERROR_SHOWN)
    }
}
