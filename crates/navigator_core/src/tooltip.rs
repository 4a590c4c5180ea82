//! Hover popup placement.
//!
//! The popup is centered above the hovered element and then clamped into
//! the visible area. The left edge of the viewport is covered by the side
//! panel, so the usable horizontal range starts at `reserved_left`.

use crate::geometry::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Anchor-above-centered placement, clamped to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipPlacer {
    /// Distance between the popup and the top of the anchor.
    pub gap: f32,

    /// Distance between the popup and the bottom of the anchor when flipped below.
    pub flip_gap: f32,

    /// Distance kept from a viewport edge after clamping.
    pub margin: f32,
}

impl Default for TooltipPlacer {
    fn default() -> Self {
        Self {
            gap: 5.0,
            flip_gap: 15.0,
            margin: 15.0,
        }
    }
}

impl TooltipPlacer {
    pub fn new(gap: f32, flip_gap: f32, margin: f32) -> Self {
        Self {
            gap,
            flip_gap,
            margin,
        }
    }

    /// Top-left corner for a popup of `tooltip` size anchored to `anchor`.
    ///
    /// Pure function of the geometry. When the popup fits, i.e.
    /// `reserved_left + margin + tooltip.width <= viewport.width` and
    /// `tooltip.height + margin <= viewport.height`, the result lies within
    /// `[reserved_left, viewport.width] x [0, viewport.height]`. Larger
    /// popups are still placed, without that guarantee.
    pub fn place(&self, anchor: Rect, tooltip: Size, viewport: Size, reserved_left: f32) -> Point {
        let mut x = anchor.center_x() - tooltip.width / 2.0;
        let mut y = anchor.top - tooltip.height - self.gap;

        let usable_right = viewport.width - reserved_left;
        if x + tooltip.width > usable_right {
            x = usable_right - tooltip.width - self.margin;
        }
        if x < reserved_left {
            x = reserved_left + self.margin;
        }

        if y < 0.0 {
            y = anchor.bottom() + self.flip_gap;
        }
        if y + tooltip.height > viewport.height {
            y = viewport.height - tooltip.height - self.margin;
        }
        // Anchors scrolled above the viewport flip to a still-negative y.
        y = y.max(0.0);

        Point::new(x, y)
    }
}
