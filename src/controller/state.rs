//! Display-side state owned by the controller.

use navigator_core::{Point, Rect, Size, TooltipPlacer};

use crate::api::{UnitProblem, UnitRef};
use crate::diagram::{BoundDiagram, TooltipCard};
use crate::error::DisplayError;

// =============================================================================
// DIAGRAM AREA
// =============================================================================

/// What occupies the diagram area.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DisplayState {
    /// Nothing requested yet.
    #[default]
    Idle,

    /// A request is in flight. The previous diagram is not kept.
    Loading,

    Displaying(BoundDiagram),

    /// The latest request failed; message shown in place of the diagram.
    Error(DisplayError),
}

impl DisplayState {
    pub fn is_loading(&self) -> bool {
        matches!(self, DisplayState::Loading)
    }

    pub fn diagram(&self) -> Option<&BoundDiagram> {
        match self {
            DisplayState::Displaying(diagram) => Some(diagram),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&DisplayError> {
        match self {
            DisplayState::Error(e) => Some(e),
            _ => None,
        }
    }
}

// =============================================================================
// TOOLTIP
// =============================================================================

/// A visible tooltip. Exists only between hover-enter and hover-leave.
///
/// Keeps the measured boxes so placement can be recomputed when the
/// reserved panel width or the viewport changes.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipState {
    /// Element the pointer is over.
    pub raw_id: String,
    pub card: TooltipCard,
    pub anchor: Rect,
    pub size: Size,
    pub viewport: Size,
    pub position: Point,
}

impl TooltipState {
    pub fn place(
        raw_id: String,
        card: TooltipCard,
        anchor: Rect,
        size: Size,
        viewport: Size,
        placer: &TooltipPlacer,
        reserved_left: f32,
    ) -> Self {
        let position = placer.place(anchor, size, viewport, reserved_left);
        Self {
            raw_id,
            card,
            anchor,
            size,
            viewport,
            position,
        }
    }

    /// Re-run placement. Returns whether the position moved.
    pub fn reposition(&mut self, placer: &TooltipPlacer, reserved_left: f32) -> bool {
        let position = placer.place(self.anchor, self.size, self.viewport, reserved_left);
        let moved = position != self.position;
        self.position = position;
        moved
    }
}

// =============================================================================
// OVERLAY
// =============================================================================

/// Modal overlay state. At most one overlay is open.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Overlay {
    #[default]
    None,

    /// Problems of one unit. An empty list shows "no problems found".
    UnitProblems {
        unit: UnitRef,
        problems: Vec<UnitProblem>,
    },
}

impl Overlay {
    pub fn is_none(&self) -> bool {
        matches!(self, Overlay::None)
    }

    pub fn problems(&self) -> Option<(&UnitRef, &[UnitProblem])> {
        match self {
            Overlay::UnitProblems { unit, problems } => Some((unit, problems.as_slice())),
            Overlay::None => None,
        }
    }
}

// =============================================================================
// BACKGROUND TASKS
// =============================================================================

/// Lifecycle of a background request.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TaskStatus<T, E> {
    #[default]
    Idle,
    InProgress,
    Finished(Result<T, E>),
}

impl<T, E> TaskStatus<T, E> {
    pub fn is_idle(&self) -> bool {
        matches!(self, TaskStatus::Idle)
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(self, TaskStatus::InProgress)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, TaskStatus::Finished(_))
    }

    pub fn ok(&self) -> Option<&T> {
        match self {
            TaskStatus::Finished(Ok(value)) => Some(value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navigator_core::ElementKind;

    fn card() -> TooltipCard {
        TooltipCard {
            identity: "B14".into(),
            kind: ElementKind::Building,
            payload: Default::default(),
        }
    }

    #[test]
    fn reposition_follows_reserved_width() {
        let placer = TooltipPlacer::default();
        let mut tooltip = TooltipState::place(
            "RU1:B14".into(),
            card(),
            Rect::new(260.0, 400.0, 40.0, 40.0),
            Size::new(120.0, 60.0),
            Size::new(1600.0, 900.0),
            &placer,
            80.0,
        );
        let collapsed_x = tooltip.position.x;

        assert!(tooltip.reposition(&placer, 250.0));
        assert!(tooltip.position.x >= 250.0);
        assert!(tooltip.position.x > collapsed_x);
        assert!(!tooltip.reposition(&placer, 250.0));
    }

    #[test]
    fn task_status_accessors() {
        let mut status: TaskStatus<u32, String> = TaskStatus::default();
        assert!(status.is_idle());
        status = TaskStatus::InProgress;
        assert!(status.is_in_progress());
        assert_eq!(status.ok(), None);
        status = TaskStatus::Finished(Ok(7));
        assert!(status.is_finished());
        assert_eq!(status.ok(), Some(&7));
    }

    #[test]
    fn overlay_exposes_problems() {
        assert!(Overlay::default().is_none());
        let overlay = Overlay::UnitProblems {
            unit: UnitRef {
                composite_id: "RU1:B14:F1:G0002".into(),
                identity: "G0002".into(),
                kind: ElementKind::Unit,
            },
            problems: Vec::new(),
        };
        let (unit, problems) = overlay.problems().unwrap();
        assert_eq!(unit.identity, "G0002");
        assert!(problems.is_empty());
    }
}
