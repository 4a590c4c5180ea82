//! Display surface - where the navigator's state becomes visible.
//!
//! The runtime calls [`DisplaySurface::apply`] after every event that
//! produced effects. Surfaces read whatever they need from the controller
//! and redraw only the parts named by the effect set.

use navigator_core::EffectSet;

use crate::controller::{DisplayState, VisualizationController};

pub trait DisplaySurface: Send {
    fn apply(&mut self, controller: &VisualizationController, effects: EffectSet);
}

/// Headless surface that reports changes through `tracing`.
#[derive(Debug, Default)]
pub struct LogSurface {
    redraws: usize,
}

impl LogSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `apply` calls that changed something.
    pub fn redraws(&self) -> usize {
        self.redraws
    }
}

impl DisplaySurface for LogSurface {
    fn apply(&mut self, controller: &VisualizationController, effects: EffectSet) {
        if effects.is_empty() {
            return;
        }
        self.redraws += 1;

        if effects.needs_loading_indicator() {
            tracing::info!(
                level = %controller.level(),
                parent = %controller.parent_key(),
                "Loading diagram"
            );
        }
        if effects.diagram_replaced() {
            match controller.display() {
                DisplayState::Displaying(diagram) => {
                    tracing::info!(elements = diagram.elements().len(), "Diagram shown");
                }
                DisplayState::Error(e) => tracing::info!("{}", e),
                DisplayState::Idle | DisplayState::Loading => {}
            }
        }
        if effects.has_control_effects() {
            tracing::debug!(
                back = controller.can_go_back(),
                forward = controller.can_go_forward(),
                mode = %controller.mode(),
                panel_collapsed = controller.panel_collapsed(),
                "Controls updated"
            );
        }
        if effects.contains(EffectSet::TOOLTIP_CHANGED) {
            match controller.tooltip() {
                Some(tooltip) => tracing::debug!(
                    identity = %tooltip.card.identity,
                    x = tooltip.position.x,
                    y = tooltip.position.y,
                    "Tooltip shown"
                ),
                None => tracing::debug!("Tooltip hidden"),
            }
        }
        if effects.contains(EffectSet::OVERLAY_CHANGED) {
            if let Some((unit, problems)) = controller.overlay().problems() {
                tracing::info!(unit = %unit.identity, count = problems.len(), "Problems shown");
            }
        }
    }
}
