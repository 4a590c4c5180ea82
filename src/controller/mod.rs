//! Visualization controller - the navigator state machine.
//!
//! The controller owns the drill-down position (through the history
//! timeline), the filter selection, the visualization mode and everything
//! shown in the diagram area. It never performs IO: `handle_event` mutates
//! state and returns an [`Outcome`] listing the effects for the display and
//! the commands for the runtime.
//!
//! ## Transitions
//!
//! - click on a site, building or floor: push a new history entry one level
//!   deeper, keyed by the clicked element's raw id
//! - click on a unit or room: fetch its problems; position is unchanged
//! - back/forward: move the history cursor; filters are untouched
//! - filter or mode change: update the field; history is untouched
//!
//! Every change of level, parent key, filters or mode issues a new diagram
//! request with a fresh token. Only the response carrying the latest token
//! is installed.

mod events;
mod state;

pub use events::{NavCommand, NavEvent, Outcome, RequestToken, TokenSequence};
pub use state::{DisplayState, Overlay, TaskStatus, TooltipState};

use navigator_core::{
    EffectSet, ElementKind, FilterOptions, FilterSelection, FilterValue, HistoryTimeline,
    IdentityCodec, Level, NavigationEntry, ParentKey, Rect, Size, TooltipPlacer,
    VisualizationMode,
};

use crate::api::{DiagramDocument, DiagramRequest, UnitProblem, UnitRef};
use crate::config::{NavigatorConfig, PanelConfig};
use crate::diagram::BoundDiagram;
use crate::error::{DisplayError, FetchError};

pub struct VisualizationController {
    // -------------------------------------------------------------------------
    // Query state
    // -------------------------------------------------------------------------
    history: HistoryTimeline,
    filters: FilterSelection,
    mode: VisualizationMode,

    // -------------------------------------------------------------------------
    // Display state
    // -------------------------------------------------------------------------
    display: DisplayState,
    tooltip: Option<TooltipState>,
    overlay: Overlay,
    panel_collapsed: bool,

    /// Server options merged with the static buckets. Static-only until loaded.
    options: FilterOptions,
    options_status: TaskStatus<(), FetchError>,

    // -------------------------------------------------------------------------
    // Request bookkeeping
    // -------------------------------------------------------------------------
    diagram_tokens: TokenSequence,
    problem_tokens: TokenSequence,
    cache_clear_pending: bool,
    started: bool,

    placer: TooltipPlacer,
    panel: PanelConfig,
}

impl VisualizationController {
    pub fn new(config: &NavigatorConfig) -> Self {
        Self {
            history: HistoryTimeline::new(),
            filters: FilterSelection::new(),
            mode: config.initial_mode,
            display: DisplayState::Idle,
            tooltip: None,
            overlay: Overlay::None,
            panel_collapsed: false,
            options: FilterOptions::new().with_static_buckets(),
            options_status: TaskStatus::Idle,
            diagram_tokens: TokenSequence::default(),
            problem_tokens: TokenSequence::default(),
            cache_clear_pending: false,
            started: false,
            placer: config.tooltip,
            panel: config.panel,
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn position(&self) -> &NavigationEntry {
        self.history.current()
    }

    pub fn level(&self) -> Level {
        self.history.current().level
    }

    pub fn parent_key(&self) -> &ParentKey {
        &self.history.current().parent_key
    }

    pub fn history(&self) -> &HistoryTimeline {
        &self.history
    }

    pub fn can_go_back(&self) -> bool {
        self.history.can_go_back()
    }

    pub fn can_go_forward(&self) -> bool {
        self.history.can_go_forward()
    }

    pub fn filters(&self) -> &FilterSelection {
        &self.filters
    }

    pub fn mode(&self) -> VisualizationMode {
        self.mode
    }

    pub fn filter_options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn filter_options_status(&self) -> &TaskStatus<(), FetchError> {
        &self.options_status
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    pub fn diagram(&self) -> Option<&BoundDiagram> {
        self.display.diagram()
    }

    pub fn tooltip(&self) -> Option<&TooltipState> {
        self.tooltip.as_ref()
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn panel_collapsed(&self) -> bool {
        self.panel_collapsed
    }

    /// Width of the left chrome tooltips must clear.
    pub fn reserved_width(&self) -> f32 {
        self.panel.reserved_width(self.panel_collapsed)
    }

    /// Token of the diagram request whose response will be installed.
    pub fn pending_diagram(&self) -> Option<RequestToken> {
        if self.display.is_loading() {
            self.diagram_tokens.latest()
        } else {
            None
        }
    }

    /// The request describing the current state.
    pub fn current_request(&self) -> DiagramRequest {
        let position = self.history.current();
        DiagramRequest {
            level: position.level,
            parent_key: position.parent_key.clone(),
            filters: self.filters.to_query_descriptor(),
            mode: self.mode,
        }
    }

    // =========================================================================
    // EVENT HANDLING
    // =========================================================================

    /// Apply one event. Never fails; errors become display state.
    pub fn handle_event(&mut self, event: NavEvent) -> Outcome {
        match event {
            NavEvent::Start => self.start(),
            NavEvent::Refresh => self.request_diagram(),
            NavEvent::ElementClicked { raw_id } => self.element_clicked(&raw_id),
            NavEvent::HoverEnter {
                raw_id,
                anchor,
                tooltip_size,
                viewport,
            } => self.hover_enter(raw_id, anchor, tooltip_size, viewport),
            NavEvent::HoverLeave { raw_id } => self.hover_leave(&raw_id),
            NavEvent::ViewportResized(viewport) => self.viewport_resized(viewport),
            NavEvent::Back => self.back(),
            NavEvent::Forward => self.forward(),
            NavEvent::ToggleFilter { dimension, value } => self.toggle_filter(&dimension, value),
            NavEvent::SetFilter { dimension, values } => self.set_filter(&dimension, values),
            NavEvent::ClearFilters => self.clear_filters(),
            NavEvent::SetMode(mode) => self.set_mode(mode),
            NavEvent::TogglePanel => self.toggle_panel(),
            NavEvent::ClearCache => self.clear_cache(),
            NavEvent::CloseOverlay => self.close_overlay(),
            NavEvent::DiagramLoaded { token, result } => self.diagram_loaded(token, result),
            NavEvent::FilterOptionsLoaded(result) => self.filter_options_loaded(result),
            NavEvent::UnitProblemsLoaded {
                token,
                unit,
                result,
            } => self.unit_problems_loaded(token, unit, result),
            NavEvent::CacheCleared(result) => self.cache_cleared(result),
        }
    }

    fn start(&mut self) -> Outcome {
        if self.started {
            tracing::debug!("Navigator already started");
            return Outcome::none();
        }
        self.started = true;
        self.options_status = TaskStatus::InProgress;
        tracing::info!("Starting navigator at {}", self.level());

        self.request_diagram()
            .with_command(NavCommand::FetchFilterOptions)
    }

    /// Issue a diagram request for the current state.
    ///
    /// The old diagram and its bindings are dropped immediately.
    fn request_diagram(&mut self) -> Outcome {
        let (token, effects) = self.begin_loading();
        let request = self.current_request();
        tracing::info!(
            %token,
            level = %request.level,
            parent = %request.parent_key,
            mode = %request.mode,
            "Requesting diagram"
        );

        Outcome::effects(effects).with_command(NavCommand::FetchDiagram { token, request })
    }

    /// Supersede every outstanding diagram request and drop the shown diagram.
    fn begin_loading(&mut self) -> (RequestToken, EffectSet) {
        let token = self.diagram_tokens.issue();
        self.display = DisplayState::Loading;
        let mut effects = EffectSet::DIAGRAM_REQUESTED;
        if self.tooltip.take().is_some() {
            effects |= EffectSet::TOOLTIP_CHANGED;
        }
        (token, effects)
    }

    // -------------------------------------------------------------------------
    // Clicks
    // -------------------------------------------------------------------------

    fn element_clicked(&mut self, raw_id: &str) -> Outcome {
        let Some(element) = self.diagram().and_then(|d| d.element(raw_id)) else {
            tracing::debug!("Click on unbound element {:?} ignored", raw_id);
            return Outcome::none();
        };
        let kind = element.kind;

        match kind.try_drill_target() {
            Ok(level) => self.drill_down(level, raw_id),
            Err(fault) => {
                tracing::debug!("{}; looking up problems instead", fault);
                self.request_unit_problems(raw_id, kind)
            }
        }
    }

    fn drill_down(&mut self, level: Level, raw_id: &str) -> Outcome {
        tracing::info!(from = %self.level(), to = %level, parent = raw_id, "Drill down");
        self.history.push_new(NavigationEntry::new(level, raw_id));

        let mut outcome = Outcome::effects(EffectSet::POSITION_CHANGED | EffectSet::HISTORY_CHANGED);
        outcome.merge(self.request_diagram());
        outcome
    }

    fn request_unit_problems(&mut self, raw_id: &str, kind: ElementKind) -> Outcome {
        let identity = match IdentityCodec::try_decode(raw_id, kind) {
            Ok(identity) => identity.to_string(),
            Err(fault) => {
                tracing::warn!("No problem lookup possible: {}", fault);
                return Outcome::none();
            }
        };

        let token = self.problem_tokens.issue();
        let unit = UnitRef {
            composite_id: raw_id.to_string(),
            identity,
            kind,
        };
        tracing::info!(%token, unit = %unit.identity, "Requesting unit problems");

        Outcome::none().with_command(NavCommand::FetchUnitProblems {
            token,
            unit,
            filters: self.filters.to_query_descriptor(),
        })
    }

    // -------------------------------------------------------------------------
    // Hover
    // -------------------------------------------------------------------------

    fn hover_enter(&mut self, raw_id: String, anchor: Rect, size: Size, viewport: Size) -> Outcome {
        let card = self
            .diagram()
            .and_then(|d| {
                let element = d.element(&raw_id)?;
                let identity = IdentityCodec::try_decode(&element.raw_id, element.kind).ok()?;
                d.card(identity)
            })
            .cloned();

        let Some(card) = card else {
            return self.hide_tooltip();
        };

        let reserved = self.reserved_width();
        let tooltip = TooltipState::place(raw_id, card, anchor, size, viewport, &self.placer, reserved);
        tracing::debug!(
            identity = %tooltip.card.identity,
            x = tooltip.position.x,
            y = tooltip.position.y,
            "Show tooltip"
        );
        self.tooltip = Some(tooltip);
        Outcome::effects(EffectSet::TOOLTIP_CHANGED)
    }

    fn hover_leave(&mut self, raw_id: &str) -> Outcome {
        match &self.tooltip {
            Some(tooltip) if tooltip.raw_id == raw_id => self.hide_tooltip(),
            _ => Outcome::none(),
        }
    }

    fn hide_tooltip(&mut self) -> Outcome {
        if self.tooltip.take().is_some() {
            Outcome::effects(EffectSet::TOOLTIP_CHANGED)
        } else {
            Outcome::none()
        }
    }

    fn viewport_resized(&mut self, viewport: Size) -> Outcome {
        let reserved = self.reserved_width();
        match self.tooltip.as_mut() {
            Some(tooltip) => {
                tooltip.viewport = viewport;
                if tooltip.reposition(&self.placer, reserved) {
                    Outcome::effects(EffectSet::TOOLTIP_CHANGED)
                } else {
                    Outcome::none()
                }
            }
            None => Outcome::none(),
        }
    }

    fn toggle_panel(&mut self) -> Outcome {
        self.panel_collapsed = !self.panel_collapsed;
        tracing::debug!(collapsed = self.panel_collapsed, "Side panel toggled");

        let mut effects = EffectSet::PANEL_CHANGED;
        let reserved = self.reserved_width();
        if let Some(tooltip) = self.tooltip.as_mut() {
            if tooltip.reposition(&self.placer, reserved) {
                effects |= EffectSet::TOOLTIP_CHANGED;
            }
        }
        Outcome::effects(effects)
    }

    // -------------------------------------------------------------------------
    // History
    // -------------------------------------------------------------------------

    fn back(&mut self) -> Outcome {
        if let Err(fault) = self.history.try_back() {
            tracing::debug!("Back ignored: {}", fault);
            return Outcome::none();
        }
        tracing::info!(level = %self.level(), parent = %self.parent_key(), "Back");
        self.position_moved()
    }

    fn forward(&mut self) -> Outcome {
        if let Err(fault) = self.history.try_forward() {
            tracing::debug!("Forward ignored: {}", fault);
            return Outcome::none();
        }
        tracing::info!(level = %self.level(), parent = %self.parent_key(), "Forward");
        self.position_moved()
    }

    fn position_moved(&mut self) -> Outcome {
        let mut outcome = Outcome::effects(EffectSet::POSITION_CHANGED | EffectSet::HISTORY_CHANGED);
        outcome.merge(self.request_diagram());
        outcome
    }

    // -------------------------------------------------------------------------
    // Filters and mode
    // -------------------------------------------------------------------------

    fn toggle_filter(&mut self, dimension: &str, value: FilterValue) -> Outcome {
        let selected = self.filters.toggle(dimension, value.clone());
        tracing::info!(dimension, %value, selected, "Filter toggled");
        self.filters_changed()
    }

    fn set_filter(&mut self, dimension: &str, values: Vec<FilterValue>) -> Outcome {
        if !self.filters.set(dimension, values) {
            return Outcome::none();
        }
        tracing::info!(dimension, "Filter replaced");
        self.filters_changed()
    }

    fn clear_filters(&mut self) -> Outcome {
        if self.filters.is_unconstrained() {
            return Outcome::none();
        }
        self.filters.clear();
        tracing::info!("Filters cleared");
        self.filters_changed()
    }

    fn filters_changed(&mut self) -> Outcome {
        let mut outcome = Outcome::effects(EffectSet::FILTERS_CHANGED);
        outcome.merge(self.request_diagram());
        outcome
    }

    fn set_mode(&mut self, mode: VisualizationMode) -> Outcome {
        if mode == self.mode {
            return Outcome::none();
        }
        tracing::info!(from = %self.mode, to = %mode, "Visualization mode changed");
        self.mode = mode;

        let mut outcome = Outcome::effects(EffectSet::MODE_CHANGED);
        outcome.merge(self.request_diagram());
        outcome
    }

    // -------------------------------------------------------------------------
    // Cache and overlay
    // -------------------------------------------------------------------------

    /// Clear the local selection now; the diagram is refetched once the
    /// server confirms, so it is not served from the old cache.
    fn clear_cache(&mut self) -> Outcome {
        tracing::info!("Clearing server cache and filters");
        self.filters.clear();
        self.cache_clear_pending = true;
        let (token, effects) = self.begin_loading();
        tracing::debug!(%token, "Diagram requests superseded until cache is cleared");

        Outcome::effects(EffectSet::FILTERS_CHANGED | effects)
            .with_command(NavCommand::ClearServerCache)
    }

    fn cache_cleared(&mut self, result: Result<(), FetchError>) -> Outcome {
        if let Err(e) = &result {
            tracing::warn!("Server cache clear failed: {}", e);
        }
        if !self.cache_clear_pending {
            return Outcome::none();
        }
        self.cache_clear_pending = false;
        self.request_diagram()
    }

    fn close_overlay(&mut self) -> Outcome {
        if self.overlay.is_none() {
            return Outcome::none();
        }
        self.overlay = Overlay::None;
        Outcome::effects(EffectSet::OVERLAY_CHANGED)
    }

    // -------------------------------------------------------------------------
    // Task results
    // -------------------------------------------------------------------------

    fn diagram_loaded(
        &mut self,
        token: RequestToken,
        result: Result<DiagramDocument, FetchError>,
    ) -> Outcome {
        if !self.diagram_tokens.is_latest(token) || !self.display.is_loading() {
            tracing::debug!(%token, "Discarding stale diagram response");
            return Outcome::effects(EffectSet::DIAGRAM_DISCARDED);
        }

        match result {
            Ok(document) => {
                let diagram = BoundDiagram::bind(document);
                tracing::info!(%token, elements = diagram.elements().len(), "Diagram installed");
                self.display = DisplayState::Displaying(diagram);
                Outcome::effects(EffectSet::DIAGRAM_INSTALLED)
            }
            Err(e) => {
                if e.is_not_found() {
                    tracing::info!(%token, "No data for selection: {}", e);
                } else {
                    tracing::warn!(%token, "Diagram request failed: {}", e);
                }
                self.display = DisplayState::Error(DisplayError::from(&e));
                Outcome::effects(EffectSet::ERROR_SHOWN)
            }
        }
    }

    fn filter_options_loaded(&mut self, result: Result<FilterOptions, FetchError>) -> Outcome {
        match result {
            Ok(options) => {
                tracing::debug!(dimensions = options.dimensions().count(), "Filter options loaded");
                self.options = options.with_static_buckets();
                self.options_status = TaskStatus::Finished(Ok(()));
            }
            Err(e) => {
                tracing::warn!("Filter options unavailable: {}", e);
                self.options_status = TaskStatus::Finished(Err(e));
            }
        }
        Outcome::effects(EffectSet::OPTIONS_CHANGED)
    }

    fn unit_problems_loaded(
        &mut self,
        token: RequestToken,
        unit: UnitRef,
        result: Result<Vec<UnitProblem>, FetchError>,
    ) -> Outcome {
        if !self.problem_tokens.is_latest(token) {
            tracing::debug!(%token, unit = %unit.identity, "Discarding stale problem list");
            return Outcome::none();
        }

        let problems = result.unwrap_or_else(|e| {
            tracing::warn!(unit = %unit.identity, "Problem lookup failed, showing none: {}", e);
            Vec::new()
        });
        tracing::info!(unit = %unit.identity, count = problems.len(), "Opening problem overlay");
        self.overlay = Overlay::UnitProblems { unit, problems };
        Outcome::effects(EffectSet::OVERLAY_CHANGED)
    }
}
