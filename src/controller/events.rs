//! Navigator events, commands and the outcome of handling one event.

use navigator_core::{EffectSet, FilterOptions, FilterValue, QueryDescriptor, Rect, Size, VisualizationMode};
use std::fmt;

use crate::api::{DiagramDocument, DiagramRequest, UnitProblem, UnitRef};
use crate::error::FetchError;

// =============================================================================
// REQUEST TOKENS
// =============================================================================

/// Identifies one issued request. Later requests carry larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic token source. One per request kind.
#[derive(Debug, Default)]
pub struct TokenSequence {
    last: u64,
}

impl TokenSequence {
    pub fn issue(&mut self) -> RequestToken {
        self.last += 1;
        RequestToken(self.last)
    }

    /// Most recently issued token, if any.
    pub fn latest(&self) -> Option<RequestToken> {
        (self.last > 0).then_some(RequestToken(self.last))
    }

    pub fn is_latest(&self, token: RequestToken) -> bool {
        self.latest() == Some(token)
    }
}

// =============================================================================
// NAV EVENT - User intent and task results
// =============================================================================

/// Everything the navigator reacts to.
///
/// The display surface emits interaction events; the runtime emits the
/// result events when a command completes.
#[derive(Debug, Clone)]
pub enum NavEvent {
    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------
    /// Issue the initial diagram and filter option requests.
    Start,

    /// Re-issue the diagram request for the current state.
    Refresh,

    // -------------------------------------------------------------------------
    // Diagram interaction
    // -------------------------------------------------------------------------
    /// An element of the installed diagram was clicked.
    ElementClicked { raw_id: String },

    /// Pointer entered an element. Boxes are measured by the surface.
    HoverEnter {
        raw_id: String,
        anchor: Rect,
        tooltip_size: Size,
        viewport: Size,
    },

    /// Pointer left an element.
    HoverLeave { raw_id: String },

    ViewportResized(Size),

    // -------------------------------------------------------------------------
    // Side panel controls
    // -------------------------------------------------------------------------
    Back,
    Forward,

    /// Flip membership of one value in a dimension.
    ToggleFilter {
        dimension: String,
        value: FilterValue,
    },

    /// Replace the selection of a dimension (multi-select widgets).
    SetFilter {
        dimension: String,
        values: Vec<FilterValue>,
    },

    /// Reset every dimension to no selection.
    ClearFilters,

    SetMode(VisualizationMode),

    TogglePanel,

    /// Clear the server cache and the local selection.
    ClearCache,

    /// Close the unit problem overlay.
    CloseOverlay,

    // -------------------------------------------------------------------------
    // Task results
    // -------------------------------------------------------------------------
    DiagramLoaded {
        token: RequestToken,
        result: Result<DiagramDocument, FetchError>,
    },

    FilterOptionsLoaded(Result<FilterOptions, FetchError>),

    UnitProblemsLoaded {
        token: RequestToken,
        unit: UnitRef,
        result: Result<Vec<UnitProblem>, FetchError>,
    },

    CacheCleared(Result<(), FetchError>),
}

// =============================================================================
// NAV COMMAND - IO to perform
// =============================================================================

/// Requests to the rendering server, executed by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum NavCommand {
    FetchDiagram {
        token: RequestToken,
        request: DiagramRequest,
    },

    FetchFilterOptions,

    FetchUnitProblems {
        token: RequestToken,
        unit: UnitRef,
        filters: QueryDescriptor,
    },

    ClearServerCache,
}

/// What handling one event changed, and what IO it asks for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    pub effects: EffectSet,
    pub commands: Vec<NavCommand>,
}

impl Outcome {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn effects(effects: EffectSet) -> Self {
        Self {
            effects,
            commands: Vec::new(),
        }
    }

    pub fn with_command(mut self, command: NavCommand) -> Self {
        self.commands.push(command);
        self
    }

    pub fn merge(&mut self, other: Outcome) {
        self.effects |= other.effects;
        self.commands.extend(other.commands);
    }

    /// The diagram requests among the commands.
    pub fn diagram_requests(&self) -> impl Iterator<Item = &DiagramRequest> {
        self.commands.iter().filter_map(|c| match c {
            NavCommand::FetchDiagram { request, .. } => Some(request),
            _ => None,
        })
    }
}
