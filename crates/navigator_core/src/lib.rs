//! Navigator core - the I/O-free half of the treemap navigator.
//!
//! Everything in this crate is synchronous and deterministic. The runtime
//! crate owns the network and the display; this crate owns the rules:
//!
//! - [`Level`] / [`ElementKind`] - hierarchy depth and the level tags the renderer emits
//! - [`HistoryTimeline`] - cursor-addressed back/forward history
//! - [`FilterSelection`] - per-dimension selected values and their query form
//! - [`IdentityCodec`] - decoding node identities out of composite element ids
//! - [`TooltipPlacer`] - viewport-clamped placement of hover popups
//! - [`EffectSet`] - what a transition changed, for the display layer
//! - [`Fault`] - recoverable domain errors

pub mod effect;
pub mod fault;
pub mod filter;
pub mod geometry;
pub mod history;
pub mod identity;
pub mod level;
pub mod tooltip;

pub use effect::EffectSet;
pub use fault::Fault;
pub use filter::{
    dimensions, FilterOptions, FilterSelection, FilterValue, QueryDescriptor,
    TIME_TO_COMPLETE_BUCKETS,
};
pub use geometry::{Point, Rect, Size};
pub use history::{HistoryTimeline, NavigationEntry};
pub use identity::IdentityCodec;
pub use level::{ElementKind, Level, ParentKey, VisualizationMode};
pub use tooltip::TooltipPlacer;
