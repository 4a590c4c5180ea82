//! Treemap navigator - drill-down client for server-rendered facility treemaps.
//!
//! The rendering server draws a site → building → floor → unit hierarchy as
//! SVG. This crate is the interactive side: it keeps the drill-down history,
//! the filter selection and the visualization mode, requests a new diagram
//! whenever one of them changes, and binds hover tooltips and clicks over
//! every installed diagram.
//!
//! ## Layers
//!
//! - [`navigator_core`] - pure rules: levels, history, filters, identity decoding, tooltip placement
//! - [`controller`] - the state machine; events in, effects and commands out
//! - [`runtime`] - tokio driver executing commands against a [`api::NavigatorBackend`]
//! - [`api`] - backend trait and the reqwest-based HTTP client
//! - [`diagram`] - SVG element extraction and binding
//! - [`surface`] - display trait
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use treemap_navigator::{HttpBackend, LogSurface, Navigator, NavigatorConfig};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! treemap_navigator::telemetry::init_tracing();
//! let config = NavigatorConfig::from_env()?;
//! let backend = Arc::new(HttpBackend::new(&config)?);
//! let (navigator, handle) = Navigator::new(&config, backend, LogSurface::new());
//!
//! let running = tokio::spawn(navigator.run());
//! // ... forward UI events through `handle` ...
//! drop(handle);
//! running.await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod controller;
pub mod diagram;
pub mod error;
pub mod runtime;
pub mod surface;
pub mod telemetry;

pub use api::{
    DiagramDocument, DiagramRequest, HttpBackend, LogId, NavigatorBackend, UnitProblem, UnitRef,
};
pub use config::{ConfigError, NavigatorConfig};
pub use controller::{
    DisplayState, NavCommand, NavEvent, Outcome, Overlay, RequestToken, TooltipState,
    VisualizationController,
};
pub use diagram::{BoundDiagram, TooltipCard, VisualElement};
pub use error::{DisplayError, FetchError};
pub use runtime::{Navigator, NavigatorHandle};
pub use surface::{DisplaySurface, LogSurface};

pub use navigator_core;
