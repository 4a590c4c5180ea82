//! Rendering server boundary.
//!
//! `NavigatorBackend` is the only way the navigator talks to the outside
//! world. `HttpBackend` is the production implementation; tests substitute
//! in-memory backends.

pub mod http;

use async_trait::async_trait;
use navigator_core::{ElementKind, FilterOptions, Level, ParentKey, QueryDescriptor, VisualizationMode};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::FetchError;

pub use http::HttpBackend;

pub type Result<T> = std::result::Result<T, FetchError>;

#[async_trait]
pub trait NavigatorBackend: Send + Sync {
    /// Render the children of `request.parent_key` at `request.level`.
    async fn fetch_diagram(&self, request: &DiagramRequest) -> Result<DiagramDocument>;

    /// Legal values per server-supplied filter dimension.
    async fn fetch_filter_options(&self) -> Result<FilterOptions>;

    /// Outstanding maintenance problems of one unit under the given filters.
    async fn fetch_unit_problems(
        &self,
        unit: &UnitRef,
        filters: &QueryDescriptor,
    ) -> Result<Vec<UnitProblem>>;

    /// Drop whatever the server has cached.
    async fn clear_server_cache(&self) -> Result<()>;
}

/// Everything that determines which diagram is shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramRequest {
    pub level: Level,
    pub parent_key: ParentKey,
    pub filters: QueryDescriptor,
    pub mode: VisualizationMode,
}

/// Renderable markup returned by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramDocument {
    markup: String,
}

impl DiagramDocument {
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
        }
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }
}

/// A clicked unit or room, as sent to the problem lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitRef {
    /// Raw element id; the server re-splits it by grammar.
    pub composite_id: String,

    /// Decoded unit code, never empty.
    pub identity: String,

    pub kind: ElementKind,
}

/// Activity log id; numeric or textual depending on the source table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LogId {
    Number(i64),
    Text(String),
}

impl fmt::Display for LogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogId::Number(n) => write!(f, "{n}"),
            LogId::Text(s) => f.write_str(s),
        }
    }
}

/// One outstanding maintenance issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitProblem {
    pub log_id: LogId,
    #[serde(default)]
    pub description: Option<String>,
}
