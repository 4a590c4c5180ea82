//! Diagram installation: element extraction and interactivity binding.
//!
//! A fetched document is scanned once for interactive elements. Each one is
//! decoded into its identity and registered with a tooltip card keyed by
//! that identity. The whole binding is rebuilt for every installed document;
//! nothing carries over from the previous diagram.

use navigator_core::{ElementKind, IdentityCodec};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use thiserror::Error;

use crate::api::DiagramDocument;

const ATTR_ID: &[u8] = b"id";
const ATTR_CLASS: &[u8] = b"class";
const ATTR_NAME: &[u8] = b"data_name";
const ATTR_ISSUES: &[u8] = b"data_issues";
const ATTR_SIZE: &[u8] = b"data_size";

#[derive(Debug, Error)]
pub enum DiagramError {
    #[error("Invalid diagram markup: {0}")]
    Markup(#[from] quick_xml::Error),

    #[error("Invalid attribute in diagram markup: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),
}

/// Descriptive attributes attached by the renderer. Shown, never interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementPayload {
    pub name: Option<String>,
    pub issues: Option<String>,
    pub size: Option<String>,
}

/// An interactive node of the rendered diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualElement {
    /// The element's own `id` attribute, undecoded.
    pub raw_id: String,
    pub kind: ElementKind,
    pub payload: ElementPayload,
}

impl VisualElement {
    /// Decoded identity, empty when the id does not fit the kind's grammar.
    pub fn identity(&self) -> String {
        IdentityCodec::decode(&self.raw_id, self.kind)
    }
}

/// Hover content for one identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipCard {
    pub identity: String,
    pub kind: ElementKind,
    pub payload: ElementPayload,
}

impl TooltipCard {
    /// Label/value rows in display order. Missing attributes are omitted.
    pub fn rows(&self) -> Vec<(&'static str, &str)> {
        let mut rows = Vec::with_capacity(4);
        if let Some(name) = &self.payload.name {
            rows.push(("Name", name.as_str()));
        }
        rows.push(("ID", self.identity.as_str()));
        if let Some(issues) = &self.payload.issues {
            rows.push(("Issues", issues.as_str()));
        }
        if let Some(size) = &self.payload.size {
            rows.push(("Size", size.as_str()));
        }
        rows
    }
}

/// Scan SVG markup for interactive `rect` and `path` elements.
///
/// An element is interactive when its class names a level tag. Tagged
/// elements without an `id` or with an unreadable attribute are skipped.
pub fn extract_elements(markup: &str) -> Result<Vec<VisualElement>, DiagramError> {
    let mut reader = Reader::from_str(markup);
    let mut elements = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(start) | Event::Empty(start) => match visual_element(&start) {
                Ok(Some(element)) => elements.push(element),
                Ok(None) => {}
                Err(e) => {
                    tracing::debug!(
                        position = reader.buffer_position(),
                        "Skipping element with bad attribute: {}",
                        e
                    );
                }
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(elements)
}

fn visual_element(start: &BytesStart<'_>) -> Result<Option<VisualElement>, DiagramError> {
    if !matches!(start.local_name().as_ref(), b"rect" | b"path") {
        return Ok(None);
    }

    let mut id = None;
    let mut kind = None;
    let mut payload = ElementPayload::default();

    for attr in start.attributes() {
        let attr = attr?;
        let key = attr.key.as_ref();
        if !matches!(key, ATTR_ID | ATTR_CLASS | ATTR_NAME | ATTR_ISSUES | ATTR_SIZE) {
            continue;
        }
        let value = attr.unescape_value()?.into_owned();
        match key {
            ATTR_ID => id = Some(value),
            ATTR_CLASS => {
                kind = value
                    .split_whitespace()
                    .find_map(|class| class.parse::<ElementKind>().ok());
            }
            ATTR_NAME => payload.name = Some(value),
            ATTR_ISSUES => payload.issues = Some(value),
            ATTR_SIZE => payload.size = Some(value),
            _ => {}
        }
    }

    let Some(kind) = kind else {
        return Ok(None);
    };
    match id.filter(|id| !id.is_empty()) {
        Some(raw_id) => Ok(Some(VisualElement {
            raw_id,
            kind,
            payload,
        })),
        None => {
            tracing::debug!(kind = %kind, "Skipping {} element without id", kind);
            Ok(None)
        }
    }
}

/// An installed document with its interactivity bound.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundDiagram {
    document: DiagramDocument,
    elements: Vec<VisualElement>,
    by_raw_id: HashMap<String, usize>,
    cards: HashMap<String, TooltipCard>,
}

impl BoundDiagram {
    /// Extract, decode and register every interactive element of `document`.
    ///
    /// Unparsable markup binds nothing; the document is still installed.
    pub fn bind(document: DiagramDocument) -> Self {
        let elements = match extract_elements(document.markup()) {
            Ok(elements) => elements,
            Err(e) => {
                tracing::warn!("Diagram installed without interactivity: {}", e);
                Vec::new()
            }
        };

        let mut by_raw_id = HashMap::with_capacity(elements.len());
        let mut cards = HashMap::with_capacity(elements.len());
        let mut malformed = 0usize;

        for (index, element) in elements.iter().enumerate() {
            by_raw_id.entry(element.raw_id.clone()).or_insert(index);

            match IdentityCodec::try_decode(&element.raw_id, element.kind) {
                Ok(identity) => {
                    // First element wins when two decode to the same identity.
                    cards
                        .entry(identity.to_string())
                        .or_insert_with(|| TooltipCard {
                            identity: identity.to_string(),
                            kind: element.kind,
                            payload: element.payload.clone(),
                        });
                }
                Err(fault) => {
                    malformed += 1;
                    tracing::debug!("No tooltip for {:?}: {}", element.raw_id, fault);
                }
            }
        }

        tracing::debug!(
            elements = elements.len(),
            cards = cards.len(),
            malformed,
            "Bound diagram"
        );

        Self {
            document,
            elements,
            by_raw_id,
            cards,
        }
    }

    pub fn document(&self) -> &DiagramDocument {
        &self.document
    }

    pub fn markup(&self) -> &str {
        self.document.markup()
    }

    pub fn elements(&self) -> &[VisualElement] {
        &self.elements
    }

    /// Look up an element by its raw `id` attribute.
    pub fn element(&self, raw_id: &str) -> Option<&VisualElement> {
        self.by_raw_id.get(raw_id).map(|&i| &self.elements[i])
    }

    /// Tooltip card registered for a decoded identity.
    pub fn card(&self, identity: &str) -> Option<&TooltipCard> {
        self.cards.get(identity)
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    /// True when the document has no interactive elements.
    pub fn is_inert(&self) -> bool {
        self.elements.is_empty()
    }
}
