//! Decoding node identities out of composite element ids.
//!
//! The default renderer writes colon-delimited ids that grow one segment
//! per level:
//!
//! ```text
//! site      RU1
//! building  RU1:B14
//! floor     RU1:B14:F1
//! unit      RU1:B14:F1:G0002
//! ```
//!
//! The building-plan renderer writes room outlines taken from architectural
//! drawings, tagged `unit-room`, with semicolon-delimited ids and no site
//! segment: `B14;F1;G0002`.
//!
//! Which grammar applies is decided by the element's level tag alone.

use crate::level::ElementKind;
use crate::Fault;

const COLON: char = ':';
const SEMICOLON: char = ';';

/// Decodes the identity of a node from its composite id and level tag.
pub struct IdentityCodec;

impl IdentityCodec {
    /// Decode the identity, or an empty string when the id is malformed.
    ///
    /// An empty identity means no tooltip or problem lookup is possible for
    /// the element; it is never an error for the caller.
    ///
    /// ```
    /// use navigator_core::{ElementKind, IdentityCodec};
    ///
    /// assert_eq!(IdentityCodec::decode("RU1:B14:F1", ElementKind::Floor), "F1");
    /// assert_eq!(IdentityCodec::decode("B14;F1;G0002", ElementKind::UnitRoom), "G0002");
    /// assert_eq!(IdentityCodec::decode("", ElementKind::Unit), "");
    /// ```
    pub fn decode(id: &str, kind: ElementKind) -> String {
        Self::try_decode(id, kind)
            .map(str::to_string)
            .unwrap_or_default()
    }

    /// Decode the identity, borrowing from `id`.
    pub fn try_decode(id: &str, kind: ElementKind) -> Result<&str, Fault> {
        let decoded = match kind {
            ElementKind::Site => segment(id, COLON, 0),
            ElementKind::Building => segment(id, COLON, 1),
            ElementKind::Floor => segment(id, COLON, 2),
            ElementKind::Unit => segment(id, COLON, 3),
            // Room ids occasionally come through in the colon grammar.
            ElementKind::UnitRoom => {
                segment(id, SEMICOLON, 2).or_else(|| segment(id, COLON, 3))
            }
        };

        decoded.ok_or_else(|| Fault::MalformedIdentity {
            id: id.to_string(),
            kind,
        })
    }
}

/// The `index`-th segment of `id`, `None` when absent or empty.
fn segment(id: &str, delimiter: char, index: usize) -> Option<&str> {
    id.split(delimiter)
        .nth(index)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
