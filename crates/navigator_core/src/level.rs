//! Hierarchy levels, level tags and the typed parent key.

use crate::Fault;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Depth in the site → building → floor → unit hierarchy.
///
/// The level says which children are being displayed: at `Building` the
/// diagram shows the buildings of the site named by the parent key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    Site,
    Building,
    Floor,
    Unit,
}

impl Level {
    pub const ALL: [Level; 4] = [Level::Site, Level::Building, Level::Floor, Level::Unit];

    /// Wire name used in the `level` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Site => "site",
            Level::Building => "building",
            Level::Floor => "floor",
            Level::Unit => "unit",
        }
    }

    /// The next deeper level, `None` at the leaf.
    pub fn deeper(&self) -> Option<Level> {
        match self {
            Level::Site => Some(Level::Building),
            Level::Building => Some(Level::Floor),
            Level::Floor => Some(Level::Unit),
            Level::Unit => None,
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self, Level::Site)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Fault;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "site" => Ok(Level::Site),
            "building" => Ok(Level::Building),
            "floor" => Ok(Level::Floor),
            "unit" => Ok(Level::Unit),
            other => Err(Fault::UnknownLevel(other.to_string())),
        }
    }
}

/// Role of a rendered element, taken from its `class` attribute.
///
/// `UnitRoom` only appears in building-plan diagrams, where a unit is drawn
/// as the room outline from the architectural drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
    Site,
    Building,
    Floor,
    Unit,
    UnitRoom,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Site => "site",
            ElementKind::Building => "building",
            ElementKind::Floor => "floor",
            ElementKind::Unit => "unit",
            ElementKind::UnitRoom => "unit-room",
        }
    }

    /// Level shown after clicking an element of this kind.
    ///
    /// A site click shows its buildings, a building click its floors and a
    /// floor click its units. Units and rooms are leaves: `None`.
    pub fn drill_target(&self) -> Option<Level> {
        match self {
            ElementKind::Site => Some(Level::Building),
            ElementKind::Building => Some(Level::Floor),
            ElementKind::Floor => Some(Level::Unit),
            ElementKind::Unit | ElementKind::UnitRoom => None,
        }
    }

    /// Like [`drill_target`](Self::drill_target), with the leaf case as a fault.
    pub fn try_drill_target(&self) -> Result<Level, Fault> {
        self.drill_target().ok_or(Fault::NotDrillable(*self))
    }

    pub fn is_leaf(&self) -> bool {
        self.drill_target().is_none()
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementKind {
    type Err = Fault;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "site" => Ok(ElementKind::Site),
            "building" => Ok(ElementKind::Building),
            "floor" => Ok(ElementKind::Floor),
            "unit" => Ok(ElementKind::Unit),
            "unit-room" => Ok(ElementKind::UnitRoom),
            other => Err(Fault::UnknownLevel(other.to_string())),
        }
    }
}

/// Identifier of the node whose children are displayed.
///
/// Always the raw element id that was clicked (never a decoded segment),
/// so it can be handed back to the renderer unchanged. Empty means root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParentKey(String);

impl ParentKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn root() -> Self {
        Self(String::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParentKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ParentKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Rendering style requested from the renderer.
///
/// The mode also fixes the identifier grammar of the returned diagram:
/// building plans use semicolon-delimited room ids at unit level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisualizationMode {
    #[default]
    Squarified,
    BuildingPlans,
}

impl VisualizationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisualizationMode::Squarified => "squarified",
            VisualizationMode::BuildingPlans => "building-plans",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            VisualizationMode::Squarified => VisualizationMode::BuildingPlans,
            VisualizationMode::BuildingPlans => VisualizationMode::Squarified,
        }
    }
}

impl fmt::Display for VisualizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisualizationMode {
    type Err = Fault;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "squarified" => Ok(VisualizationMode::Squarified),
            "building-plans" => Ok(VisualizationMode::BuildingPlans),
            other => Err(Fault::UnknownMode(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_round_trips_through_wire_name() {
        for level in Level::ALL {
            assert_eq!(level.as_str().parse::<Level>().unwrap(), level);
        }
        assert!(matches!(
            "campus".parse::<Level>(),
            Err(Fault::UnknownLevel(_))
        ));
    }

    #[test]
    fn level_deeper_stops_at_unit() {
        assert_eq!(Level::Site.deeper(), Some(Level::Building));
        assert_eq!(Level::Floor.deeper(), Some(Level::Unit));
        assert_eq!(Level::Unit.deeper(), None);
    }

    #[test]
    fn element_kind_drill_targets() {
        assert_eq!(ElementKind::Site.drill_target(), Some(Level::Building));
        assert_eq!(ElementKind::Building.drill_target(), Some(Level::Floor));
        assert_eq!(ElementKind::Floor.drill_target(), Some(Level::Unit));
        assert!(ElementKind::Unit.is_leaf());
        assert!(ElementKind::UnitRoom.is_leaf());
        assert_eq!(
            ElementKind::UnitRoom.try_drill_target(),
            Err(Fault::NotDrillable(ElementKind::UnitRoom))
        );
    }

    #[test]
    fn element_kind_parses_room_tag() {
        assert_eq!(
            "unit-room".parse::<ElementKind>().unwrap(),
            ElementKind::UnitRoom
        );
        assert!("hover-info-box".parse::<ElementKind>().is_err());
    }

    #[test]
    fn parent_key_root() {
        assert!(ParentKey::root().is_root());
        assert!(ParentKey::default().is_root());
        assert!(!ParentKey::from("RU1").is_root());
    }

    #[test]
    fn mode_wire_names() {
        assert_eq!(VisualizationMode::default().as_str(), "squarified");
        assert_eq!(
            "building-plans".parse::<VisualizationMode>().unwrap(),
            VisualizationMode::BuildingPlans
        );
        assert_eq!(
            VisualizationMode::Squarified.toggled(),
            VisualizationMode::BuildingPlans
        );
    }
}
