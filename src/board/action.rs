//! Actions produced by the search.
//!
//! An action is a verb applied at a single cell. The data model maps
//! directly onto the game's deploy commands so the caller can submit the
//! list verbatim.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::location::Location;
use super::unit::{Cost, UnitType};

/// What to do at a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verb {
    /// Place a new unit: `FF 4,13`
    Spawn(UnitType),
    /// Upgrade the structure standing there: `UPG 4,13`
    Upgrade,
    /// Remove one of our structures: `REMOVE 4,13`
    Remove,
}

/// A verb applied at a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    pub verb: Verb,
    pub location: Location,
}

impl Action {
    pub fn spawn(unit_type: UnitType, location: Location) -> Self {
        Action { verb: Verb::Spawn(unit_type), location }
    }

    pub fn upgrade(location: Location) -> Self {
        Action { verb: Verb::Upgrade, location }
    }

    pub fn remove(location: Location) -> Self {
        Action { verb: Verb::Remove, location }
    }

    /// Price of the action given the type of structure it touches.
    /// `target` is ignored for spawns.
    pub fn cost(&self, target: Option<UnitType>) -> Cost {
        match (self.verb, target) {
            (Verb::Spawn(unit_type), _) => unit_type.cost(false),
            (Verb::Upgrade, Some(unit_type)) => unit_type.cost(true),
            _ => Cost::default(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Location { x, y } = self.location;
        match self.verb {
            Verb::Spawn(unit_type) => write!(f, "{} {},{}", unit_type, x, y),
            Verb::Upgrade => write!(f, "UPG {},{}", x, y),
            Verb::Remove => write!(f, "REMOVE {},{}", x, y),
        }
    }
}
