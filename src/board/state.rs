//! Battlefield snapshot.
//!
//! Holds every unit on the board plus both players' resource pools.
//!
//! Design: units live in a flat table indexed by [`UnitId`]; each cell of
//! the dense `ARENA_SIZE * ARENA_SIZE` grid holds the ids standing on it.
//! Cloning a snapshot is a structural copy of these two arrays, which is
//! what the search does for every hypothesis it scores.

use thiserror::Error;

use super::action::{Action, Verb};
use super::location::{Location, CELL_COUNT};
use super::unit::{Player, Resource, Unit, UnitId, UnitType};

/// Errors raised by snapshot mutation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoardError {
    #[error("location {0} is outside the arena")]
    InvalidLocation(Location),

    #[error("location {0} already holds a structure")]
    Occupied(Location),

    #[error("no structure at {0}")]
    NoStructure(Location),

    #[error("structure at {0} is already upgraded")]
    AlreadyUpgraded(Location),

    #[error("structure at {0} belongs to the other player")]
    NotOwned(Location),

    #[error("insufficient {resource}: need {required}, have {available}")]
    InsufficientResources {
        resource: Resource,
        required: f32,
        available: f32,
    },
}

/// Complete battlefield state at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    /// Unit table indexed by id; `None` once removed.
    units: Vec<Option<Unit>>,
    /// Ids standing on each cell, indexed by `Location::index`.
    cells: Vec<Vec<UnitId>>,
    /// `resources[player][resource]`.
    resources: [[f32; 2]; 2],
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new()
    }
}

impl GameState {
    /// Creates an empty board with no resources.
    pub fn new() -> Self {
        GameState {
            units: Vec::new(),
            cells: vec![Vec::new(); CELL_COUNT],
            resources: [[0.0; 2]; 2],
        }
    }

    /// Returns the amount of `resource` held by `player`.
    pub fn get_resource(&self, resource: Resource, player: Player) -> f32 {
        self.resources[player.index()][resource.index()]
    }

    /// Sets the amount of `resource` held by `player`.
    pub fn set_resource(&mut self, resource: Resource, player: Player, amount: f32) {
        self.resources[player.index()][resource.index()] = amount;
    }

    /// Returns the unit with the given id, if it is still on the board.
    #[inline]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id).and_then(Option::as_ref)
    }

    #[inline]
    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(id).and_then(Option::as_mut)
    }

    /// Iterates every unit on the board in id order.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().flatten()
    }

    /// One past the highest id ever issued.
    pub fn id_capacity(&self) -> usize {
        self.units.len()
    }

    /// Ids of the units standing on `loc`. Empty for out-of-bounds cells.
    pub fn unit_ids_at(&self, loc: Location) -> &[UnitId] {
        if !loc.in_arena_bounds() {
            return &[];
        }
        &self.cells[loc.index()]
    }

    /// Units standing on `loc`.
    pub fn units_at(&self, loc: Location) -> impl Iterator<Item = &Unit> {
        self.unit_ids_at(loc).iter().filter_map(|&id| self.unit(id))
    }

    /// The structure occupying `loc`, if any.
    pub fn stationary_unit_at(&self, loc: Location) -> Option<&Unit> {
        self.units_at(loc).find(|u| u.is_stationary())
    }

    pub fn contains_stationary_unit(&self, loc: Location) -> bool {
        self.stationary_unit_at(loc).is_some()
    }

    /// True if `loc` holds a wall or turret.
    pub fn contains_stationary_nonsupport_unit(&self, loc: Location) -> bool {
        self.stationary_unit_at(loc)
            .is_some_and(|u| u.unit_type != UnitType::Support)
    }

    /// Spawns `count` units of `unit_type` for `player` at `loc` without
    /// checking or charging resources. Returns the contiguous id range issued.
    pub fn unsafe_spawn(
        &mut self,
        unit_type: UnitType,
        loc: Location,
        player: Player,
        count: usize,
    ) -> Result<std::ops::Range<UnitId>, BoardError> {
        if !loc.in_arena_bounds() {
            return Err(BoardError::InvalidLocation(loc));
        }
        if self.contains_stationary_unit(loc) {
            return Err(BoardError::Occupied(loc));
        }
        let count = if unit_type.is_stationary() { count.min(1) } else { count };
        let first = self.units.len();
        for id in first..first + count {
            self.units.push(Some(Unit::new(id, unit_type, player, loc)));
            self.cells[loc.index()].push(id);
        }
        Ok(first..first + count)
    }

    /// Upgrades the structure at `loc` without checking or charging resources.
    pub fn unsafe_upgrade(&mut self, loc: Location) -> Result<(), BoardError> {
        let id = self.structure_id(loc)?;
        match self.unit_mut(id) {
            Some(unit) if unit.upgraded => Err(BoardError::AlreadyUpgraded(loc)),
            Some(unit) => {
                unit.upgrade();
                Ok(())
            }
            None => Err(BoardError::NoStructure(loc)),
        }
    }

    /// Removes a unit from the board and returns it.
    pub fn remove_unit(&mut self, id: UnitId) -> Option<Unit> {
        let unit = self.units.get_mut(id)?.take()?;
        let cell = &mut self.cells[unit.location.index()];
        if let Some(pos) = cell.iter().position(|&u| u == id) {
            cell.remove(pos);
        }
        Some(unit)
    }

    /// Moves a unit to `to`. Returns false if the unit is gone or `to` is
    /// outside the arena.
    pub fn move_unit(&mut self, id: UnitId, to: Location) -> bool {
        if !to.in_arena_bounds() {
            return false;
        }
        let Some(unit) = self.units.get_mut(id).and_then(Option::as_mut) else {
            return false;
        };
        let from = unit.location;
        unit.location = to;
        let cell = &mut self.cells[from.index()];
        if let Some(pos) = cell.iter().position(|&u| u == id) {
            cell.remove(pos);
        }
        self.cells[to.index()].push(id);
        true
    }

    /// Executes an action for `player` the way the game would: resources
    /// are checked and charged, and ownership is enforced.
    pub fn apply(&mut self, action: &Action, player: Player) -> Result<(), BoardError> {
        let loc = action.location;
        if !loc.in_arena_bounds() {
            return Err(BoardError::InvalidLocation(loc));
        }
        match action.verb {
            Verb::Spawn(unit_type) => {
                if self.contains_stationary_unit(loc) {
                    return Err(BoardError::Occupied(loc));
                }
                let cost = unit_type.cost(false);
                self.charge(player, cost.structure, cost.mobile)?;
                self.unsafe_spawn(unit_type, loc, player, 1)?;
            }
            Verb::Upgrade => {
                let id = self.structure_id(loc)?;
                let (unit_type, owner, upgraded) = match self.unit(id) {
                    Some(u) => (u.unit_type, u.owner, u.upgraded),
                    None => return Err(BoardError::NoStructure(loc)),
                };
                if owner != player {
                    return Err(BoardError::NotOwned(loc));
                }
                if upgraded {
                    return Err(BoardError::AlreadyUpgraded(loc));
                }
                let cost = unit_type.cost(true);
                self.charge(player, cost.structure, cost.mobile)?;
                self.unsafe_upgrade(loc)?;
            }
            Verb::Remove => {
                let id = self.structure_id(loc)?;
                if self.unit(id).map(|u| u.owner) != Some(player) {
                    return Err(BoardError::NotOwned(loc));
                }
                self.remove_unit(id);
            }
        }
        Ok(())
    }

    /// Id of the structure at `loc`.
    fn structure_id(&self, loc: Location) -> Result<UnitId, BoardError> {
        if !loc.in_arena_bounds() {
            return Err(BoardError::InvalidLocation(loc));
        }
        self.stationary_unit_at(loc)
            .map(|u| u.id)
            .ok_or(BoardError::NoStructure(loc))
    }

    /// Deducts a price from `player`, failing without side effects if
    /// either pool is short.
    fn charge(&mut self, player: Player, structure: f32, mobile: f32) -> Result<(), BoardError> {
        for (resource, required) in [(Resource::Structure, structure), (Resource::Mobile, mobile)] {
            let available = self.get_resource(resource, player);
            if required > available {
                return Err(BoardError::InsufficientResources { resource, required, available });
            }
        }
        self.resources[player.index()][Resource::Structure.index()] -= structure;
        self.resources[player.index()][Resource::Mobile.index()] -= mobile;
        Ok(())
    }
}
