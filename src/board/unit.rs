//! Unit types, stats, costs, and ownership.
//!
//! Six unit kinds share the board: three stationary structures (walls,
//! supports, turrets) and three mobile attackers (scouts, demolishers,
//! interceptors). All per-kind numbers live in the tables below and are
//! resolved once from `(type, upgraded)`.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::location::{Location, ARENA_SIZE};

/// Stable unit identifier, unique within a snapshot and never reused.
pub type UnitId = usize;

/// Number of unit kinds.
pub const UNIT_TYPE_COUNT: usize = 6;

/// Flat shield granted by an un-upgraded support.
const SUPPORT_SHIELD: f32 = 3.0;
/// Base of the upgraded support shield, before the row bonus.
const UPGRADED_SUPPORT_SHIELD: f32 = 2.0;
/// Extra upgraded shield per row of distance from the nearer horizontal border.
const UPGRADED_SUPPORT_SHIELD_PER_ROW: f32 = 0.3;

/// The owning player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Player {
    Friendly,
    Enemy,
}

impl Player {
    /// Player index as used by the game: 0 for self, 1 for the opponent.
    pub const fn index(self) -> usize {
        match self {
            Player::Friendly => 0,
            Player::Enemy => 1,
        }
    }
}

/// The two resource pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resource {
    /// Structure points, spent on walls, supports, and turrets.
    Structure,
    /// Mobile points, spent on scouts, demolishers, and interceptors.
    Mobile,
}

impl Resource {
    pub const fn index(self) -> usize {
        match self {
            Resource::Structure => 0,
            Resource::Mobile => 1,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Structure => f.write_str("SP"),
            Resource::Mobile => f.write_str("MP"),
        }
    }
}

/// A price in both resource denominations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Cost {
    pub structure: f32,
    pub mobile: f32,
}

impl Cost {
    const fn sp(structure: f32) -> Cost {
        Cost { structure, mobile: 0.0 }
    }

    const fn mp(mobile: f32) -> Cost {
        Cost { structure: 0.0, mobile }
    }

    pub fn get(&self, resource: Resource) -> f32 {
        match resource {
            Resource::Structure => self.structure,
            Resource::Mobile => self.mobile,
        }
    }
}

/// Combat stats derived from `(type, upgraded)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitStats {
    pub max_health: f32,
    /// Damage dealt to stationary targets.
    pub damage_structure: f32,
    /// Damage dealt to mobile targets.
    pub damage_mobile: f32,
    /// Attack range, or shield range for supports.
    pub range: f32,
    /// Moves once every `cadence` ticks; 0 for structures.
    pub cadence: u32,
    /// Player damage dealt on reaching the target edge.
    pub breach_damage: u32,
    /// Added to remaining health when self-destructing.
    pub self_destruct_bonus: f32,
}

impl UnitStats {
    const fn structure(max_health: f32, damage_mobile: f32, range: f32) -> Self {
        UnitStats {
            max_health,
            damage_structure: 0.0,
            damage_mobile,
            range,
            cadence: 0,
            breach_damage: 0,
            self_destruct_bonus: 0.0,
        }
    }
}

/// The kind of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnitType {
    Wall,
    Support,
    Turret,
    Scout,
    Demolisher,
    Interceptor,
}

impl UnitType {
    pub const ALL: [UnitType; UNIT_TYPE_COUNT] = [
        UnitType::Wall,
        UnitType::Support,
        UnitType::Turret,
        UnitType::Scout,
        UnitType::Demolisher,
        UnitType::Interceptor,
    ];

    /// The mobile kinds, in the order the simulator moves them.
    pub const MOBILE: [UnitType; 3] =
        [UnitType::Scout, UnitType::Demolisher, UnitType::Interceptor];

    /// Returns the game's two-letter shorthand.
    pub const fn shorthand(self) -> &'static str {
        match self {
            UnitType::Wall => "FF",
            UnitType::Support => "EF",
            UnitType::Turret => "DF",
            UnitType::Scout => "PI",
            UnitType::Demolisher => "EI",
            UnitType::Interceptor => "SI",
        }
    }

    pub const fn is_stationary(self) -> bool {
        matches!(self, UnitType::Wall | UnitType::Support | UnitType::Turret)
    }

    pub const fn is_mobile(self) -> bool {
        !self.is_stationary()
    }

    /// Placement cost when `upgraded` is false, upgrade cost when true.
    /// Mobile units cannot be upgraded and report a zero upgrade cost.
    pub const fn cost(self, upgraded: bool) -> Cost {
        match (self, upgraded) {
            (UnitType::Wall, _) => Cost::sp(2.0),
            (UnitType::Support, _) => Cost::sp(4.0),
            (UnitType::Turret, false) => Cost::sp(3.0),
            (UnitType::Turret, true) => Cost::sp(5.0),
            (UnitType::Scout, false) => Cost::mp(1.0),
            (UnitType::Demolisher, false) => Cost::mp(3.0),
            (UnitType::Interceptor, false) => Cost::mp(2.0),
            (_, true) => Cost { structure: 0.0, mobile: 0.0 },
        }
    }

    /// Structure-point value used to weight destruction of this unit.
    pub const fn structure_value(self, upgraded: bool) -> f32 {
        if self.is_stationary() {
            self.cost(upgraded).structure
        } else {
            0.0
        }
    }

    /// Combat stats for this kind at the given upgrade state.
    pub const fn stats(self, upgraded: bool) -> UnitStats {
        match (self, upgraded) {
            (UnitType::Wall, false) => UnitStats::structure(40.0, 0.0, 0.0),
            (UnitType::Wall, true) => UnitStats::structure(120.0, 0.0, 0.0),
            (UnitType::Support, false) => UnitStats::structure(20.0, 0.0, 2.5),
            (UnitType::Support, true) => UnitStats::structure(20.0, 0.0, 6.0),
            (UnitType::Turret, false) => UnitStats::structure(75.0, 6.0, 2.5),
            (UnitType::Turret, true) => UnitStats::structure(75.0, 14.0, 4.5),
            (UnitType::Scout, _) => UnitStats {
                max_health: 12.0,
                damage_structure: 2.0,
                damage_mobile: 2.0,
                range: 4.5,
                cadence: 1,
                breach_damage: 1,
                self_destruct_bonus: 3.0,
            },
            (UnitType::Demolisher, _) => UnitStats {
                max_health: 5.0,
                damage_structure: 8.0,
                damage_mobile: 8.0,
                range: 4.5,
                cadence: 2,
                breach_damage: 2,
                self_destruct_bonus: 0.0,
            },
            (UnitType::Interceptor, _) => UnitStats {
                max_health: 30.0,
                damage_structure: 0.0,
                damage_mobile: 20.0,
                range: 3.5,
                cadence: 4,
                breach_damage: 1,
                self_destruct_bonus: 10.0,
            },
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.shorthand())
    }
}

/// A unit on the board.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    pub id: UnitId,
    pub unit_type: UnitType,
    pub owner: Player,
    pub location: Location,
    pub health: f32,
    pub max_health: f32,
    /// Shield pool; absorbs damage before health.
    pub shield: f32,
    pub upgraded: bool,
}

impl Unit {
    /// Creates a fresh, un-upgraded unit at full health.
    pub fn new(id: UnitId, unit_type: UnitType, owner: Player, location: Location) -> Self {
        let max_health = unit_type.stats(false).max_health;
        Unit {
            id,
            unit_type,
            owner,
            location,
            health: max_health,
            max_health,
            shield: 0.0,
            upgraded: false,
        }
    }

    pub fn stats(&self) -> UnitStats {
        self.unit_type.stats(self.upgraded)
    }

    pub fn is_stationary(&self) -> bool {
        self.unit_type.is_stationary()
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Health plus shield.
    pub fn effective_health(&self) -> f32 {
        self.health + self.shield
    }

    /// Structure-point value of this unit.
    pub fn structure_value(&self) -> f32 {
        self.unit_type.structure_value(self.upgraded)
    }

    /// Shield this unit grants when it is a support; zero otherwise.
    pub fn shield_amount(&self) -> f32 {
        match (self.unit_type, self.upgraded) {
            (UnitType::Support, false) => SUPPORT_SHIELD,
            (UnitType::Support, true) => {
                let rows = self.location.y.min(ARENA_SIZE - 1 - self.location.y);
                UPGRADED_SUPPORT_SHIELD + UPGRADED_SUPPORT_SHIELD_PER_ROW * rows as f32
            }
            _ => 0.0,
        }
    }

    /// Adds to the shield pool.
    pub fn add_shield(&mut self, amount: f32) {
        self.shield += amount;
    }

    /// Applies `amount` damage, shield first. Returns the health that was
    /// actually removed (shield absorption excluded).
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let absorbed = amount.min(self.shield);
        self.shield -= absorbed;
        let removed = (amount - absorbed).min(self.health.max(0.0));
        self.health -= amount - absorbed;
        removed
    }

    /// Marks the unit destroyed.
    pub fn kill(&mut self) {
        self.health = 0.0;
        self.shield = 0.0;
    }

    /// Upgrades the unit in place. Added max health is granted as health.
    pub fn upgrade(&mut self) {
        let new_max = self.unit_type.stats(true).max_health;
        self.health += new_max - self.max_health;
        self.max_health = new_max;
        self.upgraded = true;
    }
}
