//! Board representation and battlefield queries.
//!
//! Contains the arena geometry, unit model, snapshot container, and the
//! pathing and targeting services the simulator relies on.

pub mod action;
pub mod lane;
pub mod location;
pub mod navigation;
pub mod state;
pub mod targeting;
pub mod unit;

pub use action::{Action, Verb};
pub use lane::{LaneCounts, LaneZone, LANE_COUNT};
pub use location::{
    enemy_spawn_locations, friendly_spawn_locations, Edge, Location, ARENA_SIZE, CELL_COUNT,
    EDGE_LEN, HALF_ARENA,
};
pub use navigation::Navigator;
pub use state::{BoardError, GameState};
pub use targeting::{range_mask, shield_mask, RangeMask};
pub use unit::{Cost, Player, Resource, Unit, UnitId, UnitStats, UnitType, UNIT_TYPE_COUNT};
