//! Lane zones.
//!
//! Five named regions strung along the friendly front line. Moving units
//! are tallied against the zones they pass through so that a simulated
//! wave can be summarised by the lane it mostly used.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::location::Location;

/// Squared radius around a lane center within which a unit counts toward it.
const LANE_RADIUS_SQ: f32 = 25.0;

/// A lane zone. The declaration order is the fixed lane ordering used for
/// every tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaneZone {
    FarLeft,
    Left,
    Mid,
    Right,
    FarRight,
}

/// Number of lane zones.
pub const LANE_COUNT: usize = 5;

impl LaneZone {
    pub const ALL: [LaneZone; LANE_COUNT] =
        [LaneZone::FarLeft, LaneZone::Left, LaneZone::Mid, LaneZone::Right, LaneZone::FarRight];

    /// Representative center of the zone.
    pub const fn center(self) -> (f32, f32) {
        match self {
            LaneZone::FarLeft => (2.0, 12.0),
            LaneZone::Left => (7.0, 12.0),
            LaneZone::Mid => (13.5, 12.0),
            LaneZone::Right => (20.0, 12.0),
            LaneZone::FarRight => (25.0, 12.0),
        }
    }

    /// Returns true if `loc` is within the zone's radius.
    pub fn contains(self, loc: Location) -> bool {
        let (cx, cy) = self.center();
        let dx = loc.x as f32 - cx;
        let dy = loc.y as f32 - cy;
        dx * dx + dy * dy < LANE_RADIUS_SQ
    }

    /// The zone on the opposite side of the vertical center line.
    pub const fn mirrored(self) -> LaneZone {
        match self {
            LaneZone::FarLeft => LaneZone::FarRight,
            LaneZone::Left => LaneZone::Right,
            LaneZone::Mid => LaneZone::Mid,
            LaneZone::Right => LaneZone::Left,
            LaneZone::FarRight => LaneZone::FarLeft,
        }
    }

    /// Short tag used in logs.
    pub const fn tag(self) -> &'static str {
        match self {
            LaneZone::FarLeft => "LL",
            LaneZone::Left => "L",
            LaneZone::Mid => "M",
            LaneZone::Right => "R",
            LaneZone::FarRight => "RR",
        }
    }
}

impl fmt::Display for LaneZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Per-lane traversal tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneCounts([u32; LANE_COUNT]);

impl LaneCounts {
    /// Counts one unit-step at `loc` toward every zone containing it.
    pub fn record(&mut self, loc: Location) {
        for lane in LaneZone::ALL {
            if lane.contains(loc) {
                self.0[lane as usize] += 1;
            }
        }
    }

    pub fn get(&self, lane: LaneZone) -> u32 {
        self.0[lane as usize]
    }

    /// The most traversed zone; the earliest zone in lane order wins ties,
    /// including the all-zero case.
    pub fn dominant(&self) -> LaneZone {
        let mut best = LaneZone::FarLeft;
        for lane in LaneZone::ALL {
            if self.get(lane) > self.get(best) {
                best = lane;
            }
        }
        best
    }
}
