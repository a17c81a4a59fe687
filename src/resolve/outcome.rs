//! Aggregate result of one simulated wave.

use serde::{Deserialize, Serialize};

use crate::board::{LaneCounts, LaneZone, Location};

/// What a wave achieved before it ran out of units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Player damage dealt by units reaching their target edge.
    pub player_damage: u32,
    /// Structure-point value of structures destroyed outright.
    pub structure_destroyed: f32,
    /// Structure-point value weighted by the fraction of health removed.
    pub structural_damage: f32,
    /// Cells of destroyed un-upgraded walls, in destruction order.
    pub breach_opportunities: Vec<Location>,
    /// Most traversed lane zone.
    pub dominant_lane: LaneZone,
    pub lane_counts: LaneCounts,
    /// Ticks run.
    pub ticks: u32,
    /// False if the run was cut off by the tick cap.
    pub converged: bool,
}

impl Default for Outcome {
    fn default() -> Self {
        Outcome {
            player_damage: 0,
            structure_destroyed: 0.0,
            structural_damage: 0.0,
            breach_opportunities: Vec::new(),
            dominant_lane: LaneZone::FarLeft,
            lane_counts: LaneCounts::default(),
            ticks: 0,
            converged: true,
        }
    }
}

impl Outcome {
    /// `player_damage * weight + structural_damage`.
    pub fn score(&self, player_damage_weight: f32) -> f32 {
        self.player_damage as f32 * player_damage_weight + self.structural_damage
    }
}
