//! Search configuration.
//!
//! Weights, floors, and thresholds for the offensive and defensive
//! searches, plus the per-lane build priority lists. Everything has a
//! tuned default and can be overridden from JSON; the hyperparameter keys
//! used by existing tuning runs are accepted as aliases.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{LaneZone, Location};
use crate::resolve::SimConfig;

/// Errors from loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Tunable parameters for [`Optimizer`](super::Optimizer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Score an attack must beat to be launched.
    #[serde(alias = "best")]
    pub min_attack_score: f32,
    /// An attack that breaches nothing must destroy more structure value
    /// than this.
    pub min_destroyed_to_attack: f32,
    /// Above this many affordable scouts the attack floor drops to zero.
    #[serde(alias = "minscouts")]
    pub go_for_it_scouts: u32,
    /// Player-damage weight when scoring our attacks.
    #[serde(alias = "attack_(s)pdratio")]
    pub attack_weight: f32,
    /// Danger at or below which no new defenses are built.
    #[serde(alias = "mindanger")]
    pub max_tolerated_danger: f32,
    /// Player-damage weight when scoring the opponent's waves.
    #[serde(alias = "defend_(s)pdratio")]
    pub defend_weight: f32,
    /// Shield given to each hypothetical opposing scout.
    pub danger_health_bonus: f32,
    /// Upgraded walls at or below this health are removed for salvage.
    pub salvage_health: f32,
    /// Upgrade every turret in the mandatory pass. When off, the batch
    /// pass upgrades only the turrets standing on threatened priority cells.
    pub force_upgrade_turrets: bool,
    /// Worker threads for candidate evaluation; 1 runs inline.
    pub threads: usize,
    pub sim: SimConfig,
    pub priorities: PriorityLists,
}

// Weights and floors from the best hyperparameter search run.
impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            min_attack_score: 8.0,
            min_destroyed_to_attack: 3.0,
            go_for_it_scouts: 13,
            attack_weight: 6.0,
            max_tolerated_danger: 4.0,
            defend_weight: 2.0,
            danger_health_bonus: 3.0,
            salvage_health: 30.0,
            force_upgrade_turrets: true,
            threads: 1,
            sim: SimConfig::default(),
            priorities: PriorityLists::default(),
        }
    }
}

impl SearchConfig {
    /// Parses a configuration from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SearchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rejects values the search cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threads == 0 {
            return Err(invalid("threads", "must be at least 1"));
        }
        if self.sim.max_ticks == 0 {
            return Err(invalid("sim.max_ticks", "must be at least 1"));
        }
        for (field, value) in [
            ("min_attack_score", self.min_attack_score),
            ("min_destroyed_to_attack", self.min_destroyed_to_attack),
            ("attack_weight", self.attack_weight),
            ("max_tolerated_danger", self.max_tolerated_danger),
            ("defend_weight", self.defend_weight),
            ("danger_health_bonus", self.danger_health_bonus),
            ("salvage_health", self.salvage_health),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(field, format!("{value} is not a non-negative number")));
            }
        }
        for lane in LaneZone::ALL {
            let list = self.priorities.get(lane);
            if let Some(loc) = list.iter().find(|l| !l.in_arena_bounds() || !l.is_friendly_half()) {
                let reason = format!("{loc} in lane {lane} is not on our half");
                return Err(invalid("priorities", reason));
            }
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field, reason: reason.into() }
}

/// Ordered build cells per lane; earlier cells are filled first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityLists {
    pub far_left: Vec<Location>,
    pub left: Vec<Location>,
    pub mid: Vec<Location>,
    pub right: Vec<Location>,
    pub far_right: Vec<Location>,
}

impl PriorityLists {
    pub fn get(&self, lane: LaneZone) -> &[Location] {
        match lane {
            LaneZone::FarLeft => &self.far_left,
            LaneZone::Left => &self.left,
            LaneZone::Mid => &self.mid,
            LaneZone::Right => &self.right,
            LaneZone::FarRight => &self.far_right,
        }
    }
}

fn cells(coords: &[(i32, i32)]) -> Vec<Location> {
    coords.iter().map(|&(x, y)| Location::new(x, y)).collect()
}

impl Default for PriorityLists {
    fn default() -> Self {
        PriorityLists {
            far_left: cells(&[
                (4, 13), (4, 12), (0, 13), (3, 13), (3, 12), (1, 13), (2, 13),
                (2, 12), (3, 11), (4, 11), (5, 13), (5, 12), (5, 11),
            ]),
            left: cells(&[
                (4, 13), (4, 12), (10, 13), (10, 12), (5, 13), (5, 12),
                (9, 13), (9, 12), (5, 11), (9, 11), (4, 11), (10, 11),
            ]),
            mid: cells(&[
                (10, 13), (10, 12), (17, 13), (17, 12), (11, 13), (11, 12),
                (16, 13), (16, 12), (11, 11), (16, 11), (10, 11), (17, 11),
            ]),
            right: cells(&[
                (17, 13), (17, 12), (23, 13), (23, 12), (18, 13), (18, 12),
                (22, 13), (22, 12), (18, 11), (22, 11), (17, 11), (23, 11),
            ]),
            far_right: cells(&[
                (23, 13), (23, 12), (27, 13), (24, 13), (24, 12), (26, 13), (25, 13),
                (25, 12), (24, 11), (23, 11), (22, 13), (22, 12), (22, 11),
            ]),
        }
    }
}
