//! Offensive search.
//!
//! Tries a full scout wave from every free cell on our deploy edges, each
//! with a support escort tucked in behind it, and keeps the wave that
//! scores best against the opponent's current defenses.

use serde::{Deserialize, Serialize};

use super::Optimizer;
use crate::board::{
    friendly_spawn_locations, Action, GameState, Location, Player, Resource, UnitType, HALF_ARENA,
};
use crate::eval::map_candidates;
use crate::resolve::{simulate, Outcome};

/// Cells tried for the escort support, relative to the spawn cell, in
/// preference order.
pub const ESCORT_OFFSETS: [(i32, i32); 20] = [
    (-1, -2), (0, -2), (1, -2), (1, -1), (-1, -1),
    (0, -1), (-2, -1), (2, -1), (2, 0), (-2, 0),
    (-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1),
    (-2, 1), (2, 1), (-1, 2), (0, 2), (1, 2),
];

/// The chosen attack, or the empty plan when no wave is worth sending.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OffensePlan {
    /// Deploy cell for the scouts.
    pub spawn: Option<Location>,
    /// Cell for the escort support, if one fits.
    pub escort: Option<Location>,
    /// Number of scouts in the wave.
    pub scouts: u32,
    /// Predicted score of the wave.
    pub score: f32,
}

impl OffensePlan {
    /// True if the plan launches a wave.
    pub fn is_attack(&self) -> bool {
        self.spawn.is_some()
    }

    /// `(spawn, escort)` as handed to the turn loop.
    pub fn locations(&self) -> (Option<Location>, Option<Location>) {
        (self.spawn, self.escort)
    }

    /// Deploy actions for the wave: the escort first, then one spawn per scout.
    pub fn actions(&self) -> Vec<Action> {
        let Some(spawn) = self.spawn else {
            return Vec::new();
        };
        let mut actions = Vec::with_capacity(self.scouts as usize + 1);
        if let Some(escort) = self.escort {
            actions.push(Action::spawn(UnitType::Support, escort));
        }
        actions.extend((0..self.scouts).map(|_| Action::spawn(UnitType::Scout, spawn)));
        actions
    }
}

/// First escort cell around `spawn` that is on our half and free.
pub fn escort_cell(state: &GameState, spawn: Location) -> Option<Location> {
    ESCORT_OFFSETS
        .iter()
        .map(|&(dx, dy)| spawn.offset(dx, dy))
        .find(|&loc| {
            loc.y < HALF_ARENA && loc.in_arena_bounds() && !state.contains_stationary_unit(loc)
        })
}

impl Optimizer<'_> {
    /// Finds the best scout wave we can afford this turn, escorted when
    /// our structure points cover a support.
    pub fn optimize_offense(&self) -> OffensePlan {
        let sp = self.state.get_resource(Resource::Structure, Player::Friendly);
        self.optimize_offense_within(sp)
    }

    /// Like [`optimize_offense`](Self::optimize_offense), with only `sp`
    /// structure points left for the escort.
    pub fn optimize_offense_within(&self, sp: f32) -> OffensePlan {
        let scout_cost = UnitType::Scout.cost(false).mobile;
        let mp = self.state.get_resource(Resource::Mobile, Player::Friendly);
        let scouts = (mp / scout_cost).floor().max(0.0) as u32;
        if scouts == 0 {
            return OffensePlan::default();
        }

        let floor = if scouts > self.config.go_for_it_scouts {
            0.0
        } else {
            self.config.min_attack_score
        };
        let escorted = sp >= UnitType::Support.cost(false).structure;

        let candidates: Vec<(Location, Option<Location>)> = friendly_spawn_locations()
            .into_iter()
            .filter(|&loc| !self.state.contains_stationary_unit(loc))
            .map(|loc| (loc, escorted.then(|| escort_cell(self.state, loc)).flatten()))
            .collect();

        let outcomes = map_candidates(&candidates, self.config.threads, |&(spawn, escort)| {
            self.simulate_wave(spawn, escort, scouts)
        });

        let mut best = OffensePlan { score: floor, ..OffensePlan::default() };
        for (&(spawn, escort), outcome) in candidates.iter().zip(outcomes) {
            let Some(outcome) = outcome else {
                continue;
            };
            if !self.worth_sending(&outcome) {
                continue;
            }
            let score = outcome.score(self.config.attack_weight);
            if score > best.score {
                best = OffensePlan { spawn: Some(spawn), escort, scouts, score };
            }
        }

        match best.spawn {
            Some(spawn) => {
                tracing::debug!(
                    %spawn,
                    escort = ?best.escort,
                    scouts,
                    score = best.score,
                    "attack chosen"
                );
                best
            }
            None => {
                tracing::debug!(
                    scouts,
                    floor,
                    candidates = candidates.len(),
                    "no attack clears the floor"
                );
                OffensePlan::default()
            }
        }
    }

    /// A wave must breach or knock down enough structure to be sent.
    fn worth_sending(&self, outcome: &Outcome) -> bool {
        outcome.player_damage > 0
            || outcome.structure_destroyed > self.config.min_destroyed_to_attack
    }

    /// Simulates `scouts` scouts from `spawn` with an optional escort.
    fn simulate_wave(
        &self,
        spawn: Location,
        escort: Option<Location>,
        scouts: u32,
    ) -> Option<Outcome> {
        let mut hypothesis = self.state.clone();
        hypothesis
            .unsafe_spawn(UnitType::Scout, spawn, Player::Friendly, scouts as usize)
            .ok()?;
        if let Some(escort) = escort {
            hypothesis.unsafe_spawn(UnitType::Support, escort, Player::Friendly, 1).ok()?;
        }
        Some(simulate(&mut hypothesis, &self.config.sim))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchConfig;

    fn with_mp(mp: f32) -> GameState {
        let mut state = GameState::new();
        state.set_resource(Resource::Mobile, Player::Friendly, mp);
        state
    }

    #[test]
    fn escort_takes_first_free_offset_in_bounds() {
        let state = GameState::new();
        // The bottom apex row only holds (13, 0) and (14, 0).
        assert_eq!(escort_cell(&state, Location::new(13, 0)), Some(Location::new(14, 0)));
        assert_eq!(escort_cell(&state, Location::new(5, 8)), Some(Location::new(6, 7)));
        assert_eq!(escort_cell(&state, Location::new(0, 13)), Some(Location::new(1, 12)));
    }

    #[test]
    fn open_board_attack_is_found() {
        let mut state = with_mp(6.0);
        state.set_resource(Resource::Structure, Player::Friendly, 4.0);
        let config = SearchConfig::default();
        let plan = Optimizer::new(&state, &config).optimize_offense();
        assert!(plan.is_attack());
        assert_eq!(plan.scouts, 6);
        assert_eq!(plan.score, 6.0 * config.attack_weight);
        // Every cell ties; the first candidate is kept.
        assert_eq!(plan.spawn, Some(Location::new(0, 13)));
        assert_eq!(plan.escort, Some(Location::new(1, 12)));
        assert_eq!(plan.actions().len(), 7);
    }

    #[test]
    fn escort_needs_structure_points() {
        let mut state = with_mp(6.0);
        state.set_resource(Resource::Structure, Player::Friendly, 3.0);
        let config = SearchConfig::default();
        let optimizer = Optimizer::new(&state, &config);
        let plan = optimizer.optimize_offense();
        assert!(plan.is_attack());
        assert_eq!(plan.escort, None);
        assert_eq!(plan.actions().len(), 6);
        assert!(optimizer.optimize_offense_within(4.0).escort.is_some());
    }

    #[test]
    fn no_mobile_points_means_no_attack() {
        let state = with_mp(0.5);
        let config = SearchConfig::default();
        let plan = Optimizer::new(&state, &config).optimize_offense();
        assert_eq!(plan.locations(), (None, None));
        assert!(plan.actions().is_empty());
    }

    #[test]
    fn floor_blocks_weak_attacks() {
        let state = with_mp(1.0);
        let base = SearchConfig::default();
        // One scout scores exactly the attack weight; the floor is strict.
        let config = SearchConfig { min_attack_score: base.attack_weight, ..base.clone() };
        assert!(!Optimizer::new(&state, &config).optimize_offense().is_attack());
        let config = SearchConfig { min_attack_score: base.attack_weight - 0.1, ..base };
        assert!(Optimizer::new(&state, &config).optimize_offense().is_attack());
    }

    #[test]
    fn waves_that_neither_breach_nor_destroy_are_held_back() {
        let mut state = with_mp(2.0);
        // A full row of upgraded enemy walls seals the arena.
        for loc in Location::all().filter(|l| l.y == HALF_ARENA) {
            state.unsafe_spawn(UnitType::Wall, loc, Player::Enemy, 1).unwrap();
            state.unsafe_upgrade(loc).unwrap();
        }
        // The floor is waived, so only the breach-or-destroy rule can refuse.
        let config = SearchConfig { go_for_it_scouts: 1, ..SearchConfig::default() };
        let optimizer = Optimizer::new(&state, &config);
        assert!(!optimizer.optimize_offense().is_attack());

        let mut sealed = state.clone();
        sealed.unsafe_spawn(UnitType::Scout, Location::new(0, 13), Player::Friendly, 2).unwrap();
        let outcome = simulate(&mut sealed, &config.sim);
        assert_eq!(outcome.player_damage, 0);
        assert!(outcome.structural_damage > 0.0);
    }

    #[test]
    fn floor_is_waived_for_large_waves() {
        let mut state = with_mp(3.0);
        let config = SearchConfig {
            min_attack_score: 1000.0,
            go_for_it_scouts: 2,
            ..SearchConfig::default()
        };
        let plan = Optimizer::new(&state, &config).optimize_offense();
        assert!(plan.is_attack());
        state.set_resource(Resource::Mobile, Player::Friendly, 2.0);
        assert!(!Optimizer::new(&state, &config).optimize_offense().is_attack());
    }
}
