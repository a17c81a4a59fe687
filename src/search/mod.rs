//! Search and planning.
//!
//! Builds hypothetical boards, simulates each, and picks the actions
//! whose predicted outcome scores best: an offensive wave and a
//! budget-bounded list of defensive builds.

pub mod config;
pub mod defense;
pub mod offense;

pub use config::{ConfigError, PriorityLists, SearchConfig};
pub use offense::{escort_cell, OffensePlan, ESCORT_OFFSETS};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::board::{Action, GameState, Location, Player, Resource, UnitType, Verb};

/// Everything we intend to do this turn.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TurnPlan {
    pub attack: OffensePlan,
    /// Mandatory maintenance first, then reactive builds.
    pub defense: Vec<Action>,
}

impl TurnPlan {
    /// Defense followed by the attack's deploy actions.
    pub fn actions(&self) -> Vec<Action> {
        let mut actions = self.defense.clone();
        actions.extend(self.attack.actions());
        actions
    }
}

/// Action search over a fixed snapshot. The snapshot is never mutated;
/// every hypothesis runs on a clone.
#[derive(Debug, Clone, Copy)]
pub struct Optimizer<'a> {
    state: &'a GameState,
    config: &'a SearchConfig,
}

impl<'a> Optimizer<'a> {
    pub fn new(state: &'a GameState, config: &'a SearchConfig) -> Self {
        Optimizer { state, config }
    }

    /// Plans a full turn with our current structure points. Defense is
    /// paid for first; the attack's escort only comes out of what is left.
    pub fn plan_turn(&self) -> TurnPlan {
        let sp = self.state.get_resource(Resource::Structure, Player::Friendly);
        let (mut defense, remaining) = self.optimize_defense_mandatory(sp);
        defense.extend(self.optimize_defense_batch(remaining));
        let leftover = sp - self.structure_cost(&defense);
        let attack = self.optimize_offense_within(leftover);
        tracing::debug!(
            defense = defense.len(),
            attack = attack.is_attack(),
            leftover,
            "turn planned"
        );
        TurnPlan { attack, defense }
    }

    /// Structure points `actions` cost when applied in order to the snapshot.
    fn structure_cost(&self, actions: &[Action]) -> f32 {
        let mut placed: HashMap<Location, UnitType> = HashMap::new();
        let mut total = 0.0;
        for action in actions {
            let target = placed
                .get(&action.location)
                .copied()
                .or_else(|| self.state.stationary_unit_at(action.location).map(|u| u.unit_type));
            total += action.cost(target).structure;
            if let Verb::Spawn(unit_type) = action.verb {
                placed.insert(action.location, unit_type);
            }
        }
        total
    }
}
