//! Tick-by-tick combat simulation.
//!
//! Replays one offensive wave against the structures on the board until
//! no mobile unit remains. Each tick runs four phases in a fixed order:
//! shielding, movement (with breaches and self-destructs), attacks, and
//! cleanup of destroyed units.
//!
//! Design: the simulator mutates the snapshot it is given; callers that
//! need the original clone first. Per-unit scratch (paths, target edges,
//! spent shields) lives in dense vectors indexed by [`UnitId`].

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::outcome::Outcome;
use crate::board::{
    shield_mask, Edge, GameState, Location, Navigator, Player, UnitId, UnitType, UNIT_TYPE_COUNT,
};

/// Ticks a blocked unit must wait before it may self-destruct.
pub const SELF_DESTRUCT_GRACE: u32 = 5;

/// Slowest cadence times arena size times four.
pub const DEFAULT_MAX_TICKS: u32 = 448;

/// How defending turrets pick what to shoot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FireModel {
    /// Every turret covering the focus unit shoots it; when it dies the
    /// next surviving attacker takes over.
    #[default]
    Focus,
    /// Every turret picks its own target.
    PerUnit,
}

/// Simulation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Hard cap on the number of ticks.
    pub max_ticks: u32,
    /// Ticks before a blocked unit self-destructs instead of vanishing.
    pub self_destruct_grace: u32,
    pub fire_model: FireModel,
    /// Recompute a mover's path after any structure is destroyed.
    pub repath_on_destroy: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            max_ticks: DEFAULT_MAX_TICKS,
            self_destruct_grace: SELF_DESTRUCT_GRACE,
            fire_model: FireModel::Focus,
            repath_on_destroy: false,
        }
    }
}

/// Simulates the wave on `state` to completion and returns the outcome.
pub fn simulate(state: &mut GameState, config: &SimConfig) -> Outcome {
    Simulator::new(state, config).run()
}

/// Single-run simulation driver.
pub struct Simulator<'a> {
    state: &'a mut GameState,
    config: &'a SimConfig,
    navigator: Navigator,
    /// Live units per kind, in registration order.
    by_type: [Vec<UnitId>; UNIT_TYPE_COUNT],
    /// Live mobile units, in registration order.
    attacking: Vec<UnitId>,
    paths: Vec<VecDeque<Location>>,
    target_edges: Vec<Option<Edge>>,
    stale_paths: Vec<bool>,
    shield_spent: Vec<bool>,
    focus: Option<UnitId>,
    wave_team: Player,
    tick: u32,
    outcome: Outcome,
}

impl<'a> Simulator<'a> {
    /// Registers every unit on the board in grid scan order and computes
    /// the movers' paths.
    pub fn new(state: &'a mut GameState, config: &'a SimConfig) -> Self {
        let capacity = state.id_capacity();
        let mut sim = Simulator {
            state,
            config,
            navigator: Navigator::new(),
            by_type: Default::default(),
            attacking: Vec::new(),
            paths: vec![VecDeque::new(); capacity],
            target_edges: vec![None; capacity],
            stale_paths: vec![false; capacity],
            shield_spent: vec![false; capacity],
            focus: None,
            wave_team: Player::Friendly,
            tick: 0,
            outcome: Outcome::default(),
        };
        sim.warm_up();
        sim
    }

    fn warm_up(&mut self) {
        for loc in Location::all() {
            let ids = self.state.unit_ids_at(loc).to_vec();
            if ids.is_empty() {
                continue;
            }
            let has_mobile = ids
                .iter()
                .filter_map(|&id| self.state.unit(id))
                .any(|u| !u.is_stationary());
            let (edge, path) = if has_mobile {
                let edge = Edge::target_for(loc);
                let path = self.path_from(loc, edge);
                (Some(edge), path)
            } else {
                (None, VecDeque::new())
            };

            for id in ids {
                let Some(unit) = self.state.unit(id) else {
                    continue;
                };
                let (unit_type, owner, mobile) =
                    (unit.unit_type, unit.owner, !unit.is_stationary());
                self.by_type[unit_type as usize].push(id);
                if mobile {
                    self.attacking.push(id);
                    self.target_edges[id] = edge;
                    self.paths[id] = path.clone();
                    self.focus = Some(id);
                    self.wave_team = owner;
                }
            }
        }
    }

    /// Path from `loc` to `edge` without the starting cell.
    fn path_from(&mut self, loc: Location, edge: Edge) -> VecDeque<Location> {
        let mut path: VecDeque<Location> =
            self.navigator.find_path_to_edge(&*self.state, loc, edge).into();
        path.pop_front();
        path
    }

    fn mobile_remaining(&self) -> bool {
        !self.attacking.is_empty()
    }

    /// Runs ticks until no mobile unit remains or the cap is hit.
    pub fn run(mut self) -> Outcome {
        while self.mobile_remaining() {
            if self.tick >= self.config.max_ticks {
                tracing::warn!(
                    ticks = self.tick,
                    remaining = self.attacking.len(),
                    "simulation hit the tick cap; returning partial outcome"
                );
                self.outcome.converged = false;
                break;
            }
            self.step();
        }
        self.outcome.ticks = self.tick;
        self.outcome.dominant_lane = self.outcome.lane_counts.dominant();
        self.outcome
    }

    /// Advances one tick.
    pub fn step(&mut self) {
        self.shield_phase();
        self.movement_phase();
        self.attack_phase();
        self.defender_phase();
        self.cleanup_phase();
        self.tick += 1;
    }

    /// Makes sure the focus is a live attacker, promoting the first
    /// surviving one in registration order if needed.
    fn refresh_focus(&mut self) -> Option<UnitId> {
        if let Some(id) = self.focus {
            if self.is_alive(id) {
                return Some(id);
            }
        }
        self.focus = self.attacking.iter().copied().find(|&id| self.is_alive(id));
        self.focus
    }

    fn is_alive(&self, id: UnitId) -> bool {
        self.state.unit(id).is_some_and(|u| u.is_alive())
    }

    fn shield_phase(&mut self) {
        let Some(focus) = self.refresh_focus() else {
            return;
        };
        let Some(focus_loc) = self.state.unit(focus).map(|u| u.location) else {
            return;
        };

        for i in 0..self.by_type[UnitType::Support as usize].len() {
            let support_id = self.by_type[UnitType::Support as usize][i];
            if self.shield_spent[support_id] {
                continue;
            }
            let Some(support) = self.state.unit(support_id) else {
                continue;
            };
            if support.owner != self.wave_team {
                continue;
            }
            let dx = (focus_loc.x - support.location.x).abs();
            let dy = (focus_loc.y - support.location.y).abs();
            if !shield_mask(support.stats().range).covers(dx, dy) {
                continue;
            }
            let amount = support.shield_amount();
            self.shield_spent[support_id] = true;
            for &id in &self.attacking {
                if let Some(unit) = self.state.unit_mut(id) {
                    if unit.is_alive() {
                        unit.add_shield(amount);
                    }
                }
            }
        }
    }

    fn movement_phase(&mut self) {
        for unit_type in UnitType::MOBILE {
            let cadence = unit_type.stats(false).cadence;
            if cadence == 0 || self.tick % cadence != 0 {
                continue;
            }
            for i in 0..self.by_type[unit_type as usize].len() {
                let id = self.by_type[unit_type as usize][i];
                self.move_action(id);
            }
        }
    }

    fn move_action(&mut self, id: UnitId) {
        let Some(unit) = self.state.unit(id) else {
            return;
        };
        if !unit.is_alive() {
            return;
        }
        let (unit_type, loc) = (unit.unit_type, unit.location);
        let Some(edge) = self.target_edges[id] else {
            return;
        };

        if unit_type != UnitType::Interceptor {
            self.outcome.lane_counts.record(loc);
        }

        if self.stale_paths[id] {
            self.stale_paths[id] = false;
            self.paths[id] = self.path_from(loc, edge);
        }

        if let Some(next) = self.paths[id].pop_front() {
            self.state.move_unit(id, next);
        } else if edge.contains(loc) {
            self.outcome.player_damage += unit_type.stats(false).breach_damage;
            self.kill(id);
        } else if self.tick >= self.config.self_destruct_grace {
            self.self_destruct(id);
        } else {
            self.kill(id);
        }
    }

    /// Removes `id` and damages every opposing unit in the surrounding
    /// 3x3 block by its effective health plus the kind's bonus.
    fn self_destruct(&mut self, id: UnitId) {
        let Some(unit) = self.state.unit(id) else {
            return;
        };
        let damage = unit.effective_health() + unit.stats().self_destruct_bonus;
        let (owner, origin) = (unit.owner, unit.location);
        self.kill(id);

        for dx in -1..=1 {
            for dy in -1..=1 {
                let cell = origin.offset(dx, dy);
                let victims = self.state.unit_ids_at(cell).to_vec();
                for victim in victims {
                    if self.state.unit(victim).is_some_and(|u| u.owner != owner && u.is_alive()) {
                        self.deal_damage(victim, damage);
                    }
                }
            }
        }
    }

    fn attack_phase(&mut self) {
        for i in 0..self.attacking.len() {
            let id = self.attacking[i];
            let Some(attacker) = self.state.unit(id) else {
                continue;
            };
            if !attacker.is_alive() {
                continue;
            }
            let stats = attacker.stats();
            let Some(target) = self.state.get_target(id) else {
                continue;
            };
            let damage = match self.state.unit(target) {
                Some(t) if t.is_stationary() => stats.damage_structure,
                Some(_) => stats.damage_mobile,
                None => continue,
            };
            self.deal_damage(target, damage);
        }
    }

    fn defender_phase(&mut self) {
        match self.config.fire_model {
            FireModel::Focus => self.focus_fire(),
            FireModel::PerUnit => self.per_unit_fire(),
        }
    }

    fn focus_fire(&mut self) {
        let Some(mut focus) = self.refresh_focus() else {
            return;
        };
        let Some(focus_loc) = self.state.unit(focus).map(|u| u.location) else {
            return;
        };

        for turret in self.state.get_attackers(focus_loc, self.wave_team) {
            let Some(damage) = self.state.unit(turret).map(|t| t.stats().damage_mobile) else {
                continue;
            };
            self.deal_damage(focus, damage);
            if self.state.unit(focus).is_some_and(|u| !u.is_alive()) {
                match self.refresh_focus() {
                    Some(next) => focus = next,
                    None => break,
                }
            }
        }
    }

    fn per_unit_fire(&mut self) {
        for i in 0..self.by_type[UnitType::Turret as usize].len() {
            let turret = self.by_type[UnitType::Turret as usize][i];
            let Some(unit) = self.state.unit(turret) else {
                continue;
            };
            if unit.owner == self.wave_team || !unit.is_alive() {
                continue;
            }
            let damage = unit.stats().damage_mobile;
            if let Some(target) = self.state.get_target(turret) {
                self.deal_damage(target, damage);
            }
        }
    }

    /// Applies damage, crediting the weighted structural tally when the
    /// victim is a structure.
    fn deal_damage(&mut self, victim: UnitId, damage: f32) {
        let Some(unit) = self.state.unit_mut(victim) else {
            return;
        };
        let removed = unit.take_damage(damage);
        if unit.is_stationary() && unit.max_health > 0.0 {
            self.outcome.structural_damage += unit.structure_value() * removed / unit.max_health;
        }
    }

    fn kill(&mut self, id: UnitId) {
        if let Some(unit) = self.state.unit_mut(id) {
            unit.kill();
        }
    }

    fn cleanup_phase(&mut self) {
        let mut structure_lost = false;
        for kind in 0..UNIT_TYPE_COUNT {
            let ids = std::mem::take(&mut self.by_type[kind]);
            let mut survivors = Vec::with_capacity(ids.len());
            for id in ids {
                let alive = self.state.unit(id).is_some_and(|u| u.is_alive());
                if alive {
                    survivors.push(id);
                    continue;
                }
                let Some(unit) = self.state.remove_unit(id) else {
                    continue;
                };
                if unit.is_stationary() {
                    structure_lost = true;
                    self.outcome.structure_destroyed += unit.structure_value();
                    if unit.unit_type == UnitType::Wall && !unit.upgraded {
                        self.outcome.breach_opportunities.push(unit.location);
                    }
                }
            }
            self.by_type[kind] = survivors;
        }

        let state = &*self.state;
        self.attacking.retain(|&id| state.unit(id).is_some());
        if structure_lost && self.config.repath_on_destroy {
            for &id in &self.attacking {
                self.stale_paths[id] = true;
            }
        }
        self.refresh_focus();
    }
}
