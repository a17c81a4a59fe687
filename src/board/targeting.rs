//! Range masks, target selection, and attacker lookup.
//!
//! Every range in the game is a multiple of half a cell, so the set of
//! relative offsets a unit reaches is computed once per half-cell step
//! and shared through a `LazyLock`. Combat queries then scan offsets
//! instead of recomputing distances.
//!
//! Shield coverage uses its own masks: a support never reaches a cell
//! that is a whole range away along a single axis.

use std::cmp::Ordering;
use std::sync::LazyLock;

use super::location::{Location, HALF_ARENA};
use super::state::GameState;
use super::unit::{Player, Unit, UnitId, UnitType};

/// Largest half-cell step with a precomputed mask (range 6.0).
const MAX_HALF_STEPS: usize = 12;

/// Longest turret range; bounds the attacker scan.
const MAX_TURRET_RANGE: f32 = 4.5;

/// Offsets within a given range of the origin.
#[derive(Debug, Clone)]
pub struct RangeMask {
    reach: i32,
    /// `(2 * reach + 1)^2` membership grid, row-major in `dy`.
    covered: Vec<bool>,
    /// Covered offsets ordered x-major, matching the grid scan order.
    offsets: Vec<(i32, i32)>,
}

impl RangeMask {
    fn build(half_steps: usize) -> Self {
        Self::build_with(half_steps, false)
    }

    fn build_shield(half_steps: usize) -> Self {
        Self::build_with(half_steps, true)
    }

    /// With `open_axes`, offsets whose `|dx|` or `|dy|` reaches the range
    /// are left out even when the distance is exactly the range.
    fn build_with(half_steps: usize, open_axes: bool) -> Self {
        let range = half_steps as f32 / 2.0;
        let reach = range.floor() as i32;
        let side = (2 * reach + 1) as usize;
        let mut covered = vec![false; side * side];
        let mut offsets = Vec::new();
        for dx in -reach..=reach {
            for dy in -reach..=reach {
                let on_axis_edge = dx.abs().max(dy.abs()) as f32 >= range;
                if open_axes && on_axis_edge {
                    continue;
                }
                if ((dx * dx + dy * dy) as f32) <= range * range {
                    covered[((dy + reach) as usize) * side + (dx + reach) as usize] = true;
                    offsets.push((dx, dy));
                }
            }
        }
        RangeMask { reach, covered, offsets }
    }

    /// Returns true if the offset `(dx, dy)` is in range.
    pub fn covers(&self, dx: i32, dy: i32) -> bool {
        if dx.abs() > self.reach || dy.abs() > self.reach {
            return false;
        }
        let side = (2 * self.reach + 1) as usize;
        self.covered[((dy + self.reach) as usize) * side + (dx + self.reach) as usize]
    }

    /// Offsets in range, x-major.
    pub fn offsets(&self) -> &[(i32, i32)] {
        &self.offsets
    }
}

static RANGE_MASKS: LazyLock<Vec<RangeMask>> =
    LazyLock::new(|| (0..=MAX_HALF_STEPS).map(RangeMask::build).collect());

static SHIELD_MASKS: LazyLock<Vec<RangeMask>> =
    LazyLock::new(|| (0..=MAX_HALF_STEPS).map(RangeMask::build_shield).collect());

fn half_steps(range: f32) -> usize {
    ((range.max(0.0) * 2.0).ceil() as usize).min(MAX_HALF_STEPS)
}

/// The precomputed mask for `range`, rounded up to the next half cell.
pub fn range_mask(range: f32) -> &'static RangeMask {
    &RANGE_MASKS[half_steps(range)]
}

/// Offsets a support with shield range `range` covers.
pub fn shield_mask(range: f32) -> &'static RangeMask {
    &SHIELD_MASKS[half_steps(range)]
}

/// Priority key of a candidate target; smaller is preferred.
#[derive(Debug, Clone, Copy)]
struct TargetKey {
    stationary: bool,
    distance_sq: i32,
    health: f32,
    /// Row, negated for the enemy so that "further along" compares smaller.
    progress: i32,
    /// Distance from the center column; larger is preferred.
    center_offset: f32,
}

impl TargetKey {
    fn new(attacker: &Unit, target: &Unit) -> Self {
        let dx = target.location.x - attacker.location.x;
        let dy = target.location.y - attacker.location.y;
        let progress = match attacker.owner {
            Player::Friendly => target.location.y,
            Player::Enemy => -target.location.y,
        };
        TargetKey {
            stationary: target.is_stationary(),
            distance_sq: dx * dx + dy * dy,
            health: target.effective_health(),
            progress,
            center_offset: (HALF_ARENA as f32 - 0.5 - target.location.x as f32).abs(),
        }
    }

    /// True if `self` should replace `best`. Equal keys keep the earlier candidate.
    fn precedes(&self, best: &TargetKey) -> bool {
        let ord = self
            .stationary
            .cmp(&best.stationary)
            .then(self.distance_sq.cmp(&best.distance_sq))
            .then(self.health.partial_cmp(&best.health).unwrap_or(Ordering::Equal))
            .then(self.progress.cmp(&best.progress))
            .then(
                best.center_offset
                    .partial_cmp(&self.center_offset)
                    .unwrap_or(Ordering::Equal),
            );
        ord == Ordering::Less
    }
}

/// Returns true if `attacker` deals damage to units of `target`'s kind.
fn can_damage(attacker: &Unit, target: &Unit) -> bool {
    let stats = attacker.stats();
    if target.is_stationary() {
        stats.damage_structure > 0.0
    } else {
        stats.damage_mobile > 0.0
    }
}

impl GameState {
    /// The unit `attacker_id` would shoot this tick, if any.
    ///
    /// Candidates are alive opposing units in range that the attacker can
    /// damage. Mobile targets beat structures, then the nearest, then the
    /// weakest, then the one furthest into the attacker's half, then the
    /// one furthest from the center column.
    pub fn get_target(&self, attacker_id: UnitId) -> Option<UnitId> {
        let attacker = self.unit(attacker_id)?;
        let origin = attacker.location;
        let mut best: Option<(UnitId, TargetKey)> = None;

        for &(dx, dy) in range_mask(attacker.stats().range).offsets() {
            let loc = origin.offset(dx, dy);
            for target in self.units_at(loc) {
                if target.owner == attacker.owner
                    || !target.is_alive()
                    || !can_damage(attacker, target)
                {
                    continue;
                }
                let key = TargetKey::new(attacker, target);
                match &best {
                    Some((_, best_key)) if !key.precedes(best_key) => {}
                    _ => best = Some((target.id, key)),
                }
            }
        }
        best.map(|(id, _)| id)
    }

    /// Alive turrets not owned by `player` whose range covers `loc`.
    pub fn get_attackers(&self, loc: Location, player: Player) -> Vec<UnitId> {
        let mut attackers = Vec::new();
        for &(dx, dy) in range_mask(MAX_TURRET_RANGE).offsets() {
            let at = loc.offset(dx, dy);
            let Some(unit) = self.stationary_unit_at(at) else {
                continue;
            };
            if unit.owner == player || unit.unit_type != UnitType::Turret || !unit.is_alive() {
                continue;
            }
            if range_mask(unit.stats().range).covers(dx, dy) {
                attackers.push(unit.id);
            }
        }
        attackers
    }
}
