//! Defensive search.
//!
//! Two passes share the structure budget. The mandatory pass keeps
//! existing defenses in shape: it upgrades our turrets and salvages
//! battered upgraded walls. The batch pass reacts to the danger report,
//! reinforcing walls a wave would break and then building into the most
//! exposed lanes in priority order. With turret upgrades unforced, the
//! batch pass upgrades the turrets standing on those lanes' priority
//! cells instead of building.

use std::collections::{BTreeSet, HashSet};

use super::Optimizer;
use crate::board::{Action, LaneZone, Location, Player, Resource, UnitType, HALF_ARENA};
use crate::eval::compute_danger;

/// Front defensive row; cells here get walls instead of turrets.
const FRONT_ROW: i32 = HALF_ARENA - 1;

/// What the batch pass builds at a priority cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// Place and upgrade a wall.
    FrontWall,
    /// Place a turret, upgrading it if the budget allows.
    Turret,
    /// Upgrade the turret already standing there.
    UpgradeTurret,
}

impl Slot {
    /// Structure points needed to act on the slot at all.
    fn cost(self) -> f32 {
        match self {
            Slot::FrontWall => {
                UnitType::Wall.cost(false).structure + UnitType::Wall.cost(true).structure
            }
            Slot::Turret => UnitType::Turret.cost(false).structure,
            Slot::UpgradeTurret => UnitType::Turret.cost(true).structure,
        }
    }
}

impl Optimizer<'_> {
    /// Upgrades our un-upgraded turrets while `sp` covers it (only when
    /// turret upgrades are forced), then removes upgraded walls at or below
    /// the salvage threshold. Returns the actions and the structure points
    /// left over.
    pub fn optimize_defense_mandatory(&self, mut sp: f32) -> (Vec<Action>, f32) {
        let upgrade_cost = UnitType::Turret.cost(true).structure;
        let mut actions = Vec::new();

        if self.config.force_upgrade_turrets {
            for loc in Location::all() {
                if sp < upgrade_cost {
                    break;
                }
                if self.bare_turret_at(loc) {
                    actions.push(Action::upgrade(loc));
                    sp -= upgrade_cost;
                }
            }
        }

        for loc in Location::all() {
            let Some(unit) = self.state.stationary_unit_at(loc) else {
                continue;
            };
            if unit.unit_type == UnitType::Wall
                && unit.owner == Player::Friendly
                && unit.upgraded
                && unit.health <= self.config.salvage_health
            {
                actions.push(Action::remove(loc));
            }
        }

        (actions, sp)
    }

    /// Spends `sp` against the opponent's most dangerous wave.
    pub fn optimize_defense_batch(&self, mut sp: f32) -> Vec<Action> {
        let scout_cost = UnitType::Scout.cost(false).mobile;
        let enemy_mp = self.state.get_resource(Resource::Mobile, Player::Enemy);
        let wave_size = (enemy_mp / scout_cost).floor().max(0.0) as usize;

        let report = compute_danger(self.state, wave_size, self.config);
        let mut actions = Vec::new();

        let wall_upgrade = UnitType::Wall.cost(true).structure;
        for &wall in &report.walls_in_danger {
            if sp < wall_upgrade {
                break;
            }
            actions.push(Action::upgrade(wall));
            sp -= wall_upgrade;
        }

        if report.danger <= self.config.max_tolerated_danger {
            tracing::debug!(danger = report.danger, "danger tolerated; no new structures");
            return actions;
        }

        self.allocate_lanes(&report.lanes, sp, &mut actions);
        actions
    }

    /// Works through the priority lists of `lanes`, always taking the
    /// affordable slot with the lowest index. Equal indices go to the lane
    /// that comes first in lane order. Returns the structure points left.
    fn allocate_lanes(
        &self,
        lanes: &BTreeSet<LaneZone>,
        mut sp: f32,
        actions: &mut Vec<Action>,
    ) -> f32 {
        // Next candidate index into each lane's priority list.
        let mut cursors: Vec<(LaneZone, usize)> = lanes
            .iter()
            .filter_map(|&lane| {
                let list = self.config.priorities.get(lane);
                list.iter().position(|&loc| self.initially_open(loc)).map(|i| (lane, i))
            })
            .collect();
        let mut claimed: HashSet<Location> = HashSet::new();

        loop {
            cursors.retain_mut(|(lane, i)| {
                let list = self.config.priorities.get(*lane);
                while *i < list.len()
                    && (self.slot_at(list[*i]).is_none() || claimed.contains(&list[*i]))
                {
                    *i += 1;
                }
                *i < list.len()
            });

            let pick = cursors
                .iter()
                .enumerate()
                .filter_map(|(k, &(lane, i))| {
                    let slot = self.slot_at(self.config.priorities.get(lane)[i])?;
                    (slot.cost() <= sp).then_some((k, i, slot))
                })
                .min_by_key(|&(_, i, _)| i);
            let Some((k, i, slot)) = pick else {
                break;
            };

            let lane = cursors[k].0;
            let loc = self.config.priorities.get(lane)[i];
            match slot {
                Slot::FrontWall => {
                    actions.push(Action::spawn(UnitType::Wall, loc));
                    actions.push(Action::upgrade(loc));
                    sp -= slot.cost();
                }
                Slot::Turret => {
                    actions.push(Action::spawn(UnitType::Turret, loc));
                    sp -= slot.cost();
                    let upgrade = UnitType::Turret.cost(true).structure;
                    if sp >= upgrade {
                        actions.push(Action::upgrade(loc));
                        sp -= upgrade;
                    }
                }
                Slot::UpgradeTurret => {
                    actions.push(Action::upgrade(loc));
                    sp -= slot.cost();
                }
            }
            tracing::debug!(%lane, %loc, ?slot, sp, "defense queued");
            claimed.insert(loc);
            cursors[k].1 += 1;
        }

        sp
    }

    /// True if `loc` holds one of our turrets that is not yet upgraded.
    fn bare_turret_at(&self, loc: Location) -> bool {
        self.state
            .stationary_unit_at(loc)
            .is_some_and(|u| {
                u.unit_type == UnitType::Turret && u.owner == Player::Friendly && !u.upgraded
            })
    }

    /// Where a lane's priority walk starts. A support does not block the
    /// start, although it does block building on its cell.
    fn initially_open(&self, loc: Location) -> bool {
        if self.config.force_upgrade_turrets {
            !self.state.contains_stationary_nonsupport_unit(loc)
        } else {
            self.bare_turret_at(loc)
        }
    }

    /// The work the batch pass can do at `loc`, if any.
    fn slot_at(&self, loc: Location) -> Option<Slot> {
        if !self.config.force_upgrade_turrets {
            return self.bare_turret_at(loc).then_some(Slot::UpgradeTurret);
        }
        if self.state.contains_stationary_unit(loc) {
            None
        } else if loc.y == FRONT_ROW {
            Some(Slot::FrontWall)
        } else {
            Some(Slot::Turret)
        }
    }
}
