//! Danger evaluation.
//!
//! For every entry cell the opponent could deploy from, spawns a
//! hypothetical wave of scouts, simulates it, and scores the damage it
//! would do to us. The report keeps the worst score, every lane tied for
//! it, and the walls the waves would knock down.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::map_candidates;
use crate::board::{enemy_spawn_locations, GameState, LaneZone, Location, Player, UnitType};
use crate::resolve::simulate;
use crate::search::config::SearchConfig;

/// Worst-case exposure to the opponent's next wave.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DangerReport {
    /// Highest score over all entry cells.
    pub danger: f32,
    /// Dominant lanes of every entry cell tied for the highest score.
    pub lanes: BTreeSet<LaneZone>,
    /// Walls destroyed by any simulated wave, first-seen order, no repeats.
    pub walls_in_danger: Vec<Location>,
}

/// Result of one simulated entry cell.
struct EntryResult {
    score: f32,
    lane: LaneZone,
    walls: Vec<Location>,
}

/// Evaluates a wave of `wave_size` opposing scouts from every free entry cell.
pub fn compute_danger(state: &GameState, wave_size: usize, config: &SearchConfig) -> DangerReport {
    let entries: Vec<Location> = enemy_spawn_locations()
        .into_iter()
        .filter(|&loc| !state.contains_stationary_unit(loc))
        .collect();

    let results = map_candidates(&entries, config.threads, |&loc| {
        evaluate_entry(state, loc, wave_size, config)
    });

    let mut report = DangerReport::default();
    for result in results.into_iter().flatten() {
        for wall in result.walls {
            if !report.walls_in_danger.contains(&wall) {
                report.walls_in_danger.push(wall);
            }
        }
        if result.score > report.danger {
            report.danger = result.score;
            report.lanes.clear();
            report.lanes.insert(result.lane);
        } else if result.score == report.danger {
            report.lanes.insert(result.lane);
        }
    }

    tracing::debug!(
        danger = report.danger,
        lanes = ?report.lanes,
        doomed_walls = report.walls_in_danger.len(),
        "danger evaluated"
    );
    report
}

fn evaluate_entry(
    state: &GameState,
    loc: Location,
    wave_size: usize,
    config: &SearchConfig,
) -> Option<EntryResult> {
    let mut hypothesis = state.clone();
    let ids = hypothesis.unsafe_spawn(UnitType::Scout, loc, Player::Enemy, wave_size).ok()?;
    for id in ids {
        if let Some(unit) = hypothesis.unit_mut(id) {
            unit.add_shield(config.danger_health_bonus);
        }
    }
    let outcome = simulate(&mut hypothesis, &config.sim);
    Some(EntryResult {
        score: outcome.score(config.defend_weight),
        lane: outcome.dominant_lane,
        walls: outcome.breach_opportunities,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_board_every_entry_scores_full_wave() {
        let state = GameState::new();
        let config = SearchConfig::default();
        let report = compute_danger(&state, 4, &config);
        assert_eq!(report.danger, 4.0 * config.defend_weight);
        assert!(!report.lanes.is_empty());
        assert!(report.walls_in_danger.is_empty());
    }

    #[test]
    fn tied_lanes_are_mirror_closed_on_symmetric_board() {
        let state = GameState::new();
        let report = compute_danger(&state, 3, &SearchConfig::default());
        assert!(!report.lanes.is_empty());
        for lane in &report.lanes {
            assert!(report.lanes.contains(&lane.mirrored()), "{lane} without its mirror");
        }
    }

    #[test]
    fn mirrored_defense_ties_mirrored_lanes() {
        let mut state = GameState::new();
        let layout = [
            (UnitType::Turret, Location::new(5, 11)),
            (UnitType::Turret, Location::new(9, 9)),
            (UnitType::Wall, Location::new(13, 11)),
            (UnitType::Wall, Location::new(8, 12)),
        ];
        for (unit_type, loc) in layout {
            for cell in [loc, loc.mirrored()] {
                state.unsafe_spawn(unit_type, cell, Player::Friendly, 1).unwrap();
            }
        }
        let config = SearchConfig { defend_weight: 3.0, ..SearchConfig::default() };
        let report = compute_danger(&state, 6, &config);
        assert_eq!(report.lanes, BTreeSet::from([LaneZone::Left, LaneZone::Right]));
        for lane in &report.lanes {
            assert!(report.lanes.contains(&lane.mirrored()), "{lane} without its mirror");
        }
    }

    #[test]
    fn zero_wave_has_no_danger() {
        let state = GameState::new();
        let report = compute_danger(&state, 0, &SearchConfig::default());
        assert_eq!(report.danger, 0.0);
    }

    #[test]
    fn weak_walls_in_a_wave_path_are_reported_once() {
        let mut state = GameState::new();
        // A fragile wall right next to the apex entry cells.
        let wall = Location::new(13, 25);
        state.unsafe_spawn(UnitType::Wall, wall, Player::Friendly, 1).unwrap();
        if let Some(w) = state.unit_mut(0) {
            w.health = 1.0;
        }
        let report = compute_danger(&state, 2, &SearchConfig::default());
        assert_eq!(report.walls_in_danger, vec![wall]);
    }
}
