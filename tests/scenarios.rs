//! End-to-end scenarios for the simulator and the action search.
//!
//! Each test builds a battlefield by hand, runs the public entry points,
//! and checks the predicted outcome or the chosen actions.

use lanesim::board::{friendly_spawn_locations, LaneCounts, LaneZone, Resource, Unit};
use lanesim::eval::compute_danger;
use lanesim::resolve::FireModel;
use lanesim::search::ConfigError;
use lanesim::{simulate, GameState, Location, Optimizer, Player, SearchConfig, SimConfig, UnitType};

fn place(state: &mut GameState, unit_type: UnitType, x: i32, y: i32, owner: Player, count: usize) {
    state
        .unsafe_spawn(unit_type, Location::new(x, y), owner, count)
        .expect("test placement is legal");
}

/// A small enemy defense in front of the bottom apex.
fn defended_board() -> GameState {
    let mut state = GameState::new();
    place(&mut state, UnitType::Turret, 13, 4, Player::Enemy, 1);
    place(&mut state, UnitType::Turret, 16, 5, Player::Enemy, 1);
    place(&mut state, UnitType::Wall, 12, 4, Player::Enemy, 1);
    place(&mut state, UnitType::Wall, 14, 4, Player::Enemy, 1);
    state
}

fn total_value(state: &GameState) -> f32 {
    state.units().filter(|u| u.is_stationary()).map(Unit::structure_value).sum()
}

#[test]
fn undefended_wave_breaches_in_full() {
    let mut state = GameState::new();
    place(&mut state, UnitType::Scout, 13, 0, Player::Friendly, 5);
    let outcome = simulate(&mut state, &SimConfig::default());
    assert_eq!(outcome.player_damage, 5);
    assert_eq!(outcome.structure_destroyed, 0.0);
    assert!(outcome.breach_opportunities.is_empty());
    assert!(outcome.converged);
}

#[test]
fn turret_on_the_path_stops_a_lone_scout() {
    for fire_model in [FireModel::Focus, FireModel::PerUnit] {
        let mut state = GameState::new();
        place(&mut state, UnitType::Turret, 13, 3, Player::Enemy, 1);
        place(&mut state, UnitType::Scout, 13, 0, Player::Friendly, 1);
        let config = SimConfig { fire_model, ..SimConfig::default() };
        let outcome = simulate(&mut state, &config);
        assert_eq!(outcome.player_damage, 0, "{fire_model:?}");
        assert_eq!(outcome.structure_destroyed, 0.0);
    }
}

#[test]
fn demolisher_knocks_down_a_wall_in_its_way() {
    let mut state = GameState::new();
    let wall = Location::new(13, 2);
    place(&mut state, UnitType::Wall, 13, 2, Player::Enemy, 1);
    place(&mut state, UnitType::Demolisher, 13, 0, Player::Friendly, 1);
    let outcome = simulate(&mut state, &SimConfig::default());
    assert_eq!(outcome.breach_opportunities, vec![wall]);
    assert_eq!(outcome.structure_destroyed, UnitType::Wall.structure_value(false));
    assert_eq!(outcome.player_damage, 2);
}

#[test]
fn simulation_is_deterministic_on_clones() {
    let mut base = defended_board();
    place(&mut base, UnitType::Scout, 13, 0, Player::Friendly, 7);
    place(&mut base, UnitType::Support, 12, 1, Player::Friendly, 1);

    let mut a = base.clone();
    let mut b = base.clone();
    let first = simulate(&mut a, &SimConfig::default());
    let second = simulate(&mut b, &SimConfig::default());
    assert_eq!(first, second);
    assert_eq!(first.dominant_lane, second.dominant_lane);
    // The original snapshot is untouched.
    assert_eq!(base.units().count(), 4 + 7 + 1);
}

#[test]
fn destroyed_value_never_exceeds_what_was_on_the_board() {
    for scouts in [1, 4, 10, 20] {
        let mut state = defended_board();
        let before = total_value(&state);
        place(&mut state, UnitType::Scout, 13, 0, Player::Friendly, scouts);
        let outcome = simulate(&mut state, &SimConfig::default());
        assert!(outcome.structure_destroyed <= before, "{scouts} scouts");
        assert!(outcome.structural_damage <= before + 1e-3, "{scouts} scouts");
    }
}

#[test]
fn more_scouts_never_breach_less() {
    let mut previous = 0;
    for scouts in 1..=8 {
        let mut state = GameState::new();
        place(&mut state, UnitType::Turret, 13, 4, Player::Enemy, 1);
        place(&mut state, UnitType::Scout, 13, 0, Player::Friendly, scouts);
        let pd = simulate(&mut state, &SimConfig::default()).player_damage;
        assert!(pd >= previous, "{scouts} scouts breached {pd}, fewer than {previous}");
        previous = pd;
    }
    assert!(previous > 0);
}

#[test]
fn lane_ties_resolve_to_the_leftmost_zone() {
    assert_eq!(LaneCounts::default().dominant(), LaneZone::FarLeft);

    let run = || {
        let mut state = GameState::new();
        place(&mut state, UnitType::Scout, 13, 0, Player::Friendly, 3);
        simulate(&mut state, &SimConfig::default())
    };
    let (a, b) = (run(), run());
    assert_eq!(a.lane_counts, b.lane_counts);
    assert_eq!(a.dominant_lane, a.lane_counts.dominant());
    assert_eq!(a.dominant_lane, b.dominant_lane);
}

#[test]
fn no_free_deploy_cell_means_no_attack() {
    let mut state = GameState::new();
    for loc in friendly_spawn_locations() {
        place(&mut state, UnitType::Wall, loc.x, loc.y, Player::Friendly, 1);
    }
    state.set_resource(Resource::Mobile, Player::Friendly, 15.0);
    let config = SearchConfig::default();
    let plan = Optimizer::new(&state, &config).optimize_offense();
    assert_eq!(plan.locations(), (None, None));
    assert!(plan.actions().is_empty());
}

#[test]
fn search_leaves_the_snapshot_alone() {
    let mut state = defended_board();
    state.set_resource(Resource::Mobile, Player::Friendly, 9.0);
    state.set_resource(Resource::Mobile, Player::Enemy, 6.0);
    state.set_resource(Resource::Structure, Player::Friendly, 12.0);
    let snapshot = state.clone();
    let config = SearchConfig::default();
    let _ = Optimizer::new(&state, &config).plan_turn();
    assert_eq!(state.units().count(), snapshot.units().count());
    assert_eq!(state.get_resource(Resource::Mobile, Player::Friendly), 9.0);
    assert_eq!(state.get_resource(Resource::Structure, Player::Friendly), 12.0);
}

#[test]
fn parallel_search_matches_sequential() {
    let mut state = defended_board();
    place(&mut state, UnitType::Wall, 8, 13, Player::Friendly, 1);
    place(&mut state, UnitType::Turret, 20, 12, Player::Friendly, 1);
    state.set_resource(Resource::Mobile, Player::Friendly, 8.0);
    state.set_resource(Resource::Mobile, Player::Enemy, 7.0);
    state.set_resource(Resource::Structure, Player::Friendly, 14.0);

    let sequential = SearchConfig::default();
    let parallel = SearchConfig { threads: 4, ..SearchConfig::default() };

    assert_eq!(compute_danger(&state, 7, &sequential), compute_danger(&state, 7, &parallel));
    assert_eq!(
        Optimizer::new(&state, &sequential).plan_turn(),
        Optimizer::new(&state, &parallel).plan_turn()
    );
}

#[test]
fn planned_defense_is_affordable_and_legal() {
    let mut state = GameState::new();
    state.set_resource(Resource::Structure, Player::Friendly, 20.0);
    state.set_resource(Resource::Mobile, Player::Enemy, 6.0);
    let config = SearchConfig::default();
    let plan = Optimizer::new(&state, &config).plan_turn();
    assert!(!plan.attack.is_attack());
    assert!(!plan.defense.is_empty());

    let mut board = state.clone();
    for action in &plan.actions() {
        board.apply(action, Player::Friendly).expect("planned action applies");
    }
    assert!(board.get_resource(Resource::Structure, Player::Friendly) >= 0.0);
}

#[test]
fn attack_and_defense_fit_the_same_budget() {
    let mut state = GameState::new();
    state.set_resource(Resource::Structure, Player::Friendly, 12.0);
    state.set_resource(Resource::Mobile, Player::Friendly, 13.0);
    state.set_resource(Resource::Mobile, Player::Enemy, 6.0);
    let config = SearchConfig::default();
    let plan = Optimizer::new(&state, &config).plan_turn();
    assert!(plan.attack.is_attack());

    let mut board = state.clone();
    for action in &plan.actions() {
        board.apply(action, Player::Friendly).expect("planned action applies");
    }
    assert!(board.get_resource(Resource::Structure, Player::Friendly) >= 0.0);
}

#[test]
fn configuration_loads_from_json() {
    let config = SearchConfig::from_json(
        r#"{"threads": 2, "mindanger": 4, "sim": {"max_ticks": 100, "repath_on_destroy": true}}"#,
    )
    .unwrap();
    assert_eq!(config.threads, 2);
    assert_eq!(config.max_tolerated_danger, 4.0);
    assert_eq!(config.sim.max_ticks, 100);
    assert!(config.sim.repath_on_destroy);
    assert_eq!(config.sim.fire_model, FireModel::Focus);

    let err = SearchConfig::from_json(r#"{"attack_weight": -1}"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "attack_weight", .. }));
    assert!(err.to_string().contains("attack_weight"));
}
