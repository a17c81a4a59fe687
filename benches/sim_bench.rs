use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use lanesim::board::{Location, Resource, HALF_ARENA};
use lanesim::eval::compute_danger;
use lanesim::{simulate, GameState, Optimizer, Player, SearchConfig, SimConfig, UnitType};

/// Scatters a seeded random enemy defense over the top half.
fn random_defense(seed: u64, structures: usize) -> GameState {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut state = GameState::new();
    let mut placed = 0;
    while placed < structures {
        let loc = Location::new(rng.gen_range(0..28), rng.gen_range(HALF_ARENA..28));
        if !loc.in_arena_bounds() || state.contains_stationary_unit(loc) {
            continue;
        }
        let unit_type = if rng.gen_bool(0.4) { UnitType::Turret } else { UnitType::Wall };
        if state.unsafe_spawn(unit_type, loc, Player::Enemy, 1).is_ok() {
            if rng.gen_bool(0.25) {
                let _ = state.unsafe_upgrade(loc);
            }
            placed += 1;
        }
    }
    state
}

fn bench_simulate_open(c: &mut Criterion) {
    let mut state = GameState::new();
    state
        .unsafe_spawn(UnitType::Scout, Location::new(13, 0), Player::Friendly, 10)
        .unwrap();
    let config = SimConfig::default();
    c.bench_function("simulate_10_scouts_open", |b| {
        b.iter(|| simulate(&mut black_box(&state).clone(), &config))
    });
}

fn bench_simulate_defended(c: &mut Criterion) {
    let mut state = random_defense(7, 30);
    state
        .unsafe_spawn(UnitType::Scout, Location::new(13, 0), Player::Friendly, 10)
        .unwrap();
    let config = SimConfig::default();
    c.bench_function("simulate_10_scouts_30_structures", |b| {
        b.iter(|| simulate(&mut black_box(&state).clone(), &config))
    });
}

fn bench_danger(c: &mut Criterion) {
    let state = random_defense(11, 20);
    let config = SearchConfig::default();
    c.bench_function("danger_8_scouts", |b| {
        b.iter(|| compute_danger(black_box(&state), 8, &config))
    });
}

fn bench_plan_turn(c: &mut Criterion) {
    let mut state = random_defense(42, 25);
    state.set_resource(Resource::Mobile, Player::Friendly, 9.0);
    state.set_resource(Resource::Mobile, Player::Enemy, 8.0);
    state.set_resource(Resource::Structure, Player::Friendly, 20.0);

    let sequential = SearchConfig::default();
    c.bench_function("plan_turn_1_thread", |b| {
        b.iter(|| Optimizer::new(black_box(&state), &sequential).plan_turn())
    });

    let parallel = SearchConfig { threads: 4, ..SearchConfig::default() };
    c.bench_function("plan_turn_4_threads", |b| {
        b.iter(|| Optimizer::new(black_box(&state), &parallel).plan_turn())
    });
}

fn bench_state_clone(c: &mut Criterion) {
    let state = random_defense(3, 40);
    c.bench_function("game_state_clone", |b| b.iter(|| black_box(&state).clone()));
}

criterion_group!(
    benches,
    bench_simulate_open,
    bench_simulate_defended,
    bench_danger,
    bench_plan_turn,
    bench_state_clone,
);
criterion_main!(benches);
