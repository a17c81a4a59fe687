//! Shortest path to an edge.
//!
//! Follows the game's pathing rules: a unit heads for its target edge; if
//! no edge cell is reachable it heads for the reachable cell deepest
//! toward that edge. Among equally short routes it prefers to alternate
//! between horizontal and vertical steps, then to step toward the target
//! edge.
//!
//! Design: a [`Navigator`] owns its BFS scratch buffers so that the
//! simulator can path many units without reallocating.

use std::collections::VecDeque;

use super::location::{Edge, Location, ARENA_SIZE, CELL_COUNT};
use super::state::GameState;

/// Idealness of a cell that lies on the target edge.
const IDEAL: i32 = i32::MAX;
/// Marks cells not reached by the distance sweep.
const UNREACHED: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

/// Reusable pathfinder.
#[derive(Debug, Clone)]
pub struct Navigator {
    visited: Vec<bool>,
    pathlength: Vec<i32>,
    queue: VecDeque<Location>,
}

impl Default for Navigator {
    fn default() -> Self {
        Navigator::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Navigator {
            visited: vec![false; CELL_COUNT],
            pathlength: vec![UNREACHED; CELL_COUNT],
            queue: VecDeque::with_capacity(CELL_COUNT),
        }
    }

    /// Returns the path from `start` (inclusive) toward `edge`. Empty if
    /// `start` is outside the arena or occupied by a structure.
    pub fn find_path_to_edge(
        &mut self,
        state: &GameState,
        start: Location,
        edge: Edge,
    ) -> Vec<Location> {
        if !start.in_arena_bounds() || state.contains_stationary_unit(start) {
            return Vec::new();
        }
        let ideal = self.idealness_search(state, start, edge);
        self.validate(state, ideal, edge);
        self.walk(state, start, edge)
    }

    /// BFS over pathable cells from `start`, returning the most ideal one.
    fn idealness_search(&mut self, state: &GameState, start: Location, edge: Edge) -> Location {
        self.visited.fill(false);
        self.queue.clear();
        self.queue.push_back(start);
        self.visited[start.index()] = true;

        let mut most_ideal = start;
        let mut best = idealness(start, edge);

        while let Some(cur) = self.queue.pop_front() {
            for next in cur.neighbors() {
                if !pathable(state, next) {
                    continue;
                }
                let score = idealness(next, edge);
                if score > best {
                    best = score;
                    most_ideal = next;
                }
                if !self.visited[next.index()] {
                    self.visited[next.index()] = true;
                    self.queue.push_back(next);
                }
            }
        }
        most_ideal
    }

    /// Distance field from the destination: every free edge cell when the
    /// edge is reachable, the single deepest cell otherwise.
    fn validate(&mut self, state: &GameState, ideal: Location, edge: Edge) {
        self.pathlength.fill(UNREACHED);
        self.queue.clear();

        if edge.contains(ideal) {
            for cell in edge.cells() {
                if pathable(state, cell) {
                    self.pathlength[cell.index()] = 0;
                    self.queue.push_back(cell);
                }
            }
        } else {
            self.pathlength[ideal.index()] = 0;
            self.queue.push_back(ideal);
        }

        while let Some(cur) = self.queue.pop_front() {
            let d = self.pathlength[cur.index()];
            for next in cur.neighbors() {
                if !pathable(state, next) || self.pathlength[next.index()] != UNREACHED {
                    continue;
                }
                self.pathlength[next.index()] = d + 1;
                self.queue.push_back(next);
            }
        }
    }

    /// Walks down the distance field from `start`.
    fn walk(&self, state: &GameState, start: Location, edge: Edge) -> Vec<Location> {
        let mut path = vec![start];
        let mut current = start;
        let mut last_axis = None;

        while self.pathlength[current.index()] > 0 {
            let next = self.choose_next_move(state, current, last_axis, edge);
            if next == current {
                break;
            }
            last_axis = Some(if next.x == current.x { Axis::Vertical } else { Axis::Horizontal });
            path.push(next);
            current = next;
        }
        path
    }

    fn choose_next_move(
        &self,
        state: &GameState,
        current: Location,
        last_axis: Option<Axis>,
        edge: Edge,
    ) -> Location {
        let mut ideal = current;
        let mut best = self.pathlength[current.index()];

        for next in current.neighbors() {
            if !pathable(state, next) {
                continue;
            }
            let len = self.pathlength[next.index()];
            if len == UNREACHED || len > best {
                continue;
            }
            let shorter = len < best;
            if !shorter && !better_direction(current, next, ideal, last_axis, edge) {
                continue;
            }
            ideal = next;
            best = len;
        }
        ideal
    }
}

impl GameState {
    /// Convenience wrapper around a one-off [`Navigator`].
    pub fn find_path_to_edge(&self, start: Location, edge: Edge) -> Vec<Location> {
        Navigator::new().find_path_to_edge(self, start, edge)
    }
}

#[inline]
fn pathable(state: &GameState, loc: Location) -> bool {
    loc.in_arena_bounds() && !state.contains_stationary_unit(loc)
}

/// How far toward `edge` a cell lies; edge cells are maximal.
fn idealness(loc: Location, edge: Edge) -> i32 {
    if edge.contains(loc) {
        return IDEAL;
    }
    let (dx, dy) = edge.direction();
    let mut score = if dy == 1 {
        ARENA_SIZE * loc.y
    } else {
        ARENA_SIZE * (ARENA_SIZE - 1 - loc.y)
    };
    score += if dx == 1 { loc.x } else { ARENA_SIZE - 1 - loc.x };
    score
}

/// Tie-break between two equally short steps out of `prev`: `candidate`
/// beats `best` if it switches axis relative to the last step, otherwise
/// if it heads toward the target edge.
fn better_direction(
    prev: Location,
    candidate: Location,
    best: Location,
    last_axis: Option<Axis>,
    edge: Edge,
) -> bool {
    match last_axis {
        Some(Axis::Horizontal) if candidate.x != best.x => return prev.y != candidate.y,
        Some(Axis::Vertical) if candidate.y != best.y => return prev.x != candidate.x,
        None => return prev.y != candidate.y,
        _ => {}
    }

    let (dx, dy) = edge.direction();
    if candidate.y == best.y {
        return (dx == 1 && candidate.x > best.x) || (dx == -1 && candidate.x < best.x);
    }
    if candidate.x == best.x {
        return (dy == 1 && candidate.y > best.y) || (dy == -1 && candidate.y < best.y);
    }
    true
}
