//! Arena geometry.
//!
//! The battlefield is a 28x28 diamond. Cells are addressed by integer
//! `(x, y)` coordinates with the friendly half at `y < 14`. The four
//! diagonal boundaries of the diamond are the edges units spawn on and
//! try to reach.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Width and height of the square that bounds the arena.
pub const ARENA_SIZE: i32 = 28;

/// Half of [`ARENA_SIZE`]; the first row of the enemy half.
pub const HALF_ARENA: i32 = 14;

/// Number of cells in the bounding square (dense index space).
pub const CELL_COUNT: usize = (ARENA_SIZE * ARENA_SIZE) as usize;

/// Number of cells on each edge.
pub const EDGE_LEN: usize = HALF_ARENA as usize;

/// A grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    pub const fn new(x: i32, y: i32) -> Self {
        Location { x, y }
    }

    /// Returns true if the cell lies inside the diamond.
    pub const fn in_arena_bounds(self) -> bool {
        let (x, y) = (self.x, self.y);
        if y < 0 || y >= ARENA_SIZE {
            return false;
        }
        let row_size = if y < HALF_ARENA { y + 1 } else { ARENA_SIZE - y };
        let start_x = HALF_ARENA - row_size;
        let end_x = start_x + 2 * row_size - 1;
        x >= start_x && x <= end_x
    }

    /// Dense index into per-cell arrays. Only meaningful for in-bounds cells.
    #[inline]
    pub const fn index(self) -> usize {
        (self.y * ARENA_SIZE + self.x) as usize
    }

    /// Offsets the location by `(dx, dy)`.
    #[inline]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Location { x: self.x + dx, y: self.y + dy }
    }

    /// The four orthogonal neighbours in the order the path walker
    /// evaluates them: up, down, right, left.
    pub const fn neighbors(self) -> [Location; 4] {
        [
            self.offset(0, 1),
            self.offset(0, -1),
            self.offset(1, 0),
            self.offset(-1, 0),
        ]
    }

    /// True on the half of the board owned by the friendly player.
    pub const fn is_friendly_half(self) -> bool {
        self.y < HALF_ARENA
    }

    /// Mirrors the cell across the vertical center line.
    pub const fn mirrored(self) -> Self {
        Location { x: ARENA_SIZE - 1 - self.x, y: self.y }
    }

    /// Iterates every in-bounds cell, x-major (column by column).
    pub fn all() -> impl Iterator<Item = Location> {
        (0..ARENA_SIZE)
            .flat_map(|x| (0..ARENA_SIZE).map(move |y| Location::new(x, y)))
            .filter(|loc| loc.in_arena_bounds())
    }
}

impl From<[i32; 2]> for Location {
    fn from([x, y]: [i32; 2]) -> Self {
        Location::new(x, y)
    }
}

impl From<Location> for [i32; 2] {
    fn from(loc: Location) -> Self {
        [loc.x, loc.y]
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four diagonal boundaries of the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    TopRight,
    TopLeft,
    BottomLeft,
    BottomRight,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::TopRight, Edge::TopLeft, Edge::BottomLeft, Edge::BottomRight];

    /// The edge a unit starting at `start` walks towards: the one
    /// diagonally opposite the quadrant it starts in.
    pub const fn target_for(start: Location) -> Edge {
        let left = start.x < HALF_ARENA;
        let bottom = start.y < HALF_ARENA;
        match (left, bottom) {
            (true, true) => Edge::TopRight,
            (true, false) => Edge::BottomRight,
            (false, true) => Edge::TopLeft,
            (false, false) => Edge::BottomLeft,
        }
    }

    /// Unit step (dx, dy) pointing from the arena center towards this edge.
    pub const fn direction(self) -> (i32, i32) {
        match self {
            Edge::TopRight => (1, 1),
            Edge::TopLeft => (-1, 1),
            Edge::BottomLeft => (-1, -1),
            Edge::BottomRight => (1, -1),
        }
    }

    /// Returns the `n`-th cell of the edge, counted from the horizontal
    /// center line of the diamond outwards.
    pub const fn cell(self, n: i32) -> Location {
        match self {
            Edge::TopRight => Location::new(HALF_ARENA + n, ARENA_SIZE - 1 - n),
            Edge::TopLeft => Location::new(HALF_ARENA - 1 - n, ARENA_SIZE - 1 - n),
            Edge::BottomLeft => Location::new(HALF_ARENA - 1 - n, n),
            Edge::BottomRight => Location::new(HALF_ARENA + n, n),
        }
    }

    /// All cells on this edge.
    pub fn cells(self) -> [Location; EDGE_LEN] {
        let mut out = [Location::new(0, 0); EDGE_LEN];
        for (n, slot) in out.iter_mut().enumerate() {
            *slot = self.cell(n as i32);
        }
        out
    }

    /// Returns true if `loc` lies on this edge.
    pub const fn contains(self, loc: Location) -> bool {
        let (x, y) = (loc.x, loc.y);
        match self {
            Edge::TopRight => {
                x + y == ARENA_SIZE + HALF_ARENA - 1 && x >= HALF_ARENA && x < ARENA_SIZE
            }
            Edge::TopLeft => y - x == HALF_ARENA && x >= 0 && x < HALF_ARENA,
            Edge::BottomLeft => x + y == HALF_ARENA - 1 && x >= 0 && x < HALF_ARENA,
            Edge::BottomRight => x - y == HALF_ARENA && x >= HALF_ARENA && x < ARENA_SIZE,
        }
    }
}

/// Friendly deploy cells, sweeping from the far left corner down to the
/// bottom apex and back up to the far right corner.
pub fn friendly_spawn_locations() -> Vec<Location> {
    let mut out: Vec<Location> = Edge::BottomLeft.cells().into_iter().rev().collect();
    out.extend(Edge::BottomRight.cells());
    out
}

/// Enemy deploy cells, interleaving the two top edges from the apex outwards.
pub fn enemy_spawn_locations() -> Vec<Location> {
    let left = Edge::TopLeft.cells();
    let right = Edge::TopRight.cells();
    left.into_iter()
        .zip(right)
        .flat_map(|(l, r)| [l, r])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diamond_bounds() {
        assert!(Location::new(13, 0).in_arena_bounds());
        assert!(Location::new(14, 0).in_arena_bounds());
        assert!(!Location::new(12, 0).in_arena_bounds());
        assert!(Location::new(0, 13).in_arena_bounds());
        assert!(Location::new(27, 14).in_arena_bounds());
        assert!(Location::new(13, 27).in_arena_bounds());
        assert!(!Location::new(0, 0).in_arena_bounds());
        assert!(!Location::new(28, 14).in_arena_bounds());
        assert!(!Location::new(14, -1).in_arena_bounds());
    }

    #[test]
    fn cell_count_matches_diamond() {
        // Rows 1..=14 twice.
        assert_eq!(Location::all().count(), 2 * (1..=14).map(|r| 2 * r).sum::<i32>() as usize);
    }

    #[test]
    fn edges_contain_their_cells() {
        for edge in Edge::ALL {
            for cell in edge.cells() {
                assert!(cell.in_arena_bounds(), "{:?} {}", edge, cell);
                assert!(edge.contains(cell));
                for other in Edge::ALL {
                    if other != edge {
                        assert!(!other.contains(cell));
                    }
                }
            }
        }
    }

    #[test]
    fn target_edge_is_opposite_quadrant() {
        assert_eq!(Edge::target_for(Location::new(3, 10)), Edge::TopRight);
        assert_eq!(Edge::target_for(Location::new(20, 6)), Edge::TopLeft);
        assert_eq!(Edge::target_for(Location::new(13, 27)), Edge::BottomRight);
        assert_eq!(Edge::target_for(Location::new(14, 27)), Edge::BottomLeft);
    }

    #[test]
    fn spawn_lists_follow_reference_order() {
        let friendly = friendly_spawn_locations();
        assert_eq!(friendly.len(), 28);
        assert_eq!(friendly[0], Location::new(0, 13));
        assert_eq!(friendly[13], Location::new(13, 0));
        assert_eq!(friendly[14], Location::new(14, 0));
        assert_eq!(friendly[27], Location::new(27, 13));

        let enemy = enemy_spawn_locations();
        assert_eq!(&enemy[..4], &[
            Location::new(13, 27),
            Location::new(14, 27),
            Location::new(12, 26),
            Location::new(15, 26),
        ]);
        assert_eq!(enemy[27], Location::new(27, 14));
    }

    #[test]
    fn location_serializes_as_pair() {
        let json = serde_json::to_string(&Location::new(4, 13)).unwrap();
        assert_eq!(json, "[4,13]");
        let back: Location = serde_json::from_str("[23,12]").unwrap();
        assert_eq!(back, Location::new(23, 12));
    }
}
