#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomized depth-first maze generation.
//!
//! The generator walks the grid from a start cell, visiting neighbors in a
//! uniformly shuffled order and opening an edge only when the far cell has not
//! been visited yet. The opened edges therefore form a spanning tree over the
//! grid: a perfect maze with exactly one path between any two cells.
//!
//! Backtracking uses an explicit stack of frames rather than the call stack,
//! so a single corridor spanning millions of cells cannot overflow.

mod grid;

pub use grid::Grid;

use maze_ball_core::{CellCoord, Direction, GridSize, MazeLayout};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Depth-first maze carver driven by an injected random number generator.
#[derive(Debug)]
pub struct MazeGenerator<R = ChaCha8Rng> {
    rng: R,
    frames: Vec<Frame>,
}

impl MazeGenerator<ChaCha8Rng> {
    /// Creates a generator whose output is fully determined by `seed`.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> MazeGenerator<R> {
    /// Creates a generator drawing randomness from `rng`.
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            frames: Vec::new(),
        }
    }

    /// Carves a maze into `grid` starting at `start` and returns the finished layout.
    #[must_use]
    pub fn generate(&mut self, mut grid: Grid, start: CellCoord) -> MazeLayout {
        self.carve(&mut grid, start);
        let layout = grid.into_layout();
        log::info!(
            "carved {} openings across a {}x{} grid from {start:?}",
            layout.opening_count(),
            layout.size().rows(),
            layout.size().columns()
        );
        layout
    }

    /// Carves passages into `grid` in place, starting at `start`.
    ///
    /// Returns immediately when `start` was already visited.
    pub fn carve(&mut self, grid: &mut Grid, start: CellCoord) {
        if grid.is_visited(start) {
            return;
        }

        self.frames.clear();
        self.enter(grid, start);

        while let Some(frame) = self.frames.last_mut() {
            let Some((direction, neighbor)) = frame.next_neighbor() else {
                let _ = self.frames.pop();
                continue;
            };
            let cell = frame.cell;

            if grid.is_visited(neighbor) {
                continue;
            }

            grid.open(cell, direction);
            self.enter(grid, neighbor);
        }
    }

    /// Returns a uniformly chosen cell of the grid.
    pub fn random_cell(&mut self, size: GridSize) -> CellCoord {
        CellCoord::new(
            self.rng.gen_range(0..size.columns()),
            self.rng.gen_range(0..size.rows()),
        )
    }

    fn enter(&mut self, grid: &mut Grid, cell: CellCoord) {
        grid.mark_visited(cell);
        let mut frame = Frame::new(cell, grid.size());
        frame.shuffle(&mut self.rng);
        self.frames.push(frame);
    }
}

/// Pending work for one cell on the traversal stack.
#[derive(Clone, Copy, Debug)]
struct Frame {
    cell: CellCoord,
    neighbors: [(Direction, CellCoord); 4],
    len: usize,
    cursor: usize,
}

impl Frame {
    fn new(cell: CellCoord, size: GridSize) -> Self {
        let mut neighbors = [(Direction::North, cell); 4];
        let mut len = 0;
        for direction in Direction::ALL {
            if let Some(neighbor) = size.neighbor(cell, direction) {
                neighbors[len] = (direction, neighbor);
                len += 1;
            }
        }

        Self {
            cell,
            neighbors,
            len,
            cursor: 0,
        }
    }

    fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.neighbors[..self.len].shuffle(rng);
    }

    fn next_neighbor(&mut self) -> Option<(Direction, CellCoord)> {
        if self.cursor >= self.len {
            return None;
        }
        let neighbor = self.neighbors[self.cursor];
        self.cursor += 1;
        Some(neighbor)
    }
}
