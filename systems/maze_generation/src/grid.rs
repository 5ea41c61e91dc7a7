//! Mutable grid state owned by the generator while a maze is carved.

use maze_ball_core::{CellCoord, Direction, Edge, EdgeAxis, GridSize, MazeLayout, OpeningMatrix};

/// Visited-cell flags plus the two opening matrices of an R×C grid.
///
/// Coordinates outside the grid are a programming error and panic.
#[derive(Clone, Debug)]
pub struct Grid {
    size: GridSize,
    visited: Vec<bool>,
    vertical: OpeningMatrix,
    horizontal: OpeningMatrix,
}

impl Grid {
    /// Creates a grid with every cell unvisited and every edge closed.
    #[must_use]
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            visited: vec![false; size.cell_count()],
            vertical: OpeningMatrix::closed(size.rows(), size.columns() - 1),
            horizontal: OpeningMatrix::closed(size.rows() - 1, size.columns()),
        }
    }

    /// Dimensions of the grid.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Reports whether the cell has been visited.
    #[must_use]
    pub fn is_visited(&self, cell: CellCoord) -> bool {
        self.visited[self.index(cell)]
    }

    /// Marks the cell as visited.
    pub fn mark_visited(&mut self, cell: CellCoord) {
        let index = self.index(cell);
        self.visited[index] = true;
    }

    /// Number of visited cells.
    #[must_use]
    pub fn visited_count(&self) -> usize {
        self.visited.iter().filter(|visited| **visited).count()
    }

    /// Opens the edge between `cell` and its neighbor in `direction`.
    ///
    /// # Panics
    ///
    /// Panics when the neighbor lies outside the grid.
    pub fn open(&mut self, cell: CellCoord, direction: Direction) {
        let Some(Edge { axis, row, column }) = self.size.edge(cell, direction) else {
            panic!("no edge leaves {cell:?} toward {direction:?}");
        };
        match axis {
            EdgeAxis::Vertical => self.vertical.open(row, column),
            EdgeAxis::Horizontal => self.horizontal.open(row, column),
        }
    }

    /// Freezes the openings into an immutable layout.
    #[must_use]
    pub fn into_layout(self) -> MazeLayout {
        MazeLayout::new(self.size, self.vertical, self.horizontal)
    }

    fn index(&self, cell: CellCoord) -> usize {
        match self.size.index(cell) {
            Some(index) => index,
            None => panic!(
                "cell {cell:?} lies outside the {}x{} grid",
                self.size.rows(),
                self.size.columns()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_unvisited_and_closed() {
        let grid = Grid::new(GridSize::new(3, 4).expect("valid grid"));
        assert_eq!(grid.visited_count(), 0);
        let layout = grid.into_layout();
        assert_eq!(layout.opening_count(), 0);
        assert_eq!(layout.vertical().rows(), 3);
        assert_eq!(layout.vertical().columns(), 3);
        assert_eq!(layout.horizontal().rows(), 2);
        assert_eq!(layout.horizontal().columns(), 4);
    }

    #[test]
    fn opening_records_lower_indexed_cell() {
        let mut grid = Grid::new(GridSize::new(2, 2).expect("valid grid"));
        grid.open(CellCoord::new(1, 1), Direction::West);
        grid.open(CellCoord::new(1, 1), Direction::North);
        let layout = grid.into_layout();
        assert!(layout.vertical().is_open(1, 0));
        assert!(layout.horizontal().is_open(0, 1));
        assert_eq!(layout.opening_count(), 2);
    }

    #[test]
    fn visiting_is_tracked_per_cell() {
        let mut grid = Grid::new(GridSize::new(2, 3).expect("valid grid"));
        let cell = CellCoord::new(2, 1);
        assert!(!grid.is_visited(cell));
        grid.mark_visited(cell);
        assert!(grid.is_visited(cell));
        assert!(!grid.is_visited(CellCoord::new(1, 1)));
        assert_eq!(grid.visited_count(), 1);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn out_of_bounds_access_panics() {
        let grid = Grid::new(GridSize::new(2, 2).expect("valid grid"));
        let _ = grid.is_visited(CellCoord::new(2, 0));
    }

    #[test]
    #[should_panic(expected = "no edge")]
    fn opening_past_the_border_panics() {
        let mut grid = Grid::new(GridSize::new(2, 2).expect("valid grid"));
        grid.open(CellCoord::new(0, 0), Direction::North);
    }
}
