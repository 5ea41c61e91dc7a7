#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Ball engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative physics world, and pure systems. Systems submit [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.
//!
//! The maze itself is described by [`MazeLayout`]: two opening matrices that
//! record which edges between grid-adjacent cells are passable.

use std::{
    collections::VecDeque,
    ops::{Add, Mul, Sub},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner shown while the player has not moved yet.
pub const WELCOME_BANNER: &str = "Use WASD or the arrow keys to guide the ball to the blue goal.";

/// Banner shown once the player reached the goal.
pub const VICTORY_BANNER: &str = "You won!";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Creates a static rectangle and adds it to the world.
    CreateStaticRectangle {
        /// Geometry and tag of the rectangle.
        placement: RectPlacement,
    },
    /// Creates a dynamic circle and adds it to the world.
    CreateDynamicCircle {
        /// Center of the circle in world units.
        center: Vector,
        /// Radius of the circle in world units.
        radius: f32,
        /// Tag used to recognise the body in collision notifications.
        tag: BodyTag,
    },
    /// Toggles whether a body is static (immovable) or dynamic.
    SetBodyStatic {
        /// Body that should change.
        body: BodyId,
        /// `true` pins the body in place, `false` subjects it to forces.
        is_static: bool,
    },
    /// Replaces the velocity of a dynamic body.
    SetBodyVelocity {
        /// Body whose velocity is replaced.
        body: BodyId,
        /// New velocity expressed in world units per physics step.
        velocity: Vector,
    },
    /// Sets the vertical gravity magnitude applied to dynamic bodies.
    SetGravity {
        /// Gravity scale; positive values pull towards increasing `y`.
        y: f32,
    },
    /// Requests that the world broadcast the victory signal.
    AnnounceVictory,
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a body was added to the world.
    BodyCreated {
        /// Identifier assigned to the body by the world.
        body: BodyId,
        /// Tag supplied when the body was requested.
        tag: BodyTag,
    },
    /// Confirms that a body switched between static and dynamic.
    BodyStaticChanged {
        /// Body that changed.
        body: BodyId,
        /// Whether the body is static after the change.
        is_static: bool,
    },
    /// Announces that the world gravity changed.
    GravityChanged {
        /// Gravity scale in effect after the change.
        y: f32,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Reports that two bodies started touching during a physics step.
    CollisionStarted {
        /// The two bodies that came into contact.
        contact: ContactPair,
    },
    /// Announces that the player won the session.
    VictoryAnnounced,
}

/// Cardinal directions between grid-adjacent cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing row indices.
    North,
    /// Toward increasing column indices.
    East,
    /// Toward increasing row indices.
    South,
    /// Toward decreasing column indices.
    West,
}

impl Direction {
    /// Every direction in up, right, down, left order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Dimensions of a rectangular maze grid. Both dimensions are at least one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    rows: u32,
    columns: u32,
}

impl GridSize {
    /// Validates and creates grid dimensions.
    pub fn new(rows: u32, columns: u32) -> Result<Self, ConfigError> {
        if rows == 0 || columns == 0 {
            return Err(ConfigError::EmptyGrid { rows, columns });
        }
        Ok(Self { rows, columns })
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Total number of cells in the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Row-major index of the cell, or `None` when it lies outside the grid.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            Some(cell.row() as usize * self.columns as usize + cell.column() as usize)
        } else {
            None
        }
    }

    /// Cell adjacent to `cell` in `direction`, or `None` when it would leave the grid.
    #[must_use]
    pub fn neighbor(&self, cell: CellCoord, direction: Direction) -> Option<CellCoord> {
        if !self.contains(cell) {
            return None;
        }

        let (column, row) = (cell.column(), cell.row());
        let neighbor = match direction {
            Direction::North => CellCoord::new(column, row.checked_sub(1)?),
            Direction::East => CellCoord::new(column.checked_add(1)?, row),
            Direction::South => CellCoord::new(column, row.checked_add(1)?),
            Direction::West => CellCoord::new(column.checked_sub(1)?, row),
        };
        self.contains(neighbor).then_some(neighbor)
    }

    /// Locates the opening-matrix entry describing the edge leaving `cell` in `direction`.
    ///
    /// The entry is always associated with the lower-indexed of the two cells
    /// along the edge's axis.
    #[must_use]
    pub fn edge(&self, cell: CellCoord, direction: Direction) -> Option<Edge> {
        let neighbor = self.neighbor(cell, direction)?;
        let edge = match direction {
            Direction::East | Direction::West => Edge {
                axis: EdgeAxis::Vertical,
                row: cell.row(),
                column: cell.column().min(neighbor.column()),
            },
            Direction::North | Direction::South => Edge {
                axis: EdgeAxis::Horizontal,
                row: cell.row().min(neighbor.row()),
                column: cell.column(),
            },
        };
        Some(edge)
    }

    /// Cell diagonally opposite the top-left origin.
    #[must_use]
    pub const fn far_corner(&self) -> CellCoord {
        CellCoord::new(self.columns - 1, self.rows - 1)
    }

    /// Cell at the center of the grid, rounding toward the origin.
    #[must_use]
    pub const fn center(&self) -> CellCoord {
        CellCoord::new(self.columns / 2, self.rows / 2)
    }
}

/// Matrix an [`Edge`] is recorded in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeAxis {
    /// Edge between horizontally adjacent cells `(r, c)` and `(r, c + 1)`.
    Vertical,
    /// Edge between vertically adjacent cells `(r, c)` and `(r + 1, c)`.
    Horizontal,
}

/// Single entry in one of the two opening matrices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Matrix holding the entry.
    pub axis: EdgeAxis,
    /// Row of the entry within its matrix.
    pub row: u32,
    /// Column of the entry within its matrix.
    pub column: u32,
}

/// Boolean matrix recording which edges between grid-adjacent cells are passable.
///
/// Entries start closed and can only ever be opened.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OpeningMatrix {
    rows: u32,
    columns: u32,
    cells: Vec<bool>,
}

impl OpeningMatrix {
    /// Creates a matrix with every entry closed.
    #[must_use]
    pub fn closed(rows: u32, columns: u32) -> Self {
        Self {
            rows,
            columns,
            cells: vec![false; rows as usize * columns as usize],
        }
    }

    /// Number of rows in the matrix.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns in the matrix.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Reports whether the entry is open. Entries outside the matrix read as closed.
    #[must_use]
    pub fn is_open(&self, row: u32, column: u32) -> bool {
        self.index(row, column)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(false)
    }

    /// Marks the entry as open.
    ///
    /// # Panics
    ///
    /// Panics when the entry lies outside the matrix, which indicates a broken
    /// adjacency computation in the caller.
    pub fn open(&mut self, row: u32, column: u32) {
        let Some(index) = self.index(row, column) else {
            panic!(
                "opening ({row}, {column}) lies outside a {}x{} matrix",
                self.rows, self.columns
            );
        };
        self.cells[index] = true;
    }

    /// Number of open entries.
    #[must_use]
    pub fn open_count(&self) -> usize {
        self.cells.iter().filter(|open| **open).count()
    }

    /// Iterates every entry in row-major order as `(row, column, open)`.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, bool)> + '_ {
        let columns = self.columns.max(1);
        self.cells.iter().enumerate().map(move |(index, open)| {
            let index = index as u32;
            (index / columns, index % columns, *open)
        })
    }

    fn index(&self, row: u32, column: u32) -> Option<usize> {
        if row < self.rows && column < self.columns {
            Some(row as usize * self.columns as usize + column as usize)
        } else {
            None
        }
    }
}

/// Finished maze: the grid dimensions and both opening matrices.
///
/// Layouts are immutable once produced by the generator.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MazeLayout {
    size: GridSize,
    vertical: OpeningMatrix,
    horizontal: OpeningMatrix,
}

impl MazeLayout {
    /// Assembles a layout from matrices matching the grid dimensions.
    ///
    /// # Panics
    ///
    /// Panics when a matrix does not have the shape implied by `size`:
    /// `rows × (columns - 1)` for vertical openings and `(rows - 1) × columns`
    /// for horizontal openings.
    #[must_use]
    pub fn new(size: GridSize, vertical: OpeningMatrix, horizontal: OpeningMatrix) -> Self {
        assert_eq!(
            (vertical.rows(), vertical.columns()),
            (size.rows(), size.columns() - 1),
            "vertical openings must be rows x (columns - 1)"
        );
        assert_eq!(
            (horizontal.rows(), horizontal.columns()),
            (size.rows() - 1, size.columns()),
            "horizontal openings must be (rows - 1) x columns"
        );
        Self {
            size,
            vertical,
            horizontal,
        }
    }

    /// Dimensions of the maze grid.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Openings between horizontally adjacent cells.
    #[must_use]
    pub const fn vertical(&self) -> &OpeningMatrix {
        &self.vertical
    }

    /// Openings between vertically adjacent cells.
    #[must_use]
    pub const fn horizontal(&self) -> &OpeningMatrix {
        &self.horizontal
    }

    /// Total number of open edges across both matrices.
    #[must_use]
    pub fn opening_count(&self) -> usize {
        self.vertical.open_count() + self.horizontal.open_count()
    }

    /// Reports whether a passage leads from `cell` toward `direction`.
    #[must_use]
    pub fn is_open(&self, cell: CellCoord, direction: Direction) -> bool {
        match self.size.edge(cell, direction) {
            Some(Edge {
                axis: EdgeAxis::Vertical,
                row,
                column,
            }) => self.vertical.is_open(row, column),
            Some(Edge {
                axis: EdgeAxis::Horizontal,
                row,
                column,
            }) => self.horizontal.is_open(row, column),
            None => false,
        }
    }

    /// Cells reachable from `cell` through a single open edge.
    pub fn passages(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        Direction::ALL.into_iter().filter_map(move |direction| {
            if self.is_open(cell, direction) {
                self.size.neighbor(cell, direction)
            } else {
                None
            }
        })
    }

    /// Counts the cells reachable from `start` by walking open edges.
    #[must_use]
    pub fn reachable_from(&self, start: CellCoord) -> usize {
        let Some(start_index) = self.size.index(start) else {
            return 0;
        };

        let mut seen = vec![false; self.size.cell_count()];
        seen[start_index] = true;
        let mut frontier = VecDeque::from([start]);
        let mut reached = 0;

        while let Some(cell) = frontier.pop_front() {
            reached += 1;
            for next in self.passages(cell) {
                if let Some(index) = self.size.index(next) {
                    if !seen[index] {
                        seen[index] = true;
                        frontier.push_back(next);
                    }
                }
            }
        }

        reached
    }
}

/// Two-dimensional vector in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    x: f32,
    y: f32,
}

impl Vector {
    /// Vector with both components set to zero.
    pub const ZERO: Vector = Vector::new(0.0, 0.0);

    /// Creates a new vector.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal component.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical component; positive values point down the screen.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Dot product of two vectors.
    #[must_use]
    pub fn dot(self, other: Vector) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Euclidean length of the vector.
    #[must_use]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, rhs: Vector) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vector {
    type Output = Vector;

    fn mul(self, rhs: f32) -> Vector {
        Vector::new(self.x * rhs, self.y * rhs)
    }
}

/// Size of the area the maze is laid out on, in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    width: f32,
    height: f32,
}

impl Viewport {
    /// Validates and creates a viewport. Both dimensions must be finite and positive.
    pub fn new(width: f32, height: f32) -> Result<Self, ConfigError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ConfigError::InvalidViewport { width, height });
        }
        Ok(Self { width, height })
    }

    /// Width of the viewport.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the viewport.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Size of a single cell when `size` is stretched over the viewport.
    #[must_use]
    pub fn cell_size(&self, size: GridSize) -> CellSize {
        CellSize::new(
            self.width / size.columns() as f32,
            self.height / size.rows() as f32,
        )
    }
}

/// Dimensions of a single maze cell in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellSize {
    width: f32,
    height: f32,
}

impl CellSize {
    /// Creates a new cell size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Horizontal extent of a cell.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Vertical extent of a cell.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// World-space center of the provided cell.
    #[must_use]
    pub fn center_of(&self, cell: CellCoord) -> Vector {
        Vector::new(
            (cell.column() as f32 + 0.5) * self.width,
            (cell.row() as f32 + 0.5) * self.height,
        )
    }
}

/// Unique identifier assigned to a physics body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(u32);

impl BodyId {
    /// Creates a new body identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Role a body plays in the session, reported with collision notifications.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BodyTag {
    /// Interior maze wall; released when the player wins.
    Wall(WallOrientation),
    /// Perimeter rectangle framing the viewport.
    Boundary,
    /// Region the player must reach.
    Goal,
    /// Ball steered by the player.
    Player,
}

impl BodyTag {
    /// Reports whether the tag marks an interior maze wall of either orientation.
    #[must_use]
    pub const fn is_wall(self) -> bool {
        matches!(self, BodyTag::Wall(_))
    }
}

/// Direction in which a maze wall runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WallOrientation {
    /// Runs along a row border, separating vertically adjacent cells.
    Horizontal,
    /// Runs along a column border, separating horizontally adjacent cells.
    Vertical,
}

/// Static rectangle placement in world coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RectPlacement {
    /// Center of the rectangle.
    pub center: Vector,
    /// Horizontal extent of the rectangle.
    pub width: f32,
    /// Vertical extent of the rectangle.
    pub height: f32,
    /// Tag identifying the rectangle's role.
    pub tag: BodyTag,
}

impl RectPlacement {
    /// Creates a new rectangle placement.
    #[must_use]
    pub const fn new(center: Vector, width: f32, height: f32, tag: BodyTag) -> Self {
        Self {
            center,
            width,
            height,
            tag,
        }
    }
}

/// Collision geometry of a body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BodyShape {
    /// Axis-aligned rectangle.
    Rectangle {
        /// Horizontal extent.
        width: f32,
        /// Vertical extent.
        height: f32,
    },
    /// Circle.
    Circle {
        /// Radius of the circle.
        radius: f32,
    },
}

/// Two bodies reported together in a collision notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ContactPair {
    /// First body of the pair.
    pub first: BodyId,
    /// Tag of the first body.
    pub first_tag: BodyTag,
    /// Second body of the pair.
    pub second: BodyId,
    /// Tag of the second body.
    pub second_tag: BodyTag,
}

impl ContactPair {
    /// Reports whether the pair's tags are exactly `{a, b}` in either order.
    #[must_use]
    pub fn is_between(&self, a: BodyTag, b: BodyTag) -> bool {
        (self.first_tag == a && self.second_tag == b)
            || (self.first_tag == b && self.second_tag == a)
    }
}

/// Keyboard keys reported by adapters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Up arrow.
    ArrowUp,
    /// Right arrow.
    ArrowRight,
    /// Down arrow.
    ArrowDown,
    /// Left arrow.
    ArrowLeft,
    /// `W`.
    W,
    /// `D`.
    D,
    /// `S`.
    S,
    /// `A`.
    A,
    /// Any key without a gameplay binding.
    Other,
}

impl Key {
    /// Steering direction bound to the key, if any.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::ArrowUp | Self::W => Some(Direction::North),
            Self::ArrowRight | Self::D => Some(Direction::East),
            Self::ArrowDown | Self::S => Some(Direction::South),
            Self::ArrowLeft | Self::A => Some(Direction::West),
            Self::Other => None,
        }
    }
}

/// Immutable representation of a single body's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodySnapshot {
    /// Identifier assigned to the body.
    pub id: BodyId,
    /// Role of the body.
    pub tag: BodyTag,
    /// Collision geometry.
    pub shape: BodyShape,
    /// Current center of the body.
    pub center: Vector,
    /// Current velocity in world units per physics step.
    pub velocity: Vector,
    /// Whether the body is pinned in place.
    pub is_static: bool,
}

/// Read-only snapshot describing every body in the world.
#[derive(Clone, Debug, Default)]
pub struct BodyView {
    snapshots: Vec<BodySnapshot>,
}

impl BodyView {
    /// Creates a new body view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<BodySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &BodySnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of the body with the provided identifier.
    #[must_use]
    pub fn get(&self, id: BodyId) -> Option<&BodySnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Iterator over the snapshots carrying `tag`.
    pub fn tagged(&self, tag: BodyTag) -> impl Iterator<Item = &BodySnapshot> {
        self.snapshots
            .iter()
            .filter(move |snapshot| snapshot.tag == tag)
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<BodySnapshot> {
        self.snapshots
    }
}

/// Configuration errors rejected before a maze is generated.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The grid has no rows or no columns.
    #[error("maze grid must have at least one row and one column (received {rows}x{columns})")]
    EmptyGrid {
        /// Requested row count.
        rows: u32,
        /// Requested column count.
        columns: u32,
    },
    /// The viewport has a zero, negative or non-finite dimension.
    #[error("viewport must have a positive finite size (received {width}x{height})")]
    InvalidViewport {
        /// Requested width.
        width: f32,
        /// Requested height.
        height: f32,
    },
    /// The wall thickness is zero, negative or non-finite.
    #[error("wall thickness must be positive (received {thickness})")]
    InvalidWallThickness {
        /// Requested thickness.
        thickness: f32,
    },
    /// Walls would be at least as thick as the cells they separate.
    #[error("wall thickness {thickness} leaves no room inside {cell_width}x{cell_height} cells")]
    WallsTooThick {
        /// Requested thickness.
        thickness: f32,
        /// Width of a single cell.
        cell_width: f32,
        /// Height of a single cell.
        cell_height: f32,
    },
    /// The requested generation start cell lies outside the grid.
    #[error("start cell {cell:?} lies outside the {rows}x{columns} grid")]
    StartOutOfBounds {
        /// Requested start cell.
        cell: CellCoord,
        /// Grid row count.
        rows: u32,
        /// Grid column count.
        columns: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::{
        BodyId, BodySnapshot, BodyShape, BodyTag, BodyView, CellCoord, ConfigError, ContactPair,
        Direction, Edge, EdgeAxis, GridSize, Key, MazeLayout, OpeningMatrix, Vector, Viewport,
        WallOrientation,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    fn corridor_layout() -> MazeLayout {
        // 2x2 grid shaped like a "U": (0,0)-(0,1) down to (1,1)-(1,0).
        let size = GridSize::new(2, 2).expect("valid grid");
        let mut vertical = OpeningMatrix::closed(2, 1);
        vertical.open(0, 0);
        vertical.open(1, 0);
        let mut horizontal = OpeningMatrix::closed(1, 2);
        horizontal.open(0, 1);
        MazeLayout::new(size, vertical, horizontal)
    }

    #[test]
    fn grid_size_rejects_empty_dimensions() {
        assert_eq!(
            GridSize::new(0, 4),
            Err(ConfigError::EmptyGrid {
                rows: 0,
                columns: 4
            })
        );
        assert!(GridSize::new(3, 0).is_err());
        assert!(GridSize::new(1, 1).is_ok());
    }

    #[test]
    fn neighbor_respects_grid_bounds() {
        let size = GridSize::new(3, 2).expect("valid grid");
        let origin = CellCoord::new(0, 0);
        assert_eq!(size.neighbor(origin, Direction::North), None);
        assert_eq!(size.neighbor(origin, Direction::West), None);
        assert_eq!(
            size.neighbor(origin, Direction::East),
            Some(CellCoord::new(1, 0))
        );
        assert_eq!(
            size.neighbor(origin, Direction::South),
            Some(CellCoord::new(0, 1))
        );
        assert_eq!(size.neighbor(CellCoord::new(1, 2), Direction::East), None);
        assert_eq!(size.neighbor(CellCoord::new(1, 2), Direction::South), None);
    }

    #[test]
    fn edges_are_stored_at_lower_indexed_cell() {
        let size = GridSize::new(3, 3).expect("valid grid");
        let center = CellCoord::new(1, 1);
        assert_eq!(
            size.edge(center, Direction::West),
            Some(Edge {
                axis: EdgeAxis::Vertical,
                row: 1,
                column: 0
            })
        );
        assert_eq!(
            size.edge(center, Direction::East),
            Some(Edge {
                axis: EdgeAxis::Vertical,
                row: 1,
                column: 1
            })
        );
        assert_eq!(
            size.edge(center, Direction::North),
            Some(Edge {
                axis: EdgeAxis::Horizontal,
                row: 0,
                column: 1
            })
        );
        assert_eq!(
            size.edge(center, Direction::South),
            Some(Edge {
                axis: EdgeAxis::Horizontal,
                row: 1,
                column: 1
            })
        );
    }

    #[test]
    fn opening_matrix_starts_closed_and_only_opens() {
        let mut matrix = OpeningMatrix::closed(2, 3);
        assert_eq!(matrix.open_count(), 0);
        matrix.open(1, 2);
        matrix.open(1, 2);
        assert!(matrix.is_open(1, 2));
        assert!(!matrix.is_open(0, 0));
        assert!(!matrix.is_open(5, 5), "outside entries read as closed");
        assert_eq!(matrix.open_count(), 1);
        let entries: Vec<_> = matrix.iter().collect();
        assert_eq!(entries.len(), 6);
        assert_eq!(entries[5], (1, 2, true));
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn opening_outside_matrix_panics() {
        let mut matrix = OpeningMatrix::closed(1, 1);
        matrix.open(1, 0);
    }

    #[test]
    fn layout_reports_passages_in_both_directions() {
        let layout = corridor_layout();
        assert!(layout.is_open(CellCoord::new(0, 0), Direction::East));
        assert!(layout.is_open(CellCoord::new(1, 0), Direction::West));
        assert!(layout.is_open(CellCoord::new(1, 0), Direction::South));
        assert!(!layout.is_open(CellCoord::new(0, 0), Direction::South));
        assert!(!layout.is_open(CellCoord::new(0, 0), Direction::North));
        assert_eq!(layout.opening_count(), 3);
        assert_eq!(layout.reachable_from(CellCoord::new(0, 1)), 4);
    }

    #[test]
    #[should_panic(expected = "vertical openings")]
    fn layout_rejects_mismatched_matrices() {
        let size = GridSize::new(2, 2).expect("valid grid");
        let _ = MazeLayout::new(
            size,
            OpeningMatrix::closed(2, 2),
            OpeningMatrix::closed(1, 2),
        );
    }

    #[test]
    fn layout_round_trips_through_bincode() {
        assert_round_trip(&corridor_layout());
    }

    #[test]
    fn body_tag_round_trips_through_bincode() {
        assert_round_trip(&BodyTag::Goal);
        assert_round_trip(&BodyId::new(42));
    }

    #[test]
    fn viewport_rejects_degenerate_sizes() {
        assert!(Viewport::new(0.0, 10.0).is_err());
        assert!(Viewport::new(10.0, -1.0).is_err());
        assert!(Viewport::new(f32::NAN, 10.0).is_err());
        let viewport = Viewport::new(300.0, 200.0).expect("valid viewport");
        let cell = viewport.cell_size(GridSize::new(4, 3).expect("valid grid"));
        assert!((cell.width() - 100.0).abs() < f32::EPSILON);
        assert!((cell.height() - 50.0).abs() < f32::EPSILON);
        assert_eq!(cell.center_of(CellCoord::new(1, 2)), Vector::new(150.0, 125.0));
    }

    #[test]
    fn contact_pair_matches_tags_in_either_order() {
        let contact = ContactPair {
            first: BodyId::new(1),
            first_tag: BodyTag::Goal,
            second: BodyId::new(7),
            second_tag: BodyTag::Player,
        };
        assert!(contact.is_between(BodyTag::Player, BodyTag::Goal));
        assert!(contact.is_between(BodyTag::Goal, BodyTag::Player));
        assert!(!contact.is_between(
            BodyTag::Player,
            BodyTag::Wall(WallOrientation::Horizontal)
        ));
    }

    #[test]
    fn both_wall_orientations_count_as_walls() {
        assert!(BodyTag::Wall(WallOrientation::Horizontal).is_wall());
        assert!(BodyTag::Wall(WallOrientation::Vertical).is_wall());
        assert!(!BodyTag::Boundary.is_wall());
        assert_ne!(
            BodyTag::Wall(WallOrientation::Horizontal),
            BodyTag::Wall(WallOrientation::Vertical)
        );
    }

    #[test]
    fn keys_map_to_directions() {
        assert_eq!(Key::W.direction(), Some(Direction::North));
        assert_eq!(Key::ArrowUp.direction(), Some(Direction::North));
        assert_eq!(Key::D.direction(), Some(Direction::East));
        assert_eq!(Key::ArrowDown.direction(), Some(Direction::South));
        assert_eq!(Key::A.direction(), Some(Direction::West));
        assert_eq!(Key::Other.direction(), None);
    }

    #[test]
    fn body_view_finds_snapshots_by_id() {
        let snapshot = |id: u32, tag| BodySnapshot {
            id: BodyId::new(id),
            tag,
            shape: BodyShape::Circle { radius: 1.0 },
            center: Vector::ZERO,
            velocity: Vector::ZERO,
            is_static: true,
        };
        let view = BodyView::from_snapshots(vec![
            snapshot(3, BodyTag::Wall(WallOrientation::Vertical)),
            snapshot(1, BodyTag::Player),
            snapshot(2, BodyTag::Wall(WallOrientation::Vertical)),
        ]);
        assert_eq!(
            view.get(BodyId::new(1)).map(|body| body.tag),
            Some(BodyTag::Player)
        );
        assert!(view.get(BodyId::new(9)).is_none());
        assert_eq!(view.tagged(BodyTag::Wall(WallOrientation::Vertical)).count(), 2);
        let ids: Vec<u32> = view.iter().map(|body| body.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
