#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Translates a finished maze layout into static obstacles.
//!
//! Every closed edge between two adjacent cells becomes one rectangle tagged
//! [`BodyTag::Wall`] carrying its orientation, straddling the shared cell border. The viewport is
//! additionally framed by four thin rectangles tagged [`BodyTag::Boundary`].

use maze_ball_core::{
    BodyTag, CellSize, Command, MazeLayout, RectPlacement, Vector, Viewport, WallOrientation,
};

/// Default thickness of maze walls in world units.
pub const DEFAULT_WALL_THICKNESS: f32 = 10.0;

/// Default thickness of the viewport frame in world units.
pub const DEFAULT_BOUNDARY_THICKNESS: f32 = 2.0;

/// Computes one wall rectangle per closed edge of the layout.
///
/// Placements follow the horizontal opening matrix in row-major order and then
/// the vertical one.
#[must_use]
pub fn wall_placements(
    layout: &MazeLayout,
    cell_size: CellSize,
    thickness: f32,
) -> Vec<RectPlacement> {
    let width = cell_size.width();
    let height = cell_size.height();

    let horizontal = layout
        .horizontal()
        .iter()
        .filter(|(_, _, open)| !open)
        .map(|(row, column, _)| {
            RectPlacement::new(
                Vector::new(
                    column as f32 * width + width / 2.0,
                    row as f32 * height + height,
                ),
                width,
                thickness,
                BodyTag::Wall(WallOrientation::Horizontal),
            )
        });

    let vertical = layout
        .vertical()
        .iter()
        .filter(|(_, _, open)| !open)
        .map(|(row, column, _)| {
            RectPlacement::new(
                Vector::new(
                    column as f32 * width + width,
                    row as f32 * height + height / 2.0,
                ),
                thickness,
                height,
                BodyTag::Wall(WallOrientation::Vertical),
            )
        });

    horizontal.chain(vertical).collect()
}

/// Computes the four rectangles framing the viewport: top, bottom, left, right.
#[must_use]
pub fn boundary_placements(viewport: Viewport, thickness: f32) -> [RectPlacement; 4] {
    let width = viewport.width();
    let height = viewport.height();
    [
        RectPlacement::new(
            Vector::new(width / 2.0, 0.0),
            width,
            thickness,
            BodyTag::Boundary,
        ),
        RectPlacement::new(
            Vector::new(width / 2.0, height),
            width,
            thickness,
            BodyTag::Boundary,
        ),
        RectPlacement::new(
            Vector::new(0.0, height / 2.0),
            thickness,
            height,
            BodyTag::Boundary,
        ),
        RectPlacement::new(
            Vector::new(width, height / 2.0),
            thickness,
            height,
            BodyTag::Boundary,
        ),
    ]
}

/// Emits creation commands for the maze walls and the viewport frame.
#[derive(Clone, Copy, Debug)]
pub struct WallEmitter {
    wall_thickness: f32,
    boundary_thickness: f32,
}

impl WallEmitter {
    /// Creates an emitter producing walls and frame rectangles of the given thickness.
    #[must_use]
    pub const fn new(wall_thickness: f32, boundary_thickness: f32) -> Self {
        Self {
            wall_thickness,
            boundary_thickness,
        }
    }

    /// Pushes one [`Command::CreateStaticRectangle`] per frame rectangle and per closed edge.
    pub fn handle(&self, layout: &MazeLayout, viewport: Viewport, out: &mut Vec<Command>) {
        let cell_size = viewport.cell_size(layout.size());
        let walls = wall_placements(layout, cell_size, self.wall_thickness);
        log::debug!(
            "emitting {} walls and 4 boundary rectangles for a {}x{} maze",
            walls.len(),
            layout.size().rows(),
            layout.size().columns()
        );

        out.extend(
            boundary_placements(viewport, self.boundary_thickness)
                .into_iter()
                .chain(walls)
                .map(|placement| Command::CreateStaticRectangle { placement }),
        );
    }
}

impl Default for WallEmitter {
    fn default() -> Self {
        Self::new(DEFAULT_WALL_THICKNESS, DEFAULT_BOUNDARY_THICKNESS)
    }
}
