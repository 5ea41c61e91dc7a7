#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares a Maze Ball session.
//!
//! [`Bootstrap::prepare`] validates a [`SessionConfig`], carves the maze and
//! produces the batch of creation commands that populate an empty world:
//! the viewport frame, the maze walls, the goal and finally the ball.

use maze_ball_core::{
    BodyTag, BodyView, CellCoord, CellSize, Command, ConfigError, GridSize, MazeLayout,
    RectPlacement, Viewport,
};
use maze_ball_system_maze_generation::{Grid, MazeGenerator};
use maze_ball_system_wall_emission::{
    WallEmitter, DEFAULT_BOUNDARY_THICKNESS, DEFAULT_WALL_THICKNESS,
};
use maze_ball_world::{query, World};

/// Fraction of a cell covered by the goal rectangle along each axis.
pub const GOAL_SCALE: f32 = 0.7;

/// Cell where the generator begins its traversal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StartCell {
    /// Pick a uniformly random cell from the seeded generator.
    #[default]
    Random,
    /// Start from the provided cell.
    Fixed(CellCoord),
}

/// Parameters describing a session before it is validated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionConfig {
    /// Number of grid rows.
    pub rows: u32,
    /// Number of grid columns.
    pub columns: u32,
    /// Width of the playing field in world units.
    pub width: f32,
    /// Height of the playing field in world units.
    pub height: f32,
    /// Thickness of interior maze walls.
    pub wall_thickness: f32,
    /// Thickness of the rectangles framing the playing field.
    pub boundary_thickness: f32,
    /// Cell the generator starts carving from.
    pub start: StartCell,
    /// Seed that fully determines the maze.
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rows: 15,
            columns: 15,
            width: 960.0,
            height: 960.0,
            wall_thickness: DEFAULT_WALL_THICKNESS,
            boundary_thickness: DEFAULT_BOUNDARY_THICKNESS,
            start: StartCell::Random,
            seed: 0,
        }
    }
}

/// Validated session ready to be applied to an empty world.
#[derive(Clone, Debug)]
pub struct SessionPlan {
    layout: MazeLayout,
    viewport: Viewport,
    cell_size: CellSize,
    generation_start: CellCoord,
    goal: CellCoord,
    commands: Vec<Command>,
}

impl SessionPlan {
    /// Carved maze layout.
    #[must_use]
    pub fn layout(&self) -> &MazeLayout {
        &self.layout
    }

    /// Playing field dimensions.
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Size of a single maze cell.
    #[must_use]
    pub const fn cell_size(&self) -> CellSize {
        self.cell_size
    }

    /// Cell the generator started carving from.
    #[must_use]
    pub const fn generation_start(&self) -> CellCoord {
        self.generation_start
    }

    /// Cell holding the goal.
    #[must_use]
    pub const fn goal(&self) -> CellCoord {
        self.goal
    }

    /// Creation commands in the order they must be applied.
    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Consumes the plan, yielding the creation commands.
    #[must_use]
    pub fn into_commands(self) -> Vec<Command> {
        self.commands
    }
}

/// Produces session plans and the data required to greet the player.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Validates the configuration and prepares the initial command batch.
    pub fn prepare(&self, config: &SessionConfig) -> Result<SessionPlan, ConfigError> {
        let size = GridSize::new(config.rows, config.columns)?;
        let viewport = Viewport::new(config.width, config.height)?;
        validate_thickness(config.wall_thickness)?;
        validate_thickness(config.boundary_thickness)?;
        let cell_size = viewport.cell_size(size);
        validate_wall_fit(config.wall_thickness, cell_size)?;

        let mut generator = MazeGenerator::from_seed(config.seed);
        let generation_start = match config.start {
            StartCell::Random => generator.random_cell(size),
            StartCell::Fixed(cell) if size.contains(cell) => cell,
            StartCell::Fixed(cell) => {
                return Err(ConfigError::StartOutOfBounds {
                    cell,
                    rows: size.rows(),
                    columns: size.columns(),
                })
            }
        };
        let layout = generator.generate(Grid::new(size), generation_start);

        let mut commands = Vec::new();
        WallEmitter::new(config.wall_thickness, config.boundary_thickness).handle(
            &layout,
            viewport,
            &mut commands,
        );

        let goal = size.far_corner();
        commands.push(Command::CreateStaticRectangle {
            placement: RectPlacement::new(
                cell_size.center_of(goal),
                cell_size.width() * GOAL_SCALE,
                cell_size.height() * GOAL_SCALE,
                BodyTag::Goal,
            ),
        });

        let spawn = CellCoord::new(0, 0);
        commands.push(Command::CreateDynamicCircle {
            center: cell_size.center_of(spawn),
            radius: ball_radius(cell_size),
            tag: BodyTag::Player,
        });

        log::info!(
            "prepared {}x{} maze (seed {}, start {generation_start:?}) with {} bodies",
            size.rows(),
            size.columns(),
            config.seed,
            commands.len()
        );

        Ok(SessionPlan {
            layout,
            viewport,
            cell_size,
            generation_start,
            goal,
            commands,
        })
    }

    /// Derives the banner that should be shown when the session starts.
    #[must_use]
    pub fn welcome_banner(&self, world: &World) -> &'static str {
        query::welcome_banner(world)
    }

    /// Captures the bodies currently in the world for presentation purposes.
    #[must_use]
    pub fn bodies(&self, world: &World) -> BodyView {
        query::body_view(world)
    }
}

/// Radius of the player ball for the given cell size.
#[must_use]
pub fn ball_radius(cell_size: CellSize) -> f32 {
    cell_size.width().min(cell_size.height()) / 4.0
}

fn validate_thickness(thickness: f32) -> Result<(), ConfigError> {
    if thickness.is_finite() && thickness > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidWallThickness { thickness })
    }
}

/// Walls must leave part of every cell open, otherwise neighbouring walls merge.
fn validate_wall_fit(thickness: f32, cell_size: CellSize) -> Result<(), ConfigError> {
    if thickness < cell_size.width().min(cell_size.height()) {
        Ok(())
    } else {
        Err(ConfigError::WallsTooThick {
            thickness,
            cell_width: cell_size.width(),
            cell_height: cell_size.height(),
        })
    }
}
