#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots a Maze Ball session.

mod simulation;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use maze_ball_core::CellCoord;
use maze_ball_rendering::{render_layout, Palette, Presentation, RenderingBackend, Scene};
use maze_ball_rendering_macroquad::MacroquadBackend;
use maze_ball_system_bootstrap::{Bootstrap, SessionConfig, StartCell};

use self::simulation::Simulation;

/// Guide a ball through a randomly generated maze to the blue goal.
#[derive(Debug, Parser)]
#[command(name = "maze-ball", version, about)]
struct CliArgs {
    /// Number of maze rows.
    #[arg(long)]
    rows: Option<u32>,
    /// Number of maze columns.
    #[arg(long)]
    columns: Option<u32>,
    /// Width of the playing field in pixels.
    #[arg(long)]
    width: Option<f32>,
    /// Height of the playing field in pixels.
    #[arg(long)]
    height: Option<f32>,
    /// Seed for maze generation; a random seed is drawn when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Row the generator starts carving from.
    #[arg(long, requires = "start_column")]
    start_row: Option<u32>,
    /// Column the generator starts carving from.
    #[arg(long, requires = "start_row")]
    start_column: Option<u32>,
    /// Thickness of the maze walls.
    #[arg(long)]
    wall_thickness: Option<f32>,
    /// Print the maze as text and exit instead of opening a window.
    #[arg(long)]
    ascii: bool,
    /// Render as fast as possible instead of waiting for the display refresh.
    #[arg(long)]
    no_vsync: bool,
}

impl CliArgs {
    fn session_config(&self) -> SessionConfig {
        let defaults = SessionConfig::default();
        let start = match (self.start_column, self.start_row) {
            (Some(column), Some(row)) => StartCell::Fixed(CellCoord::new(column, row)),
            _ => StartCell::Random,
        };

        SessionConfig {
            rows: self.rows.unwrap_or(defaults.rows),
            columns: self.columns.unwrap_or(defaults.columns),
            width: self.width.unwrap_or(defaults.width),
            height: self.height.unwrap_or(defaults.height),
            wall_thickness: self.wall_thickness.unwrap_or(defaults.wall_thickness),
            start,
            seed: self.seed.unwrap_or_else(rand::random),
            ..defaults
        }
    }
}

/// Entry point for the Maze Ball command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    let config = args.session_config();
    log::info!("starting session with seed {}", config.seed);

    let plan = Bootstrap
        .prepare(&config)
        .context("invalid session configuration")?;

    if args.ascii {
        print!("{}", render_layout(plan.layout()));
        return Ok(());
    }

    let field_size = Vec2::new(plan.viewport().width(), plan.viewport().height());
    let mut simulation = Simulation::new(plan);
    let mut scene = Scene::new(Vec::new(), Palette::default().background, None);
    simulation.populate_scene(&mut scene);

    MacroquadBackend::new()
        .with_vsync(!args.no_vsync)
        .run(
            Presentation::new("Maze Ball", field_size, scene),
            move |dt, input, scene| {
                let _ = simulation.advance(dt, &input.keys);
                simulation.populate_scene(scene);
            },
        )
        .context("rendering backend failed")
}
