#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Maze Ball adapters.

mod ascii;

pub use ascii::render_layout;

use anyhow::Result as AnyResult;
use glam::Vec2;
use maze_ball_core::{BodyShape, BodySnapshot, BodyTag, BodyView, Key, WallOrientation};
use std::time::Duration;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Creates an opaque color from a `0xRRGGBB` value.
    #[must_use]
    pub const fn from_hex(rgb: u32) -> Self {
        Self::from_rgb_u8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }
}

/// Colors assigned to every kind of body and to the backdrop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Backdrop while the session is in progress.
    pub background: Color,
    /// Backdrop once the player has won.
    pub victory_background: Color,
    /// Walls separating vertically adjacent cells.
    pub horizontal_wall: Color,
    /// Walls separating horizontally adjacent cells.
    pub vertical_wall: Color,
    /// Frame around the playing field.
    pub boundary: Color,
    /// Goal region.
    pub goal: Color,
    /// Player ball.
    pub player: Color,
    /// Banner text.
    pub banner: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::from_hex(0x14_14_14),
            victory_background: Color::from_hex(0xde_2f_32),
            horizontal_wall: Color::from_hex(0xff_00_00),
            vertical_wall: Color::from_hex(0x00_80_00),
            boundary: Color::from_hex(0x80_80_80),
            goal: Color::from_hex(0x00_00_ff),
            player: Color::from_hex(0x00_80_00),
            banner: Color::from_hex(0xff_ff_ff),
        }
    }
}

impl Palette {
    /// Color used to draw the provided body.
    #[must_use]
    pub fn body_color(&self, body: &BodySnapshot) -> Color {
        match body.tag {
            BodyTag::Wall(WallOrientation::Horizontal) => self.horizontal_wall,
            BodyTag::Wall(WallOrientation::Vertical) => self.vertical_wall,
            BodyTag::Boundary => self.boundary,
            BodyTag::Goal => self.goal,
            BodyTag::Player => self.player,
        }
    }
}

/// Geometry of a body in presentation space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SceneShape {
    /// Axis-aligned rectangle of the given size.
    Rectangle {
        /// Width and height of the rectangle.
        size: Vec2,
    },
    /// Circle of the given radius.
    Circle {
        /// Radius of the circle.
        radius: f32,
    },
}

/// Drawable body positioned by its center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneBody {
    /// Center of the body in presentation space.
    pub center: Vec2,
    /// Shape to draw.
    pub shape: SceneShape,
    /// Fill color.
    pub color: Color,
}

impl SceneBody {
    /// Creates a new scene body.
    #[must_use]
    pub const fn new(center: Vec2, shape: SceneShape, color: Color) -> Self {
        Self {
            center,
            shape,
            color,
        }
    }
}

/// Scene description combining the bodies, backdrop and banner.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Bodies drawn in creation order.
    pub bodies: Vec<SceneBody>,
    /// Solid color used to clear the frame.
    pub background: Color,
    /// Optional banner shown on top of the maze.
    pub banner: Option<String>,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(bodies: Vec<SceneBody>, background: Color, banner: Option<String>) -> Self {
        Self {
            bodies,
            background,
            banner,
        }
    }

    /// Builds a scene from a world snapshot.
    #[must_use]
    pub fn from_bodies(
        view: &BodyView,
        palette: &Palette,
        banner: Option<&str>,
        won: bool,
    ) -> Self {
        let bodies = view
            .iter()
            .map(|body| {
                let shape = match body.shape {
                    BodyShape::Rectangle { width, height } => SceneShape::Rectangle {
                        size: Vec2::new(width, height),
                    },
                    BodyShape::Circle { radius } => SceneShape::Circle { radius },
                };
                SceneBody::new(
                    Vec2::new(body.center.x(), body.center.y()),
                    shape,
                    palette.body_color(body),
                )
            })
            .collect();
        let background = if won {
            palette.victory_background
        } else {
            palette.background
        };

        Self::new(bodies, background, banner.map(str::to_owned))
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Size of the playing field the scene is laid out on.
    pub field_size: Vec2,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, field_size: Vec2, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            field_size,
            scene,
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Keys pressed since the previous frame, in press order.
    pub keys: Vec<Key>,
    /// Whether the player asked to close the session.
    pub quit: bool,
}

/// Rendering backend capable of presenting Maze Ball scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta,
    /// per-frame input captured by the adapter, and may mutate the scene before
    /// it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}
