#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Maze Ball.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.

use anyhow::Result;
use glam::Vec2;
use macroquad::input::{is_key_pressed, utils, KeyCode};
use macroquad::miniquad::{Context as QuadContext, EventHandler, KeyMods};
use maze_ball_core::Key;
use maze_ball_rendering::{
    Color, FrameInput, Presentation, RenderingBackend, Scene, SceneBody, SceneShape,
};
use std::time::Duration;

/// Keyboard bindings forwarded to the simulation, in polling order.
const KEY_BINDINGS: [(KeyCode, Key); 8] = [
    (KeyCode::Up, Key::ArrowUp),
    (KeyCode::Right, Key::ArrowRight),
    (KeyCode::Down, Key::ArrowDown),
    (KeyCode::Left, Key::ArrowLeft),
    (KeyCode::W, Key::W),
    (KeyCode::D, Key::D),
    (KeyCode::S, Key::S),
    (KeyCode::A, Key::A),
];

const BANNER_FONT_SIZE: u16 = 28;
const BANNER_MARGIN: f32 = 16.0;

/// Rendering backend implemented on top of macroquad.
#[derive(Clone, Copy, Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(mut self, enabled: bool) -> Self {
        self.swap_interval = Some(i32::from(enabled));
        self
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Presentation {
            window_title,
            field_size,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: field_size.x.round() as i32,
            window_height: field_size.y.round() as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = self.swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let subscriber = utils::register_input_subscriber();
            let mut steering = SteeringKeys::default();

            loop {
                utils::repeat_all_miniquad_input(&mut steering, subscriber);
                let frame_input = FrameInput {
                    keys: steering.drain(),
                    quit: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
                };
                if frame_input.quit {
                    break;
                }

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                update_scene(frame_dt, frame_input, &mut scene);

                macroquad::window::clear_background(to_macroquad_color(scene.background));
                let metrics = FieldMetrics::new(
                    field_size,
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                for body in &scene.bodies {
                    draw_body(body, &metrics);
                }
                if let Some(banner) = &scene.banner {
                    draw_banner(banner, macroquad::window::screen_width());
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn binding(code: KeyCode) -> Option<Key> {
    KEY_BINDINGS
        .iter()
        .find(|(bound, _)| *bound == code)
        .map(|(_, key)| *key)
}

/// Collects steering keys from raw key-down events, auto-repeats included,
/// so holding a key keeps nudging the ball.
#[derive(Debug, Default)]
struct SteeringKeys {
    pending: Vec<Key>,
}

impl SteeringKeys {
    fn record(&mut self, code: KeyCode) {
        if let Some(key) = binding(code) {
            self.pending.push(key);
        }
    }

    fn drain(&mut self) -> Vec<Key> {
        std::mem::take(&mut self.pending)
    }
}

impl EventHandler for SteeringKeys {
    fn update(&mut self, _ctx: &mut QuadContext) {}

    fn draw(&mut self, _ctx: &mut QuadContext) {}

    fn key_down_event(
        &mut self,
        _ctx: &mut QuadContext,
        keycode: KeyCode,
        _keymods: KeyMods,
        _repeat: bool,
    ) {
        self.record(keycode);
    }
}

/// Uniform scale and centering offset mapping the playing field onto the screen.
#[derive(Clone, Copy, Debug, PartialEq)]
struct FieldMetrics {
    scale: f32,
    offset: Vec2,
}

impl FieldMetrics {
    fn new(field_size: Vec2, screen_width: f32, screen_height: f32) -> Self {
        let scale = if field_size.x <= f32::EPSILON || field_size.y <= f32::EPSILON {
            1.0
        } else {
            (screen_width / field_size.x).min(screen_height / field_size.y)
        };
        let offset = Vec2::new(
            ((screen_width - field_size.x * scale) * 0.5).max(0.0),
            ((screen_height - field_size.y * scale) * 0.5).max(0.0),
        );
        Self { scale, offset }
    }

    fn to_screen(&self, point: Vec2) -> Vec2 {
        self.offset + point * self.scale
    }
}

fn draw_body(body: &SceneBody, metrics: &FieldMetrics) {
    let center = metrics.to_screen(body.center);
    let color = to_macroquad_color(body.color);
    match body.shape {
        SceneShape::Rectangle { size } => {
            let size = size * metrics.scale;
            macroquad::shapes::draw_rectangle(
                center.x - size.x * 0.5,
                center.y - size.y * 0.5,
                size.x,
                size.y,
                color,
            );
        }
        SceneShape::Circle { radius } => {
            macroquad::shapes::draw_circle(center.x, center.y, radius * metrics.scale, color);
        }
    }
}

fn draw_banner(text: &str, screen_width: f32) {
    let dimensions = macroquad::text::measure_text(text, None, BANNER_FONT_SIZE, 1.0);
    let x = ((screen_width - dimensions.width) * 0.5).max(BANNER_MARGIN);
    let y = BANNER_MARGIN + dimensions.offset_y;
    macroquad::text::draw_text(
        text,
        x,
        y,
        f32::from(BANNER_FONT_SIZE),
        macroquad::color::WHITE,
    );
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
