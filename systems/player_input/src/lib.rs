#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system translating steering keys into velocity changes for the player ball.

use maze_ball_core::{BodyId, BodyTag, Command, Direction, Event, Key, Vector};

/// Velocity change applied per steering key press, in world units per step.
pub const STEERING_IMPULSE: f32 = 2.0;

/// Velocity change associated with a steering direction.
#[must_use]
pub fn impulse(direction: Direction) -> Vector {
    match direction {
        Direction::North => Vector::new(0.0, -STEERING_IMPULSE),
        Direction::East => Vector::new(STEERING_IMPULSE, 0.0),
        Direction::South => Vector::new(0.0, STEERING_IMPULSE),
        Direction::West => Vector::new(-STEERING_IMPULSE, 0.0),
    }
}

/// Player steering system that nudges the ball in response to key presses.
#[derive(Clone, Debug, Default)]
pub struct PlayerInput {
    player: Option<BodyId>,
    has_moved: bool,
}

impl PlayerInput {
    /// Creates a new steering system that has not seen the player yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            player: None,
            has_moved: false,
        }
    }

    /// Body currently steered, once the world announced it.
    #[must_use]
    pub const fn player(&self) -> Option<BodyId> {
        self.player
    }

    /// Reports whether a steering key has been pressed during the session.
    #[must_use]
    pub const fn has_moved(&self) -> bool {
        self.has_moved
    }

    /// Consumes world events and the keys pressed this frame to emit a velocity update.
    ///
    /// The `velocity_of` closure should mirror the world's body query so the
    /// system can add the impulse to the ball's current velocity.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        keys: &[Key],
        mut velocity_of: F,
        out: &mut Vec<Command>,
    ) where
        F: FnMut(BodyId) -> Option<Vector>,
    {
        for event in events {
            if let Event::BodyCreated {
                body,
                tag: BodyTag::Player,
            } = event
            {
                self.player = Some(*body);
            }
        }

        let mut delta = Vector::ZERO;
        let mut steered = false;
        for direction in keys.iter().filter_map(|key| key.direction()) {
            delta = delta + impulse(direction);
            steered = true;
        }

        if !steered {
            return;
        }
        self.has_moved = true;

        let Some(player) = self.player else {
            return;
        };
        let Some(velocity) = velocity_of(player) else {
            return;
        };

        out.push(Command::SetBodyVelocity {
            body: player,
            velocity: velocity + delta,
        });
    }
}
