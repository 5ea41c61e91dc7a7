#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Win-condition controller that releases the maze once the player reaches the goal.

use maze_ball_core::{BodyId, BodyTag, Command, Event};

/// Gravity applied to the world once the walls are released.
pub const RELEASE_GRAVITY: f32 = 1.0;

/// Progress of the current session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The player has not reached the goal yet.
    #[default]
    InProgress,
    /// The player reached the goal. Terminal.
    Won,
}

/// Pure system that watches collisions and performs the victory transition exactly once.
#[derive(Debug, Default)]
pub struct Victory {
    outcome: SessionOutcome,
    walls: Vec<BodyId>,
}

impl Victory {
    /// Creates a controller for a session that is still in progress.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current session outcome.
    #[must_use]
    pub const fn outcome(&self) -> SessionOutcome {
        self.outcome
    }

    /// Walls that will be released on victory, in creation order.
    #[must_use]
    pub fn walls(&self) -> &[BodyId] {
        &self.walls
    }

    /// Consumes world events and emits the victory commands on the first player/goal contact.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::BodyCreated {
                    body,
                    tag: BodyTag::Wall(_),
                } => self.walls.push(*body),
                Event::CollisionStarted { contact }
                    if contact.is_between(BodyTag::Player, BodyTag::Goal) =>
                {
                    self.win(out);
                }
                _ => {}
            }
        }
    }

    fn win(&mut self, out: &mut Vec<Command>) {
        if self.outcome == SessionOutcome::Won {
            return;
        }
        self.outcome = SessionOutcome::Won;
        log::info!("goal reached, releasing {} walls", self.walls.len());

        out.push(Command::AnnounceVictory);
        out.push(Command::SetGravity {
            y: RELEASE_GRAVITY,
        });
        out.extend(self.walls.iter().map(|body| Command::SetBodyStatic {
            body: *body,
            is_static: false,
        }));
    }
}
