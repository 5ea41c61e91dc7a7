//! Frame-by-frame driver that wires the pure systems to the world.

use std::time::Duration;

use maze_ball_core::{Command, Event, Key, VICTORY_BANNER};
use maze_ball_rendering::{Palette, Scene};
use maze_ball_system_bootstrap::{Bootstrap, SessionPlan};
use maze_ball_system_player_input::PlayerInput;
use maze_ball_system_victory::Victory;
use maze_ball_world::{self as world, query, World};

/// Owns the world and every system participating in a session.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    bootstrap: Bootstrap,
    victory: Victory,
    player_input: PlayerInput,
    palette: Palette,
}

impl Simulation {
    /// Populates an empty world from the plan.
    pub(crate) fn new(plan: SessionPlan) -> Self {
        let mut simulation = Self {
            world: World::new(),
            bootstrap: Bootstrap,
            victory: Victory::new(),
            player_input: PlayerInput::new(),
            palette: Palette::default(),
        };
        let _ = simulation.apply_commands(plan.into_commands());
        simulation
    }

    /// Applies this frame's input, advances the clock and returns every event broadcast.
    pub(crate) fn advance(&mut self, dt: Duration, keys: &[Key]) -> Vec<Event> {
        let mut commands = Vec::new();
        self.player_input.handle(
            &[],
            keys,
            |body| query::body(&self.world, body).map(|snapshot| snapshot.velocity),
            &mut commands,
        );
        commands.push(Command::Tick { dt });
        self.apply_commands(commands)
    }

    /// Rebuilds the scene from the current world state.
    pub(crate) fn populate_scene(&self, scene: &mut Scene) {
        *scene = Scene::from_bodies(
            &self.bootstrap.bodies(&self.world),
            &self.palette,
            self.banner(),
            query::victory_announced(&self.world),
        );
    }

    fn banner(&self) -> Option<&'static str> {
        if query::victory_announced(&self.world) {
            Some(VICTORY_BANNER)
        } else if self.player_input.has_moved() {
            None
        } else {
            Some(self.bootstrap.welcome_banner(&self.world))
        }
    }

    fn apply_commands(&mut self, commands: Vec<Command>) -> Vec<Event> {
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        self.process_events(events)
    }

    /// Feeds events to the systems until they stop issuing commands.
    fn process_events(&mut self, pending_events: Vec<Event>) -> Vec<Event> {
        let mut processed = Vec::new();
        let mut events = pending_events;

        loop {
            if events.is_empty() {
                break;
            }
            processed.extend(events.iter().cloned());

            let mut commands = Vec::new();
            self.victory.handle(&events, &mut commands);
            self.player_input.handle(
                &events,
                &[],
                |body| query::body(&self.world, body).map(|snapshot| snapshot.velocity),
                &mut commands,
            );

            if commands.is_empty() {
                break;
            }

            events.clear();
            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
        }

        if processed.contains(&Event::VictoryAnnounced) {
            log::info!(
                "victory after {} physics steps",
                query::step_count(&self.world)
            );
        }
        processed
    }
}
