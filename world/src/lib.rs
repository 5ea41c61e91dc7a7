#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative physics world for Maze Ball.
//!
//! The world owns every body in the session and is the only place where
//! simulation state changes. Systems request changes through
//! [`Command`] values handed to [`apply`]; the world answers with [`Event`]
//! values, including the collision-start notifications the win condition
//! listens for.

mod physics;

use std::{collections::BTreeSet, time::Duration};

use maze_ball_core::{
    BodyId, BodyShape, BodySnapshot, BodyTag, Command, ContactPair, Event, RectPlacement,
    Vector, WELCOME_BANNER,
};

/// Simulated time covered by a single physics step.
pub const STEP_QUANTUM: Duration = Duration::from_nanos(16_666_667);

/// Velocity gained per step, per unit of gravity.
const GRAVITY_ACCELERATION: f32 = 0.28;

/// Fraction of velocity lost to air drag every step.
const AIR_FRICTION: f32 = 0.01;

/// Upper bound on steps resolved by a single tick; surplus time is dropped.
const MAX_STEPS_PER_TICK: u32 = 8;

/// Represents the authoritative Maze Ball world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    bodies: Vec<Body>,
    next_body_id: u32,
    gravity: f32,
    accumulator: Duration,
    contacts: BTreeSet<(BodyId, BodyId)>,
    step_index: u64,
    victory_announced: bool,
}

impl World {
    /// Creates an empty world with gravity disabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            bodies: Vec::new(),
            next_body_id: 0,
            gravity: 0.0,
            accumulator: Duration::ZERO,
            contacts: BTreeSet::new(),
            step_index: 0,
            victory_announced: false,
        }
    }

    fn insert_body(
        &mut self,
        tag: BodyTag,
        shape: BodyShape,
        center: Vector,
        is_static: bool,
    ) -> BodyId {
        let id = BodyId::new(self.next_body_id);
        self.next_body_id = self.next_body_id.saturating_add(1);
        self.bodies.push(Body {
            id,
            tag,
            shape,
            center,
            velocity: Vector::ZERO,
            is_static,
        });
        log::debug!("created {tag:?} body {}", id.get());
        id
    }

    fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|body| body.id == id)
    }

    fn step(&mut self, out_events: &mut Vec<Event>) {
        self.step_index = self.step_index.saturating_add(1);
        let gravity = self.gravity * GRAVITY_ACCELERATION;

        let previous: Vec<Vector> = self.bodies.iter().map(|body| body.center).collect();
        for body in self.bodies.iter_mut().filter(|body| !body.is_static) {
            body.velocity = Vector::new(body.velocity.x(), body.velocity.y() + gravity);
            body.velocity = body.velocity * (1.0 - AIR_FRICTION);
            body.center = body.center + body.velocity;
        }
        self.settle_rectangles(&previous);

        let mut touching = BTreeSet::new();
        for index in 0..self.bodies.len() {
            let BodyShape::Circle { radius } = self.bodies[index].shape else {
                continue;
            };
            if self.bodies[index].is_static {
                continue;
            }

            for other_index in 0..self.bodies.len() {
                if other_index == index {
                    continue;
                }
                let other = self.bodies[other_index];
                let BodyShape::Rectangle { width, height } = other.shape else {
                    continue;
                };

                let circle = &mut self.bodies[index];
                let separation =
                    physics::circle_rectangle(circle.center, radius, other.center, width, height);
                if !separation.is_touching() {
                    continue;
                }

                let key = ordered_pair(circle.id, other.id);
                let _ = touching.insert(key);
                if !self.contacts.contains(&key) {
                    out_events.push(Event::CollisionStarted {
                        contact: contact_pair(circle, &other),
                    });
                }

                if other.is_static && separation.is_penetrating() {
                    circle.center = circle.center + separation.normal * separation.depth;
                    circle.velocity = physics::cancel_approach(circle.velocity, separation.normal);
                }
            }
        }

        self.contacts = touching;
    }

    /// Stops released rectangles on the static bodies they would otherwise pass through.
    ///
    /// Moving rectangles do not collide with each other.
    fn settle_rectangles(&mut self, previous: &[Vector]) {
        let obstacles: Vec<(Vector, Vector)> = self
            .bodies
            .iter()
            .filter(|body| body.is_static)
            .filter_map(|body| match body.shape {
                BodyShape::Rectangle { width, height } => {
                    Some((body.center, Vector::new(width * 0.5, height * 0.5)))
                }
                BodyShape::Circle { .. } => None,
            })
            .collect();

        for (body, start) in self.bodies.iter_mut().zip(previous) {
            let BodyShape::Rectangle { width, height } = body.shape else {
                continue;
            };
            if body.is_static {
                continue;
            }
            let half = Vector::new(width * 0.5, height * 0.5);

            for (obstacle, obstacle_half) in &obstacles {
                let landing =
                    physics::sweep_rectangle(*start, body.center, half, *obstacle, *obstacle_half);
                if let Some(landing) = landing {
                    body.center = landing.center;
                    body.velocity = physics::cancel_approach(body.velocity, landing.normal);
                }
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::CreateStaticRectangle { placement } => {
            let RectPlacement {
                center,
                width,
                height,
                tag,
            } = placement;
            let shape = BodyShape::Rectangle { width, height };
            let body = world.insert_body(tag, shape, center, true);
            out_events.push(Event::BodyCreated { body, tag });
        }
        Command::CreateDynamicCircle {
            center,
            radius,
            tag,
        } => {
            let body = world.insert_body(tag, BodyShape::Circle { radius }, center, false);
            out_events.push(Event::BodyCreated { body, tag });
        }
        Command::SetBodyStatic { body, is_static } => {
            if let Some(target) = world.body_mut(body) {
                if target.is_static != is_static {
                    target.is_static = is_static;
                    if is_static {
                        target.velocity = Vector::ZERO;
                    }
                    out_events.push(Event::BodyStaticChanged { body, is_static });
                }
            }
        }
        Command::SetBodyVelocity { body, velocity } => {
            if let Some(target) = world.body_mut(body) {
                if !target.is_static {
                    target.velocity = velocity;
                }
            }
        }
        Command::SetGravity { y } => {
            world.gravity = y;
            out_events.push(Event::GravityChanged { y });
        }
        Command::AnnounceVictory => {
            world.victory_announced = true;
            out_events.push(Event::VictoryAnnounced);
        }
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            world.accumulator = world.accumulator.saturating_add(dt);

            let quantum = STEP_QUANTUM.as_nanos();
            let pending = world.accumulator.as_nanos();
            let due = u32::try_from(pending / quantum).unwrap_or(u32::MAX);
            // The remainder is below one quantum and always fits.
            world.accumulator = Duration::from_nanos((pending % quantum) as u64);

            for _ in 0..due.min(MAX_STEPS_PER_TICK) {
                world.step(out_events);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use maze_ball_core::{BodyId, BodySnapshot, BodyTag, BodyView};

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Captures a read-only view of every body in the world.
    #[must_use]
    pub fn body_view(world: &World) -> BodyView {
        BodyView::from_snapshots(world.bodies.iter().map(|body| body.snapshot()).collect())
    }

    /// Captures the state of a single body.
    #[must_use]
    pub fn body(world: &World, id: BodyId) -> Option<BodySnapshot> {
        world
            .bodies
            .iter()
            .find(|body| body.id == id)
            .map(|body| body.snapshot())
    }

    /// Identifiers of every body carrying `tag`, in ascending order.
    #[must_use]
    pub fn bodies_tagged(world: &World, tag: BodyTag) -> Vec<BodyId> {
        world
            .bodies
            .iter()
            .filter(|body| body.tag == tag)
            .map(|body| body.id)
            .collect()
    }

    /// Gravity scale currently applied to dynamic bodies.
    #[must_use]
    pub fn gravity(world: &World) -> f32 {
        world.gravity
    }

    /// Number of physics steps resolved since the world was created.
    #[must_use]
    pub fn step_count(world: &World) -> u64 {
        world.step_index
    }

    /// Reports whether the victory signal has been broadcast.
    #[must_use]
    pub fn victory_announced(world: &World) -> bool {
        world.victory_announced
    }
}

#[derive(Clone, Copy, Debug)]
struct Body {
    id: BodyId,
    tag: BodyTag,
    shape: BodyShape,
    center: Vector,
    velocity: Vector,
    is_static: bool,
}

impl Body {
    fn snapshot(&self) -> BodySnapshot {
        BodySnapshot {
            id: self.id,
            tag: self.tag,
            shape: self.shape,
            center: self.center,
            velocity: self.velocity,
            is_static: self.is_static,
        }
    }
}

fn ordered_pair(a: BodyId, b: BodyId) -> (BodyId, BodyId) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

fn contact_pair(a: &Body, b: &Body) -> ContactPair {
    let (first, second) = if a.id < b.id { (a, b) } else { (b, a) };
    ContactPair {
        first: first.id,
        first_tag: first.tag,
        second: second.id,
        second_tag: second.tag,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_ball_core::WallOrientation;

    const HORIZONTAL_WALL: BodyTag = BodyTag::Wall(WallOrientation::Horizontal);
    const VERTICAL_WALL: BodyTag = BodyTag::Wall(WallOrientation::Vertical);

    fn create(world: &mut World, command: Command) -> BodyId {
        let mut events = Vec::new();
        apply(world, command, &mut events);
        match events.as_slice() {
            [Event::BodyCreated { body, .. }] => *body,
            other => panic!("unexpected events: {other:?}"),
        }
    }

    fn ball_at(world: &mut World, x: f32, y: f32) -> BodyId {
        create(
            world,
            Command::CreateDynamicCircle {
                center: Vector::new(x, y),
                radius: 5.0,
                tag: BodyTag::Player,
            },
        )
    }

    fn rectangle(
        world: &mut World,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        tag: BodyTag,
    ) -> BodyId {
        create(
            world,
            Command::CreateStaticRectangle {
                placement: RectPlacement::new(Vector::new(x, y), width, height, tag),
            },
        )
    }

    fn tick(world: &mut World, steps: u32) -> Vec<Event> {
        let mut events = Vec::new();
        for _ in 0..steps {
            apply(world, Command::Tick { dt: STEP_QUANTUM }, &mut events);
        }
        events
    }

    fn collision_count(events: &[Event]) -> usize {
        events
            .iter()
            .filter(|event| matches!(event, Event::CollisionStarted { .. }))
            .count()
    }

    #[test]
    fn bodies_receive_sequential_identifiers() {
        let mut world = World::new();
        let wall = rectangle(&mut world, 0.0, 0.0, 10.0, 2.0, HORIZONTAL_WALL);
        let ball = ball_at(&mut world, 50.0, 50.0);

        assert_eq!(wall, BodyId::new(0));
        assert_eq!(ball, BodyId::new(1));
        assert_eq!(query::bodies_tagged(&world, HORIZONTAL_WALL), vec![wall]);
        assert_eq!(query::body_view(&world).iter().count(), 2);
        assert!(query::body(&world, wall).map_or(false, |body| body.is_static));
        assert!(query::body(&world, ball).map_or(false, |body| !body.is_static));
    }

    #[test]
    fn partial_ticks_accumulate_into_steps() {
        let mut world = World::new();
        let mut events = Vec::new();
        let half = STEP_QUANTUM / 2;

        apply(&mut world, Command::Tick { dt: half }, &mut events);
        assert_eq!(query::step_count(&world), 0);

        apply(&mut world, Command::Tick { dt: half + half }, &mut events);
        assert_eq!(query::step_count(&world), 1);
        assert_eq!(events.len(), 2, "each tick reports the elapsed time");
    }

    #[test]
    fn long_ticks_are_capped() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(10),
            },
            &mut events,
        );
        assert_eq!(query::step_count(&world), u64::from(MAX_STEPS_PER_TICK));
    }

    #[test]
    fn oversized_ticks_keep_only_the_fractional_remainder() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(u64::MAX / 4),
            },
            &mut events,
        );
        assert_eq!(query::step_count(&world), u64::from(MAX_STEPS_PER_TICK));

        apply(&mut world, Command::Tick { dt: Duration::ZERO }, &mut events);
        assert_eq!(
            query::step_count(&world),
            u64::from(MAX_STEPS_PER_TICK),
            "surplus time beyond the cap is dropped"
        );

        world.accumulator = Duration::ZERO;
        apply(
            &mut world,
            Command::Tick {
                dt: STEP_QUANTUM * 5 / 2,
            },
            &mut events,
        );
        assert_eq!(query::step_count(&world), u64::from(MAX_STEPS_PER_TICK) + 2);
        assert!(world.accumulator < STEP_QUANTUM);
    }

    #[test]
    fn released_walls_come_to_rest_on_the_floor() {
        let mut world = World::new();
        let _floor = rectangle(&mut world, 200.0, 400.0, 400.0, 2.0, BodyTag::Boundary);
        let wall = rectangle(&mut world, 100.0, 20.0, 40.0, 10.0, HORIZONTAL_WALL);
        let mut events = Vec::new();
        apply(&mut world, Command::SetGravity { y: 1.0 }, &mut events);
        apply(
            &mut world,
            Command::SetBodyStatic {
                body: wall,
                is_static: false,
            },
            &mut events,
        );

        let _ = tick(&mut world, 600);

        let rested = query::body(&world, wall).expect("wall exists");
        assert!(
            (rested.center.y() - 394.0).abs() < 1e-3,
            "wall should rest on top of the floor (y = {})",
            rested.center.y()
        );
        assert_eq!(rested.velocity, Vector::ZERO);
    }

    #[test]
    fn fast_walls_do_not_tunnel_through_the_floor() {
        let mut world = World::new();
        let _floor = rectangle(&mut world, 200.0, 400.0, 400.0, 2.0, BodyTag::Boundary);
        let wall = rectangle(&mut world, 100.0, 370.0, 4.0, 40.0, VERTICAL_WALL);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetBodyStatic {
                body: wall,
                is_static: false,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SetBodyVelocity {
                body: wall,
                velocity: Vector::new(0.0, 80.0),
            },
            &mut events,
        );

        let _ = tick(&mut world, 1);

        let landed = query::body(&world, wall).expect("wall exists");
        assert!((landed.center.y() - 379.0).abs() < 1e-3, "y = {}", landed.center.y());
    }

    #[test]
    fn gravity_moves_only_dynamic_bodies() {
        let mut world = World::new();
        let wall = rectangle(&mut world, 100.0, 100.0, 10.0, 2.0, HORIZONTAL_WALL);
        let ball = ball_at(&mut world, 10.0, 10.0);
        let mut events = Vec::new();
        apply(&mut world, Command::SetGravity { y: 1.0 }, &mut events);
        assert_eq!(events, vec![Event::GravityChanged { y: 1.0 }]);

        let _ = tick(&mut world, 10);

        let wall_after = query::body(&world, wall).expect("wall exists");
        let ball_after = query::body(&world, ball).expect("ball exists");
        assert_eq!(wall_after.center, Vector::new(100.0, 100.0));
        assert!(ball_after.center.y() > 10.0, "ball must fall under gravity");
        assert!((ball_after.center.x() - 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn released_bodies_fall_and_report_change_once() {
        let mut world = World::new();
        let wall = rectangle(&mut world, 100.0, 100.0, 10.0, 2.0, HORIZONTAL_WALL);
        let mut events = Vec::new();
        apply(&mut world, Command::SetGravity { y: 1.0 }, &mut events);
        apply(
            &mut world,
            Command::SetBodyStatic {
                body: wall,
                is_static: false,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SetBodyStatic {
                body: wall,
                is_static: false,
            },
            &mut events,
        );

        let changes = events
            .iter()
            .filter(|event| matches!(event, Event::BodyStaticChanged { .. }))
            .count();
        assert_eq!(changes, 1, "repeated release must not report again");

        let _ = tick(&mut world, 5);
        let released = query::body(&world, wall).expect("wall exists");
        assert!(released.center.y() > 100.0);
    }

    #[test]
    fn static_bodies_ignore_velocity() {
        let mut world = World::new();
        let wall = rectangle(&mut world, 0.0, 0.0, 10.0, 2.0, HORIZONTAL_WALL);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetBodyVelocity {
                body: wall,
                velocity: Vector::new(3.0, 0.0),
            },
            &mut events,
        );
        let _ = tick(&mut world, 3);
        let snapshot = query::body(&world, wall).expect("wall exists");
        assert_eq!(snapshot.velocity, Vector::ZERO);
        assert_eq!(snapshot.center, Vector::ZERO);
    }

    #[test]
    fn ball_stops_at_wall_and_collision_starts_once() {
        let mut world = World::new();
        let wall = rectangle(&mut world, 20.0, 0.0, 4.0, 40.0, VERTICAL_WALL);
        let ball = ball_at(&mut world, 0.0, 0.0);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetBodyVelocity {
                body: ball,
                velocity: Vector::new(2.0, 0.0),
            },
            &mut events,
        );

        let events = tick(&mut world, 60);

        assert_eq!(collision_count(&events), 1, "contact persists without restarting");
        let contact = events.iter().find_map(|event| match event {
            Event::CollisionStarted { contact } => Some(*contact),
            _ => None,
        });
        assert_eq!(
            contact,
            Some(ContactPair {
                first: wall,
                first_tag: VERTICAL_WALL,
                second: ball,
                second_tag: BodyTag::Player,
            })
        );
        let snapshot = query::body(&world, ball).expect("ball exists");
        assert!(
            snapshot.center.x() <= 13.0 + 1e-3,
            "ball must not pass through the wall (x = {})",
            snapshot.center.x()
        );
    }

    #[test]
    fn separate_contacts_each_start_a_collision() {
        let mut world = World::new();
        let goal = rectangle(&mut world, 0.0, 0.0, 8.0, 8.0, BodyTag::Goal);
        let ball = ball_at(&mut world, 0.0, 0.0);

        let first = tick(&mut world, 1);
        assert_eq!(collision_count(&first), 1);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetBodyVelocity {
                body: ball,
                velocity: Vector::new(0.0, 20.0),
            },
            &mut events,
        );
        let away = tick(&mut world, 3);
        assert_eq!(collision_count(&away), 0);

        apply(
            &mut world,
            Command::SetBodyVelocity {
                body: ball,
                velocity: Vector::new(0.0, -5.0),
            },
            &mut events,
        );
        let back = tick(&mut world, 20);
        assert!(collision_count(&back) >= 1, "returning to the goal starts a new contact");
        assert!(query::body(&world, goal).is_some());
    }

    #[test]
    fn victory_announcement_is_recorded() {
        let mut world = World::new();
        let mut events = Vec::new();
        assert!(!query::victory_announced(&world));
        apply(&mut world, Command::AnnounceVictory, &mut events);
        assert!(query::victory_announced(&world));
        assert_eq!(events, vec![Event::VictoryAnnounced]);
    }

    #[test]
    fn unknown_bodies_are_ignored() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetBodyStatic {
                body: BodyId::new(99),
                is_static: false,
            },
            &mut events,
        );
        assert!(events.is_empty());
        assert_eq!(query::welcome_banner(&world), WELCOME_BANNER);
    }
}
