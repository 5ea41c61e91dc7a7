//! Geometry helpers used by the world's fixed-step integrator.

use maze_ball_core::Vector;

/// Distance below which two shapes still count as touching.
pub(crate) const CONTACT_SLOP: f32 = 0.05;

/// Separation between a circle and an axis-aligned rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Separation {
    /// Unit vector pointing from the rectangle toward the circle center.
    pub(crate) normal: Vector,
    /// Penetration depth; negative values measure the gap between the shapes.
    pub(crate) depth: f32,
}

impl Separation {
    pub(crate) fn is_touching(&self) -> bool {
        self.depth > -CONTACT_SLOP
    }

    pub(crate) fn is_penetrating(&self) -> bool {
        self.depth > 0.0
    }
}

/// Measures how far a circle overlaps an axis-aligned rectangle.
pub(crate) fn circle_rectangle(
    circle_center: Vector,
    radius: f32,
    rect_center: Vector,
    width: f32,
    height: f32,
) -> Separation {
    let half_width = width * 0.5;
    let half_height = height * 0.5;
    let delta = circle_center - rect_center;
    let clamped = Vector::new(
        delta.x().clamp(-half_width, half_width),
        delta.y().clamp(-half_height, half_height),
    );
    let offset = delta - clamped;
    let distance = offset.length();

    if distance > f32::EPSILON {
        return Separation {
            normal: offset * (1.0 / distance),
            depth: radius - distance,
        };
    }

    // Circle center lies inside the rectangle: push out along the shallow axis.
    let overlap_x = half_width - delta.x().abs();
    let overlap_y = half_height - delta.y().abs();
    if overlap_x < overlap_y {
        Separation {
            normal: Vector::new(sign(delta.x()), 0.0),
            depth: overlap_x + radius,
        }
    } else {
        Separation {
            normal: Vector::new(0.0, sign(delta.y())),
            depth: overlap_y + radius,
        }
    }
}

/// Resting place of a moving rectangle stopped by a static one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Landing {
    pub(crate) center: Vector,
    /// Unit vector pointing from the obstacle toward the stopped rectangle.
    pub(crate) normal: Vector,
}

/// Resolves a rectangle moving from `start` to `end` against a static obstacle.
///
/// The motion is swept as the bounding box of both positions, so a thin
/// obstacle cannot be skipped over in a single step.
pub(crate) fn sweep_rectangle(
    start: Vector,
    end: Vector,
    half: Vector,
    obstacle: Vector,
    obstacle_half: Vector,
) -> Option<Landing> {
    let reach = half + obstacle_half;
    let swept_x = overlaps(start.x().min(end.x()), start.x().max(end.x()), obstacle.x(), reach.x());
    let swept_y = overlaps(start.y().min(end.y()), start.y().max(end.y()), obstacle.y(), reach.y());
    if !swept_x || !swept_y {
        return None;
    }

    let from = start - obstacle;
    let gap_x = from.x().abs() - reach.x();
    let gap_y = from.y().abs() - reach.y();

    if gap_x < 0.0 && gap_y < 0.0 {
        // Already embedded: leave along the shallow axis if still inside.
        let to = end - obstacle;
        let overlap_x = reach.x() - to.x().abs();
        let overlap_y = reach.y() - to.y().abs();
        if overlap_x <= 0.0 || overlap_y <= 0.0 {
            return None;
        }
        return Some(if overlap_x < overlap_y {
            land_on_x(end, obstacle, reach, to.x())
        } else {
            land_on_y(end, obstacle, reach, to.y())
        });
    }

    Some(if gap_y >= gap_x {
        land_on_y(end, obstacle, reach, from.y())
    } else {
        land_on_x(end, obstacle, reach, from.x())
    })
}

fn overlaps(low: f32, high: f32, center: f32, reach: f32) -> bool {
    low < center + reach && high > center - reach
}

fn land_on_x(end: Vector, obstacle: Vector, reach: Vector, side: f32) -> Landing {
    let normal = Vector::new(sign(side), 0.0);
    Landing {
        center: Vector::new(obstacle.x() + normal.x() * reach.x(), end.y()),
        normal,
    }
}

fn land_on_y(end: Vector, obstacle: Vector, reach: Vector, side: f32) -> Landing {
    let normal = Vector::new(0.0, sign(side));
    Landing {
        center: Vector::new(end.x(), obstacle.y() + normal.y() * reach.y()),
        normal,
    }
}

/// Removes the part of `velocity` that drives into a surface with the given normal.
pub(crate) fn cancel_approach(velocity: Vector, normal: Vector) -> Vector {
    let approach = velocity.dot(normal);
    if approach < 0.0 {
        velocity - normal * approach
    } else {
        velocity
    }
}

fn sign(value: f32) -> f32 {
    if value < 0.0 {
        -1.0
    } else {
        1.0
    }
}
