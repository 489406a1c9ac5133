//! Kinematic state shared by everything that moves through the level.

use dv_core::geometry::direction_towards;
use glam::DVec2;

/// Level-space position, per-update velocity and facing direction.
///
/// `direction` is always a unit vector; it starts facing right and only
/// changes through the setters below, which ignore zero-length input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: DVec2,
    pub velocity: DVec2,
    direction: DVec2,
}

impl Body {
    pub fn new(position: DVec2) -> Self {
        Self {
            position,
            velocity: DVec2::ZERO,
            direction: DVec2::X,
        }
    }

    pub fn direction(&self) -> DVec2 {
        self.direction
    }

    pub fn is_moving(&self) -> bool {
        self.velocity != DVec2::ZERO
    }

    /// Face along the current velocity; a still body keeps its last facing.
    pub fn face_velocity(&mut self) {
        if let Some(direction) = direction_towards(DVec2::ZERO, self.velocity) {
            self.direction = direction;
        }
    }

    /// Face from `from` towards `to`; coincident points keep the last facing.
    pub fn face_towards(&mut self, from: DVec2, to: DVec2) {
        if let Some(direction) = direction_towards(from, to) {
            self.direction = direction;
        }
    }

    pub fn integrate(&mut self) {
        self.position += self.velocity;
    }
}
