use cgmath::*;
use serde::{Deserialize, Serialize};

use crate::constants::{CAMERA_STIFFNESS, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    // visible area, in world units
    pub viewport: Vector2<f32>,
    pub stiffness: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            viewport: vec2(VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
            stiffness: CAMERA_STIFFNESS,
        }
    }
}

impl CameraConfig {
    /// Damping for a critically damped spring of this stiffness.
    pub fn damping(&self) -> f32 {
        2.0 * self.stiffness.sqrt()
    }
}

/// Spring-follow camera. `position` is the world-space top-left of the viewport.
///
/// The camera reads a target position each tick and nothing ever reads the camera
/// back into the simulation.
#[derive(Debug, Clone)]
pub struct Camera {
    config: CameraConfig,
    world_extent: Vector2<f32>,
    position: Point2<f32>,
    velocity: Vector2<f32>,
}

impl Camera {
    pub fn new(config: CameraConfig, world_extent: Vector2<f32>) -> Self {
        Self {
            config,
            world_extent,
            position: point2(0.0, 0.0),
            velocity: Zero::zero(),
        }
    }

    /// Largest allowed position on each axis. A world smaller than the viewport pins
    /// that axis to 0.
    pub fn max_position(&self) -> Point2<f32> {
        point2(
            (self.world_extent.x - self.config.viewport.x).max(0.0),
            (self.world_extent.y - self.config.viewport.y).max(0.0),
        )
    }

    /// Camera position which would center `target` in the viewport, unclamped.
    pub fn desired_position(&self, target: Point2<f32>) -> Point2<f32> {
        target - self.config.viewport * 0.5
    }

    /// Moves the camera immediately to center `target`, e.g. on level start or respawn.
    pub fn snap_to(&mut self, target: Point2<f32>) {
        self.position = self.desired_position(target);
        self.velocity = Zero::zero();
        self.clamp_to_world();
    }

    /// Advances the spring toward centering `target` by `dt` seconds.
    pub fn update(&mut self, target: Point2<f32>, dt: f32) {
        let desired = self.desired_position(target);
        let stiffness = self.config.stiffness;
        let damping = self.config.damping();

        self.velocity += (desired - self.position) * stiffness * dt;
        self.velocity *= (-damping * dt).exp();
        self.position += self.velocity * dt;

        self.clamp_to_world();
    }

    fn clamp_to_world(&mut self) {
        let max = self.max_position();

        // A clamped axis drops its velocity so the spring doesn't wind up against the edge
        if self.position.x < 0.0 || self.position.x > max.x {
            self.position.x = self.position.x.max(0.0).min(max.x);
            self.velocity.x = 0.0;
        }
        if self.position.y < 0.0 || self.position.y > max.y {
            self.position.y = self.position.y.max(0.0).min(max.y);
            self.velocity.y = 0.0;
        }

        debug_assert!(self.position.x >= 0.0 && self.position.x <= max.x);
        debug_assert!(self.position.y >= 0.0 && self.position.y <= max.y);
    }

    pub fn position(&self) -> Point2<f32> {
        self.position
    }

    pub fn velocity(&self) -> Vector2<f32> {
        self.velocity
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Maps a world position to screen space for drawing.
    pub fn world_to_screen(&self, world: Point2<f32>, pixel_scale: f32) -> Point2<f32> {
        Point2::from_vec((world - self.position) * pixel_scale)
    }
}
