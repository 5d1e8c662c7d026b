use cgmath::*;
use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Every tunable of the player body. Movement variants are different configs,
/// not different code paths.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    pub gravity: f32,
    // Terminal fall speed. None disables the clamp.
    pub max_fall_speed: Option<f32>,
    pub max_run_speed: f32,
    pub ground_accel: f32,
    pub ground_decel: f32,
    pub air_accel: f32,
    pub air_decel: f32,
    pub jump_velocity: f32,
    pub jump_buffer_window: f32,
    pub coyote_window: f32,

    /// When set, releasing jump while still rising scales upward velocity by this
    /// factor, once per jump. None keeps jump height fixed.
    pub jump_cut_multiplier: Option<f32>,

    pub run_state_threshold: f32,
    pub body_extent: Vector2<f32>,
    pub dash: DashConfig,
    pub hurt: HurtConfig,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            max_fall_speed: Some(MAX_FALL_SPEED),
            max_run_speed: MAX_RUN_SPEED,
            ground_accel: GROUND_ACCEL,
            ground_decel: GROUND_DECEL,
            air_accel: AIR_ACCEL,
            air_decel: AIR_DECEL,
            jump_velocity: JUMP_V0,
            jump_buffer_window: JUMP_BUFFER_WINDOW,
            coyote_window: COYOTE_WINDOW,
            jump_cut_multiplier: None,
            run_state_threshold: RUN_STATE_THRESHOLD,
            body_extent: vec2(PLAYER_WIDTH, PLAYER_HEIGHT),
            dash: DashConfig::default(),
            hurt: HurtConfig::default(),
        }
    }
}

impl MovementConfig {
    /// Acceleration and deceleration for the given ground state.
    pub fn horizontal_rates(&self, on_ground: bool) -> (f32, f32) {
        if on_ground {
            (self.ground_accel, self.ground_decel)
        } else {
            (self.air_accel, self.air_decel)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    pub enabled: bool,
    pub speed: f32,
    pub duration: f32,
    pub ground_cooldown: f32,
    pub air_cooldown: f32,
    // horizontal speed retained when the dash ends
    pub exit_speed: f32,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            speed: DASH_SPEED,
            duration: DASH_DURATION,
            ground_cooldown: DASH_GROUND_COOLDOWN,
            air_cooldown: DASH_AIR_COOLDOWN,
            exit_speed: DASH_EXIT_SPEED,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HurtConfig {
    pub duration: f32,
    pub knockback_speed: f32,
    pub knockback_lift: f32,
    pub invulnerability_duration: f32,
    pub hit_points: u32,
}

impl Default for HurtConfig {
    fn default() -> Self {
        Self {
            duration: HURT_DURATION,
            knockback_speed: HURT_KNOCKBACK_SPEED,
            knockback_lift: HURT_KNOCKBACK_LIFT,
            invulnerability_duration: INVULNERABILITY_DURATION,
            hit_points: HIT_POINTS,
        }
    }
}
