use cgmath::*;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalDir {
    East,
    West,
}

impl HorizontalDir {
    pub fn sign(&self) -> f32 {
        match self {
            HorizontalDir::East => 1.0,
            HorizontalDir::West => -1.0,
        }
    }

    pub fn invert(&self) -> HorizontalDir {
        match self {
            HorizontalDir::East => HorizontalDir::West,
            HorizontalDir::West => HorizontalDir::East,
        }
    }
}

/// The player body's discrete movement state. Overlay states carry their own
/// timers so a reader never sees a state that disagrees with the values that
/// produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MovementState {
    Idle,
    Run,
    JumpRise,
    Fall,
    Dash {
        // unit vector, y-down
        direction: Vector2<f32>,
        remaining: f32,
    },
    Hurt {
        remaining: f32,
    },
    Dead,
}

impl Default for MovementState {
    fn default() -> Self {
        MovementState::Idle
    }
}

impl MovementState {
    /// Derives the free-movement state from physical values.
    pub fn derive(on_ground: bool, velocity: Vector2<f32>, run_threshold: f32) -> Self {
        if !on_ground {
            if velocity.y >= 0.0 {
                MovementState::Fall
            } else {
                MovementState::JumpRise
            }
        } else if velocity.x.abs() > run_threshold {
            MovementState::Run
        } else {
            MovementState::Idle
        }
    }

    pub fn is_dashing(&self) -> bool {
        matches!(self, MovementState::Dash { .. })
    }

    pub fn is_hurt(&self) -> bool {
        matches!(self, MovementState::Hurt { .. })
    }

    pub fn is_dead(&self) -> bool {
        matches!(self, MovementState::Dead)
    }

    /// True if both values are the same variant, ignoring payloads.
    pub fn same_kind(&self, other: &MovementState) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl Display for MovementState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MovementState::Idle => write!(f, "Idle"),
            MovementState::Run => write!(f, "Run"),
            MovementState::JumpRise => write!(f, "JumpRise"),
            MovementState::Fall => write!(f, "Fall"),
            MovementState::Dash { .. } => write!(f, "Dash"),
            MovementState::Hurt { .. } => write!(f, "Hurt"),
            MovementState::Dead => write!(f, "Dead"),
        }
    }
}
