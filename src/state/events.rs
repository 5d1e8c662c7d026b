use cgmath::*;

use crate::character::{HorizontalDir, MovementState};

/// Something that happened to the player body during a tick. Presentation layers
/// (audio, particles, HUD) react to these; the simulation never reads them back.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Jump fired. `coyote` is true if the body had already left the ground
    /// and the jump was granted by the coyote window.
    Jumped { coyote: bool },

    /// Body came to rest on a floor after being airborne
    Landed {
        // downward speed at the moment of impact
        impact_speed: f32,
    },

    /// Upward motion was stopped by a ceiling
    HitCeiling,

    /// Body started pressing against a wall on the given side
    HitWall { side: HorizontalDir },

    DashStarted { direction: Vector2<f32> },

    DashEnded,

    /// Body took damage and survived
    Hurt { damage: u32, hit_points: u32 },

    Died,

    StateChanged {
        from: MovementState,
        to: MovementState,
    },
}
