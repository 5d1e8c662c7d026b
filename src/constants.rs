// Default tuning. Units are world units (pixels)
// and seconds unless otherwise specified. World space is y-down, so negative
// vertical velocity is upward.

pub const FIXED_DT: f32 = 1.0 / 60.0;
pub const MAX_FRAME_TIME: f32 = 0.25;

pub const TILE_SIZE: f32 = 16.0;

pub const GRAVITY: f32 = 2100.0;
pub const MAX_FALL_SPEED: f32 = 900.0;
pub const MAX_RUN_SPEED: f32 = 220.0;
pub const GROUND_ACCEL: f32 = 2400.0;
pub const GROUND_DECEL: f32 = 2800.0;
pub const AIR_ACCEL: f32 = 1400.0;
pub const AIR_DECEL: f32 = 1000.0;
pub const JUMP_V0: f32 = -620.0;
pub const JUMP_BUFFER_WINDOW: f32 = 0.09;
pub const COYOTE_WINDOW: f32 = 0.1;

// Below this horizontal speed a grounded body reads as Idle rather than Run.
pub const RUN_STATE_THRESHOLD: f32 = 1.0;

pub const PLAYER_WIDTH: f32 = 22.0;
pub const PLAYER_HEIGHT: f32 = 32.0;

pub const DASH_SPEED: f32 = 480.0;
pub const DASH_DURATION: f32 = 0.16;
pub const DASH_GROUND_COOLDOWN: f32 = 0.45;
pub const DASH_AIR_COOLDOWN: f32 = 0.65;
pub const DASH_EXIT_SPEED: f32 = 120.0;

pub const HURT_DURATION: f32 = 0.3;
pub const HURT_KNOCKBACK_SPEED: f32 = 160.0;
pub const HURT_KNOCKBACK_LIFT: f32 = -240.0;
pub const INVULNERABILITY_DURATION: f32 = 1.0;
// 5 hearts, 4 segments each
pub const HIT_POINTS: u32 = 20;

// Native render target, in world units
pub const VIEWPORT_WIDTH: f32 = 480.0;
pub const VIEWPORT_HEIGHT: f32 = 270.0;
pub const CAMERA_STIFFNESS: f32 = 40.0;
