pub mod camera;
pub mod character;
pub mod constants;
pub mod event_dispatch;
pub mod input;
pub mod map;
pub mod settings;
pub mod state;
pub mod util;

pub use camera::{Camera, CameraConfig};
pub use character::{MovementConfig, MovementState, PlayerBody};
pub use input::{InputSnapshot, InputSource};
pub use map::TileWorld;
pub use settings::Tuning;
pub use state::{
    game_loop::{FixedStepLoop, LoopConfig},
    game_state::{RenderSnapshot, Simulation},
};
