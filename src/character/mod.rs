pub mod collision;
pub mod config;
pub mod controller;
pub mod state;

pub use config::{DashConfig, HurtConfig, MovementConfig};
pub use controller::{BodySnapshot, PlayerBody};
pub use state::{HorizontalDir, MovementState};
