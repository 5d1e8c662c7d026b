//! Tuning document bundling every config the simulation reads.
//!
//! All sections are optional in the JSON; anything missing keeps its default.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{camera::CameraConfig, character::MovementConfig, state::game_loop::LoopConfig};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub movement: MovementConfig,
    pub camera: CameraConfig,
    #[serde(rename = "loop")]
    pub looping: LoopConfig,
}

impl Tuning {
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json).context("Failed to parse tuning JSON")?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Unable to read tuning file \"{}\"", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Invalid tuning file \"{}\"", path.display()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize tuning")
    }

    /// Rejects values the simulation can't run with.
    pub fn validate(&self) -> Result<()> {
        if !(self.looping.fixed_dt > 0.0) {
            anyhow::bail!("loop.fixed_dt must be positive, got {}", self.looping.fixed_dt);
        }
        if self.looping.max_frame_time < self.looping.fixed_dt {
            anyhow::bail!(
                "loop.max_frame_time ({}) must be at least loop.fixed_dt ({})",
                self.looping.max_frame_time,
                self.looping.fixed_dt
            );
        }
        if !(self.movement.max_run_speed > 0.0) {
            anyhow::bail!(
                "movement.max_run_speed must be positive, got {}",
                self.movement.max_run_speed
            );
        }
        let extent = self.movement.body_extent;
        if !(extent.x > 0.0 && extent.y > 0.0) {
            anyhow::bail!(
                "movement.body_extent must be positive, got ({}, {})",
                extent.x,
                extent.y
            );
        }
        if !(self.camera.stiffness > 0.0) {
            anyhow::bail!("camera.stiffness must be positive, got {}", self.camera.stiffness);
        }
        Ok(())
    }
}
