use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{
    constants::{FIXED_DT, MAX_FRAME_TIME},
    input::InputSource,
};

use super::game_state::Simulation;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    // seconds per simulation tick
    pub fixed_dt: f32,
    // longest wall-clock frame the loop will try to catch up on
    pub max_frame_time: f32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            fixed_dt: FIXED_DT,
            max_frame_time: MAX_FRAME_TIME,
        }
    }
}

/// Accumulator-driven scheduler. Converts variable wall-clock frame deltas into
/// whole fixed-size simulation ticks; leftover time carries into the next frame.
#[derive(Debug, Clone)]
pub struct FixedStepLoop {
    config: LoopConfig,
    accumulator: f32,
    total_ticks: u64,
}

impl FixedStepLoop {
    pub fn new(config: LoopConfig) -> Self {
        Self {
            config,
            accumulator: 0.0,
            total_ticks: 0,
        }
    }

    /// Feeds one displayed frame's elapsed time and runs as many ticks as fit,
    /// sampling `input` once per tick. Returns the number of ticks run, which may be zero.
    pub fn advance<I: InputSource + ?Sized>(
        &mut self,
        frame_time: Duration,
        simulation: &mut Simulation,
        input: &mut I,
    ) -> u32 {
        let mut frame_time = frame_time.as_secs_f32();
        if frame_time > self.config.max_frame_time {
            log::warn!(
                "Frame took {:.3}s, clamping to {:.3}s",
                frame_time,
                self.config.max_frame_time
            );
            frame_time = self.config.max_frame_time;
        }

        self.accumulator += frame_time;

        let mut ticks = 0;
        while self.accumulator >= self.config.fixed_dt {
            let snapshot = input.sample_input();
            simulation.tick(&snapshot, self.config.fixed_dt);
            self.accumulator -= self.config.fixed_dt;
            ticks += 1;
        }

        self.total_ticks += ticks as u64;
        ticks
    }

    /// Drops any banked time, e.g. after a respawn or unpause.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Fraction of a tick left in the accumulator, in [0, 1).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.config.fixed_dt
    }

    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }
}
