use cgmath::*;

use crate::{
    camera::Camera,
    character::{BodySnapshot, PlayerBody},
    event_dispatch::{Dispatcher, Message, MessageHandler},
    input::InputSnapshot,
    map::TileWorld,
    settings::Tuning,
    state::events::Event,
};

// pending messages kept when the host never drains; the oldest are dropped first
const MAX_PENDING_MESSAGES: usize = 256;

/// Immutable copy of everything a renderer needs for one displayed frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSnapshot {
    pub tick: u64,
    pub player: BodySnapshot,
    // world-space top-left of the viewport
    pub camera: Point2<f32>,
}

/// Owns the level, the player body and the camera, and advances them one fixed
/// tick at a time. The player updates before the camera, and the camera only ever
/// reads the player's position.
///
/// Messages queue up until drained. Hosts should drain (or dispatch) once per
/// displayed frame; past `MAX_PENDING_MESSAGES` the oldest are discarded.
#[derive(Debug)]
pub struct Simulation {
    world: TileWorld,
    player: PlayerBody,
    camera: Camera,
    spawn_point: Point2<f32>,
    tick: u64,
    messages: Vec<Message>,
}

impl Simulation {
    pub fn new(world: TileWorld, spawn_point: Point2<f32>, tuning: &Tuning) -> Self {
        let player = PlayerBody::new(spawn_point, tuning.movement.clone());
        let mut camera = Camera::new(tuning.camera.clone(), world.world_extent());
        camera.snap_to(player.center());

        log::info!(
            "Simulation created: world {}x{} tiles, spawn at ({}, {})",
            world.width(),
            world.height(),
            spawn_point.x,
            spawn_point.y
        );

        Self {
            world,
            player,
            camera,
            spawn_point,
            tick: 0,
            messages: Vec::new(),
        }
    }

    /// Runs exactly one fixed step of `dt` seconds with this tick's input.
    pub fn tick(&mut self, input: &InputSnapshot, dt: f32) {
        self.player.update(dt, input, &self.world);
        self.camera.update(self.player.center(), dt);
        self.tick += 1;

        for message in self.player.drain_messages(self.tick) {
            log::debug!("[{}] {:?}", message.tick, message.event);
            self.messages.push(message);
        }

        if self.messages.len() > MAX_PENDING_MESSAGES {
            let excess = self.messages.len() - MAX_PENDING_MESSAGES;
            log::warn!("Dropping {} undrained messages", excess);
            self.messages.drain(..excess);
        }
    }

    /// Puts the player back at the spawn point and recenters the camera.
    pub fn respawn(&mut self) {
        self.player.respawn(self.spawn_point);
        self.camera.snap_to(self.player.center());
    }

    /// Returns messages recorded since the last drain, oldest first.
    pub fn drain_messages(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.messages)
    }

    /// Drains pending messages into `handler`.
    pub fn dispatch_messages(&mut self, handler: &mut dyn MessageHandler) {
        let messages = self.drain_messages();
        Dispatcher::dispatch(&messages, handler);
    }

    /// Drains pending messages and returns just their events.
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.drain_messages().into_iter().map(|m| m.event).collect()
    }

    pub fn render_snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            tick: self.tick,
            player: self.player.snapshot(),
            camera: self.camera.position(),
        }
    }

    pub fn pending_messages(&self) -> usize {
        self.messages.len()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn world(&self) -> &TileWorld {
        &self.world
    }

    pub fn player(&self) -> &PlayerBody {
        &self.player
    }

    /// For external damage sources and debug tools; movement itself only changes in `tick`.
    pub fn player_mut(&mut self) -> &mut PlayerBody {
        &mut self.player
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn spawn_point(&self) -> Point2<f32> {
        self.spawn_point
    }
}
