use cgmath::*;

use crate::{
    event_dispatch::{Dispatcher, Message},
    input::InputSnapshot,
    map::TileWorld,
    state::events::Event,
    util::{approach, clamp, Bounds},
};

use super::{
    collision::{self, HorizontalContact, VerticalContact},
    config::MovementConfig,
    state::{HorizontalDir, MovementState},
};

// ---------------------------------------------------------------------------------------------------------------------

/// Read-only copy of the body's state for rendering and HUD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySnapshot {
    pub position: Point2<f32>,
    pub velocity: Vector2<f32>,
    pub extent: Vector2<f32>,
    pub state: MovementState,
    pub on_ground: bool,
    pub facing: HorizontalDir,
    pub hit_points: u32,
    pub invulnerable: bool,
}

#[derive(Debug, Clone, Copy)]
enum DashPhase {
    Inactive,
    Active { direction: Vector2<f32> },
    // last tick of a dash; carries the exit velocity
    Ended { direction: Vector2<f32> },
}

// ---------------------------------------------------------------------------------------------------------------------

/// The player's physical body. `position` is the top-left corner of its AABB in
/// y-down world space. Mutated only by its own `update`, plus the `hurt`/`kill`
/// entry points for external damage sources.
#[derive(Debug)]
pub struct PlayerBody {
    config: MovementConfig,
    position: Point2<f32>,
    velocity: Vector2<f32>,
    on_ground: bool,
    jump_buffer_timer: f32,
    coyote_timer: f32,
    dash_cooldown: f32,
    invulnerability_timer: f32,
    hit_points: u32,
    // true from a jump's launch until the jump cut has been applied
    jump_cut_available: bool,
    wall_contact: Option<HorizontalDir>,
    facing: HorizontalDir,
    state: MovementState,
    dispatcher: Dispatcher,
}

impl PlayerBody {
    /// Creates an airborne body at rest. It settles onto whatever floor is below it.
    pub fn new(position: Point2<f32>, config: MovementConfig) -> Self {
        let hit_points = config.hurt.hit_points;
        Self {
            config,
            position,
            velocity: Zero::zero(),
            on_ground: false,
            jump_buffer_timer: 0.0,
            coyote_timer: 0.0,
            dash_cooldown: 0.0,
            invulnerability_timer: 0.0,
            hit_points,
            jump_cut_available: false,
            wall_contact: None,
            facing: HorizontalDir::East,
            state: MovementState::Fall,
            dispatcher: Dispatcher::default(),
        }
    }

    /// Resets everything but the config, as at the start of a life.
    pub fn respawn(&mut self, position: Point2<f32>) {
        let config = std::mem::take(&mut self.config);
        *self = PlayerBody::new(position, config);
        log::debug!("Respawned at ({}, {})", position.x, position.y);
    }

    // -----------------------------------------------------------------------------------------------------------------

    /// Advances the body by one fixed step of `dt` seconds.
    pub fn update(&mut self, dt: f32, input: &InputSnapshot, world: &TileWorld) {
        if self.state.is_dead() {
            return;
        }

        let previous_state = self.state;

        //
        //  Countdowns. The dash cooldown only runs while not dashing.
        //

        self.jump_buffer_timer = (self.jump_buffer_timer - dt).max(0.0);
        self.coyote_timer = (self.coyote_timer - dt).max(0.0);
        self.invulnerability_timer = (self.invulnerability_timer - dt).max(0.0);
        if !self.state.is_dashing() {
            self.dash_cooldown = (self.dash_cooldown - dt).max(0.0);
        }

        //
        //  Hurt expires before anything else looks at the state this tick. A dash
        //  started this tick counts this tick against its duration.
        //

        self.update_hurt(dt);
        self.try_start_dash(input);

        //
        //  Compute velocity for this tick
        //

        match self.update_dash(dt) {
            DashPhase::Active { direction } => {
                self.velocity = direction * self.config.dash.speed;
            }
            DashPhase::Ended { direction } => {
                // exit velocity stands for this tick; no input until the next one
                self.velocity.x = direction.x * self.config.dash.exit_speed;
                self.apply_gravity(dt);
                if direction.y > 0.0 {
                    self.velocity.y = 0.0;
                }
            }
            DashPhase::Inactive if self.state.is_hurt() => {
                self.velocity.x = approach(self.velocity.x, 0.0, self.config.air_decel * dt);
                self.apply_gravity(dt);
            }
            DashPhase::Inactive => {
                self.apply_horizontal_input(input, dt);
                self.apply_jump_input(input);
                self.apply_jump_cut(input);
                self.apply_gravity(dt);
            }
        }

        //
        //  Integrate (semi-implicit: velocity was updated above) and resolve
        //  vertical before horizontal.
        //

        let candidate = self.position + self.velocity * dt;
        let extent = self.config.body_extent;

        let vertical =
            collision::resolve_vertical(world, candidate.x, candidate.y, extent, self.velocity.y);
        self.apply_vertical_contact(vertical);

        let horizontal =
            collision::resolve_horizontal(world, candidate.x, vertical.y(), extent, self.velocity.x);
        self.apply_horizontal_contact(horizontal);

        self.position = point2(horizontal.x(), vertical.y());

        debug_assert!(
            !self.on_ground || self.velocity.y == 0.0,
            "grounded body has vertical velocity {}",
            self.velocity.y
        );

        //
        //  Free-movement state follows the physical values. Overlays keep theirs.
        //

        if !self.state.is_dashing() && !self.state.is_hurt() {
            self.state = MovementState::derive(
                self.on_ground,
                self.velocity,
                self.config.run_state_threshold,
            );
        }

        if !self.state.same_kind(&previous_state) {
            log::debug!("PlayerBody state {} -> {}", previous_state, self.state);
            self.dispatcher.broadcast(Event::StateChanged {
                from: previous_state,
                to: self.state,
            });
        }

        log::trace!(
            "PlayerBody pos: ({:.2}, {:.2}) vel: ({:.2}, {:.2}) state: {} on_ground: {}",
            self.position.x,
            self.position.y,
            self.velocity.x,
            self.velocity.y,
            self.state,
            self.on_ground
        );
    }

    fn update_hurt(&mut self, dt: f32) {
        if let MovementState::Hurt { remaining } = self.state {
            let remaining = remaining - dt;
            self.state = if remaining > 0.0 {
                MovementState::Hurt { remaining }
            } else {
                MovementState::derive(
                    self.on_ground,
                    self.velocity,
                    self.config.run_state_threshold,
                )
            };
        }
    }

    /// Counts down an active dash. On expiry the state reverts to free movement
    /// and the caller applies the exit velocity.
    fn update_dash(&mut self, dt: f32) -> DashPhase {
        if let MovementState::Dash {
            direction,
            remaining,
        } = self.state
        {
            let remaining = remaining - dt;
            if remaining > 0.0 {
                self.state = MovementState::Dash {
                    direction,
                    remaining,
                };
                DashPhase::Active { direction }
            } else {
                self.state = MovementState::derive(
                    self.on_ground,
                    self.velocity,
                    self.config.run_state_threshold,
                );
                log::debug!("Dash ended");
                self.dispatcher.broadcast(Event::DashEnded);
                DashPhase::Ended { direction }
            }
        } else {
            DashPhase::Inactive
        }
    }

    fn try_start_dash(&mut self, input: &InputSnapshot) {
        if !self.config.dash.enabled
            || !input.dash_pressed
            || self.dash_cooldown > 0.0
            || self.state.is_dashing()
            || self.state.is_hurt()
        {
            return;
        }

        let mut direction = vec2(input.horizontal() as f32, input.vertical() as f32);
        if direction.is_zero() {
            direction = vec2(self.facing.sign(), 0.0);
        }
        let direction = direction.normalize();

        self.dash_cooldown = if self.on_ground {
            self.config.dash.ground_cooldown
        } else {
            self.config.dash.air_cooldown
        };
        self.state = MovementState::Dash {
            direction,
            remaining: self.config.dash.duration,
        };
        if direction.x > 0.0 {
            self.facing = HorizontalDir::East;
        } else if direction.x < 0.0 {
            self.facing = HorizontalDir::West;
        }

        log::debug!("Dash started ({:.2}, {:.2})", direction.x, direction.y);
        self.dispatcher.broadcast(Event::DashStarted { direction });
    }

    fn apply_horizontal_input(&mut self, input: &InputSnapshot, dt: f32) {
        let (accel, decel) = self.config.horizontal_rates(self.on_ground);
        let max_speed = self.config.max_run_speed;

        match input.horizontal() {
            0 => {
                self.velocity.x = approach(self.velocity.x, 0.0, decel * dt);
            }
            dir => {
                self.velocity.x += dir as f32 * accel * dt;
                self.facing = if dir > 0 {
                    HorizontalDir::East
                } else {
                    HorizontalDir::West
                };
            }
        }

        self.velocity.x = clamp(self.velocity.x, -max_speed, max_speed);
        debug_assert!(self.velocity.x.abs() <= max_speed);
    }

    /// Jump buffering and coyote time share one gate: a press within the buffer
    /// window fires as soon as the body is grounded or within the coyote window.
    fn apply_jump_input(&mut self, input: &InputSnapshot) {
        if input.jump_pressed {
            self.jump_buffer_timer = self.config.jump_buffer_window;
        }

        if self.jump_buffer_timer > 0.0 && (self.on_ground || self.coyote_timer > 0.0) {
            let coyote = !self.on_ground;
            self.velocity.y = self.config.jump_velocity;
            self.on_ground = false;
            self.jump_buffer_timer = 0.0;
            self.coyote_timer = 0.0;
            self.jump_cut_available = true;

            log::debug!("Jump (coyote: {})", coyote);
            self.dispatcher.broadcast(Event::Jumped { coyote });
        }
    }

    fn apply_jump_cut(&mut self, input: &InputSnapshot) {
        if let Some(multiplier) = self.config.jump_cut_multiplier {
            if self.jump_cut_available && self.velocity.y < 0.0 && !input.jump_held {
                self.velocity.y *= multiplier;
                self.jump_cut_available = false;
            }
        }
    }

    fn apply_gravity(&mut self, dt: f32) {
        self.velocity.y += self.config.gravity * dt;
        if let Some(max_fall_speed) = self.config.max_fall_speed {
            self.velocity.y = self.velocity.y.min(max_fall_speed);
        }
    }

    fn apply_vertical_contact(&mut self, contact: VerticalContact) {
        match contact {
            VerticalContact::Floor { .. } => {
                if !self.on_ground {
                    log::debug!("Landed at {:.2} px/s", self.velocity.y);
                    self.dispatcher.broadcast(Event::Landed {
                        impact_speed: self.velocity.y,
                    });
                }
                self.velocity.y = 0.0;
                self.on_ground = true;
                self.coyote_timer = self.config.coyote_window;
                self.jump_cut_available = false;
            }
            VerticalContact::Ceiling { .. } => {
                self.velocity.y = 0.0;
                self.on_ground = false;
                self.jump_cut_available = false;
                self.dispatcher.broadcast(Event::HitCeiling);
            }
            VerticalContact::None { .. } => {
                // nothing under the feet, or moving up
                self.on_ground = false;
            }
        }
    }

    fn apply_horizontal_contact(&mut self, contact: HorizontalContact) {
        match contact {
            HorizontalContact::Wall { side, .. } => {
                self.velocity.x = 0.0;
                if self.wall_contact != Some(side) {
                    self.dispatcher.broadcast(Event::HitWall { side });
                }
                self.wall_contact = Some(side);
            }
            HorizontalContact::None { .. } => {
                self.wall_contact = None;
            }
        }
    }

    // -----------------------------------------------------------------------------------------------------------------

    /// Applies damage from a source pushing the body toward `push`. Returns false if
    /// the damage was ignored because the body is invulnerable or already dead.
    pub fn hurt(&mut self, damage: u32, push: HorizontalDir) -> bool {
        if self.state.is_dead() || self.is_invulnerable() {
            return false;
        }

        self.hit_points = self.hit_points.saturating_sub(damage);
        if self.hit_points == 0 {
            self.kill();
            return true;
        }

        let hurt = &self.config.hurt;
        let previous_state = self.state;
        self.velocity = vec2(push.sign() * hurt.knockback_speed, hurt.knockback_lift);
        self.on_ground = false;
        self.jump_buffer_timer = 0.0;
        self.coyote_timer = 0.0;
        self.jump_cut_available = false;
        self.invulnerability_timer = hurt.invulnerability_duration;
        self.facing = push.invert();
        self.state = MovementState::Hurt {
            remaining: hurt.duration,
        };

        log::debug!("Hurt for {}, {} remaining", damage, self.hit_points);
        self.dispatcher.broadcast(Event::Hurt {
            damage,
            hit_points: self.hit_points,
        });
        if !previous_state.same_kind(&self.state) {
            self.dispatcher.broadcast(Event::StateChanged {
                from: previous_state,
                to: self.state,
            });
        }
        true
    }

    pub fn kill(&mut self) {
        if self.state.is_dead() {
            return;
        }
        let previous_state = self.state;
        self.hit_points = 0;
        self.velocity = Zero::zero();
        self.state = MovementState::Dead;

        log::debug!("PlayerBody died");
        self.dispatcher.broadcast(Event::Died);
        self.dispatcher.broadcast(Event::StateChanged {
            from: previous_state,
            to: self.state,
        });
    }

    // -----------------------------------------------------------------------------------------------------------------

    pub fn position(&self) -> Point2<f32> {
        self.position
    }

    pub fn velocity(&self) -> Vector2<f32> {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vector2<f32>) {
        self.velocity = velocity;
    }

    pub fn state(&self) -> MovementState {
        self.state
    }

    pub fn on_ground(&self) -> bool {
        self.on_ground
    }

    pub fn facing(&self) -> HorizontalDir {
        self.facing
    }

    pub fn jump_buffer_timer(&self) -> f32 {
        self.jump_buffer_timer
    }

    pub fn coyote_timer(&self) -> f32 {
        self.coyote_timer
    }

    pub fn dash_cooldown(&self) -> f32 {
        self.dash_cooldown
    }

    pub fn hit_points(&self) -> u32 {
        self.hit_points
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerability_timer > 0.0
    }

    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.position, self.config.body_extent)
    }

    pub fn center(&self) -> Point2<f32> {
        self.bounds().center()
    }

    pub fn snapshot(&self) -> BodySnapshot {
        BodySnapshot {
            position: self.position,
            velocity: self.velocity,
            extent: self.config.body_extent,
            state: self.state,
            on_ground: self.on_ground,
            facing: self.facing,
            hit_points: self.hit_points,
            invulnerable: self.is_invulnerable(),
        }
    }

    /// Returns events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.dispatcher.drain()
    }

    pub fn drain_messages(&mut self, tick: u64) -> Vec<Message> {
        self.dispatcher.drain_messages(tick)
    }
}

#[cfg(test)]
mod controller_tests {
    use super::*;
    use crate::constants::MAX_RUN_SPEED;
    use rand::{prelude::*, Rng};

    const DT: f32 = 1.0 / 60.0;
    const EPSILON: f32 = 1e-3;

    // ground row 15 spans y 240..256, so a resting 32px tall body sits at y = 208
    const REST_Y: f32 = 208.0;

    fn flat_world() -> TileWorld {
        TileWorld::flat(40, 16, 16.0, 15).unwrap()
    }

    fn step(body: &mut PlayerBody, input: InputSnapshot, world: &TileWorld) -> Vec<Event> {
        body.update(DT, &input, world);
        body.drain_events()
    }

    /// A body already settled on the flat world's floor.
    fn resting_body(x: f32, config: MovementConfig, world: &TileWorld) -> PlayerBody {
        let mut body = PlayerBody::new(point2(x, REST_Y), config);
        step(&mut body, InputSnapshot::neutral(), world);
        assert!(body.on_ground());
        body
    }

    fn jumped(events: &[Event]) -> Option<bool> {
        events.iter().find_map(|e| match e {
            Event::Jumped { coyote } => Some(*coyote),
            _ => None,
        })
    }

    #[test]
    fn resting_body_is_stable() {
        let world = flat_world();
        let mut body = PlayerBody::new(point2(100.0, REST_Y), MovementConfig::default());

        let events = step(&mut body, InputSnapshot::neutral(), &world);
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::Landed { .. })));

        for _ in 0..120 {
            let events = step(&mut body, InputSnapshot::neutral(), &world);
            assert!(events.is_empty());
            assert_eq!(body.position(), point2(100.0, REST_Y));
            assert_eq!(body.velocity(), vec2(0.0, 0.0));
            assert_eq!(body.state(), MovementState::Idle);
            assert!(body.on_ground());
        }
    }

    #[test]
    fn falls_and_lands_on_flat_ground() {
        let world = flat_world();
        let mut body = PlayerBody::new(point2(100.0, 0.0), MovementConfig::default());
        let mut landings = 0;
        let mut previous_y = body.position().y;

        for _ in 0..120 {
            let events = step(&mut body, InputSnapshot::neutral(), &world);
            landings += events
                .iter()
                .filter(|e| matches!(e, Event::Landed { .. }))
                .count();
            assert!(body.position().y >= previous_y);
            assert!(body.position().y <= REST_Y);
            previous_y = body.position().y;
        }

        assert_eq!(landings, 1);
        assert_eq!(body.position().y, REST_Y);
        assert_eq!(body.velocity().y, 0.0);
        assert_eq!(body.state(), MovementState::Idle);
    }

    #[test]
    fn holding_right_reaches_max_run_speed() {
        let world = flat_world();
        let mut body = resting_body(32.0, MovementConfig::default(), &world);

        for _ in 0..5 {
            step(&mut body, InputSnapshot::right(), &world);
        }
        assert!(body.velocity().x < MAX_RUN_SPEED);

        step(&mut body, InputSnapshot::right(), &world);
        assert_eq!(body.velocity().x, MAX_RUN_SPEED);

        for _ in 6..60 {
            step(&mut body, InputSnapshot::right(), &world);
            assert_eq!(body.velocity().x, MAX_RUN_SPEED);
        }
        assert_eq!(body.state(), MovementState::Run);
        assert_eq!(body.facing(), HorizontalDir::East);
        assert!(body.position().x > 200.0);

        // letting go decelerates to a stop without reversing
        for _ in 0..60 {
            step(&mut body, InputSnapshot::neutral(), &world);
            assert!(body.velocity().x >= 0.0);
        }
        assert_eq!(body.velocity().x, 0.0);
        assert_eq!(body.state(), MovementState::Idle);
    }

    #[test]
    fn random_input_respects_invariants() {
        let world = flat_world();
        let mut config = MovementConfig::default();
        config.dash.enabled = false;
        let max_speed = config.max_run_speed;
        let mut body = PlayerBody::new(point2(300.0, 120.0), config);
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        let extent = world.world_extent();

        for _ in 0..3000 {
            let jump_held = rng.gen_bool(0.2);
            let input = InputSnapshot {
                move_left: rng.gen_bool(0.5),
                move_right: rng.gen_bool(0.5),
                jump_held,
                jump_pressed: jump_held && rng.gen_bool(0.5),
                ..Default::default()
            };
            step(&mut body, input, &world);

            assert!(body.velocity().x.abs() <= max_speed);
            if body.on_ground() {
                assert_eq!(body.velocity().y, 0.0);
            }
            let bounds = body.bounds();
            assert!(bounds.left() >= 0.0 && bounds.right() <= extent.x);
            assert!(bounds.top() >= 0.0 && bounds.bottom() <= REST_Y + 32.0);
        }
    }

    #[test]
    fn buffered_jump_fires_on_landing() {
        let world = flat_world();
        // half a pixel above the floor, so this tick's fall lands
        let mut body = PlayerBody::new(point2(100.0, REST_Y - 0.5), MovementConfig::default());

        let events = step(&mut body, InputSnapshot::jump(), &world);
        assert_eq!(jumped(&events), None);
        assert!(body.on_ground());
        assert!(body.jump_buffer_timer() > 0.0);

        let events = step(&mut body, InputSnapshot::neutral(), &world);
        assert_eq!(jumped(&events), Some(false));
        assert!(!body.on_ground());
        assert_eq!(body.jump_buffer_timer(), 0.0);
        assert!((body.velocity().y - (-620.0 + 35.0)).abs() < EPSILON);
        assert_eq!(body.state(), MovementState::JumpRise);

        // fires once only
        let events = step(&mut body, InputSnapshot::neutral(), &world);
        assert_eq!(jumped(&events), None);
    }

    #[test]
    fn expired_buffer_drops_jump() {
        let world = flat_world();
        let mut body = PlayerBody::new(point2(100.0, 50.0), MovementConfig::default());
        let mut events = step(&mut body, InputSnapshot::jump(), &world);
        for _ in 0..120 {
            events.extend(step(&mut body, InputSnapshot::neutral(), &world));
        }
        assert_eq!(jumped(&events), None);
        assert!(body.on_ground());
        assert_eq!(body.position().y, REST_Y);
    }

    /// Ledge spanning columns 0..=9; past it the floor is the world's bottom edge.
    fn ledge_world() -> TileWorld {
        let mut rows = vec!["....................".to_string(); 15];
        rows.push("##########..........".to_string());
        TileWorld::from_rows(&rows, 16.0).unwrap()
    }

    /// Walks right off the ledge. Returns the body on the tick after the last
    /// tick it was grounded.
    fn walk_off_ledge() -> (PlayerBody, TileWorld) {
        let world = ledge_world();
        let mut body = resting_body(159.0, MovementConfig::default(), &world);

        step(&mut body, InputSnapshot::right(), &world);
        assert!(body.on_ground());

        // the moved span has cleared column 9
        let events = step(&mut body, InputSnapshot::right(), &world);
        assert!(body.position().x > 160.0);
        assert!(!body.on_ground());
        assert_eq!(jumped(&events), None);
        (body, world)
    }

    #[test]
    fn coyote_jump_within_window() {
        let (mut body, world) = walk_off_ledge();
        for _ in 0..3 {
            step(&mut body, InputSnapshot::right(), &world);
        }
        assert!(!body.on_ground());
        assert!(body.coyote_timer() > 0.0);

        // fifth tick after leaving the ground
        let events = step(&mut body, InputSnapshot::right().with_jump(), &world);
        assert_eq!(jumped(&events), Some(true));
        assert!(body.velocity().y < 0.0);
    }

    #[test]
    fn coyote_jump_after_window_is_buffered() {
        let (mut body, world) = walk_off_ledge();
        for _ in 0..5 {
            step(&mut body, InputSnapshot::right(), &world);
        }
        assert!(!body.on_ground());

        // seventh tick after leaving the ground; this tick also lands
        let events = step(&mut body, InputSnapshot::right().with_jump(), &world);
        assert_eq!(jumped(&events), None);
        assert!(body.on_ground());

        let events = step(&mut body, InputSnapshot::right(), &world);
        assert_eq!(jumped(&events), Some(false));
    }

    #[test]
    fn diagonal_fall_lands_on_ledge_corner() {
        // ledge covers columns 10..=12, y 192..208
        let mut rows = vec!["....................".to_string(); 16];
        rows[12] = "..........###.......".to_string();
        rows[15] = "####################".to_string();
        let world = TileWorld::from_rows(&rows, 16.0).unwrap();

        // before the move the body spans x 137..159, clear of the ledge; after it, x 140.67..162.67
        let mut body = PlayerBody::new(point2(137.0, 159.0), MovementConfig::default());
        body.set_velocity(vec2(220.0, 300.0));
        let events = step(&mut body, InputSnapshot::right(), &world);

        assert!(events.iter().any(|e| matches!(e, Event::Landed { .. })));
        assert!(body.on_ground());
        assert_eq!(body.position().y, 160.0);
        assert_eq!(body.velocity(), vec2(220.0, 0.0));
        assert!((body.position().x - (137.0 + 220.0 / 60.0)).abs() < EPSILON);
    }

    #[test]
    fn falls_never_tunnel_through_a_tile() {
        let world = flat_world();
        let mut y = 160.0;
        while y <= REST_Y {
            let mut body = PlayerBody::new(point2(100.0, y), MovementConfig::default());
            body.set_velocity(vec2(0.0, 900.0));
            step(&mut body, InputSnapshot::neutral(), &world);
            assert!(
                body.position().y <= REST_Y,
                "started at {} ended at {}",
                y,
                body.position().y
            );
            if y + 15.0 >= REST_Y {
                assert!(body.on_ground());
                assert_eq!(body.position().y, REST_Y);
            }
            y += 0.25;
        }
    }

    #[test]
    fn ceiling_stops_jump() {
        let mut rows = vec!["....................".to_string(); 16];
        rows[10] = "####################".to_string();
        rows[15] = "####################".to_string();
        let world = TileWorld::from_rows(&rows, 16.0).unwrap();
        let mut body = resting_body(100.0, MovementConfig::default(), &world);

        let mut events = step(&mut body, InputSnapshot::jump(), &world);
        for _ in 0..3 {
            events.extend(step(&mut body, InputSnapshot::neutral(), &world));
        }
        assert!(events.contains(&Event::HitCeiling));
        // row 10 spans y 160..176
        assert_eq!(body.position().y, 176.0);
        assert_eq!(body.velocity().y, 0.0);
        assert_eq!(body.state(), MovementState::Fall);

        for _ in 0..60 {
            step(&mut body, InputSnapshot::neutral(), &world);
        }
        assert_eq!(body.position().y, REST_Y);
    }

    #[test]
    fn walls_stop_horizontal_motion() {
        let world = flat_world();
        // world is 640 wide; out-of-bounds is solid
        let mut body = resting_body(600.0, MovementConfig::default(), &world);
        let mut wall_hits = 0;
        for _ in 0..60 {
            let events = step(&mut body, InputSnapshot::right(), &world);
            wall_hits += events
                .iter()
                .filter(|e| matches!(e, Event::HitWall { side: HorizontalDir::East }))
                .count();
        }
        assert_eq!(wall_hits, 1);
        assert_eq!(body.position().x, 640.0 - 22.0);
        assert_eq!(body.velocity().x, 0.0);
    }

    #[test]
    fn ground_dash_runs_fixed_duration() {
        let world = flat_world();
        let mut body = resting_body(100.0, MovementConfig::default(), &world);

        let events = step(&mut body, InputSnapshot::neutral().with_dash(), &world);
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::DashStarted { .. })));
        assert_eq!(body.dash_cooldown(), 0.45);

        assert!(body.state().is_dashing());
        assert_eq!(body.velocity(), vec2(480.0, 0.0));

        // the start tick counts toward the duration: nine ticks at dash speed
        for tick in 1..9 {
            step(&mut body, InputSnapshot::neutral(), &world);
            assert!(body.state().is_dashing(), "tick {}", tick);
            assert_eq!(body.velocity(), vec2(480.0, 0.0));
        }
        assert!((body.position().x - (100.0 + 72.0)).abs() < EPSILON);

        // exit tick moves at exit speed, ignoring input
        let events = step(&mut body, InputSnapshot::left(), &world);
        assert!(events.contains(&Event::DashEnded));
        assert!(!body.state().is_dashing());
        assert_eq!(body.velocity(), vec2(120.0, 0.0));
        assert!((body.position().x - (100.0 + 74.0)).abs() < EPSILON);
        assert_eq!(body.dash_cooldown(), 0.45);

        // still cooling down
        let events = step(&mut body, InputSnapshot::neutral().with_dash(), &world);
        assert!(!events
            .iter()
            .any(|e| matches!(e, Event::DashStarted { .. })));
        assert!(body.dash_cooldown() < 0.45);
        assert!((body.velocity().x - (120.0 - 2800.0 / 60.0)).abs() < EPSILON);

        for _ in 0..30 {
            step(&mut body, InputSnapshot::neutral(), &world);
        }
        assert_eq!(body.dash_cooldown(), 0.0);
        let events = step(&mut body, InputSnapshot::left().with_dash(), &world);
        assert!(events.contains(&Event::DashStarted {
            direction: vec2(-1.0, 0.0)
        }));
        assert_eq!(body.facing(), HorizontalDir::West);
    }

    #[test]
    fn air_dash_suspends_gravity() {
        let world = flat_world();
        let mut body = PlayerBody::new(point2(100.0, 60.0), MovementConfig::default());
        step(&mut body, InputSnapshot::right().with_dash(), &world);
        let y = body.position().y;
        assert_eq!(body.dash_cooldown(), 0.65);

        for _ in 0..8 {
            step(&mut body, InputSnapshot::neutral(), &world);
            assert_eq!(body.position().y, y);
            assert!(!body.on_ground());
        }

        // gravity resumes on the exit tick
        let events = step(&mut body, InputSnapshot::neutral(), &world);
        assert!(events.contains(&Event::DashEnded));
        assert_eq!(body.velocity().x, 120.0);
        assert!(body.velocity().y > 0.0);
        assert!(body.position().y > y);
    }

    #[test]
    fn diagonal_dash_is_normalized() {
        let world = flat_world();
        let mut body = PlayerBody::new(point2(100.0, 60.0), MovementConfig::default());
        let input = InputSnapshot {
            move_up: true,
            ..InputSnapshot::right().with_dash()
        };
        step(&mut body, input, &world);
        let v = body.velocity();
        assert!((v.magnitude() - 480.0).abs() < EPSILON);
        assert!(v.x > 0.0 && v.y < 0.0);
    }

    #[test]
    fn disabled_dash_is_ignored() {
        let world = flat_world();
        let mut config = MovementConfig::default();
        config.dash.enabled = false;
        let mut body = resting_body(100.0, config, &world);
        step(&mut body, InputSnapshot::neutral().with_dash(), &world);
        assert_eq!(body.state(), MovementState::Idle);
    }

    #[test]
    fn hurt_knocks_back_and_grants_invulnerability() {
        let world = flat_world();
        let mut body = resting_body(300.0, MovementConfig::default(), &world);

        assert!(body.hurt(5, HorizontalDir::West));
        assert_eq!(body.hit_points(), 15);
        assert_eq!(body.velocity(), vec2(-160.0, -240.0));
        assert_eq!(body.facing(), HorizontalDir::East);
        assert!(body.state().is_hurt());
        assert!(body.is_invulnerable());
        let events = body.drain_events();
        assert!(events.contains(&Event::Hurt {
            damage: 5,
            hit_points: 15
        }));

        // invulnerable
        assert!(!body.hurt(5, HorizontalDir::West));
        assert_eq!(body.hit_points(), 15);

        // input is ignored while hurt
        for _ in 0..17 {
            step(&mut body, InputSnapshot::right().with_jump(), &world);
            assert!(body.state().is_hurt());
            assert!(body.velocity().x <= 0.0);
        }
        for _ in 0..2 {
            step(&mut body, InputSnapshot::neutral(), &world);
        }
        assert!(!body.state().is_hurt());

        for _ in 0..40 {
            step(&mut body, InputSnapshot::neutral(), &world);
        }
        assert!(body.is_invulnerable());
        for _ in 0..5 {
            step(&mut body, InputSnapshot::neutral(), &world);
        }
        assert!(!body.is_invulnerable());
        assert!(body.hurt(1, HorizontalDir::East));
    }

    #[test]
    fn lethal_damage_kills_and_freezes() {
        let world = flat_world();
        let mut body = resting_body(300.0, MovementConfig::default(), &world);

        assert!(body.hurt(100, HorizontalDir::East));
        assert_eq!(body.hit_points(), 0);
        assert_eq!(body.state(), MovementState::Dead);
        let events = body.drain_events();
        assert!(events.contains(&Event::Died));

        let position = body.position();
        for _ in 0..30 {
            let events = step(&mut body, InputSnapshot::right().with_jump(), &world);
            assert!(events.is_empty());
        }
        assert_eq!(body.position(), position);
        assert!(!body.hurt(1, HorizontalDir::East));

        body.respawn(point2(32.0, REST_Y));
        assert_eq!(body.hit_points(), 20);
        assert_eq!(body.state(), MovementState::Fall);
    }

    #[test]
    fn jump_cut_shortens_jump() {
        let world = flat_world();
        let mut config = MovementConfig::default();
        config.jump_cut_multiplier = Some(0.5);

        let mut held = resting_body(100.0, config.clone(), &world);
        let mut released = resting_body(100.0, config, &world);
        step(&mut held, InputSnapshot::jump(), &world);
        step(&mut released, InputSnapshot::jump(), &world);

        let hold = InputSnapshot {
            jump_held: true,
            ..Default::default()
        };
        step(&mut held, hold, &world);
        step(&mut released, InputSnapshot::neutral(), &world);
        assert!((held.velocity().y - (-620.0 + 70.0)).abs() < EPSILON);
        assert!((released.velocity().y - ((-620.0 + 35.0) * 0.5 + 35.0)).abs() < EPSILON);

        let mut held_apex = held.position().y;
        let mut released_apex = released.position().y;
        for _ in 0..60 {
            step(&mut held, hold, &world);
            step(&mut released, InputSnapshot::neutral(), &world);
            held_apex = held_apex.min(held.position().y);
            released_apex = released_apex.min(released.position().y);
        }
        assert!(released_apex > held_apex);
    }

    #[test]
    fn state_changes_are_reported() {
        let world = flat_world();
        let mut body = resting_body(100.0, MovementConfig::default(), &world);
        let events = step(&mut body, InputSnapshot::jump(), &world);
        assert!(events.contains(&Event::StateChanged {
            from: MovementState::Idle,
            to: MovementState::JumpRise
        }));
    }
}
