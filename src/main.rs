use anyhow::Result;
use cgmath::*;
use env_logger::{Builder, Env};
use log::LevelFilter;
use rand::{prelude::*, Rng};
use std::{path::PathBuf, time::Duration};
use structopt::StructOpt;

use platformer_core::{
    event_dispatch::{Message, MessageHandler},
    input::{InputSnapshot, InputSource, ScriptedInput},
    state::events::Event,
    FixedStepLoop, Simulation, TileWorld, Tuning,
};

// ---------------------------------------------------------------------------------------------------------------------

#[derive(StructOpt, Debug)]
#[structopt(about = "Runs the platformer core headlessly against a simulated frame clock")]
struct Options {
    /// Seconds of wall-clock time to simulate
    #[structopt(short, long, default_value = "10")]
    seconds: f32,

    /// Seed for frame-time jitter and random input
    #[structopt(long, default_value = "1")]
    seed: u64,

    /// JSON tuning file; missing fields keep their defaults
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Drive the player with random input instead of the scripted run
    #[structopt(short, long)]
    random_input: bool,

    /// Enable debug logging
    #[structopt(short, long)]
    verbose: bool,
}

// ---------------------------------------------------------------------------------------------------------------------

const LEVEL: [&str; 17] = [
    "########################################",
    "#......................................#",
    "#......................................#",
    "#......................................#",
    "#......................................#",
    "#..........................######......#",
    "#......................................#",
    "#......................................#",
    "#..................####................#",
    "#......................................#",
    "#......................................#",
    "#.........####.........................#",
    "#.............................#........#",
    "#.............................#........#",
    "#.....................#.......#........#",
    "#.....................#.......#........#",
    "########################################",
];

// fraction of frames which stall, simulating a hitch
const STALL_PROBABILITY: f64 = 0.01;

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let env = Env::default().default_filter_or(level.to_string());
    let _ = Builder::from_env(env).try_init();
}

/// Run right, hop the low wall, then come back.
fn scripted_run() -> ScriptedInput {
    ScriptedInput::default()
        .hold(InputSnapshot::neutral(), 30)
        .hold(InputSnapshot::right(), 60)
        .then(InputSnapshot::right().with_jump())
        .hold(
            InputSnapshot {
                jump_held: true,
                ..InputSnapshot::right()
            },
            20,
        )
        .hold(InputSnapshot::right(), 50)
        .then(InputSnapshot::right().with_dash())
        .hold(InputSnapshot::right(), 40)
        .hold(InputSnapshot::left(), 90)
        .then(InputSnapshot::left().with_jump())
        .hold(InputSnapshot::left(), 60)
}

/// Mashes buttons, holding each combination for a random number of ticks.
struct RandomInput {
    rng: StdRng,
    current: InputSnapshot,
    ticks_remaining: u32,
}

impl RandomInput {
    fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            current: InputSnapshot::neutral(),
            ticks_remaining: 0,
        }
    }
}

impl InputSource for RandomInput {
    fn sample_input(&mut self) -> InputSnapshot {
        if self.ticks_remaining == 0 {
            let jump_held = self.rng.gen_bool(0.3);
            self.current = InputSnapshot {
                move_left: self.rng.gen_bool(0.4),
                move_right: self.rng.gen_bool(0.4),
                move_up: self.rng.gen_bool(0.1),
                move_down: self.rng.gen_bool(0.1),
                jump_held,
                jump_pressed: jump_held,
                dash_pressed: self.rng.gen_bool(0.05),
            };
            self.ticks_remaining = self.rng.gen_range(1..30);
            return self.current;
        }

        // presses are edges; only the first tick of a hold reports them
        self.ticks_remaining -= 1;
        InputSnapshot {
            jump_pressed: false,
            dash_pressed: false,
            ..self.current
        }
    }
}

/// Stand-in for audio/particle consumers: tallies what happened.
#[derive(Default)]
struct EventTally {
    jumps: u32,
    landings: u32,
    dashes: u32,
    wall_hits: u32,
}

impl MessageHandler for EventTally {
    fn handle_message(&mut self, message: &Message) {
        match message.event {
            Event::Jumped { .. } => self.jumps += 1,
            Event::Landed { .. } => self.landings += 1,
            Event::DashStarted { .. } => self.dashes += 1,
            Event::HitWall { .. } => self.wall_hits += 1,
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------------------------------------------------

fn main() -> Result<()> {
    let opt = Options::from_args();
    init_logging(opt.verbose);

    let tuning = match &opt.config {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };

    let world = TileWorld::from_rows(&LEVEL, platformer_core::constants::TILE_SIZE)?;
    let spawn_point = point2(48.0, 48.0);
    let mut simulation = Simulation::new(world, spawn_point, &tuning);
    let mut game_loop = FixedStepLoop::new(tuning.looping.clone());

    let mut input: Box<dyn InputSource> = if opt.random_input {
        Box::new(RandomInput::new(opt.seed))
    } else {
        Box::new(scripted_run())
    };

    let mut rng = StdRng::seed_from_u64(opt.seed);
    let mut tally = EventTally::default();
    let mut elapsed = 0.0;
    let mut frames = 0u64;
    let mut quit = false;

    while !quit {
        // a ~60Hz display with scheduling jitter and the occasional hitch
        let frame_time = if rng.gen_bool(STALL_PROBABILITY) {
            rng.gen_range(0.1..0.5)
        } else {
            rng.gen_range(0.012..0.022)
        };

        game_loop.advance(
            Duration::from_secs_f32(frame_time),
            &mut simulation,
            input.as_mut(),
        );
        simulation.dispatch_messages(&mut tally);

        // presentation would read this once per displayed frame
        let snapshot = simulation.render_snapshot();
        if snapshot.player.state.is_dead() {
            simulation.respawn();
            game_loop.reset();
        }

        frames += 1;
        elapsed += frame_time;
        quit = elapsed >= opt.seconds;
    }

    let snapshot = simulation.render_snapshot();
    log::info!(
        "Ran {} frames, {} ticks ({:.2}s of simulated time)",
        frames,
        snapshot.tick,
        snapshot.tick as f32 * game_loop.config().fixed_dt
    );
    log::info!(
        "Events: {} jumps, {} landings, {} dashes, {} wall hits",
        tally.jumps,
        tally.landings,
        tally.dashes,
        tally.wall_hits
    );
    log::info!(
        "Player at ({:.2}, {:.2}) vel ({:.2}, {:.2}) state: {} - camera at ({:.2}, {:.2})",
        snapshot.player.position.x,
        snapshot.player.position.y,
        snapshot.player.velocity.x,
        snapshot.player.velocity.y,
        snapshot.player.state,
        snapshot.camera.x,
        snapshot.camera.y
    );

    Ok(())
}
