use std::collections::{HashMap, HashSet, VecDeque};
use std::hash::Hash;

/// Boolean intents for a single simulation tick. Sampled once per tick by the
/// loop and never mutated afterwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub move_left: bool,
    pub move_right: bool,
    pub move_up: bool,
    pub move_down: bool,
    pub jump_held: bool,
    // true only on the tick the jump button went down
    pub jump_pressed: bool,
    pub dash_pressed: bool,
}

impl InputSnapshot {
    pub fn neutral() -> Self {
        Self::default()
    }

    pub fn left() -> Self {
        Self {
            move_left: true,
            ..Default::default()
        }
    }

    pub fn right() -> Self {
        Self {
            move_right: true,
            ..Default::default()
        }
    }

    /// Jump pressed this tick (and therefore held).
    pub fn jump() -> Self {
        Self {
            jump_held: true,
            jump_pressed: true,
            ..Default::default()
        }
    }

    pub fn with_jump(mut self) -> Self {
        self.jump_held = true;
        self.jump_pressed = true;
        self
    }

    pub fn with_dash(mut self) -> Self {
        self.dash_pressed = true;
        self
    }

    /// -1 for left, +1 for right, 0 if both or neither are held.
    pub fn horizontal(&self) -> i32 {
        input_accumulator(self.move_left, self.move_right)
    }

    /// -1 for up, +1 for down (world space is y-down), 0 if both or neither are held.
    pub fn vertical(&self) -> i32 {
        input_accumulator(self.move_up, self.move_down)
    }
}

/// Helper to fold a negative/positive button pair into -1, 0 or +1.
pub fn input_accumulator(negative: bool, positive: bool) -> i32 {
    let mut acc = 0;
    if negative {
        acc -= 1;
    }
    if positive {
        acc += 1;
    }
    acc
}

/// Anything which can produce the input for one tick. Must be sampled at most once per tick.
pub trait InputSource {
    fn sample_input(&mut self) -> InputSnapshot;
}

// ---------------------------------------------------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonState {
    Pressed,
    Down,
    Released,
    Up,
}

impl Default for ButtonState {
    fn default() -> Self {
        ButtonState::Up
    }
}

impl ButtonState {
    fn transition(&self, key_down: bool) -> ButtonState {
        if key_down {
            match self {
                ButtonState::Pressed => ButtonState::Down,
                ButtonState::Down => ButtonState::Down,
                ButtonState::Released => ButtonState::Pressed,
                ButtonState::Up => ButtonState::Pressed,
            }
        } else {
            match self {
                ButtonState::Pressed => ButtonState::Released,
                ButtonState::Down => ButtonState::Released,
                ButtonState::Released => ButtonState::Up,
                ButtonState::Up => ButtonState::Up,
            }
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, ButtonState::Pressed | ButtonState::Down)
    }
}

/// The logical buttons the player body responds to. Key/gamepad mapping onto these
/// is the input collector's business.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Jump,
    Dash,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::MoveUp,
        Action::MoveDown,
        Action::Jump,
        Action::Dash,
    ];
}

/// Tracks button edges between ticks, keyed by any button identifier. A press
/// is latched until the next `update`, so a tap released before the tick samples
/// still reads as pressed for that tick.
#[derive(Debug)]
pub struct InputState<K: Hash + Eq + Copy> {
    buttons: HashMap<K, ButtonState>,
    pressed_since_update: HashSet<K>,
}

impl<K: Hash + Eq + Copy> Default for InputState<K> {
    fn default() -> Self {
        Self {
            buttons: HashMap::new(),
            pressed_since_update: HashSet::new(),
        }
    }
}

impl<K: Hash + Eq + Copy> InputState<K> {
    pub fn for_keys(keys: &[K]) -> Self {
        let mut buttons = HashMap::new();
        for key in keys {
            buttons.insert(*key, ButtonState::default());
        }

        Self {
            buttons,
            pressed_since_update: HashSet::new(),
        }
    }

    pub fn register(&mut self, key: K) {
        self.buttons.insert(key, ButtonState::default());
    }

    pub fn get_button_state(&self, key: K) -> Option<&ButtonState> {
        self.buttons.get(&key)
    }

    /// Feed a key down/up event. Returns false if the key isn't tracked.
    pub fn process_key(&mut self, key: K, pressed: bool) -> bool {
        if let Some(button_state) = self.buttons.get(&key) {
            let new_state = button_state.transition(pressed);
            if new_state == ButtonState::Pressed {
                self.pressed_since_update.insert(key);
            }
            self.buttons.insert(key, new_state);
            true
        } else {
            false
        }
    }

    /// Advance edges by one tick - Pressed becomes Down, Released becomes Up.
    pub fn update(&mut self) {
        let previous_button_state = std::mem::take(&mut self.buttons);
        for (key, button_state) in previous_button_state {
            self.buttons
                .insert(key, button_state.transition(button_state.is_active()));
        }
        self.pressed_since_update.clear();
    }

    fn is_active(&self, key: K) -> bool {
        self.buttons
            .get(&key)
            .map(|b| b.is_active())
            .unwrap_or(false)
            || self.pressed_since_update.contains(&key)
    }

    fn is_pressed(&self, key: K) -> bool {
        self.buttons.get(&key) == Some(&ButtonState::Pressed)
            || self.pressed_since_update.contains(&key)
    }
}

impl InputState<Action> {
    pub fn for_actions() -> Self {
        Self::for_keys(&Action::ALL)
    }

    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            move_left: self.is_active(Action::MoveLeft),
            move_right: self.is_active(Action::MoveRight),
            move_up: self.is_active(Action::MoveUp),
            move_down: self.is_active(Action::MoveDown),
            jump_held: self.is_active(Action::Jump),
            jump_pressed: self.is_pressed(Action::Jump),
            dash_pressed: self.is_pressed(Action::Dash),
        }
    }
}

impl InputSource for InputState<Action> {
    /// Takes the snapshot for this tick and then advances button edges, so a press
    /// is reported on exactly one tick.
    fn sample_input(&mut self) -> InputSnapshot {
        let snapshot = self.snapshot();
        self.update();
        snapshot
    }
}

// ---------------------------------------------------------------------------------------------------------------------

/// Replays a fixed sequence of snapshots, one per tick, then neutral input forever.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    queue: VecDeque<InputSnapshot>,
}

impl ScriptedInput {
    pub fn new<I: IntoIterator<Item = InputSnapshot>>(snapshots: I) -> Self {
        Self {
            queue: snapshots.into_iter().collect(),
        }
    }

    /// Queue `input` for the next `ticks` ticks.
    pub fn hold(mut self, input: InputSnapshot, ticks: usize) -> Self {
        self.queue.extend(std::iter::repeat(input).take(ticks));
        self
    }

    pub fn then(mut self, input: InputSnapshot) -> Self {
        self.queue.push_back(input);
        self
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl InputSource for ScriptedInput {
    fn sample_input(&mut self) -> InputSnapshot {
        self.queue.pop_front().unwrap_or_default()
    }
}
