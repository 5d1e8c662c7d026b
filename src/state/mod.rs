pub mod events;
pub mod game_loop;
pub mod game_state;
