mod config;
mod error;
mod game;
mod listener;
mod player;
mod recording;
mod schedule;
mod score;
mod tournament;
#[cfg(test)]
mod testing;
pub use config::*;
pub use error::*;
pub use game::*;
pub use listener::*;
pub use player::*;
pub use recording::*;
pub use schedule::*;
pub use score::*;
pub use tournament::*;
