pub use errors::*;
pub use game_state::*;
pub use grid::*;
pub use grid_info::*;
pub use token::*;

#[cfg(test)]
mod arbitrary;
mod errors;
mod game_state;
mod grid;
mod grid_info;
mod token;
