use fourwins::Token;
use itertools::Itertools;

#[derive(Debug, PartialEq, Eq)]
/// Error type for setting up a game or a season in an invalid way.
///
/// Everything that goes wrong while a game is running is expressed through
/// its [`GameState`](fourwins::GameState) instead.
pub enum ConfigurationError {
    DuplicateTokens { tokens: Vec<Token> },
    NotEnoughPlayers { count: usize },
    OddRoster { count: usize },
}

impl std::error::Error for ConfigurationError {}

impl std::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigurationError::DuplicateTokens { tokens } => {
                write!(f, "Players with same tokens {}", tokens.iter().join(", "))
            }
            ConfigurationError::NotEnoughPlayers { count } => {
                write!(f, "A game needs at least two players (was {})", count)
            }
            ConfigurationError::OddRoster { count } => {
                write!(f, "Amount of teams must be even (was {})", count)
            }
        }
    }
}

/// The answer to a registration attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Registration {
    Registered,
    TokenAlreadyTaken,
}
