use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{Axis, Position, Token};

/// The outcome of a game so far, without any details.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Score {
    #[serde(rename = "IN_GAME")]
    InProgress,
    Win,
    Lose,
    Draw,
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Score::InProgress => "IN_GAME",
            Score::Win => "WIN",
            Score::Lose => "LOSE",
            Score::Draw => "DRAW",
        };
        f.write_str(s)
    }
}

/// The state of a game after the latest token was placed.
///
/// `InProgress` is the initial state, the other three are terminal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "score", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameState {
    #[serde(rename = "IN_GAME")]
    InProgress,
    /// The player owning `token` won.
    ///
    /// A win on the grid always carries at least one winning combination.
    /// Wins handed out without playing (e.g. against a bye) have none, but a
    /// reason instead.
    Win {
        token: Token,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
        #[serde(default)]
        winning_combinations: Vec<WinningCombination>,
    },
    /// The player owning `token` forfeited.
    Lose { token: Token, reason: String },
    Draw,
}

impl GameState {
    pub fn win(token: Token, winning_combinations: Vec<WinningCombination>) -> Self {
        GameState::Win {
            token,
            reason: None,
            winning_combinations,
        }
    }

    pub fn lose(token: Token, reason: impl Into<String>) -> Self {
        GameState::Lose {
            token,
            reason: reason.into(),
        }
    }

    pub fn score(&self) -> Score {
        match self {
            GameState::InProgress => Score::InProgress,
            GameState::Win { .. } => Score::Win,
            GameState::Lose { .. } => Score::Lose,
            GameState::Draw => Score::Draw,
        }
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(self, GameState::InProgress)
    }

    /// The player that caused the terminal state, if any.
    pub fn token(&self) -> Option<&Token> {
        match self {
            GameState::Win { token, .. } | GameState::Lose { token, .. } => Some(token),
            GameState::InProgress | GameState::Draw => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            GameState::Win { reason, .. } => reason.as_deref(),
            GameState::Lose { reason, .. } => Some(reason),
            GameState::InProgress | GameState::Draw => None,
        }
    }

    pub fn winning_combinations(&self) -> &[WinningCombination] {
        match self {
            GameState::Win {
                winning_combinations,
                ..
            } => winning_combinations,
            _ => &[],
        }
    }
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.score())?;
        if let Some(token) = self.token() {
            write!(f, ";{}", token)?;
        }
        if let Some(reason) = self.reason() {
            write!(f, " -- {}", reason)?;
        }
        Ok(())
    }
}

/// A line of connected tokens that won the game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinningCombination {
    pub token: Token,
    /// Where the winning token was inserted.
    pub origin: Position,
    /// All connected positions on the axis, including `origin`.
    pub positions: BTreeSet<Position>,
    pub axis: Axis,
}
