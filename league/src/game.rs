use std::collections::HashSet;

use fourwins::{GameState, Grid, Token};
use itertools::Itertools;
use serde::{Serialize, Serializer};
use tracing::{debug, trace, warn};

use crate::error::ConfigurationError;
use crate::player::Player;

/// Identifies one game, random and unique per game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GameId(u128);

impl GameId {
    pub fn random() -> Self {
        Self(rand::random())
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

impl Serialize for GameId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The result of a finished game.
#[derive(Clone, Debug)]
pub struct GameOutcome {
    pub id: GameId,
    /// In turn order.
    pub players: Vec<Player>,
    pub state: GameState,
}

impl GameOutcome {
    pub fn player_for_token(&self, token: &Token) -> Option<&Player> {
        self.players.iter().find(|p| p.token() == token)
    }

    pub fn opponents_of<'a>(&'a self, token: &'a Token) -> impl Iterator<Item = &'a Player> + 'a {
        self.players.iter().filter(move |p| p.token() != token)
    }

    /// The tokens of the players that won: the actor of a win, or everybody
    /// but the actor of a loss.
    pub fn winners(&self) -> Vec<&Token> {
        match &self.state {
            GameState::Win { token, .. } => vec![token],
            GameState::Lose { token, .. } => self.opponents_of(token).map(Player::token).collect(),
            GameState::InProgress | GameState::Draw => Vec::new(),
        }
    }
}

/// One game between two or more players on one grid.
pub struct Match {
    id: GameId,
    grid: Grid,
    players: Vec<Player>,
}

impl Match {
    /// Sets up the game and invites every player to it.
    ///
    /// Fails if there are fewer than two players or if two players share a
    /// token. Whether the players accept the invitation does not matter.
    pub fn new(id: GameId, grid: Grid, players: Vec<Player>) -> Result<Self, ConfigurationError> {
        if players.len() < 2 {
            return Err(ConfigurationError::NotEnoughPlayers {
                count: players.len(),
            });
        }
        validate_tokens(&players)?;

        for player in &players {
            let opponents = players
                .iter()
                .filter(|p| p.token() != player.token())
                .map(Player::token)
                .join(",");
            if !player.join_game(&opponents, grid.info()) {
                debug!(game = %id, player = %player.token(), "Player declined to join");
            }
        }

        Ok(Self { id, grid, players })
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Plays the game to the end.
    pub fn run(self) -> GameOutcome {
        self.run_observed(|_, _| {})
    }

    /// Plays the game to the end, calling `on_move` with each announced
    /// column before it is played.
    pub fn run_observed(mut self, mut on_move: impl FnMut(&Token, i32)) -> GameOutcome {
        let state = self.execute(&mut on_move);
        for player in &self.players {
            if let Err(err) = player.game_ended(&state) {
                warn!(game = %self.id, player = %player.token(), "Could not report the result: {:#}", err);
            }
        }
        GameOutcome {
            id: self.id,
            players: self.players,
            state,
        }
    }

    fn execute(&mut self, on_move: &mut impl FnMut(&Token, i32)) -> GameState {
        let mut turn = 0;
        while self.grid.state().is_in_progress() {
            let player = &self.players[turn % self.players.len()];
            let column = match player.next_column() {
                Ok(column) => column,
                Err(err) => return GameState::lose(player.token().clone(), err.to_string()),
            };
            trace!(game = %self.id, player = %player.token(), column, "Move");
            on_move(player.token(), column);
            self.grid = self.grid.insert(column, player.token());
            for p in &self.players {
                if let Err(err) = p.token_was_inserted(player.token(), column) {
                    warn!(game = %self.id, player = %p.token(), "Could not report the move: {:#}", err);
                }
            }
            turn += 1;
        }
        self.grid.state().clone()
    }
}

fn validate_tokens(players: &[Player]) -> Result<(), ConfigurationError> {
    let mut all_tokens = HashSet::new();
    let duplicates: Vec<Token> = players
        .iter()
        .map(Player::token)
        .filter(|&token| !all_tokens.insert(token))
        .unique()
        .cloned()
        .collect();
    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(ConfigurationError::DuplicateTokens { tokens: duplicates })
    }
}
