use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use fourwins::Token;
use tracing::{debug, info};

use crate::game::{GameId, GameOutcome};
use crate::player::Player;

/// Observes a [`Tournament`](crate::Tournament). Every hook is optional.
///
/// Games of a matchday run in parallel, so hooks get called concurrently.
/// An error returned from a hook is logged and otherwise ignored.
pub trait TournamentListener: Send + Sync {
    fn season_started(&self) -> anyhow::Result<()> {
        Ok(())
    }

    fn game_started(&self, _game: GameId, _players: &[Player]) -> anyhow::Result<()> {
        Ok(())
    }

    /// A player announced a column. Called before the token is placed.
    fn new_token_at(&self, _game: GameId, _token: &Token, _column: i32) -> anyhow::Result<()> {
        Ok(())
    }

    fn game_ended(&self, _outcome: &GameOutcome) -> anyhow::Result<()> {
        Ok(())
    }

    fn season_ended(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Logs the course of each season, and how many games everybody won.
#[derive(Default)]
pub struct TracingListener {
    games_won: Mutex<BTreeMap<Token, usize>>,
}

impl TracingListener {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TournamentListener for TracingListener {
    fn season_started(&self) -> anyhow::Result<()> {
        info!("Season starting");
        Ok(())
    }

    fn game_ended(&self, outcome: &GameOutcome) -> anyhow::Result<()> {
        debug!(game = %outcome.id, result = %outcome.state, "Game ended");
        let mut games_won = self.games_won.lock().unwrap_or_else(PoisonError::into_inner);
        for winner in outcome.winners() {
            *games_won.entry(winner.clone()).or_default() += 1;
        }
        Ok(())
    }

    fn season_ended(&self) -> anyhow::Result<()> {
        let games_won = std::mem::take(
            &mut *self.games_won.lock().unwrap_or_else(PoisonError::into_inner),
        );
        info!(?games_won, "Season ended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use fourwins::GameState;

    use super::*;
    use crate::testing::FailingCompetitor;

    fn outcome(state: GameState) -> GameOutcome {
        GameOutcome {
            id: GameId::random(),
            players: vec![
                Player::new("a", FailingCompetitor("a")),
                Player::new("b", FailingCompetitor("b")),
                Player::new("c", FailingCompetitor("c")),
            ],
            state,
        }
    }

    fn tally(listener: &TracingListener) -> BTreeMap<Token, usize> {
        listener.games_won.lock().unwrap().clone()
    }

    #[test]
    fn wins_are_counted_until_the_season_ends() {
        let listener = TracingListener::new();
        listener
            .game_ended(&outcome(GameState::win(Token::new("a"), vec![])))
            .unwrap();
        listener
            .game_ended(&outcome(GameState::lose(Token::new("b"), "boom")))
            .unwrap();
        listener.game_ended(&outcome(GameState::Draw)).unwrap();

        let expected: BTreeMap<Token, usize> =
            [(Token::new("a"), 2), (Token::new("c"), 1)].into_iter().collect();
        assert_eq!(tally(&listener), expected);

        listener.season_ended().unwrap();
        assert!(tally(&listener).is_empty());
    }
}
