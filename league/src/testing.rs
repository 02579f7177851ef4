//! Scripted competitors and listeners for the tests in this crate.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::bail;
use fourwins::{GameState, GridInfo, Token};

use crate::{Competitor, GameId, GameOutcome, Player, TournamentListener};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    Joined { opponents: String, grid: GridInfo },
    Inserted { token: Token, column: i32 },
    Ended(GameState),
}

/// Plays the given columns, in order, and records what it is told.
#[derive(Default)]
pub struct ScriptedCompetitor {
    columns: VecDeque<i32>,
    pub log: Arc<Mutex<Vec<Notification>>>,
    failing_notifications: bool,
}

impl ScriptedCompetitor {
    pub fn new(columns: &[i32]) -> Self {
        Self {
            columns: columns.iter().copied().collect(),
            ..Default::default()
        }
    }

    /// Every notification returns an error, after being recorded.
    pub fn failing_notifications(mut self) -> Self {
        self.failing_notifications = true;
        self
    }

    pub fn player(self, name: &str) -> (Player, Arc<Mutex<Vec<Notification>>>) {
        let log = Arc::clone(&self.log);
        (Player::new(name, self), log)
    }

    fn record(&self, notification: Notification) -> anyhow::Result<()> {
        self.log.lock().unwrap().push(notification);
        if self.failing_notifications {
            bail!("notification rejected");
        }
        Ok(())
    }
}

impl Competitor for ScriptedCompetitor {
    fn join_game(&mut self, opponents: &str, grid: GridInfo) -> bool {
        let _ = self.record(Notification::Joined {
            opponents: String::from(opponents),
            grid,
        });
        true
    }

    fn next_column(&mut self) -> anyhow::Result<i32> {
        match self.columns.pop_front() {
            Some(column) => Ok(column),
            None => bail!("script exhausted"),
        }
    }

    fn token_was_inserted(&mut self, token: &Token, column: i32) -> anyhow::Result<()> {
        self.record(Notification::Inserted {
            token: token.clone(),
            column,
        })
    }

    fn game_ended(&mut self, state: &GameState) -> anyhow::Result<()> {
        self.record(Notification::Ended(state.clone()))
    }
}

/// Always plays the same column.
pub struct StubbornCompetitor {
    pub column: i32,
    pub delay: Option<Duration>,
}

impl Competitor for StubbornCompetitor {
    fn next_column(&mut self) -> anyhow::Result<i32> {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        Ok(self.column)
    }
}

/// Fails every move with the given message.
pub struct FailingCompetitor(pub &'static str);

impl Competitor for FailingCompetitor {
    fn next_column(&mut self) -> anyhow::Result<i32> {
        bail!(self.0)
    }
}

/// Panics on every move with the given message.
pub struct PanickingCompetitor(pub &'static str);

impl Competitor for PanickingCompetitor {
    fn next_column(&mut self) -> anyhow::Result<i32> {
        panic!("{}", self.0)
    }
}

/// Plays the given column but panics whenever it is told about a move or a result.
pub struct GrumpyCompetitor(pub i32);

impl Competitor for GrumpyCompetitor {
    fn next_column(&mut self) -> anyhow::Result<i32> {
        Ok(self.0)
    }

    fn token_was_inserted(&mut self, _token: &Token, _column: i32) -> anyhow::Result<()> {
        panic!("not interested")
    }

    fn game_ended(&mut self, _state: &GameState) -> anyhow::Result<()> {
        panic!("not interested")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    SeasonStarted,
    GameStarted { game: GameId, players: Vec<Token> },
    NewToken { game: GameId, token: Token, column: i32 },
    GameEnded { game: GameId, state: GameState },
    SeasonEnded,
}

/// Records every hook, optionally failing each one afterwards.
#[derive(Default)]
pub struct RecordingListener {
    pub events: Mutex<Vec<Event>>,
    pub failing: bool,
}

impl RecordingListener {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Default::default()
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: Event) -> anyhow::Result<()> {
        self.events.lock().unwrap().push(event);
        if self.failing {
            bail!("listener failed");
        }
        Ok(())
    }
}

impl TournamentListener for RecordingListener {
    fn season_started(&self) -> anyhow::Result<()> {
        self.record(Event::SeasonStarted)
    }

    fn game_started(&self, game: GameId, players: &[Player]) -> anyhow::Result<()> {
        self.record(Event::GameStarted {
            game,
            players: players.iter().map(|p| p.token().clone()).collect(),
        })
    }

    fn new_token_at(&self, game: GameId, token: &Token, column: i32) -> anyhow::Result<()> {
        self.record(Event::NewToken {
            game,
            token: token.clone(),
            column,
        })
    }

    fn game_ended(&self, outcome: &GameOutcome) -> anyhow::Result<()> {
        self.record(Event::GameEnded {
            game: outcome.id,
            state: outcome.state.clone(),
        })
    }

    fn season_ended(&self) -> anyhow::Result<()> {
        self.record(Event::SeasonEnded)
    }
}
