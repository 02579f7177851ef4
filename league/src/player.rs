use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{anyhow, bail};
use fourwins::{GameState, GridInfo, Token};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::warn;

pub const COFFEE_BREAK_NAME: &str = "CoffeeBreak";
pub const COFFEE_BREAK_WIN_MESSAGE: &str = "coffee break";

/// The callbacks through which a game talks to a participant.
///
/// Implementations typically forward these to a remote client and block
/// until it answers. An `Err` from [`Competitor::next_column()`] loses the
/// game for this competitor, with the error message as the reason. A panic
/// counts as an error.
/// Errors from the notifications are logged and otherwise ignored.
pub trait Competitor: Send {
    /// A new game is about to start. `opponents` are the tokens of the
    /// other players, separated by commas.
    ///
    /// Returns whether the competitor wants to play.
    fn join_game(&mut self, _opponents: &str, _grid: GridInfo) -> bool {
        true
    }

    /// Asks for the column to drop the next token into.
    fn next_column(&mut self) -> anyhow::Result<i32>;

    /// Some player, possibly this one, dropped a token into `column`.
    fn token_was_inserted(&mut self, _token: &Token, _column: i32) -> anyhow::Result<()> {
        Ok(())
    }

    fn game_ended(&mut self, _state: &GameState) -> anyhow::Result<()> {
        Ok(())
    }
}

/// A registered participant: a token plus the competitor behind it.
///
/// Cloning gives another handle to the same competitor.
#[derive(Clone)]
pub struct Player {
    token: Token,
    coffee_break: bool,
    competitor: Arc<Mutex<dyn Competitor>>,
}

impl Player {
    pub fn new(token: impl Into<Token>, competitor: impl Competitor + 'static) -> Self {
        Self {
            token: token.into(),
            coffee_break: false,
            competitor: Arc::new(Mutex::new(competitor)),
        }
    }

    /// The placeholder that evens out an odd roster. It never plays.
    pub(crate) fn coffee_break() -> Self {
        Self {
            token: Token::new(COFFEE_BREAK_NAME),
            coffee_break: true,
            competitor: Arc::new(Mutex::new(CoffeeBreak)),
        }
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn is_coffee_break(&self) -> bool {
        self.coffee_break
    }

    /// A competitor that panics declines.
    pub fn join_game(&self, opponents: &str, grid: GridInfo) -> bool {
        self.guarded(|c| c.join_game(opponents, grid))
            .unwrap_or_else(|message| {
                warn!(player = %self.token, "{}", message);
                false
            })
    }

    /// A panic is reported as an error, so a competitor that panics loses
    /// the game like one that fails.
    pub fn next_column(&self) -> anyhow::Result<i32> {
        self.guarded(|c| c.next_column())
            .unwrap_or_else(|message| Err(anyhow!(message)))
    }

    pub fn token_was_inserted(&self, token: &Token, column: i32) -> anyhow::Result<()> {
        self.guarded(|c| c.token_was_inserted(token, column))
            .unwrap_or_else(|message| Err(anyhow!(message)))
    }

    pub fn game_ended(&self, state: &GameState) -> anyhow::Result<()> {
        self.guarded(|c| c.game_ended(state))
            .unwrap_or_else(|message| Err(anyhow!(message)))
    }

    /// Calls into the competitor, turning a panic into its message.
    fn guarded<R>(&self, call: impl FnOnce(&mut dyn Competitor) -> R) -> Result<R, String> {
        panic::catch_unwind(AssertUnwindSafe(|| call(&mut *self.lock())))
            .map_err(|payload| format!("Competitor panicked: {}", panic_message(&*payload)))
    }

    // A competitor that panicked is still asked; whatever it answers is
    // handled like any other answer.
    fn lock(&self) -> MutexGuard<'_, dyn Competitor + 'static> {
        self.competitor
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown cause"
    }
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("token", &self.token)
            .field("coffee_break", &self.coffee_break)
            .finish_non_exhaustive()
    }
}

struct CoffeeBreak;

impl Competitor for CoffeeBreak {
    fn join_game(&mut self, _opponents: &str, _grid: GridInfo) -> bool {
        false
    }

    fn next_column(&mut self) -> anyhow::Result<i32> {
        // We don't join, so we don't play
        bail!("It's me, the {}, I don't want to play!", COFFEE_BREAK_NAME)
    }
}

/// Drops tokens into random columns that still have room.
///
/// Stands in for a remote client when running seasons in-process.
pub struct RandomCompetitor {
    rng: StdRng,
    rows: usize,
    fill: Vec<usize>,
}

impl RandomCompetitor {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            rows: 0,
            fill: Vec::new(),
        }
    }
}

impl Competitor for RandomCompetitor {
    fn join_game(&mut self, _opponents: &str, grid: GridInfo) -> bool {
        self.rows = grid.rows;
        self.fill = vec![0; grid.columns];
        true
    }

    fn next_column(&mut self) -> anyhow::Result<i32> {
        let open: Vec<usize> = (0..self.fill.len())
            .filter(|&column| self.fill[column] < self.rows)
            .collect();
        match open.choose(&mut self.rng) {
            Some(&column) => Ok(column as i32),
            None => bail!("No free column left"),
        }
    }

    fn token_was_inserted(&mut self, _token: &Token, column: i32) -> anyhow::Result<()> {
        if let Some(filled) = usize::try_from(column)
            .ok()
            .and_then(|column| self.fill.get_mut(column))
        {
            *filled += 1;
        }
        Ok(())
    }
}
