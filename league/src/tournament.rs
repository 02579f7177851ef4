use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use anyhow::Context;
use fourwins::{GameState, Grid, Token};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::TournamentConfig;
use crate::error::{ConfigurationError, Registration};
use crate::game::{GameId, GameOutcome, Match};
use crate::listener::TournamentListener;
use crate::player::{Player, COFFEE_BREAK_WIN_MESSAGE};
use crate::schedule::{Fixture, Season};

/// Runs seasons of double round robin games between the registered players.
///
/// Players can be registered and deregistered at any time, also while a
/// season is running. A season only ever sees the roster as it was when the
/// season started.
pub struct Tournament {
    config: TournamentConfig,
    roster: Mutex<Vec<Player>>,
    listeners: RwLock<Vec<Arc<dyn TournamentListener>>>,
    pool: rayon::ThreadPool,
}

impl Tournament {
    pub fn new(config: TournamentConfig) -> anyhow::Result<Self> {
        let mut builder =
            rayon::ThreadPoolBuilder::new().thread_name(|idx| format!("matchday-{}", idx));
        if let Some(workers) = config.workers {
            builder = builder.num_threads(workers);
        }
        let pool = builder.build().context("Could not create the thread pool")?;
        Ok(Self {
            config,
            roster: Mutex::new(Vec::new()),
            listeners: RwLock::new(Vec::new()),
            pool,
        })
    }

    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }

    pub fn register(&self, player: Player) -> Registration {
        let mut roster = self.lock_roster();
        if roster.iter().any(|p| p.token() == player.token()) {
            info!(player = %player.token(), "Token already taken");
            return Registration::TokenAlreadyTaken;
        }
        info!(player = %player.token(), "Player registered");
        roster.push(player);
        Registration::Registered
    }

    pub fn deregister(&self, token: &Token) -> Option<Player> {
        let mut roster = self.lock_roster();
        let idx = roster.iter().position(|p| p.token() == token)?;
        info!(player = %token, "Player deregistered");
        Some(roster.remove(idx))
    }

    /// The currently registered players, in registration order.
    pub fn roster(&self) -> Vec<Player> {
        self.lock_roster().clone()
    }

    pub fn add_listener(&self, listener: Arc<dyn TournamentListener>) {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }

    /// Returns whether the listener was attached.
    pub fn remove_listener(&self, listener: &Arc<dyn TournamentListener>) -> bool {
        let mut listeners = self.listeners.write().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|l| !same_listener(l, listener));
        listeners.len() != before
    }

    /// Plays one season with the players registered right now and returns
    /// the number of games played.
    ///
    /// Matchdays are played one after the other, the games of a matchday in
    /// parallel. `sink` gets the result of every game, byes included.
    pub fn play_season(
        &self,
        sink: impl Fn(&GameState) + Sync,
    ) -> Result<usize, ConfigurationError> {
        let mut players = self.roster();
        if players.len() % 2 != 0 {
            players.push(Player::coffee_break());
        }
        let season = Season::new(&players)?;
        debug!(
            players = players.len(),
            matchdays = season.len(),
            "Season scheduled"
        );

        self.notify("season_started", |l| l.season_started());
        let mut games = 0;
        for (idx, matchday) in season.matchdays().enumerate() {
            debug!(matchday = idx + 1, games = matchday.len(), "Matchday starting");
            self.pool.install(|| {
                matchday
                    .fixtures()
                    .par_iter()
                    .try_for_each(|fixture| self.play_fixture(fixture, &sink))
            })?;
            games += matchday.len();
        }
        self.notify("season_ended", |l| l.season_ended());
        Ok(games)
    }

    fn play_fixture(
        &self,
        fixture: &Fixture<Player>,
        sink: &(impl Fn(&GameState) + Sync),
    ) -> Result<(), ConfigurationError> {
        let id = GameId::random();
        let outcome = match (fixture.team_a.is_coffee_break(), fixture.team_b.is_coffee_break()) {
            (true, _) => self.coffee_break(id, &fixture.team_b),
            (_, true) => self.coffee_break(id, &fixture.team_a),
            _ => {
                let players = vec![fixture.team_a.clone(), fixture.team_b.clone()];
                let game = Match::new(id, Grid::new(self.config.grid), players)?;
                self.notify("game_started", |l| l.game_started(id, game.players()));
                game.run_observed(|token, column| {
                    self.notify("new_token_at", |l| l.new_token_at(id, token, column))
                })
            }
        };
        debug!(game = %id, result = %outcome.state, "Game finished");
        self.notify("game_ended", |l| l.game_ended(&outcome));
        sink(&outcome.state);
        Ok(())
    }

    fn coffee_break(&self, id: GameId, player: &Player) -> GameOutcome {
        let players = vec![player.clone()];
        self.notify("game_started", |l| l.game_started(id, &players));
        GameOutcome {
            id,
            players,
            state: GameState::Win {
                token: player.token().clone(),
                reason: Some(String::from(COFFEE_BREAK_WIN_MESSAGE)),
                winning_combinations: Vec::new(),
            },
        }
    }

    // Listeners are cloned out of the lock so that hooks may attach or
    // detach listeners.
    fn notify(
        &self,
        hook: &'static str,
        call: impl Fn(&dyn TournamentListener) -> anyhow::Result<()>,
    ) {
        let listeners = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for listener in listeners {
            if let Err(err) = call(listener.as_ref()) {
                warn!(hook, "Listener failed: {:#}", err);
            }
        }
    }

    fn lock_roster(&self) -> MutexGuard<'_, Vec<Player>> {
        self.roster.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// Compares the data pointers only, vtable pointers of the same type may differ.
fn same_listener(a: &Arc<dyn TournamentListener>, b: &Arc<dyn TournamentListener>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}
