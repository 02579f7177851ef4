use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use clap::Parser;
use fourwins::Score;
use league::{
    GameRecorder, Player, RandomCompetitor, Registration, ScoreListener, Tournament,
    TournamentConfig, TracingListener,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
struct Args {
    /// Path to a JSON file with the tournament settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of columns of the grid, overrides the config file
    #[arg(long)]
    columns: Option<usize>,

    /// Number of rows of the grid, overrides the config file
    #[arg(long)]
    rows: Option<usize>,

    /// How many tokens in a row win, overrides the config file
    #[arg(long)]
    connect: Option<usize>,

    /// How many random players to register
    #[arg(short, long, default_value_t = 4)]
    players: usize,

    /// How many seasons to play
    #[arg(short = 'n', long, default_value_t = 1)]
    seasons: usize,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// How many games of a matchday run at the same time
    #[arg(short, long)]
    workers: Option<usize>,

    /// Record the games as JSON files into this directory
    #[arg(short, long)]
    record_games_to_directory: Option<PathBuf>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

impl Args {
    fn tournament_config(&self) -> anyhow::Result<TournamentConfig> {
        let mut config = match &self.config {
            Some(path) => TournamentConfig::load(path)?,
            None => TournamentConfig::default(),
        };
        if let Some(columns) = self.columns {
            config.grid.columns = columns;
        }
        if let Some(rows) = self.rows {
            config.grid.rows = rows;
        }
        if let Some(connect_n) = self.connect {
            config.grid.connect_n = connect_n;
        }
        if self.workers.is_some() {
            config.workers = self.workers;
        }
        if config.grid.columns == 0 || config.grid.rows == 0 || config.grid.connect_n == 0 {
            anyhow::bail!("Invalid grid {}", config.grid);
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    initialize_logging(args.log_level);

    let config = args.tournament_config()?;
    info!(grid = %config.grid, workers = ?config.workers, "Configuration");

    // Get a random seed
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let tournament = Tournament::new(config)?;
    for idx in 0..args.players {
        let player = Player::new(format!("random-{}", idx), RandomCompetitor::new(rng.gen()));
        if tournament.register(player) == Registration::TokenAlreadyTaken {
            warn!(idx, "Could not register player");
        }
    }

    let scores = Arc::new(ScoreListener::new());
    scores.enroll(&tournament.roster());
    tournament.add_listener(Arc::new(TracingListener::new()));
    tournament.add_listener(scores.clone());
    if let Some(dir_path) = args.record_games_to_directory {
        let recorder = GameRecorder::new(dir_path)?;
        info!(directory = %recorder.directory().display(), "Recording games");
        tournament.add_listener(Arc::new(recorder));
    }

    let draws = AtomicUsize::new(0);
    for season in 1..=args.seasons {
        info!(season, "Starting season");
        let games = tournament.play_season(|state| {
            if state.score() == Score::Draw {
                draws.fetch_add(1, Ordering::Relaxed);
            }
        })?;
        info!(season, games, "Season finished");
    }

    println!("\nStandings after {} season(s):\n", args.seasons);
    println!("{}", scores.sheet());
    println!("\n{} draw(s)", draws.load(Ordering::Relaxed));

    Ok(())
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().event_format(format))
        .with(filter)
        .init();
}
