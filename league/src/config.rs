use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use fourwins::GridInfo;
use serde::{Deserialize, Serialize};

/// Settings of a [`Tournament`](crate::Tournament).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentConfig {
    /// The grid every game is played on.
    #[serde(default)]
    pub grid: GridInfo,
    /// How many games of a matchday run at the same time.
    /// Defaults to one per CPU.
    #[serde(default)]
    pub workers: Option<usize>,
}

impl TournamentConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Could not open config file '{}'", path.display()))?;
        let config = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Could not parse config file '{}'", path.display()))?;
        Ok(config)
    }
}
