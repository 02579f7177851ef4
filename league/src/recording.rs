use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use anyhow::Context;
use fourwins::{GameState, Token};
use serde::Serialize;

use crate::game::{GameId, GameOutcome};
use crate::listener::TournamentListener;
use crate::player::Player;

/// Writes every finished game as a JSON file into a directory.
///
/// Files are numbered in the order the games end: `game_000001.json`,
/// `game_000002.json` and so on.
pub struct GameRecorder {
    num: AtomicUsize,
    directory: PathBuf,
    games: Mutex<HashMap<GameId, GameRecording>>,
}

impl GameRecorder {
    pub fn new(directory: PathBuf) -> anyhow::Result<Self> {
        if !directory.is_dir() {
            anyhow::bail!("Directory '{}' does not exist", directory.display());
        }
        Ok(Self {
            num: AtomicUsize::new(1),
            directory,
            games: Mutex::new(HashMap::new()),
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn write_game_recording(&self, recording: &GameRecording) -> anyhow::Result<PathBuf> {
        let num = self.num.fetch_add(1, Ordering::Relaxed);
        let filepath = self.directory.join(format!("game_{:0>6}.json", num));
        let file = File::create(&filepath)
            .with_context(|| format!("Could not create '{}'", filepath.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, recording)?;
        writer.flush()?;
        Ok(filepath)
    }
}

#[derive(Debug, Serialize)]
pub struct GameRecording {
    game: GameId,
    players: Vec<Token>,
    moves: Vec<RecordedMove>,
    result: Option<GameState>,
}

impl GameRecording {
    fn new(game: GameId, players: &[Player]) -> Self {
        Self {
            game,
            players: players.iter().map(|p| p.token().clone()).collect(),
            moves: Vec::new(),
            result: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecordedMove {
    token: Token,
    column: i32,
}

impl TournamentListener for GameRecorder {
    fn game_started(&self, game: GameId, players: &[Player]) -> anyhow::Result<()> {
        self.games
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(game, GameRecording::new(game, players));
        Ok(())
    }

    fn new_token_at(&self, game: GameId, token: &Token, column: i32) -> anyhow::Result<()> {
        let mut games = self.games.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(recording) = games.get_mut(&game) else {
            anyhow::bail!("Move in unknown game {}", game);
        };
        recording.moves.push(RecordedMove {
            token: token.clone(),
            column,
        });
        Ok(())
    }

    fn game_ended(&self, outcome: &GameOutcome) -> anyhow::Result<()> {
        let recording = self
            .games
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&outcome.id);
        let mut recording =
            recording.unwrap_or_else(|| GameRecording::new(outcome.id, &outcome.players));
        recording.result = Some(outcome.state.clone());
        self.write_game_recording(&recording)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubbornCompetitor;

    fn player(name: &str) -> Player {
        Player::new(name, StubbornCompetitor { column: 0, delay: None })
    }

    fn read(path: PathBuf) -> serde_json::Value {
        let content = std::fs::read_to_string(path).unwrap();
        serde_json::from_str(&content).unwrap()
    }

    #[test]
    fn missing_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = GameRecorder::new(missing).err().unwrap();
        assert!(err.to_string().ends_with("does not exist"));
    }

    #[test]
    fn finished_games_are_written_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = GameRecorder::new(dir.path().to_path_buf()).unwrap();
        let players = vec![player("a"), player("b")];
        let game = GameId::random();

        recorder.game_started(game, &players).unwrap();
        recorder.new_token_at(game, &Token::new("a"), 3).unwrap();
        recorder.new_token_at(game, &Token::new("b"), 4).unwrap();
        recorder
            .game_ended(&GameOutcome {
                id: game,
                players: players.clone(),
                state: GameState::lose(Token::new("b"), "boom"),
            })
            .unwrap();

        let other = GameId::random();
        recorder.game_started(other, &players).unwrap();
        recorder
            .game_ended(&GameOutcome {
                id: other,
                players,
                state: GameState::Draw,
            })
            .unwrap();

        let first = read(dir.path().join("game_000001.json"));
        assert_eq!(first["game"], game.to_string());
        assert_eq!(first["players"], serde_json::json!(["a", "b"]));
        assert_eq!(
            first["moves"],
            serde_json::json!([{"token": "a", "column": 3}, {"token": "b", "column": 4}])
        );
        assert_eq!(first["result"]["score"], "LOSE");
        assert_eq!(first["result"]["reason"], "boom");

        let second = read(dir.path().join("game_000002.json"));
        assert_eq!(second["game"], other.to_string());
        assert_eq!(second["result"]["score"], "DRAW");
        assert!(second["moves"].as_array().unwrap().is_empty());
    }

    #[test]
    fn moves_of_unknown_games_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = GameRecorder::new(dir.path().to_path_buf()).unwrap();
        assert!(recorder
            .new_token_at(GameId::random(), &Token::new("a"), 0)
            .is_err());
    }
}
