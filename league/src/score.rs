use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use fourwins::{GameState, Token};
use tracing::info;

use crate::game::GameOutcome;
use crate::listener::TournamentListener;
use crate::player::Player;

const FULL_POINT: f64 = 1.0;
const HALF_POINT: f64 = 0.5;
const ZERO: f64 = 0.0;

/// Points per player, accumulated over any number of seasons.
#[derive(Debug, Default)]
pub struct ScoreSheet {
    data: Mutex<HashMap<Token, f64>>,
}

impl ScoreSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `points` to the player's score and returns the new score.
    pub fn add(&self, token: &Token, points: f64) -> f64 {
        let mut data = self.data.lock().unwrap_or_else(PoisonError::into_inner);
        let score = data.entry(token.clone()).or_insert(ZERO);
        *score += points;
        *score
    }

    pub fn score_of(&self, token: &Token) -> Option<f64> {
        self.data
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .copied()
    }

    /// Highest score first, ties by token.
    pub fn standings(&self) -> Vec<(Token, f64)> {
        let mut standings: Vec<(Token, f64)> = self
            .data
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(token, &score)| (token.clone(), score))
            .collect();
        standings.sort_by(|(t1, s1), (t2, s2)| s2.total_cmp(s1).then_with(|| t1.cmp(t2)));
        standings
    }
}

impl std::fmt::Display for ScoreSheet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let standings = self.standings();
        let pos_width = standings.len().to_string().len();
        let name_width = standings
            .iter()
            .map(|(token, _)| token.as_str().chars().count())
            .max()
            .unwrap_or(0);
        let score_width = standings
            .first()
            .map(|(_, score)| format!("{:.1}", score).len())
            .unwrap_or(0);
        for (idx, (token, score)) in standings.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "{:>pos_width$}: {:<name_width$} {:>score_width$.1}",
                idx + 1,
                token.as_str(),
                score
            )?;
        }
        Ok(())
    }
}

/// Keeps a [`ScoreSheet`]: a win is worth one point, a draw half a point.
/// When a player forfeits, every opponent gets the point.
#[derive(Default)]
pub struct ScoreListener {
    sheet: Arc<ScoreSheet>,
}

impl ScoreListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet(&self) -> Arc<ScoreSheet> {
        Arc::clone(&self.sheet)
    }

    /// Puts the players on the sheet with zero points, so that they show up
    /// before they finished a game.
    pub fn enroll(&self, players: &[Player]) {
        for player in players {
            self.sheet.add(player.token(), ZERO);
        }
    }

    fn update_scores(&self, outcome: &GameOutcome, token: &Token, token_owner: f64, others: f64) {
        self.sheet.add(token, token_owner);
        for opponent in outcome.opponents_of(token) {
            self.sheet.add(opponent.token(), others);
        }
    }
}

impl TournamentListener for ScoreListener {
    fn game_ended(&self, outcome: &GameOutcome) -> anyhow::Result<()> {
        match &outcome.state {
            GameState::Win { token, .. } => self.update_scores(outcome, token, FULL_POINT, ZERO),
            GameState::Lose { token, .. } => self.update_scores(outcome, token, ZERO, FULL_POINT),
            GameState::Draw => {
                for player in &outcome.players {
                    self.sheet.add(player.token(), HALF_POINT);
                }
            }
            GameState::InProgress => {}
        }
        Ok(())
    }

    fn season_ended(&self) -> anyhow::Result<()> {
        info!("Standings:\n{}", self.sheet);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameId;
    use crate::testing::StubbornCompetitor;

    fn player(name: &str) -> Player {
        Player::new(name, StubbornCompetitor { column: 0, delay: None })
    }

    fn outcome(state: GameState) -> GameOutcome {
        GameOutcome {
            id: GameId::random(),
            players: vec![player("a"), player("b")],
            state,
        }
    }

    fn t(name: &str) -> Token {
        Token::new(name)
    }

    #[test]
    fn win_lose_and_draw_are_scored() {
        let listener = ScoreListener::new();
        listener
            .game_ended(&outcome(GameState::win(t("a"), vec![])))
            .unwrap();
        listener
            .game_ended(&outcome(GameState::lose(t("a"), "COLUMN_IS_FULL")))
            .unwrap();
        listener.game_ended(&outcome(GameState::Draw)).unwrap();

        let sheet = listener.sheet();
        assert_eq!(sheet.score_of(&t("a")), Some(1.5));
        assert_eq!(sheet.score_of(&t("b")), Some(1.5));
    }

    #[test]
    fn forfeit_gives_the_point_to_the_opponent() {
        let listener = ScoreListener::new();
        listener
            .game_ended(&outcome(GameState::lose(t("b"), "boom")))
            .unwrap();
        let sheet = listener.sheet();
        assert_eq!(sheet.score_of(&t("a")), Some(1.0));
        assert_eq!(sheet.score_of(&t("b")), Some(0.0));
    }

    #[test]
    fn enrolled_players_show_up_with_zero() {
        let listener = ScoreListener::new();
        listener.enroll(&[player("c")]);
        assert_eq!(listener.sheet().score_of(&t("c")), Some(0.0));
        assert_eq!(listener.sheet().score_of(&t("d")), None);
    }

    #[test]
    fn standings_are_ranked() {
        let sheet = ScoreSheet::new();
        sheet.add(&t("bob"), 1.0);
        sheet.add(&t("alice"), 12.5);
        sheet.add(&t("carol"), 1.0);
        assert_eq!(
            sheet.standings(),
            vec![(t("alice"), 12.5), (t("bob"), 1.0), (t("carol"), 1.0)]
        );
        assert_eq!(
            sheet.to_string(),
            "1: alice 12.5\n2: bob    1.0\n3: carol  1.0"
        );
    }
}
