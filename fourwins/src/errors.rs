/// Why a player forfeited by placing a token.
///
/// An illegal move is not an error of the grid, it ends the game. The
/// [`Display`](std::fmt::Display) output is what ends up as the reason of the
/// resulting [`GameState::Lose`](crate::GameState::Lose).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IllegalMove {
    IllegalColumnAnnounced,
    ColumnIsFull,
}

impl IllegalMove {
    pub fn code(&self) -> &'static str {
        match self {
            IllegalMove::IllegalColumnAnnounced => "ILLEGAL_COLUMN_ANNOUNCED",
            IllegalMove::ColumnIsFull => "COLUMN_IS_FULL",
        }
    }
}

impl std::error::Error for IllegalMove {}

impl std::fmt::Display for IllegalMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
