mod axis;
mod position;

pub use axis::*;
pub use position::*;

use std::collections::BTreeSet;

use crate::{GameState, GridInfo, IllegalMove, Token, WinningCombination};

/// The board of a single game, together with the state of that game.
///
/// A grid is never modified in place. [`Grid::insert()`] computes the grid
/// after the move, so a grid is a snapshot of one point in the game.
/// Once the game is over, the grid is frozen.
#[derive(Clone, Debug)]
pub struct Grid {
    info: GridInfo,
    /// Column-major, i.e. `cells[column * rows + row]`.
    cells: Vec<Option<Token>>,
    /// The number of tokens in each column, which is also the row the next
    /// token in that column lands on.
    fill: Vec<usize>,
    state: GameState,
}

impl Grid {
    /// Creates an empty grid.
    pub fn new(info: GridInfo) -> Self {
        Self {
            info,
            cells: vec![None; info.cells()],
            fill: vec![0; info.columns],
            state: GameState::InProgress,
        }
    }

    pub fn info(&self) -> GridInfo {
        self.info
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Returns the token at the given position, if the position is on the
    /// grid and occupied.
    pub fn token_at(&self, position: Position) -> Option<&Token> {
        if position.column >= self.info.columns || position.row >= self.info.rows {
            return None;
        }
        self.cells[self.index(position)].as_ref()
    }

    /// Are all columns full?
    pub fn is_full(&self) -> bool {
        self.fill.iter().all(|&filled| filled >= self.info.rows)
    }

    /// Drops `token` into `column` and returns the resulting grid.
    ///
    /// Rules, in order:
    /// - A grid that was won or lost is returned unchanged.
    /// - A drawn grid has no room left, so the player trying to insert loses.
    /// - A column outside of the grid, or a full column, loses the game for the player.
    /// - Otherwise, the token lands in the lowest free row. If it connects
    ///   at least `connect_n` tokens on any axis, the player wins. If that
    ///   filled the last free cell, it's a draw.
    pub fn insert(&self, column: i32, token: &Token) -> Grid {
        match self.state {
            GameState::InProgress => {}
            GameState::Draw => return self.forfeit(token, IllegalMove::ColumnIsFull),
            GameState::Win { .. } | GameState::Lose { .. } => return self.clone(),
        }

        let Some(column) = self.column_index(column) else {
            return self.forfeit(token, IllegalMove::IllegalColumnAnnounced);
        };
        let row = self.fill[column];
        if row >= self.info.rows {
            return self.forfeit(token, IllegalMove::ColumnIsFull);
        }

        let origin = Position::new(column, row);
        let mut next = self.clone();
        let idx = next.index(origin);
        next.cells[idx] = Some(token.clone());
        next.fill[column] += 1;

        let winning_combinations: Vec<WinningCombination> = Axis::ALL
            .into_iter()
            .filter_map(|axis| next.winning_combination(origin, token, axis))
            .collect();

        next.state = if !winning_combinations.is_empty() {
            GameState::win(token.clone(), winning_combinations)
        } else if next.fill[column] == next.info.rows && next.is_full() {
            // Only scan all columns once the column that was played is full.
            GameState::Draw
        } else {
            GameState::InProgress
        };
        next
    }

    fn forfeit(&self, token: &Token, illegal_move: IllegalMove) -> Grid {
        Grid {
            state: GameState::lose(token.clone(), illegal_move.to_string()),
            ..self.clone()
        }
    }

    fn column_index(&self, column: i32) -> Option<usize> {
        usize::try_from(column)
            .ok()
            .filter(|&column| column < self.info.columns)
    }

    fn index(&self, position: Position) -> usize {
        position.column * self.info.rows + position.row
    }

    fn step(&self, position: Position, direction: Direction) -> Option<Position> {
        let (d_column, d_row) = direction.offset();
        let column = position.column.checked_add_signed(d_column)?;
        let row = position.row.checked_add_signed(d_row)?;
        (column < self.info.columns && row < self.info.rows).then_some(Position::new(column, row))
    }

    /// The positions next to `start` (exclusive) in `direction` that hold `token`,
    /// up to the first one that doesn't.
    fn neighbours_of_same_token<'a>(
        &'a self,
        start: Position,
        token: &'a Token,
        direction: Direction,
    ) -> impl Iterator<Item = Position> + 'a {
        std::iter::successors(self.step(start, direction), move |&p| self.step(p, direction))
            .take_while(move |&p| self.token_at(p) == Some(token))
    }

    fn winning_combination(
        &self,
        origin: Position,
        token: &Token,
        axis: Axis,
    ) -> Option<WinningCombination> {
        let positions: BTreeSet<Position> = std::iter::once(origin)
            .chain(self.neighbours_of_same_token(origin, token, axis.from))
            .chain(self.neighbours_of_same_token(origin, token, axis.to))
            .collect();
        (positions.len() >= self.info.connect_n).then(|| WinningCombination {
            token: token.clone(),
            origin,
            positions,
            axis,
        })
    }
}
