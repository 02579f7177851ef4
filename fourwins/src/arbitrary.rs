use quickcheck::{Arbitrary, Gen};

use crate::{Grid, GridInfo, Token};

const TOKENS: [&str; 2] = ["X", "O"];

fn small_grid_info(g: &mut Gen) -> GridInfo {
    let columns = 1 + usize::arbitrary(g) % 7;
    let rows = 1 + usize::arbitrary(g) % 6;
    let connect_n = 2 + usize::arbitrary(g) % 4;
    GridInfo::new(columns, rows).with_connect_n(connect_n)
}

/// A small grid and a sequence of in-bounds moves by two alternating players.
#[derive(Clone, Debug)]
pub struct GridSetup {
    pub info: GridInfo,
    pub moves: Vec<i32>,
}

impl GridSetup {
    pub fn play(&self) -> Grid {
        self.moves
            .iter()
            .enumerate()
            .fold(Grid::new(self.info), |grid, (idx, &column)| {
                grid.insert(column, &Token::new(TOKENS[idx % 2]))
            })
    }
}

impl Arbitrary for GridSetup {
    fn arbitrary(g: &mut Gen) -> Self {
        let info = small_grid_info(g);
        let moves = Vec::<u8>::arbitrary(g)
            .into_iter()
            .map(|column| (column as usize % info.columns) as i32)
            .collect();
        GridSetup { info, moves }
    }
}

/// A grid where nobody can ever win, with some tokens scattered over it and
/// then one column filled to the top.
#[derive(Clone, Debug)]
pub struct ColumnFillSetup {
    pub info: GridInfo,
    pub scattered: Vec<i32>,
    pub column: usize,
}

impl ColumnFillSetup {
    pub fn play(&self) -> Grid {
        let fill = std::iter::repeat(self.column as i32).take(self.info.rows);
        self.scattered
            .iter()
            .copied()
            .chain(fill)
            .enumerate()
            .fold(Grid::new(self.info), |grid, (idx, column)| {
                grid.insert(column, &Token::new(TOKENS[idx % 2]))
            })
    }
}

impl Arbitrary for ColumnFillSetup {
    fn arbitrary(g: &mut Gen) -> Self {
        let info = small_grid_info(g);
        // Longer than any line on the grid
        let info = info.with_connect_n(info.columns.max(info.rows) + 1);
        let column = usize::arbitrary(g) % info.columns;
        // Tokens in the other columns, never more than fit
        let mut fill = vec![0; info.columns];
        let mut scattered = Vec::new();
        for c in Vec::<u8>::arbitrary(g) {
            let c = c as usize % info.columns;
            if c != column && fill[c] < info.rows {
                fill[c] += 1;
                scattered.push(c as i32);
            }
        }
        ColumnFillSetup {
            info,
            scattered,
            column,
        }
    }
}
