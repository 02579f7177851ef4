use serde::{Deserialize, Serialize};

pub const DEFAULT_CONNECT_N: usize = 4;

/// The geometry of a grid and the number of tokens that have to be
/// connected to win.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridInfo {
    pub columns: usize,
    pub rows: usize,
    #[serde(default = "default_connect_n")]
    pub connect_n: usize,
}

fn default_connect_n() -> usize {
    DEFAULT_CONNECT_N
}

impl GridInfo {
    /// The classic board.
    pub const SEVEN_COLUMNS_SIX_ROWS: GridInfo = GridInfo::new(7, 6);

    pub const fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            connect_n: DEFAULT_CONNECT_N,
        }
    }

    pub const fn with_connect_n(self, connect_n: usize) -> Self {
        Self { connect_n, ..self }
    }

    pub fn cells(&self) -> usize {
        self.columns * self.rows
    }
}

impl Default for GridInfo {
    fn default() -> Self {
        Self::SEVEN_COLUMNS_SIX_ROWS
    }
}

impl std::fmt::Display for GridInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{} (connect {})",
            self.columns, self.rows, self.connect_n
        )
    }
}
