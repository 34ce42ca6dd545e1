use serde::{Deserialize, Serialize};

/// Snapshot of one board position as produced by the board engine.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub has_mine: bool,
    pub discovered: bool,
    pub adjacent_mines: u8,
}

impl Cell {
    pub const fn new(has_mine: bool, adjacent_mines: u8) -> Self {
        Self {
            has_mine,
            discovered: false,
            adjacent_mines,
        }
    }

    pub const fn discover(self) -> Self {
        Self {
            discovered: true,
            ..self
        }
    }

    /// Undiscovered cell without a mine, the ones that must be opened to win.
    pub const fn is_pending_safe(self) -> bool {
        !self.has_mine && !self.discovered
    }
}
