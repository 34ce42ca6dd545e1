use serde::{Deserialize, Serialize};

use crate::*;

/// Board shape and mine count for one game.
///
/// [`GameConfig::new`] and the setters clamp their input: both sides are at
/// least [`GameConfig::MIN_SIDE`], and the mine count stays within
/// `1..=cells - 1` so that at least one safe cell always exists.
/// [`GameConfig::new_unchecked`] and deserialization take values as given,
/// [`GameConfig::normalized`] brings those back in bounds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// `(rows, cols)`
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const MIN_SIDE: Coord = 3;
    pub const DEFAULT_SIDE: Coord = 6;
    pub const DEFAULT_MINES: CellCount = 6;

    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    pub fn new((rows, cols): Coord2, mines: CellCount) -> Self {
        let mut config = Self::new_unchecked(
            (Self::clamp_side(rows.into()), Self::clamp_side(cols.into())),
            mines,
        );
        config.mines = config.clamp_mines(mines.into());
        config
    }

    pub const fn rows(&self) -> Coord {
        self.size.0
    }

    pub const fn cols(&self) -> Coord {
        self.size.1
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    /// Largest mine count that still leaves one safe cell.
    pub const fn max_mines(&self) -> CellCount {
        let total = self.total_cells();
        if total > 1 { total - 1 } else { 1 }
    }

    pub fn set_rows(&mut self, rows: i64) -> Coord {
        self.size.0 = Self::clamp_side(rows);
        self.size.0
    }

    pub fn set_cols(&mut self, cols: i64) -> Coord {
        self.size.1 = Self::clamp_side(cols);
        self.size.1
    }

    pub fn set_mines(&mut self, mines: i64) -> CellCount {
        self.mines = self.clamp_mines(mines);
        self.mines
    }

    /// Parses a row count typed by the player, falling back to the default on garbage.
    pub fn set_rows_text(&mut self, text: &str) -> Coord {
        self.set_rows(parse_or(text, Self::DEFAULT_SIDE.into()))
    }

    pub fn set_cols_text(&mut self, text: &str) -> Coord {
        self.set_cols(parse_or(text, Self::DEFAULT_SIDE.into()))
    }

    pub fn set_mines_text(&mut self, text: &str) -> CellCount {
        self.set_mines(parse_or(text, Self::DEFAULT_MINES.into()))
    }

    /// Re-applies every bound, sides first so the mine bound sees the final size.
    pub fn normalized(self) -> Self {
        Self::new(self.size, self.mines)
    }

    fn clamp_side(value: i64) -> Coord {
        let clamped = value.clamp(Self::MIN_SIDE.into(), Coord::MAX.into());
        Coord::try_from(clamped).unwrap_or(Coord::MAX)
    }

    fn clamp_mines(&self, value: i64) -> CellCount {
        let clamped = value.clamp(1, self.max_mines().into());
        CellCount::try_from(clamped).unwrap_or(CellCount::MAX)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(
            (Self::DEFAULT_SIDE, Self::DEFAULT_SIDE),
            Self::DEFAULT_MINES,
        )
    }
}

fn parse_or(text: &str, default: i64) -> i64 {
    text.trim().parse().unwrap_or(default)
}
