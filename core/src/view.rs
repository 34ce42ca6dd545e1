use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Background {
    Undiscovered,
    Discovered,
    /// The mine that ended the game.
    Detonated,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Icon {
    Flag,
    Mine,
}

/// Everything a renderer needs to draw one cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellAppearance {
    pub background: Background,
    pub icon: Option<Icon>,
    pub number: Option<u8>,
}

impl CellAppearance {
    /// Index into an eight-entry palette for the number colour.
    pub fn number_slot(&self) -> Option<usize> {
        self.number.map(|n| usize::from(n.clamp(1, 8)) - 1)
    }
}

/// Presentation state of one cell: the last snapshot from the board engine
/// plus the player's flag, which the engine never sees.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellView {
    coords: Coord2,
    state: Cell,
    flagged: bool,
    exposed_mine: Option<bool>,
}

impl CellView {
    pub fn new(coords: Coord2) -> Self {
        Self {
            coords,
            state: Cell::default(),
            flagged: false,
            exposed_mine: None,
        }
    }

    pub fn coords(&self) -> Coord2 {
        self.coords
    }

    pub fn state(&self) -> Cell {
        self.state
    }

    pub fn is_flagged(&self) -> bool {
        self.flagged
    }

    /// Click intent for the board engine, only hidden unflagged cells produce one.
    pub fn primary_click(&self) -> Option<Coord2> {
        if self.state.discovered || self.flagged || self.exposed_mine.is_some() {
            None
        } else {
            Some(self.coords)
        }
    }

    pub fn secondary_click(&mut self) -> MarkOutcome {
        if self.state.discovered || self.exposed_mine.is_some() {
            return MarkOutcome::NoChange;
        }

        self.flagged = !self.flagged;
        if self.flagged {
            MarkOutcome::Flagged
        } else {
            MarkOutcome::Unflagged
        }
    }

    /// Takes a new snapshot, dropping the flag once the cell is discovered.
    pub fn set_state(&mut self, cell: Cell) -> MarkOutcome {
        self.state = cell;
        self.exposed_mine = None;
        if cell.discovered && self.flagged {
            self.flagged = false;
            MarkOutcome::Unflagged
        } else {
            MarkOutcome::NoChange
        }
    }

    /// Switches a mined cell to the end-of-game look, `detonated` gets highlighted.
    pub fn show_mine(&mut self, detonated: Coord2) {
        if !self.state.has_mine {
            return;
        }
        self.exposed_mine = Some(self.coords == detonated);
    }

    pub fn appearance(&self) -> CellAppearance {
        if let Some(detonated) = self.exposed_mine {
            return CellAppearance {
                background: if detonated {
                    Background::Detonated
                } else {
                    Background::Undiscovered
                },
                icon: Some(Icon::Mine),
                number: None,
            };
        }

        if !self.state.discovered {
            return CellAppearance {
                background: Background::Undiscovered,
                icon: self.flagged.then_some(Icon::Flag),
                number: None,
            };
        }

        CellAppearance {
            background: Background::Discovered,
            icon: None,
            number: (self.state.adjacent_mines > 0).then_some(self.state.adjacent_mines),
        }
    }
}

/// Where cells go on screen, in the units of the hosting scene.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoardLayout {
    pub size: Coord2,
    pub cell_side: f32,
}

impl BoardLayout {
    /// Fits `size` into a viewport `grid_height` tall, never growing a cell past one unit.
    pub fn fit(size: Coord2, grid_height: f32) -> Self {
        let cell_side = f32::min(1.0, grid_height / f32::from(size.0));
        Self { size, cell_side }
    }

    pub fn total_width(&self) -> f32 {
        self.cell_side * f32::from(self.size.1)
    }

    pub fn total_height(&self) -> f32 {
        self.cell_side * f32::from(self.size.0)
    }

    /// Position of a cell's corner, `(x, y)`, with the board centered on the origin.
    pub fn position(&self, (row, col): Coord2) -> (f32, f32) {
        (
            f32::from(col) * self.cell_side - self.total_width() / 2.0,
            f32::from(row) * self.cell_side - self.total_height() / 2.0,
        )
    }
}

/// One [`CellView`] per grid cell plus the flag counter they report to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardView {
    cells: Array2<CellView>,
    flag_count: CellCount,
}

impl BoardView {
    pub fn new(size: Coord2) -> Self {
        let cells = Array2::from_shape_fn(size.to_nd_index(), |(row, col)| {
            CellView::new((row as Coord, col as Coord))
        });
        Self {
            cells,
            flag_count: 0,
        }
    }

    pub fn size(&self) -> Coord2 {
        shape_of(&self.cells)
    }

    pub fn cell(&self, coords: Coord2) -> Option<&CellView> {
        self.cells.get(coords.to_nd_index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &CellView> + '_ {
        self.cells.iter()
    }

    /// Rows of views, top to bottom, for renderers that build tables.
    pub fn rows(&self) -> impl Iterator<Item = impl Iterator<Item = &CellView> + '_> + '_ {
        self.cells.outer_iter().map(|row| row.into_iter())
    }

    pub fn flag_count(&self) -> CellCount {
        self.flag_count
    }

    pub fn layout(&self, grid_height: f32) -> BoardLayout {
        BoardLayout::fit(self.size(), grid_height)
    }

    /// Pushes a new snapshot into every cell view.
    pub fn draw(&mut self, grid: &Grid) -> Result<()> {
        if grid.size() != self.size() {
            return Err(GameError::InvalidBoardShape);
        }

        for (coords, cell) in grid.iter() {
            let outcome = self.cells[coords.to_nd_index()].set_state(cell);
            self.count_mark(outcome);
        }
        Ok(())
    }

    pub fn show_mines(&mut self, detonated: Coord2) {
        for view in self.cells.iter_mut() {
            view.show_mine(detonated);
        }
    }

    pub fn primary_click(&self, coords: Coord2) -> Result<Option<Coord2>> {
        self.cell(coords)
            .map(CellView::primary_click)
            .ok_or(GameError::InvalidCoords)
    }

    pub fn secondary_click(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let view = self
            .cells
            .get_mut(coords.to_nd_index())
            .ok_or(GameError::InvalidCoords)?;
        let outcome = view.secondary_click();
        self.count_mark(outcome);
        Ok(outcome)
    }

    fn count_mark(&mut self, outcome: MarkOutcome) {
        match outcome {
            MarkOutcome::NoChange => {}
            MarkOutcome::Flagged => self.flag_count = self.flag_count.saturating_add(1),
            MarkOutcome::Unflagged => self.flag_count = self.flag_count.saturating_sub(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hidden(has_mine: bool, adjacent_mines: u8) -> Cell {
        Cell::new(has_mine, adjacent_mines)
    }

    fn view_with(cell: Cell) -> CellView {
        let mut view = CellView::new((1, 2));
        view.set_state(cell);
        view
    }

    #[test]
    fn hidden_cell_renders_blank() {
        let view = view_with(hidden(true, 3));

        assert_eq!(
            view.appearance(),
            CellAppearance {
                background: Background::Undiscovered,
                icon: None,
                number: None,
            }
        );
    }

    #[test]
    fn flagged_hidden_cell_renders_flag() {
        let mut view = view_with(hidden(false, 2));

        assert_eq!(view.secondary_click(), MarkOutcome::Flagged);

        assert_eq!(view.appearance().icon, Some(Icon::Flag));
        assert_eq!(view.appearance().number, None);
    }

    #[test]
    fn discovered_zero_has_no_number() {
        let view = view_with(hidden(false, 0).discover());

        assert_eq!(view.appearance().background, Background::Discovered);
        assert_eq!(view.appearance().number, None);
        assert_eq!(view.appearance().number_slot(), None);
    }

    #[test]
    fn discovered_number_uses_palette_slot() {
        let view = view_with(hidden(false, 3).discover());

        assert_eq!(view.appearance().number, Some(3));
        assert_eq!(view.appearance().number_slot(), Some(2));
    }

    #[test]
    fn primary_click_only_from_hidden_unflagged() {
        let mut view = view_with(hidden(false, 1));
        assert_eq!(view.primary_click(), Some((1, 2)));

        view.secondary_click();
        assert_eq!(view.primary_click(), None);

        let view = view_with(hidden(false, 1).discover());
        assert_eq!(view.primary_click(), None);
    }

    #[test]
    fn secondary_click_toggles_and_ignores_discovered() {
        let mut view = view_with(hidden(false, 1));
        assert_eq!(view.secondary_click(), MarkOutcome::Flagged);
        assert_eq!(view.secondary_click(), MarkOutcome::Unflagged);
        assert!(!view.is_flagged());

        let mut view = view_with(hidden(false, 1).discover());
        assert_eq!(view.secondary_click(), MarkOutcome::NoChange);
    }

    #[test]
    fn discovery_clears_flag() {
        let mut view = view_with(hidden(false, 0));
        view.secondary_click();

        assert_eq!(view.set_state(hidden(false, 0).discover()), MarkOutcome::Unflagged);
        assert!(!view.is_flagged());
    }

    #[test]
    fn show_mine_highlights_detonated_only() {
        let mut boom = view_with(hidden(true, 0));
        let mut other = CellView::new((0, 0));
        other.set_state(hidden(true, 1));
        let mut safe = CellView::new((0, 1));
        safe.set_state(hidden(false, 2));

        boom.show_mine((1, 2));
        other.show_mine((1, 2));
        safe.show_mine((1, 2));

        assert_eq!(boom.appearance().background, Background::Detonated);
        assert_eq!(boom.appearance().icon, Some(Icon::Mine));
        assert_eq!(other.appearance().background, Background::Undiscovered);
        assert_eq!(other.appearance().icon, Some(Icon::Mine));
        assert_eq!(safe.appearance().icon, None);
    }

    #[test]
    fn set_state_clears_mine_reveal() {
        let mut view = view_with(hidden(true, 0));
        view.show_mine((1, 2));
        assert_eq!(view.primary_click(), None);

        view.set_state(hidden(true, 0));

        assert_eq!(view.appearance().background, Background::Undiscovered);
        assert_eq!(view.appearance().icon, None);
        assert_eq!(view.primary_click(), Some((1, 2)));
    }

    #[test]
    fn board_counts_flags() {
        let grid = Grid::from_layout(&MineLayout::from_mine_coords((3, 3), &[(2, 2)]).unwrap());
        let mut board = BoardView::new(grid.size());
        board.draw(&grid).unwrap();

        assert_eq!(board.secondary_click((0, 0)), Ok(MarkOutcome::Flagged));
        assert_eq!(board.secondary_click((2, 2)), Ok(MarkOutcome::Flagged));
        assert_eq!(board.flag_count(), 2);

        // the cascade from (0, 2) discovers (0, 0) and drops its flag
        let next = grid.left_click((0, 2)).unwrap().unwrap();
        board.draw(&next).unwrap();
        assert_eq!(board.flag_count(), 1);
        assert!(board.cell((2, 2)).unwrap().is_flagged());
    }

    #[test]
    fn board_rejects_mismatched_grid() {
        let grid = Grid::from_layout(&MineLayout::from_mine_coords((3, 4), &[]).unwrap());
        let mut board = BoardView::new((4, 3));

        assert_eq!(board.draw(&grid), Err(GameError::InvalidBoardShape));
        assert_eq!(board.primary_click((5, 0)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn layout_centers_board() {
        let layout = BoardLayout::fit((4, 6), 8.0);
        assert_eq!(layout.cell_side, 1.0);
        assert_eq!(layout.position((0, 0)), (-3.0, -2.0));
        assert_eq!(layout.position((3, 5)), (2.0, 1.0));

        let layout = BoardLayout::fit((10, 10), 5.0);
        assert_eq!(layout.cell_side, 0.5);
        assert_eq!(layout.total_width(), 5.0);
    }
}
