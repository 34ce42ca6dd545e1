use alloc::collections::VecDeque;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Immutable board snapshot, row-major and indexed by `(row, col)`.
///
/// Moves never mutate a grid in place, [`Grid::left_click`] hands back a new
/// one, so earlier snapshots stay valid for whoever still holds them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    cells: Array2<Cell>,
}

/// Creates a freshly populated board of `rows × cols` with `mine_count` mines.
///
/// Inputs are clamped the same way [`GameConfig::new`] clamps them.
pub fn start_game(rows: Coord, cols: Coord, mine_count: CellCount, seed: u64) -> Grid {
    Grid::generate(
        GameConfig::new((rows, cols), mine_count),
        RandomLayoutGenerator::new(seed),
    )
}

/// Discovers `(row, col)`, `Ok(None)` means a mine went off.
pub fn left_click(grid: &Grid, row: Coord, col: Coord) -> Result<Option<Grid>> {
    grid.left_click((row, col))
}

impl Grid {
    pub fn generate(config: GameConfig, generator: impl LayoutGenerator) -> Self {
        Self::from_layout(&generator.generate(config))
    }

    pub fn from_layout(layout: &MineLayout) -> Self {
        let (rows, cols) = layout.size();
        let cells = Array2::from_shape_fn((usize::from(rows), usize::from(cols)), |(row, col)| {
            // indices come from a shape that fits in Coord
            let coords = (row as Coord, col as Coord);
            Cell::new(layout.contains_mine(coords), layout.adjacent_mine_count(coords))
        });
        Self { cells }
    }

    pub fn size(&self) -> Coord2 {
        shape_of(&self.cells)
    }

    pub fn total_cells(&self) -> CellCount {
        self.cells.len().try_into().unwrap_or(CellCount::MAX)
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.cells[coords.to_nd_index()]
    }

    pub fn mine_count(&self) -> CellCount {
        self.count_cells(|cell| cell.has_mine)
    }

    pub fn discovered_count(&self) -> CellCount {
        self.count_cells(|cell| cell.discovered)
    }

    /// Whether every cell without a mine has been discovered.
    pub fn is_cleared(&self) -> bool {
        !self.cells.iter().any(|cell| cell.is_pending_safe())
    }

    /// All cells with their coordinates, in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, col), &cell)| ((row as Coord, col as Coord), cell))
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (rows, cols) = self.size();
        if coords.0 < rows && coords.1 < cols {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    /// Produces the grid that results from a primary click on `coords`.
    ///
    /// Returns `Ok(None)` when the cell holds a mine. Clicking a discovered
    /// cell yields an unchanged copy. Discovering a cell with no adjacent mines
    /// opens the whole connected empty region together with its numbered
    /// border.
    pub fn left_click(&self, coords: Coord2) -> Result<Option<Grid>> {
        let coords = self.validate_coords(coords)?;
        let cell = self.cell_at(coords);

        if cell.discovered {
            log::debug!("Click on discovered cell at {:?}, no change", coords);
            return Ok(Some(self.clone()));
        }

        if cell.has_mine {
            log::debug!("Mine hit at {:?}", coords);
            return Ok(None);
        }

        let mut next = self.clone();
        let opened = next.discover_from(coords);
        log::debug!("Open cell at {:?}, discovered {} cells", coords, opened);
        Ok(Some(next))
    }

    fn discover_from(&mut self, start: Coord2) -> CellCount {
        let mut opened = 0;
        let mut to_visit = VecDeque::from([start]);

        while let Some(coords) = to_visit.pop_front() {
            let cell = &mut self.cells[coords.to_nd_index()];
            if cell.discovered || cell.has_mine {
                continue;
            }
            *cell = cell.discover();
            opened += 1;

            if cell.adjacent_mines == 0 {
                log::trace!("Flood fill continues from {:?}", coords);
                to_visit.extend(
                    self.cells
                        .iter_neighbors(coords)
                        .filter(|&pos| !self.cells[pos.to_nd_index()].discovered),
                );
            }
        }

        opened
    }

    fn count_cells(&self, pred: impl Fn(&Cell) -> bool) -> CellCount {
        self.cells
            .iter()
            .filter(|cell| pred(cell))
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(size: Coord2, mines: &[Coord2]) -> Grid {
        Grid::from_layout(&MineLayout::from_mine_coords(size, mines).unwrap())
    }

    #[test]
    fn start_game_builds_undiscovered_board() {
        let grid = start_game(5, 7, 8, 3);

        assert_eq!(grid.size(), (5, 7));
        assert_eq!(grid.mine_count(), 8);
        assert_eq!(grid.discovered_count(), 0);
        assert!(!grid.is_cleared());
    }

    #[test]
    fn start_game_clamps_inputs() {
        let grid = start_game(1, 1, 50, 3);

        assert_eq!(grid.size(), (3, 3));
        assert_eq!(grid.mine_count(), 8);
    }

    #[test]
    fn adjacency_matches_brute_force() {
        let grid = start_game(12, 9, 30, 99);

        for ((row, col), cell) in grid.iter() {
            let mut expected = 0;
            for r in row.saturating_sub(1)..=(row + 1).min(11) {
                for c in col.saturating_sub(1)..=(col + 1).min(8) {
                    if (r, c) != (row, col) && grid.cell_at((r, c)).has_mine {
                        expected += 1;
                    }
                }
            }
            assert_eq!(cell.adjacent_mines, expected, "at {:?}", (row, col));
        }
    }

    #[test]
    fn clicking_mine_returns_none() {
        let grid = grid((3, 3), &[(1, 1)]);

        assert_eq!(grid.left_click((1, 1)), Ok(None));
    }

    #[test]
    fn clicking_numbered_cell_opens_only_it() {
        let grid = grid((3, 3), &[(1, 1)]);

        let next = grid.left_click((0, 0)).unwrap().unwrap();

        assert_eq!(next.discovered_count(), 1);
        assert!(next.cell_at((0, 0)).discovered);
        assert_eq!(next.cell_at((0, 0)).adjacent_mines, 1);
    }

    #[test]
    fn zero_cell_cascades_to_numbered_border() {
        // mine in the corner, everything else is reachable from the far corner
        let grid = grid((4, 4), &[(0, 0)]);

        let next = grid.left_click((3, 3)).unwrap().unwrap();

        assert!(!next.cell_at((0, 0)).discovered);
        assert_eq!(next.discovered_count(), 15);
        assert!(next.is_cleared());
    }

    #[test]
    fn cascade_stops_at_wall_of_numbers() {
        // a column of mines splits the board in two
        let grid = grid((3, 5), &[(0, 2), (1, 2), (2, 2)]);

        let next = grid.left_click((1, 0)).unwrap().unwrap();

        for row in 0..3 {
            assert!(next.cell_at((row, 0)).discovered);
            assert!(next.cell_at((row, 1)).discovered);
            assert!(!next.cell_at((row, 3)).discovered);
            assert!(!next.cell_at((row, 4)).discovered);
        }
        assert!(!next.is_cleared());
    }

    #[test]
    fn click_leaves_input_snapshot_untouched() {
        let grid = grid((3, 3), &[(2, 2)]);
        let before = grid.clone();

        let _ = grid.left_click((0, 0)).unwrap();

        assert_eq!(grid, before);
    }

    #[test]
    fn clicking_discovered_cell_changes_nothing() {
        let grid = grid((3, 3), &[(2, 2)]);
        let once = grid.left_click((0, 2)).unwrap().unwrap();

        let twice = once.left_click((0, 2)).unwrap().unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn out_of_range_click_is_an_error() {
        let grid = grid((3, 3), &[(2, 2)]);

        assert_eq!(left_click(&grid, 3, 0), Err(GameError::InvalidCoords));
        assert_eq!(left_click(&grid, 0, 9), Err(GameError::InvalidCoords));
    }
}
