use super::*;

/// Uniformly random mine placement, reproducible from a seed.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomLayoutGenerator {
    seed: u64,
}

impl RandomLayoutGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl LayoutGenerator for RandomLayoutGenerator {
    fn generate(self, config: GameConfig) -> MineLayout {
        use rand::prelude::*;

        let total_cells = config.total_cells();

        // optimize for full boards
        if config.mines >= total_cells {
            if config.mines > total_cells {
                log::warn!(
                    "Minefield already full, generated anyway, requested {} but only fits {}",
                    config.mines,
                    total_cells
                );
            }
            return MineLayout::from_mine_mask(Array2::from_elem(
                config.size.to_nd_index(),
                true,
            ));
        }

        let mut mines: Array2<bool> = Array2::default(config.size.to_nd_index());
        let mut free_cells = total_cells;
        let mut mines_placed = 0;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        for cell in mines.iter_mut() {
            if mines_placed == config.mines {
                break;
            }
            // selection sampling: keep each cell with probability remaining / free
            let remaining = config.mines - mines_placed;
            if rng.random_range(0..free_cells) < remaining {
                *cell = true;
                mines_placed += 1;
            }
            free_cells -= 1;
        }

        let layout = MineLayout::from_mine_mask(mines);

        // double check mine count
        if layout.mine_count() != config.mines {
            log::warn!(
                "Generated minefield count mismatch, actual: {}, requested: {}",
                layout.mine_count(),
                config.mines
            );
        }
        log::debug!(
            "Generated {}x{} layout with {} mines from seed {}",
            config.rows(),
            config.cols(),
            layout.mine_count(),
            self.seed
        );
        layout
    }
}
