use core::time::Duration;

use crate::*;

/// How long the board stays on screen after a mine goes off, before the result panel shows.
pub const DEFEAT_WATCH_BOARD_TIME: Duration = Duration::from_secs(2);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Victory,
    Defeat,
}

impl Outcome {
    pub const fn message(self) -> &'static str {
        match self {
            Self::Victory => "You Win!",
            Self::Defeat => "You Lose :(",
        }
    }
}

/// Valid transitions:
/// - Setup -> Playing
/// - Playing -> Finished(Victory)
/// - Playing -> Detonated -> Finished(Defeat)
/// - any -> Playing, on restart
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// Configuration panel up, no board yet
    Setup,
    Playing,
    /// Mines are shown, the result panel is pending
    Detonated { at: Coord2 },
    /// Result panel up over the last board
    Finished(Outcome),
}

impl SessionPhase {
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Whether the configuration and result panel is visible.
    pub const fn shows_panel(self) -> bool {
        matches!(self, Self::Setup | Self::Finished(_))
    }
}

/// What a host has to do after feeding an input to the session.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// Nothing changed, no redraw needed.
    Ignored,
    /// The board changed and should be redrawn.
    Updated,
    /// Game won, the result panel is already up.
    Won,
    /// A mine went off. Call [`Session::show_result`] with `generation` once
    /// `delay` has elapsed.
    Detonated { generation: u32, delay: Duration },
}

impl SessionEvent {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// Orchestrates one player's games: configuration, start and reset, click
/// routing and the end-of-game sequence.
#[derive(Clone, Debug)]
pub struct Session {
    config: GameConfig,
    grid: Option<Grid>,
    board: Option<BoardView>,
    phase: SessionPhase,
    generation: u32,
}

impl Session {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config: config.normalized(),
            grid: None,
            board: None,
            phase: SessionPhase::Setup,
            generation: 0,
        }
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    pub fn board(&self) -> Option<&BoardView> {
        self.board.as_ref()
    }

    /// Text for the result panel, once a game has ended and the panel is up.
    pub fn result_text(&self) -> Option<&'static str> {
        match self.phase {
            SessionPhase::Finished(outcome) => Some(outcome.message()),
            _ => None,
        }
    }

    /// Mines minus flags, goes negative when the player over-flags.
    pub fn mines_left(&self) -> i32 {
        let mines = self
            .grid
            .as_ref()
            .map_or(self.config.mines, Grid::mine_count);
        let flags = self.board.as_ref().map_or(0, BoardView::flag_count);
        i32::from(mines) - i32::from(flags)
    }

    pub fn set_rows_text(&mut self, text: &str) -> Coord {
        self.config.set_rows_text(text)
    }

    pub fn set_cols_text(&mut self, text: &str) -> Coord {
        self.config.set_cols_text(text)
    }

    pub fn set_mines_text(&mut self, text: &str) -> CellCount {
        self.config.set_mines_text(text)
    }

    pub fn set_config(&mut self, config: GameConfig) {
        self.config = config.normalized();
    }

    /// Starts a game with a random layout from `seed`.
    pub fn start(&mut self, seed: u64) {
        self.start_with(RandomLayoutGenerator::new(seed));
    }

    /// Starts a game, replacing whatever was going on, including a pending result.
    pub fn start_with(&mut self, generator: impl LayoutGenerator) {
        self.config = self.config.normalized();
        let grid = Grid::generate(self.config, generator);
        let mut board = BoardView::new(grid.size());
        if let Err(err) = board.draw(&grid) {
            log::error!("Fresh board does not fit its grid: {}", err);
        }

        self.generation = self.generation.wrapping_add(1);
        log::info!(
            "Game {} started: {}x{} with {} mines",
            self.generation,
            self.config.rows(),
            self.config.cols(),
            grid.mine_count()
        );

        self.grid = Some(grid);
        self.board = Some(board);
        self.phase = SessionPhase::Playing;
    }

    /// Primary click routed through the cell view, flagged or discovered cells swallow it.
    pub fn primary_click(&mut self, coords: Coord2) -> Result<SessionEvent> {
        if !self.phase.is_playing() {
            return Ok(SessionEvent::Ignored);
        }
        let Some(board) = self.board.as_ref() else {
            return Ok(SessionEvent::Ignored);
        };

        match board.primary_click(coords)? {
            Some(coords) => self.on_cell_click(coords),
            None => Ok(SessionEvent::Ignored),
        }
    }

    pub fn secondary_click(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        if !self.phase.is_playing() {
            return Ok(MarkOutcome::NoChange);
        }
        match self.board.as_mut() {
            Some(board) => {
                let outcome = board.secondary_click(coords)?;
                log::debug!("Mark {:?}: {:?}", coords, outcome);
                Ok(outcome)
            }
            None => Ok(MarkOutcome::NoChange),
        }
    }

    /// Forwards a click to the board engine and plays out its consequence.
    pub fn on_cell_click(&mut self, coords: Coord2) -> Result<SessionEvent> {
        if !self.phase.is_playing() {
            return Ok(SessionEvent::Ignored);
        }
        let (Some(grid), Some(board)) = (self.grid.as_ref(), self.board.as_mut()) else {
            return Ok(SessionEvent::Ignored);
        };

        let Some(next) = grid.left_click(coords)? else {
            log::debug!("Game {} lost at {:?}", self.generation, coords);
            board.show_mines(coords);
            self.phase = SessionPhase::Detonated { at: coords };
            return Ok(SessionEvent::Detonated {
                generation: self.generation,
                delay: DEFEAT_WATCH_BOARD_TIME,
            });
        };

        board.draw(&next)?;
        let won = next.is_cleared();
        self.grid = Some(next);

        if won {
            log::debug!("Game {} won", self.generation);
            self.phase = SessionPhase::Finished(Outcome::Victory);
            Ok(SessionEvent::Won)
        } else {
            Ok(SessionEvent::Updated)
        }
    }

    /// Delayed continuation after a defeat, stale generations are dropped.
    pub fn show_result(&mut self, generation: u32) -> bool {
        match self.phase {
            SessionPhase::Detonated { .. } if generation == self.generation => {
                self.phase = SessionPhase::Finished(Outcome::Defeat);
                true
            }
            _ => {
                log::trace!(
                    "Dropping result for game {}, current is {} in {:?}",
                    generation,
                    self.generation,
                    self.phase
                );
                false
            }
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}
