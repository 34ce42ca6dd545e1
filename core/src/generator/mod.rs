use crate::*;
pub use random::*;

mod random;

pub trait LayoutGenerator {
    fn generate(self, config: GameConfig) -> MineLayout;
}

/// Uses a layout decided up front, ignoring the requested config.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedLayoutGenerator(pub MineLayout);

impl LayoutGenerator for FixedLayoutGenerator {
    fn generate(self, config: GameConfig) -> MineLayout {
        if self.0.game_config() != config {
            log::warn!(
                "Fixed layout {:?} does not match requested config {:?}",
                self.0.game_config(),
                config
            );
        }
        self.0
    }
}
