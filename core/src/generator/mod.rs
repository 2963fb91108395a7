use crate::*;
pub use preset::*;
pub use random::*;

mod preset;
mod random;

/// Produces the finished layout once the first reveal location is known.
pub trait LayoutGenerator {
    fn generate(&self, config: &GameConfig, first_click: Coord2) -> Result<Grid>;
}
