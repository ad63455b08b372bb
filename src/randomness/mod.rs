pub mod roller;
pub mod technique;

pub use roller::{DisplacedSeeds, ReseedOptions, Roller, with_default_roller};
pub use technique::Technique;
