pub use serde_with;

pub mod coordinate;
pub mod draw_mode;
pub mod elevation;
pub mod geometry;
pub mod marker;
pub mod pace;
pub mod run;
pub mod summary;
pub mod track;

pub use coordinate::{Coordinate, Path};

/// A representative value, used for example-filled JSON schemas.
pub trait ExampleData {
    fn example_data() -> Self;
}
