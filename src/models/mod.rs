pub mod grid;
pub mod region;

pub use grid::{BinaryGrid, FloatGrid, GrayGrid, LabelGrid, PixelGrid};
pub use region::{BoundingBox, RegionStats};
