//! Scene layers and entity geometry

pub mod layer;
pub mod geometry;

pub use layer::{CoordinateSpace, Layer, LayerLookup, LayerManager};
pub use geometry::entity_bounds;
