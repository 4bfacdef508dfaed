//! Spatial indexing for broad-phase collision detection

pub mod grid;

pub use grid::{GridEntry, SpatialHashGrid, TargetKind};
