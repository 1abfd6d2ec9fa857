//! Rectilinear geometry primitives shared by the FST generator.
//!
//! Purpose
//! - Distances and their decomposition along the four canonical directions.
//! - Per-terminal successor chains in sorted order for each direction.
//! - The empty-rectangle table used to prune staircase candidates.
//!
//! Assumptions and conventions
//! - Coordinates are finite and compared exactly. The LP layer uses a
//!   tolerance; this layer never does.
//! - Terminals are identified by their 0-based index in the input slice.

mod successors;
mod types;

pub use successors::{EmptyRects, Successors};
pub use types::{corner, dist_across, dist_along, offset_left, rect_dist, Dir, Point};

#[cfg(test)]
mod tests;
