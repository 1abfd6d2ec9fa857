//! Rectilinear full Steiner tree (FST) generation.
//!
//! Purpose
//! - Enumerate a small set of candidate FSTs whose union contains every full
//!   component of some rectilinear Steiner minimal tree over the terminals.
//! - Give each candidate explicit Steiner points and axis-aligned edges so the
//!   chosen components can be concatenated into the final tree.
//!
//! Why this design (short)
//! - Hwang's theorem restricts rectilinear FSTs to a backbone with alternating
//!   legs (plus the 4-terminal cross), so a depth-first growth from every root
//!   in every direction reaches all of them.
//! - The search is pruned by bounds that are cheap per step: forward-cone
//!   bounds, empty rectangles and bottleneck Steiner distances from the MST.
//!
//! Assumptions and conventions
//! - Coordinates are compared exactly; this layer applies no tolerance.
//! - Two-terminal FSTs are exactly the MST edges.
//! - Candidates over the same terminal set are deduplicated, keeping the
//!   shorter tree; generation order is otherwise preserved.

mod build;
mod rfst;
mod types;

pub use rfst::{rfst, rfst_with_stats, RfstStats};
pub use types::{Endpoint, Fst, FstKind, FstSet};
