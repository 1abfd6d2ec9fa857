//! Curated surface for callers that want more than `rsmt`.
//!
//! Re-exports the building blocks of the pipeline so experiments can run a
//! stage on its own (generate FSTs, solve with a custom LP backend, assemble).

pub use crate::fst::{rfst, rfst_with_stats, Fst, FstKind, FstSet, RfstStats};
pub use crate::ip::{
    branch_and_cut, BbOutcome, ConstraintPool, LpModel, LpOutcome, LpRow, LpSolver, MicroLp,
    RowSense,
};
pub use crate::mst::{mst_length, rect_mst, Bsd};
pub use crate::solution::build_solution;
pub use crate::{solve_report, SolveReport};
