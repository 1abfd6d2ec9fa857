//! Integer program over FST selections.
//!
//! Purpose
//! - Choose a subset of candidate FSTs forming a spanning tree of the
//!   terminals with minimum total length.
//!
//! Why this design (short)
//! - The LP relaxation keeps the spanning equality and cut-set rows active
//!   from the start; 2-secant and subtour rows sit in a pool and are
//!   activated only when violated, which keeps every LP small.
//! - The LP backend sits behind `LpSolver`, so tests can swap it.
//! - Heuristic upper bounds come from greedy Kruskal passes over FSTs ordered
//!   by LP value, seeded with the MST so the result never exceeds it.
//!
//! Assumptions and conventions
//! - Variables are indexed like `FstSet::fsts`.
//! - One tolerance (`RsmtCfg::lp_eps`) governs integrality and violation.

mod bb;
mod heuristic;
mod lp;
mod pool;

pub use bb::{branch_and_cut, integer_feasible_solution, BbNode, BbOutcome, Integrality, NodeBound};
pub use heuristic::{
    compute_heuristic_upper_bound, greedy_upper_bound, mst_incumbent, try_trees, ub_kruskal,
    update_best_solution_set, HeuristicRanks, Incumbent,
};
pub use lp::{
    initial_formulation, separate_subtours, solve_lp_over_constraint_pool, LpModel, LpOutcome,
    LpRow, LpSolver, MicroLp,
};
pub use pool::{ConstraintPool, PoolRow, RowFamily, RowSense};
