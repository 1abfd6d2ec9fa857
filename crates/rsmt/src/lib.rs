//! Rectilinear Steiner minimal trees.
//!
//! Pipeline
//! - `fst`: enumerate candidate full Steiner trees (FSTs) over the terminals.
//! - `ip`: pick a minimum-length spanning subset with an LP relaxation,
//!   cutting planes, greedy upper bounds and (optionally) branching.
//! - `solution`: concatenate the chosen FSTs into one tree.
//!
//! Entry points are `rsmt` (default configuration and LP backend) and
//! `rsmt_with`. Both are synchronous for every input size.

pub mod api;
pub mod cfg;
pub mod error;
pub mod fst;
pub mod geom;
pub mod ip;
pub mod mst;
pub mod rand;
pub mod solution;

use tracing::debug;

pub use cfg::{Branching, RsmtCfg, LP_EPS};
pub use error::{Result, RsmtError};
pub use fst::Endpoint;
pub use geom::Point;
pub use solution::RsmtResult;

use fst::{rfst_with_stats, RfstStats};
use ip::{branch_and_cut, LpSolver, MicroLp};
use solution::build_solution;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cfg::{Branching, RsmtCfg};
    pub use crate::fst::Endpoint;
    pub use crate::geom::Point;
    pub use crate::rand::{draw_terminals, ReplayToken, TerminalCfg};
    pub use crate::solution::RsmtResult;
    pub use crate::{rsmt, rsmt_with};
}

/// A solved instance plus what the solver learned along the way.
#[derive(Clone, Debug)]
pub struct SolveReport {
    pub result: RsmtResult,
    pub mst_length: f64,
    pub fsts: usize,
    pub fst_stats: RfstStats,
    pub lower_bound: f64,
    pub nodes: usize,
    pub proven_optimal: bool,
}

/// Steiner tree of `terminals` with the default configuration.
pub fn rsmt(terminals: &[Point]) -> Result<RsmtResult> {
    rsmt_with(terminals, &RsmtCfg::default(), &MicroLp)
}

/// Steiner tree of `terminals` with an explicit configuration and backend.
pub fn rsmt_with(terminals: &[Point], cfg: &RsmtCfg, solver: &dyn LpSolver) -> Result<RsmtResult> {
    solve_report(terminals, cfg, solver).map(|r| r.result)
}

/// Like `rsmt_with`, returning bounds and counters alongside the tree.
pub fn solve_report(terminals: &[Point], cfg: &RsmtCfg, solver: &dyn LpSolver) -> Result<SolveReport> {
    if let Some(index) = terminals
        .iter()
        .position(|p| !p.x.is_finite() || !p.y.is_finite())
    {
        return Err(RsmtError::NonFinite { index });
    }
    let n = terminals.len();
    if n <= 1 {
        return Ok(SolveReport {
            result: RsmtResult::empty(terminals),
            mst_length: 0.0,
            fsts: 0,
            fst_stats: RfstStats::default(),
            lower_bound: 0.0,
            nodes: 0,
            proven_optimal: true,
        });
    }

    let (set, fst_stats) = rfst_with_stats(terminals);
    let out = branch_and_cut(terminals, &set, cfg, solver)?;
    let spanning: usize = out.selected.iter().map(|&f| set.fsts[f].size() - 1).sum();
    if spanning != n - 1 {
        return Err(RsmtError::Disconnected);
    }
    let result = build_solution(terminals, &set, &out.selected);
    debug!(
        terminals = n,
        fsts = set.len(),
        length = result.length,
        mst_length = set.mst_length,
        steiners = result.steiners.len(),
        "RSMT solved"
    );
    Ok(SolveReport {
        result,
        mst_length: set.mst_length,
        fsts: set.len(),
        fst_stats,
        lower_bound: out.lower_bound,
        nodes: out.nodes,
        proven_optimal: out.proven_optimal,
    })
}
