//! Solver configuration and fixed tolerances.
//!
//! Policy
//! - The FST layer compares coordinates exactly and has no knobs.
//! - The LP layer uses one tolerance (`LP_EPS`) for "is this variable 0/1" and
//!   "is this row violated". It is exposed through `RsmtCfg` only so tests can
//!   run ablations; the default is the production value.

/// Integrality / violation tolerance of the LP layer.
pub const LP_EPS: f64 = 1e-5;

/// How far the branch-and-bound explores past the root node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Branching {
    /// One LP bound plus heuristic closing at the root node.
    RootOnly,
    /// Best-first branching on the most fractional variable, stopping after
    /// `node_limit` LP nodes.
    BestFirst { node_limit: usize },
}

/// Solver configuration.
#[derive(Clone, Copy, Debug)]
pub struct RsmtCfg {
    pub lp_eps: f64,
    /// Upper bound on LP re-solves per branch node in the row-generation loop.
    pub max_cut_rounds: usize,
    pub branching: Branching,
    /// Greedy attempts granted to `try_trees` before its restart extensions.
    pub heuristic_budget: usize,
    /// Relative gap to the incumbent under which `try_trees` extends its budget.
    pub heuristic_gap: f64,
}

impl Default for RsmtCfg {
    fn default() -> Self {
        Self {
            lp_eps: LP_EPS,
            max_cut_rounds: 200,
            branching: Branching::RootOnly,
            heuristic_budget: 8,
            heuristic_gap: 1e-3,
        }
    }
}

impl RsmtCfg {
    /// Default configuration with exhaustive best-first branching.
    pub fn exhaustive() -> Self {
        Self {
            branching: Branching::BestFirst {
                node_limit: usize::MAX,
            },
            ..Self::default()
        }
    }
}
