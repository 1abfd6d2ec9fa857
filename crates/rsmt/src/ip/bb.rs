//! Branch and cut over FST selections.
//!
//! The root node always runs; `Branching::RootOnly` returns the incumbent
//! after it. `Branching::BestFirst` keeps a min-heap of open nodes keyed by
//! their parent's LP bound and branches on the most fractional variable,
//! trying `x = 1` before `x = 0`.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::{debug, trace};

use crate::cfg::{Branching, RsmtCfg};
use crate::error::Result;
use crate::fst::FstSet;
use crate::geom::Point;
use crate::mst::Dsuf;

use super::heuristic::{
    compute_heuristic_upper_bound, greedy_upper_bound, mst_incumbent, update_best_solution_set,
    HeuristicRanks, Incumbent,
};
use super::lp::{solve_lp_over_constraint_pool, LpOutcome, LpSolver};
use super::pool::ConstraintPool;

/// Integrality status of an LP solution.
#[derive(Clone, Debug, PartialEq)]
pub enum Integrality {
    Fractional,
    /// Integral, but the selected FSTs do not form a spanning tree.
    Disconnected,
    Tree(Vec<usize>),
}

/// Classify `x`: any value in `(eps, 1 - eps)` is fractional; otherwise the
/// FSTs at or above 0.5 are selected and checked for connectivity. Together
/// with the spanning count `Σ (|F| - 1) = n - 1` this rules out cycles.
pub fn integer_feasible_solution(set: &FstSet, x: &[f64], eps: f64) -> Integrality {
    if x.iter().any(|&v| v > eps && v < 1.0 - eps) {
        return Integrality::Fractional;
    }
    let n = set.n_terminals;
    let selected: Vec<usize> = (0..x.len()).filter(|&f| x[f] >= 0.5).collect();
    let spanning: usize = selected.iter().map(|&f| set.fsts[f].size() - 1).sum();
    if spanning != n.saturating_sub(1) {
        return Integrality::Disconnected;
    }
    let mut dsuf = Dsuf::new(n);
    for &f in &selected {
        for w in set.fsts[f].terminals.windows(2) {
            dsuf.union(w[0], w[1]);
        }
    }
    if dsuf.component_count() <= 1 {
        Integrality::Tree(selected)
    } else {
        Integrality::Disconnected
    }
}

/// Open branch-and-bound node.
#[derive(Clone, Debug)]
pub struct BbNode {
    /// Lower bound inherited from the parent's LP.
    pub z: f64,
    pub serial: usize,
    pub parent: Option<usize>,
    /// Variable fixed when this node was created.
    pub var: Option<usize>,
    pub fixed: Vec<(usize, bool)>,
    pub depth: usize,
}

impl PartialEq for BbNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BbNode {}

impl PartialOrd for BbNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BbNode {
    // reversed: BinaryHeap pops the smallest bound, then the oldest node
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .z
            .total_cmp(&self.z)
            .then(other.serial.cmp(&self.serial))
    }
}

/// Result of `branch_and_cut`.
#[derive(Clone, Debug)]
pub struct BbOutcome {
    pub selected: Vec<usize>,
    pub length: f64,
    /// Best proven lower bound on the optimal length.
    pub lower_bound: f64,
    pub nodes: usize,
    pub proven_optimal: bool,
}

/// LP bound of one node.
#[derive(Clone, Debug)]
pub enum NodeBound {
    Infeasible,
    Bound { z: f64, x: Vec<f64> },
}

struct Runner<'a> {
    set: &'a FstSet,
    cfg: &'a RsmtCfg,
    solver: &'a dyn LpSolver,
    ranks: HeuristicRanks,
    pool: ConstraintPool,
    best: Incumbent,
}

impl<'a> Runner<'a> {
    /// Cutting-plane LP at a node, followed by the LP-guided heuristic.
    fn compute_good_lower_bound(&mut self, fixed: &[(usize, bool)]) -> Result<NodeBound> {
        let outcome = solve_lp_over_constraint_pool(self.set, &mut self.pool, fixed, self.cfg, self.solver)?;
        let LpOutcome::Optimal { objective, values } = outcome else {
            return Ok(NodeBound::Infeasible);
        };
        compute_heuristic_upper_bound(self.set, &self.ranks, &values, self.cfg, &mut self.best);
        if let Integrality::Tree(selected) = integer_feasible_solution(self.set, &values, self.cfg.lp_eps) {
            let length = selected.iter().map(|&f| self.set.fsts[f].length).sum();
            update_best_solution_set(&mut self.best, Incumbent { selected, length });
        }
        Ok(NodeBound::Bound { z: objective, x: values })
    }

    fn closes(&self, z: f64) -> bool {
        z >= self.best.length - self.cfg.lp_eps
    }
}

/// Variable with value closest to 0.5 among the fractional ones.
fn most_fractional(x: &[f64], eps: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (j, &v) in x.iter().enumerate() {
        if v <= eps || v >= 1.0 - eps {
            continue;
        }
        let dist = (v - 0.5).abs();
        if best.is_none_or(|(_, d)| dist < d) {
            best = Some((j, dist));
        }
    }
    best.map(|(j, _)| j)
}

/// Select a minimum-length spanning set of FSTs.
pub fn branch_and_cut(pts: &[Point], set: &FstSet, cfg: &RsmtCfg, solver: &dyn LpSolver) -> Result<BbOutcome> {
    let ranks = HeuristicRanks::startup(set, pts);
    let mut best = mst_incumbent(set, &ranks);

    if set.fsts.iter().all(|f| f.size() <= 2) {
        debug!(length = best.length, "only MST edges, no LP needed");
        return Ok(BbOutcome {
            lower_bound: best.length,
            length: best.length,
            selected: best.selected,
            nodes: 0,
            proven_optimal: true,
        });
    }
    greedy_upper_bound(set, &ranks, &mut best);

    let mut run = Runner {
        set,
        cfg,
        solver,
        ranks,
        pool: ConstraintPool::build(set),
        best,
    };

    let mut nodes = 1;
    let root = run.compute_good_lower_bound(&[])?;
    let NodeBound::Bound { z: root_z, x: root_x } = root else {
        // the MST selection is LP-feasible, so this is a backend anomaly
        debug!("root LP infeasible, keeping incumbent");
        return Ok(BbOutcome {
            lower_bound: f64::NEG_INFINITY,
            length: run.best.length,
            selected: run.best.selected,
            nodes,
            proven_optimal: false,
        });
    };
    debug!(
        root_z,
        incumbent = run.best.length,
        rows = run.pool.selected_count(),
        "root node solved"
    );

    let node_limit = match cfg.branching {
        Branching::RootOnly => 1,
        Branching::BestFirst { node_limit } => node_limit.max(1),
    };

    let mut heap = BinaryHeap::new();
    let mut serial = 0;
    let mut push_children = |heap: &mut BinaryHeap<BbNode>, parent: &BbNode, z: f64, x: &[f64], eps: f64| {
        if let Some(var) = most_fractional(x, eps) {
            for one in [true, false] {
                serial += 1;
                let mut fixed = parent.fixed.clone();
                fixed.push((var, one));
                heap.push(BbNode {
                    z,
                    serial,
                    parent: Some(parent.serial),
                    var: Some(var),
                    fixed,
                    depth: parent.depth + 1,
                });
            }
        }
    };

    let root_node = BbNode {
        z: root_z,
        serial: 0,
        parent: None,
        var: None,
        fixed: Vec::new(),
        depth: 0,
    };
    // bounds of nodes closed without a proof (integral but no tree)
    let mut lost_bound = f64::INFINITY;
    if !run.closes(root_z) {
        if most_fractional(&root_x, cfg.lp_eps).is_none() {
            lost_bound = root_z;
        }
        push_children(&mut heap, &root_node, root_z, &root_x, cfg.lp_eps);
    }

    while let Some(node) = heap.pop() {
        if run.closes(node.z) {
            continue;
        }
        if nodes >= node_limit {
            heap.push(node);
            break;
        }
        nodes += 1;
        match run.compute_good_lower_bound(&node.fixed)? {
            NodeBound::Infeasible => {
                trace!(serial = node.serial, depth = node.depth, "node infeasible");
            }
            NodeBound::Bound { z, x } => {
                trace!(serial = node.serial, depth = node.depth, z, var = ?node.var, "node solved");
                if run.closes(z) {
                    continue;
                }
                if most_fractional(&x, cfg.lp_eps).is_none() {
                    debug!(serial = node.serial, "integral node without a tree, closed");
                    lost_bound = lost_bound.min(z);
                    continue;
                }
                push_children(&mut heap, &node, z, &x, cfg.lp_eps);
            }
        }
    }

    let open_min = heap.iter().map(|n| n.z).fold(f64::INFINITY, f64::min);
    let lower_bound = root_z.max(run.best.length.min(open_min).min(lost_bound));
    let proven_optimal = run.best.length <= lower_bound + cfg.lp_eps;
    debug!(
        length = run.best.length,
        lower_bound,
        nodes,
        proven_optimal,
        "branch and cut finished"
    );
    Ok(BbOutcome {
        selected: run.best.selected,
        length: run.best.length,
        lower_bound,
        nodes,
        proven_optimal,
    })
}
