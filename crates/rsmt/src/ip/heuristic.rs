//! Upper bounds: greedy spanning selections of FSTs guided by LP values.
//!
//! Every attempt is a Kruskal pass over FSTs in some order. An FST is taken
//! when all of its terminals lie in distinct components, so the result is
//! always a tree. The 2-terminal (MST) FSTs close every order, which makes
//! each pass spanning.

use std::cmp::Ordering;

use tracing::debug;

use crate::cfg::RsmtCfg;
use crate::fst::FstSet;
use crate::geom::Point;
use crate::mst::{mst_length, Dsuf};

/// A spanning FST selection.
#[derive(Clone, Debug, PartialEq)]
pub struct Incumbent {
    pub selected: Vec<usize>,
    pub length: f64,
}

/// Per-FST ranking keys, computed once per instance.
#[derive(Clone, Debug)]
pub struct HeuristicRanks {
    /// FST length over the MST length of its terminals; below 1 means the
    /// FST saves length.
    pub rank_mst: Vec<f64>,
    /// FST length per spanning unit (`|F| - 1`).
    pub rank_size: Vec<f64>,
    /// 2-terminal FSTs, shortest first.
    pub mst_fsts: Vec<usize>,
}

impl HeuristicRanks {
    pub fn startup(set: &FstSet, pts: &[Point]) -> Self {
        let mut rank_mst = Vec::with_capacity(set.len());
        let mut rank_size = Vec::with_capacity(set.len());
        for fst in &set.fsts {
            let sub: Vec<Point> = fst.terminals.iter().map(|&t| pts[t]).collect();
            let base = mst_length(&sub);
            rank_mst.push(if base > 0.0 { fst.length / base } else { 1.0 });
            rank_size.push(fst.length / (fst.size() - 1) as f64);
        }
        let mut mst_fsts: Vec<usize> = (0..set.len()).filter(|&f| set.fsts[f].size() == 2).collect();
        mst_fsts.sort_by(|&a, &b| set.fsts[a].length.total_cmp(&set.fsts[b].length).then(a.cmp(&b)));
        Self {
            rank_mst,
            rank_size,
            mst_fsts,
        }
    }

    /// `order` without 2-terminal FSTs, followed by all of them by length.
    fn close_order(&self, set: &FstSet, order: impl IntoIterator<Item = usize>) -> Vec<usize> {
        let mut out: Vec<usize> = order.into_iter().filter(|&f| set.fsts[f].size() > 2).collect();
        out.extend_from_slice(&self.mst_fsts);
        out
    }
}

fn by_key(keys: &[f64]) -> impl Fn(&usize, &usize) -> Ordering + '_ {
    move |&a, &b| keys[a].total_cmp(&keys[b]).then(a.cmp(&b))
}

/// Greedy Kruskal over FSTs in `order`. `None` if the order does not span.
pub fn ub_kruskal(set: &FstSet, order: &[usize]) -> Option<Incumbent> {
    let n = set.n_terminals;
    let mut dsuf = Dsuf::new(n);
    let mut selected = Vec::new();
    let mut length = 0.0;
    let mut roots = Vec::new();
    for &f in order {
        if dsuf.component_count() == 1 {
            break;
        }
        let fst = &set.fsts[f];
        roots.clear();
        roots.extend(fst.terminals.iter().map(|&t| dsuf.find(t)));
        roots.sort_unstable();
        roots.dedup();
        if roots.len() != fst.size() {
            continue;
        }
        for w in fst.terminals.windows(2) {
            dsuf.union(w[0], w[1]);
        }
        selected.push(f);
        length += fst.length;
    }
    (dsuf.component_count() <= 1).then_some(Incumbent { selected, length })
}

/// Replace `best` when `cand` is strictly shorter. Returns whether it did.
pub fn update_best_solution_set(best: &mut Incumbent, cand: Incumbent) -> bool {
    if cand.length < best.length - 1e-9 {
        debug!(old = best.length, new = cand.length, fsts = cand.selected.len(), "incumbent improved");
        *best = cand;
        true
    } else {
        false
    }
}

/// The pure-MST solution.
pub fn mst_incumbent(set: &FstSet, ranks: &HeuristicRanks) -> Incumbent {
    Incumbent {
        selected: ranks.mst_fsts.clone(),
        length: ranks.mst_fsts.iter().map(|&f| set.fsts[f].length).sum(),
    }
}

/// One greedy pass by `rank_mst`, before any LP is solved.
pub fn greedy_upper_bound(set: &FstSet, ranks: &HeuristicRanks, best: &mut Incumbent) -> bool {
    let mut order: Vec<usize> = (0..set.len()).collect();
    order.sort_by(by_key(&ranks.rank_mst));
    let order = ranks.close_order(set, order);
    match ub_kruskal(set, &order) {
        Some(cand) => update_best_solution_set(best, cand),
        None => false,
    }
}

/// Run rotated variants of `orders` through `ub_kruskal`.
///
/// Attempt `i` uses `orders[i % m]` rotated left by `i / m`. The budget starts
/// at `cfg.heuristic_budget` and grows by one whenever an attempt lands within
/// `cfg.heuristic_gap` (relative) of the incumbent.
pub fn try_trees(
    set: &FstSet,
    ranks: &HeuristicRanks,
    orders: &[Vec<usize>],
    cfg: &RsmtCfg,
    best: &mut Incumbent,
) -> bool {
    let m = orders.len();
    if m == 0 {
        return false;
    }
    let longest = orders.iter().map(Vec::len).max().unwrap_or(0);
    let limit = m * (longest + 1);
    let mut budget = cfg.heuristic_budget.min(limit);
    let mut improved = false;
    let mut i = 0;
    while i < budget {
        let base = &orders[i % m];
        let shift = if base.is_empty() { 0 } else { (i / m) % base.len() };
        let rotated = base[shift..].iter().chain(&base[..shift]).copied();
        let order = ranks.close_order(set, rotated);
        if let Some(cand) = ub_kruskal(set, &order) {
            let near = cand.length <= best.length * (1.0 + cfg.heuristic_gap);
            improved |= update_best_solution_set(best, cand);
            if near && budget < limit {
                budget += 1;
            }
        }
        i += 1;
    }
    improved
}

/// Upper bound from an LP solution `x`.
///
/// FSTs are split into integral (`x >= 1 - eps`), fractional and zero
/// buckets. Three orders are tried:
/// - A: integral, fractional by decreasing `x`, zero by `rank_mst`;
/// - B: integral, fractional by `rank_mst`, zero by `rank_size`;
/// - C: the LP support by `rank_size`, then the rest by `rank_mst`.
pub fn compute_heuristic_upper_bound(
    set: &FstSet,
    ranks: &HeuristicRanks,
    x: &[f64],
    cfg: &RsmtCfg,
    best: &mut Incumbent,
) -> bool {
    let eps = cfg.lp_eps;
    let mut integral = Vec::new();
    let mut fractional = Vec::new();
    let mut zero = Vec::new();
    for (f, &v) in x.iter().enumerate() {
        if v >= 1.0 - eps {
            integral.push(f);
        } else if v > eps {
            fractional.push(f);
        } else {
            zero.push(f);
        }
    }
    integral.sort_by(by_key(&ranks.rank_mst));

    let mut frac_by_x = fractional.clone();
    frac_by_x.sort_by(|&a, &b| x[b].total_cmp(&x[a]).then(a.cmp(&b)));
    let mut zero_by_mst = zero.clone();
    zero_by_mst.sort_by(by_key(&ranks.rank_mst));
    let order_a: Vec<usize> = integral.iter().chain(&frac_by_x).chain(&zero_by_mst).copied().collect();

    let mut frac_by_mst = fractional.clone();
    frac_by_mst.sort_by(by_key(&ranks.rank_mst));
    let mut zero_by_size = zero;
    zero_by_size.sort_by(by_key(&ranks.rank_size));
    let order_b: Vec<usize> = integral.iter().chain(&frac_by_mst).chain(&zero_by_size).copied().collect();

    let mut support: Vec<usize> = integral.iter().chain(&fractional).copied().collect();
    support.sort_by(by_key(&ranks.rank_size));
    let order_c: Vec<usize> = support.into_iter().chain(zero_by_mst).collect();

    try_trees(set, ranks, &[order_a, order_b, order_c], cfg, best)
}
