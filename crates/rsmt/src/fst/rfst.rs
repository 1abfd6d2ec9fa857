//! Backtracking search for rectilinear full Steiner trees.
//!
//! A tree is grown from a root terminal along one of the four directions. The
//! backbone leaves the root, every further terminal hangs off it on a short
//! perpendicular leg, and consecutive legs alternate sides. The search state
//! (`Growth`) is cloned on every recursion step so each branch owns its copy.
//!
//! Every rejection rule below discards a tree only if replacing it yields a
//! strictly shorter spanning tree of all terminals, so the surviving set
//! always contains the components of some optimal tree. Rules stated for a
//! single FST must keep holding when its terminals are shared with other FSTs.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::geom::{dist_across, dist_along, offset_left, rect_dist, Dir, EmptyRects, Point, Successors};
use crate::mst::{rect_mst, Bsd, Edge};

use super::build::{build_rfst_graph, build_two_terminal};
use super::types::{Fst, FstSet};

/// Side of the backbone a leg hangs on, seen from the root looking along the
/// growth direction. `Root` marks a tree with no leg yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Side {
    Root,
    Left,
    Right,
}

impl Side {
    fn of(offset: f64) -> Option<Side> {
        if offset > 0.0 {
            Some(Side::Left)
        } else if offset < 0.0 {
            Some(Side::Right)
        } else {
            None
        }
    }
}

/// Partial tree under construction.
#[derive(Clone, Debug)]
pub(super) struct Growth {
    pub dir: Dir,
    /// Root first, then the terminals on short legs in backbone order.
    pub terms: Vec<usize>,
    /// For each terminal in `terms`, the longest edge on its path to the
    /// current backbone end.
    pub maxedges: Vec<f64>,
    /// Along-offset of the backbone end from the root.
    pub along: f64,
    pub length: f64,
    pub last_side: Side,
    /// The last leg left the backbone at zero distance from the previous one.
    pub cross: bool,
}

impl Growth {
    fn root(dir: Dir, root: usize) -> Self {
        Self {
            dir,
            terms: vec![root],
            maxedges: vec![0.0],
            along: 0.0,
            length: 0.0,
            last_side: Side::Root,
            cross: false,
        }
    }

    #[inline]
    fn last(&self) -> usize {
        self.terms[self.terms.len() - 1]
    }
}

/// How a grown tree is closed off.
#[derive(Clone, Copy, Debug)]
pub(super) enum Closure {
    /// The backbone continues to `end`'s along-offset and bends to it.
    Corner { end: usize },
    /// The backbone bends at `end`'s along-offset; `beyond` lies further
    /// along, on the same side and closer to the backbone, and joins the
    /// perpendicular.
    Beyond { end: usize, beyond: usize },
}

/// Counters from one generation run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RfstStats {
    pub grow_calls: usize,
    pub candidates: usize,
    pub rejected_bsd_mst: usize,
    pub rejected_diamond: usize,
    pub replaced: usize,
}

struct RfstContext<'a> {
    pts: &'a [Point],
    succ: Successors,
    rects: EmptyRects,
    bsd: Bsd,
    /// Forward-cone bound on the first backbone segment, per direction.
    ub0: [Vec<f64>; 4],
    /// First short-leg candidates from each root, per direction.
    zt: [Vec<Vec<usize>>; 4],
    in_tree: Vec<bool>,
    fsts: Vec<Fst>,
    index: HashMap<Vec<usize>, usize>,
    stats: RfstStats,
}

/// Generate the FST candidates of `pts`.
pub fn rfst(pts: &[Point]) -> FstSet {
    rfst_with_stats(pts).0
}

/// `rfst` plus the search counters.
pub fn rfst_with_stats(pts: &[Point]) -> (FstSet, RfstStats) {
    let n = pts.len();
    let mst = rect_mst(pts);
    let mst_length: f64 = mst.iter().map(|e| e.len).sum();
    if n < 2 {
        let set = FstSet {
            n_terminals: n,
            fsts: Vec::new(),
            mst,
            mst_length,
        };
        return (set, RfstStats::default());
    }

    let mut ctx = RfstContext::new(pts, &mst);
    for e in &mst {
        ctx.save(build_two_terminal(pts, e.p1, e.p2));
    }
    if n >= 3 {
        for dir in Dir::ALL {
            for root in 0..n {
                ctx.in_tree[root] = true;
                ctx.grow_fst(&Growth::root(dir, root));
                ctx.in_tree[root] = false;
            }
        }
    }

    debug!(
        terminals = n,
        fsts = ctx.fsts.len(),
        mst_length,
        grow_calls = ctx.stats.grow_calls,
        candidates = ctx.stats.candidates,
        "FST generation finished"
    );
    let stats = ctx.stats;
    let set = FstSet {
        n_terminals: n,
        fsts: ctx.fsts,
        mst,
        mst_length,
    };
    (set, stats)
}

/// Forward-cone bound and short-leg candidates for one root and direction.
///
/// A terminal `q` strictly inside the cone `|across| < along` caps the first
/// backbone segment at `d(root, q)`: a longer segment could be cut and `q`
/// reconnected for less.
fn forward_candidates(pts: &[Point], succ: &Successors, dir: Dir, i: usize, cap: f64) -> (f64, Vec<usize>) {
    let origin = pts[i];
    let mut bound = f64::INFINITY;
    let mut list = Vec::new();
    for t in succ.chain(dir, i) {
        let a = dist_along(dir, &origin, &pts[t]);
        if a <= 0.0 {
            continue;
        }
        if a > bound || a > cap {
            break;
        }
        let c = dist_across(dir, &origin, &pts[t]);
        if c < a {
            bound = bound.min(a + c);
        }
        list.push(t);
    }
    list.retain(|&t| dist_along(dir, &origin, &pts[t]) <= bound);
    (bound, list)
}

impl<'a> RfstContext<'a> {
    fn new(pts: &'a [Point], mst: &[Edge]) -> Self {
        let n = pts.len();
        let succ = Successors::new(pts);
        let rects = EmptyRects::new(pts, &succ);
        let bsd = Bsd::new(n, mst);

        let cap = bsd.max_edge();
        let mut ub0: [Vec<f64>; 4] = std::array::from_fn(|_| vec![f64::INFINITY; n]);
        let mut zt: [Vec<Vec<usize>>; 4] = std::array::from_fn(|_| vec![Vec::new(); n]);
        for dir in Dir::ALL {
            let d = dir.index();
            for i in 0..n {
                let (bound, list) = forward_candidates(pts, &succ, dir, i, cap);
                ub0[d][i] = bound;
                zt[d][i] = list;
            }
        }

        Self {
            pts,
            succ,
            rects,
            bsd,
            ub0,
            zt,
            in_tree: vec![false; n],
            fsts: Vec::new(),
            index: HashMap::new(),
            stats: RfstStats::default(),
        }
    }

    /// Extend `g` by every admissible next terminal.
    fn grow_fst(&mut self, g: &Growth) {
        self.stats.grow_calls += 1;
        let dir = g.dir;
        let root = g.terms[0];

        if g.terms.len() == 1 {
            let cands = self.zt[dir.index()][root].clone();
            trace!(root, ?dir, ub0 = self.ub0[dir.index()][root], cands = cands.len(), "grow from root");
            for t in cands {
                self.extend(g, t);
            }
            return;
        }

        let rp = self.pts[root];
        // Terminals sharing the along-offset of `last` may sit before it in
        // the chain; start from the first of them.
        let mut start = g.last();
        while let Some(p) = self.succ.next(dir.opposite(), start) {
            if dist_along(dir, &rp, &self.pts[p]) < g.along {
                break;
            }
            start = p;
        }

        let cap = self.bsd.max_edge();
        let mut bound = f64::INFINITY;
        let mut cur = Some(start);
        while let Some(t) = cur {
            cur = self.succ.next(dir, t);
            if self.in_tree[t] {
                continue;
            }
            let tp = self.pts[t];
            let g_len = dist_along(dir, &rp, &tp) - g.along;
            if g_len < 0.0 {
                continue;
            }
            if g_len > bound || g_len > cap {
                break;
            }
            let across = dist_across(dir, &rp, &tp);
            if across < g_len {
                bound = bound.min(g_len + across);
            }
            self.extend(g, t);
        }
    }

    fn extend(&mut self, g: &Growth, t: usize) {
        let rp = self.pts[g.terms[0]];
        let tp = self.pts[t];
        let g_len = dist_along(g.dir, &rp, &tp) - g.along;
        let left = offset_left(g.dir, &rp, &tp);
        self.try_corner_closure(g, t, g_len, left);
        self.try_short_leg(g, t, g_len, left);
        self.try_beyond_closure(g, t, g_len, left);
    }

    /// Every terminal in the tree keeps its bottleneck bound once `t` is
    /// attached through `shared` (new backbone) and `tail` (its own leg).
    fn path_ok(&self, g: &Growth, shared: f64, t: usize, tail: f64) -> bool {
        let new_edge = shared.max(tail);
        g.terms
            .iter()
            .zip(&g.maxedges)
            .all(|(&z, &m)| m.max(new_edge) <= self.bsd.bsd(z, t))
    }

    fn try_short_leg(&mut self, g: &Growth, t: usize, g_len: f64, left: f64) {
        let Some(side) = Side::of(left) else { return };
        let size = g.terms.len();
        if g.cross || (size >= 2 && side == g.last_side) {
            return;
        }
        let cross = g_len == 0.0;
        if cross && size != 2 {
            return;
        }
        let leg = left.abs();
        if !self.rects.is_empty(g.last(), t) {
            return;
        }
        if !self.path_ok(g, g_len, t, leg) {
            return;
        }

        let rp = self.pts[g.terms[0]];
        let mut next = g.clone();
        for m in next.maxedges.iter_mut() {
            *m = m.max(g_len);
        }
        next.terms.push(t);
        next.maxedges.push(leg);
        next.along = dist_along(g.dir, &rp, &self.pts[t]);
        next.length = g.length + g_len + leg;
        next.last_side = side;
        next.cross = cross;

        self.in_tree[t] = true;
        self.grow_fst(&next);
        self.in_tree[t] = false;
    }

    fn try_corner_closure(&mut self, g: &Growth, t: usize, g_len: f64, left: f64) {
        if g.terms.len() < 2 {
            return;
        }
        let side = Side::of(left);
        if side == Some(g.last_side) {
            return;
        }
        if g_len == 0.0 && (side.is_none() || g.cross) {
            return;
        }
        if g.cross && side.is_some() {
            return;
        }
        // a straight end is also grown from `t` in the opposite direction
        if side.is_none() && t < g.terms[0] {
            return;
        }
        let edge = g_len + left.abs();
        if !self.rects.is_empty(g.last(), t) {
            return;
        }
        if !self.path_ok(g, edge, t, edge) {
            return;
        }
        self.test_and_save_fst(g, Closure::Corner { end: t }, g.length + edge);
    }

    fn try_beyond_closure(&mut self, g: &Growth, t: usize, g_len: f64, left: f64) {
        if g.terms.len() < 2 || g.cross || g_len <= 0.0 {
            return;
        }
        let Some(side) = Side::of(left) else { return };
        if side == g.last_side {
            return;
        }
        let last = g.last();
        if !self.rects.is_empty(last, t) {
            return;
        }

        let dir = g.dir;
        let rp = self.pts[g.terms[0]];
        let along_t = dist_along(dir, &rp, &self.pts[t]);
        let cap = self.bsd.max_edge();
        let mut cur = self.succ.next(dir, t);
        while let Some(u) = cur {
            cur = self.succ.next(dir, u);
            if self.in_tree[u] {
                continue;
            }
            let up = self.pts[u];
            let h = dist_along(dir, &rp, &up) - along_t;
            if h <= 0.0 {
                continue;
            }
            if h > cap {
                break;
            }
            let left_u = offset_left(dir, &rp, &up);
            if Side::of(left_u) != Some(side) || left_u.abs() >= left.abs() {
                continue;
            }
            let e_back = g_len + left_u.abs();
            let e_t = left.abs() - left_u.abs();
            if !self.rects.is_empty(t, u) || !self.rects.is_empty(last, u) {
                continue;
            }
            if !self.path_ok(g, e_back, t, e_t) || !self.path_ok(g, e_back, u, h) {
                continue;
            }
            if e_t.max(h) > self.bsd.bsd(t, u) {
                continue;
            }
            let length = g.length + e_back + e_t + h;
            self.test_and_save_fst(g, Closure::Beyond { end: t, beyond: u }, length);
        }
    }

    fn test_and_save_fst(&mut self, g: &Growth, closure: Closure, length: f64) {
        self.stats.candidates += 1;
        let mut terms = g.terms.clone();
        match closure {
            Closure::Corner { end } => terms.push(end),
            Closure::Beyond { end, beyond } => {
                terms.push(end);
                terms.push(beyond);
            }
        }
        if terms.len() >= i32::MAX as usize {
            return;
        }
        // zero-length backbone segments only in the 4-terminal cross
        if g.cross && !(terms.len() == 4 && matches!(closure, Closure::Corner { .. })) {
            return;
        }
        if length > self.bsd_mst_length(&terms) {
            self.stats.rejected_bsd_mst += 1;
            return;
        }

        let fst = build_rfst_graph(self.pts, g, closure);
        let segments_clear = fst.edges.iter().all(|&(a, b)| {
            self.diamond_empty(&fst.resolve(a, self.pts), &fst.resolve(b, self.pts))
        });
        if !segments_clear {
            self.stats.rejected_diamond += 1;
            return;
        }
        trace!(terminals = ?fst.terminals, length = fst.length, "FST accepted");
        self.save(fst);
    }

    /// MST length over `terms` with bottleneck Steiner distances as weights.
    fn bsd_mst_length(&self, terms: &[usize]) -> f64 {
        let k = terms.len();
        let mut in_tree = vec![false; k];
        let mut dist = vec![f64::INFINITY; k];
        dist[0] = 0.0;
        let mut total = 0.0;
        for _ in 0..k {
            let mut best = None;
            for v in 0..k {
                if !in_tree[v] && best.is_none_or(|b: usize| dist[v] < dist[b]) {
                    best = Some(v);
                }
            }
            let Some(u) = best else { break };
            in_tree[u] = true;
            total += dist[u];
            for v in 0..k {
                if !in_tree[v] {
                    dist[v] = dist[v].min(self.bsd.bsd(terms[u], terms[v]));
                }
            }
        }
        total
    }

    /// No terminal lies strictly closer than `|pq|` to both `p` and `q`.
    fn diamond_empty(&self, p: &Point, q: &Point) -> bool {
        let l = rect_dist(p, q);
        !self
            .pts
            .iter()
            .any(|w| rect_dist(w, p) < l && rect_dist(w, q) < l)
    }

    /// Keep `fst` unless a tree over the same terminals is already stored at
    /// equal or shorter length.
    fn save(&mut self, fst: Fst) {
        match self.index.get(&fst.terminals) {
            Some(&slot) => {
                if fst.length < self.fsts[slot].length {
                    self.fsts[slot] = fst;
                    self.stats.replaced += 1;
                }
            }
            None => {
                self.index.insert(fst.terminals.clone(), self.fsts.len());
                self.fsts.push(fst);
            }
        }
    }
}
