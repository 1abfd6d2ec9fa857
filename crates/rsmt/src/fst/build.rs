//! Explicit geometry of accepted FSTs.
//!
//! Three shapes are produced:
//! - two terminals: one edge, or two edges through a bend point when the pair
//!   is not axis-aligned;
//! - the 4-terminal cross: both middle legs share one Steiner point;
//! - the staircase: a backbone from the root with one Steiner point per short
//!   leg, closed either by a bend to the last terminal (corner closure) or by a
//!   perpendicular that carries one more terminal attached from beyond.

use crate::geom::{corner, rect_dist, Point};

use super::rfst::{Closure, Growth};
use super::types::{Endpoint, Fst, FstKind};

/// FST for a single MST edge.
pub(super) fn build_two_terminal(pts: &[Point], a: usize, b: usize) -> Fst {
    let (pa, pb) = (pts[a], pts[b]);
    let mut steiners = Vec::new();
    let mut edges = Vec::new();
    if pa.x == pb.x || pa.y == pb.y {
        edges.push((Endpoint::Terminal(a), Endpoint::Terminal(b)));
    } else {
        steiners.push(Point::new(pb.x, pa.y));
        edges.push((Endpoint::Terminal(a), Endpoint::Steiner(0)));
        edges.push((Endpoint::Steiner(0), Endpoint::Terminal(b)));
    }
    let mut terminals = vec![a, b];
    terminals.sort_unstable();
    Fst {
        terminals,
        steiners,
        edges,
        length: rect_dist(&pa, &pb),
        kind: FstKind::TwoTerminal,
    }
}

/// Build the Steiner points and edges of a grown tree.
pub(super) fn build_rfst_graph(pts: &[Point], g: &Growth, closure: Closure) -> Fst {
    let dir = g.dir;
    let root = g.terms[0];
    let rp = pts[root];
    let mut steiners: Vec<Point> = Vec::new();
    let mut edges: Vec<(Endpoint, Endpoint)> = Vec::new();

    let mut prev = Endpoint::Terminal(root);
    let mut prev_pt = rp;
    for &t in &g.terms[1..] {
        let s = corner(dir, &pts[t], &rp);
        let node = if s == prev_pt && matches!(prev, Endpoint::Steiner(_)) {
            // zero-length backbone segment: the cross shares its Steiner point
            prev
        } else {
            steiners.push(s);
            let node = Endpoint::Steiner(steiners.len() - 1);
            edges.push((prev, node));
            node
        };
        edges.push((node, Endpoint::Terminal(t)));
        prev = node;
        prev_pt = s;
    }

    let mut terminals = g.terms.clone();
    match closure {
        Closure::Corner { end } => {
            let ep = pts[end];
            let bend = corner(dir, &ep, &rp);
            if bend == prev_pt || bend == ep {
                edges.push((prev, Endpoint::Terminal(end)));
            } else {
                steiners.push(bend);
                let b = Endpoint::Steiner(steiners.len() - 1);
                edges.push((prev, b));
                edges.push((b, Endpoint::Terminal(end)));
            }
            terminals.push(end);
        }
        Closure::Beyond { end, beyond } => {
            let bend = corner(dir, &pts[end], &rp);
            let fork = corner(dir, &pts[end], &pts[beyond]);
            steiners.push(bend);
            let b = Endpoint::Steiner(steiners.len() - 1);
            steiners.push(fork);
            let f = Endpoint::Steiner(steiners.len() - 1);
            edges.push((prev, b));
            edges.push((b, f));
            edges.push((f, Endpoint::Terminal(end)));
            edges.push((f, Endpoint::Terminal(beyond)));
            terminals.push(end);
            terminals.push(beyond);
        }
    }
    terminals.sort_unstable();

    let mut fst = Fst {
        terminals,
        steiners,
        edges,
        length: 0.0,
        kind: if g.cross {
            FstKind::Cross
        } else {
            FstKind::Staircase
        },
    };
    fst.length = fst.edge_length_sum(pts);
    fst
}
