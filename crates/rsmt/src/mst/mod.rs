//! Rectilinear minimum spanning trees and bottleneck Steiner distances.
//!
//! Purpose
//! - `mst`: Kruskal over an explicit edge list with a size-balanced union-find.
//! - `Bsd`: answers `bsd(i, j)`, the longest MST edge on the path between two
//!   terminals, which is the pruning oracle of the FST generator (the most
//!   frequently queried structure in the whole solve).
//!
//! Why this design (short)
//! - The BSD structure is the Kruskal merge tree: every MST edge becomes a
//!   synthetic node above the terminals, so the LCA of two leaves carries the
//!   bottleneck edge. Queries walk the tree with binary lifting (path
//!   doubling), `O(log n)` each.
//! - `Dsuf` keeps union by size and skips path compression; `find` stays
//!   logarithmic, which is ample at the sizes this crate targets.

use crate::geom::{rect_dist, Point};

mod bsd;
mod dsuf;

pub use bsd::Bsd;
pub use dsuf::Dsuf;

/// Weighted edge between two indices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub p1: usize,
    pub p2: usize,
    pub len: f64,
}

impl Edge {
    #[inline]
    pub fn new(p1: usize, p2: usize, len: f64) -> Self {
        Self { p1, p2, len }
    }
}

/// Complete graph over `pts` with rectilinear edge lengths.
pub fn full_graph_edges(pts: &[Point]) -> Vec<Edge> {
    let n = pts.len();
    let mut edges = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            edges.push(Edge::new(i, j, rect_dist(&pts[i], &pts[j])));
        }
    }
    edges
}

/// Kruskal's algorithm over `n` vertices.
///
/// Edges are sorted by length (stable, so ties keep input order). The result
/// has `n - c` edges where `c` is the number of connected components.
pub fn mst(n: usize, edges: &[Edge]) -> Vec<Edge> {
    let mut sorted: Vec<Edge> = edges.to_vec();
    sorted.sort_by(|a, b| a.len.total_cmp(&b.len));
    let mut dsuf = Dsuf::new(n);
    let mut out = Vec::with_capacity(n.saturating_sub(1));
    for e in sorted {
        if out.len() + 1 >= n.max(1) {
            break;
        }
        if dsuf.union(e.p1, e.p2) {
            out.push(e);
        }
    }
    out
}

/// Rectilinear MST of a point set.
pub fn rect_mst(pts: &[Point]) -> Vec<Edge> {
    mst(pts.len(), &full_graph_edges(pts))
}

/// Total length of the rectilinear MST of `pts` (dense Prim, no edge list).
pub fn mst_length(pts: &[Point]) -> f64 {
    let n = pts.len();
    if n < 2 {
        return 0.0;
    }
    let mut in_tree = vec![false; n];
    let mut dist = vec![f64::INFINITY; n];
    dist[0] = 0.0;
    let mut total = 0.0;
    for _ in 0..n {
        let mut best = None;
        for v in 0..n {
            if !in_tree[v] && best.is_none_or(|b: usize| dist[v] < dist[b]) {
                best = Some(v);
            }
        }
        let Some(u) = best else { break };
        in_tree[u] = true;
        total += dist[u];
        for v in 0..n {
            if !in_tree[v] {
                let d = rect_dist(&pts[u], &pts[v]);
                if d < dist[v] {
                    dist[v] = d;
                }
            }
        }
    }
    total
}

#[cfg(test)]
mod tests;
