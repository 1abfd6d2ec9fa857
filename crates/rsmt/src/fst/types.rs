//! FST records and edge endpoint encoding.

use crate::geom::{rect_dist, Point};
use crate::mst::Edge;

/// Endpoint of an edge: an input terminal or a synthesized Steiner point.
///
/// Signed encoding (`signed_id`): `Terminal(i)` ↔ `i + 1` (positive,
/// 1-based), `Steiner(k)` ↔ `-k` (non-positive).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Terminal(usize),
    Steiner(usize),
}

impl Endpoint {
    #[inline]
    pub fn signed_id(self) -> i64 {
        match self {
            Endpoint::Terminal(i) => i as i64 + 1,
            Endpoint::Steiner(k) => -(k as i64),
        }
    }

    #[inline]
    pub fn from_signed_id(id: i64) -> Self {
        if id > 0 {
            Endpoint::Terminal((id - 1) as usize)
        } else {
            Endpoint::Steiner(id.unsigned_abs() as usize)
        }
    }

    /// Shift Steiner indices by `offset`; terminals are unchanged.
    #[inline]
    pub fn offset_steiner(self, offset: usize) -> Self {
        match self {
            Endpoint::Steiner(k) => Endpoint::Steiner(k + offset),
            t => t,
        }
    }
}

/// Geometric shape of an FST, one per construction case.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FstKind {
    /// A single (possibly bent) connection between two terminals.
    TwoTerminal,
    /// Four terminals around one degree-4 Steiner point.
    Cross,
    /// Backbone with alternating short legs.
    Staircase,
}

/// A full Steiner tree over a subset of terminals.
///
/// Invariants:
/// - `terminals` is sorted ascending and has at least two entries.
/// - Every edge is horizontal or vertical; bends are explicit Steiner points.
/// - `length` is the sum of the edges' rectilinear lengths.
#[derive(Clone, Debug)]
pub struct Fst {
    pub terminals: Vec<usize>,
    pub steiners: Vec<Point>,
    pub edges: Vec<(Endpoint, Endpoint)>,
    pub length: f64,
    pub kind: FstKind,
}

impl Fst {
    #[inline]
    pub fn size(&self) -> usize {
        self.terminals.len()
    }

    /// 1-based terminal ids, as exposed in exported FST records.
    pub fn terminal_ids(&self) -> Vec<usize> {
        self.terminals.iter().map(|&t| t + 1).collect()
    }

    #[inline]
    pub fn contains(&self, t: usize) -> bool {
        self.terminals.binary_search(&t).is_ok()
    }

    /// Coordinates of `ep` given the terminal set of the instance.
    #[inline]
    pub fn resolve(&self, ep: Endpoint, pts: &[Point]) -> Point {
        match ep {
            Endpoint::Terminal(i) => pts[i],
            Endpoint::Steiner(k) => self.steiners[k],
        }
    }

    /// Sum of edge lengths recomputed from coordinates.
    pub fn edge_length_sum(&self, pts: &[Point]) -> f64 {
        self.edges
            .iter()
            .map(|&(a, b)| rect_dist(&self.resolve(a, pts), &self.resolve(b, pts)))
            .sum()
    }
}

/// Output of FST generation: the candidate list in generation order plus the
/// MST it was pruned against.
#[derive(Clone, Debug)]
pub struct FstSet {
    pub n_terminals: usize,
    pub fsts: Vec<Fst>,
    pub mst: Vec<Edge>,
    pub mst_length: f64,
}

impl FstSet {
    #[inline]
    pub fn len(&self) -> usize {
        self.fsts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fsts.is_empty()
    }

    /// For every terminal, the indices of the FSTs containing it.
    pub fn term_trees(&self) -> Vec<Vec<usize>> {
        let mut out = vec![Vec::new(); self.n_terminals];
        for (f, fst) in self.fsts.iter().enumerate() {
            for &t in &fst.terminals {
                out[t].push(f);
            }
        }
        out
    }
}
