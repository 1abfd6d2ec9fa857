//! Assembly of the final tree from the selected FSTs.

use crate::fst::{Endpoint, FstSet};
use crate::geom::Point;

/// A rectilinear Steiner tree over the input terminals.
///
/// `edges` and `edge_ids` are parallel: `edges[i]` holds the coordinates of
/// the endpoints named by `edge_ids[i]`. Steiner indices refer to `steiners`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RsmtResult {
    pub terminals: Vec<Point>,
    pub steiners: Vec<Point>,
    pub edges: Vec<[Point; 2]>,
    pub edge_ids: Vec<(Endpoint, Endpoint)>,
    pub length: f64,
}

impl RsmtResult {
    /// Tree with no edges over `terminals` (0 or 1 terminals).
    pub fn empty(terminals: &[Point]) -> Self {
        Self {
            terminals: terminals.to_vec(),
            ..Self::default()
        }
    }

    /// Edge endpoints in the signed encoding: terminal `i` is `i + 1`,
    /// Steiner point `k` is `-k`.
    pub fn edge_ids_signed(&self) -> Vec<[i64; 2]> {
        self.edge_ids
            .iter()
            .map(|&(a, b)| [a.signed_id(), b.signed_id()])
            .collect()
    }

    /// Coordinates of `ep` in this tree.
    pub fn resolve(&self, ep: Endpoint) -> Point {
        match ep {
            Endpoint::Terminal(i) => self.terminals[i],
            Endpoint::Steiner(k) => self.steiners[k],
        }
    }
}

/// Concatenate the selected FSTs, renumbering Steiner points with a running
/// offset. `length` is the sum of the selected FST lengths.
pub fn build_solution(terminals: &[Point], set: &FstSet, selected: &[usize]) -> RsmtResult {
    let mut out = RsmtResult::empty(terminals);
    for &f in selected {
        let fst = &set.fsts[f];
        let offset = out.steiners.len();
        out.steiners.extend_from_slice(&fst.steiners);
        for &(a, b) in &fst.edges {
            let (a, b) = (a.offset_steiner(offset), b.offset_steiner(offset));
            out.edges.push([out.resolve(a), out.resolve(b)]);
            out.edge_ids.push((a, b));
        }
        out.length += fst.length;
    }
    out
}
