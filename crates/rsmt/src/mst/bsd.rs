use super::{Dsuf, Edge};

/// Bottleneck Steiner distances over a spanning tree.
///
/// Invariants:
/// - Leaves `0..n` are terminals; node `n + k` is created when the `k`-th
///   shortest MST edge merges two components, and stores that edge's length.
/// - `up[0]` is the parent array (roots point to themselves); `up[l]` is the
///   `2^l`-th ancestor.
#[derive(Clone, Debug)]
pub struct Bsd {
    n: usize,
    edge: Vec<f64>,
    depth: Vec<u32>,
    up: Vec<Vec<usize>>,
    max_edge: f64,
}

impl Bsd {
    pub fn new(n: usize, mst: &[Edge]) -> Self {
        let mut sorted: Vec<Edge> = mst.to_vec();
        sorted.sort_by(|a, b| a.len.total_cmp(&b.len));
        let total = n + sorted.len();
        let mut parent: Vec<usize> = (0..total).collect();
        let mut edge = vec![0.0; total];
        // Tree node currently representing each union-find root.
        let mut top: Vec<usize> = (0..n).collect();
        let mut dsuf = Dsuf::new(n);
        let mut next = n;
        for e in &sorted {
            let ra = dsuf.find(e.p1);
            let rb = dsuf.find(e.p2);
            if ra == rb {
                continue;
            }
            parent[top[ra]] = next;
            parent[top[rb]] = next;
            edge[next] = e.len;
            dsuf.union(ra, rb);
            top[dsuf.find(ra)] = next;
            next += 1;
        }
        parent.truncate(next);
        edge.truncate(next);

        // Parents always carry larger ids, so a descending sweep sees them first.
        let mut depth = vec![0u32; next];
        for v in (0..next).rev() {
            let p = parent[v];
            if p != v {
                depth[v] = depth[p] + 1;
            }
        }
        let mut up = vec![parent];
        let mut span = 1usize;
        while span < next {
            let prev = &up[up.len() - 1];
            let level: Vec<usize> = (0..next).map(|v| prev[prev[v]]).collect();
            up.push(level);
            span *= 2;
        }
        let max_edge = sorted.iter().map(|e| e.len).fold(0.0, f64::max);
        Self {
            n,
            edge,
            depth,
            up,
            max_edge,
        }
    }

    /// Longest MST edge on the path between `i` and `j`; `0` when `i == j`,
    /// infinite when they lie in different components.
    pub fn bsd(&self, i: usize, j: usize) -> f64 {
        debug_assert!(i < self.n && j < self.n);
        if i == j {
            return 0.0;
        }
        let (mut a, mut b) = (i, j);
        if self.depth[a] < self.depth[b] {
            std::mem::swap(&mut a, &mut b);
        }
        let mut diff = self.depth[a] - self.depth[b];
        let mut level = 0;
        while diff > 0 {
            if diff & 1 == 1 {
                a = self.up[level][a];
            }
            diff >>= 1;
            level += 1;
        }
        if a == b {
            return self.edge[a];
        }
        for l in (0..self.up.len()).rev() {
            if self.up[l][a] != self.up[l][b] {
                a = self.up[l][a];
                b = self.up[l][b];
            }
        }
        let (pa, pb) = (self.up[0][a], self.up[0][b]);
        if pa != pb {
            return f64::INFINITY;
        }
        self.edge[pa]
    }

    /// Longest edge of the underlying tree (0 for fewer than two terminals).
    #[inline]
    pub fn max_edge(&self) -> f64 {
        self.max_edge
    }
}
