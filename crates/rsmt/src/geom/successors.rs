//! Successor chains and the empty-rectangle table.
//!
//! Purpose
//! - `Successors`: for every terminal, its neighbour one step further in each
//!   of the four sorted orders. East/west follow `(x, y, index)`, north/south
//!   follow `(y, x, index)`. Chains are singly linked and end in `None`.
//! - `EmptyRects`: for every terminal pair, whether the open rectangle they
//!   span contains no other terminal.
//!
//! The rectangle table is filled with one sweep per terminal along its east
//! chain, carrying the nearest terminal above and below the horizontal line
//! through the sweep origin. Worst case is quadratic, which is what the FST
//! generator can afford anyway.

use super::types::{Dir, Point};

/// Successor arrays for the four directions.
#[derive(Clone, Debug)]
pub struct Successors {
    succ: [Vec<Option<usize>>; 4],
}

impl Successors {
    pub fn new(pts: &[Point]) -> Self {
        let n = pts.len();
        let mut by_x: Vec<usize> = (0..n).collect();
        by_x.sort_by(|&a, &b| {
            pts[a]
                .x
                .total_cmp(&pts[b].x)
                .then(pts[a].y.total_cmp(&pts[b].y))
                .then(a.cmp(&b))
        });
        let mut by_y: Vec<usize> = (0..n).collect();
        by_y.sort_by(|&a, &b| {
            pts[a]
                .y
                .total_cmp(&pts[b].y)
                .then(pts[a].x.total_cmp(&pts[b].x))
                .then(a.cmp(&b))
        });

        let mut succ: [Vec<Option<usize>>; 4] = [
            vec![None; n],
            vec![None; n],
            vec![None; n],
            vec![None; n],
        ];
        for w in by_x.windows(2) {
            succ[Dir::East.index()][w[0]] = Some(w[1]);
            succ[Dir::West.index()][w[1]] = Some(w[0]);
        }
        for w in by_y.windows(2) {
            succ[Dir::North.index()][w[0]] = Some(w[1]);
            succ[Dir::South.index()][w[1]] = Some(w[0]);
        }
        Self { succ }
    }

    /// Next terminal after `i` in direction `dir`.
    #[inline]
    pub fn next(&self, dir: Dir, i: usize) -> Option<usize> {
        self.succ[dir.index()][i]
    }

    /// Iterate the chain after `i` (exclusive) in direction `dir`.
    pub fn chain(&self, dir: Dir, i: usize) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(self.next(dir, i), move |&j| self.next(dir, j))
    }
}

/// Lower-triangular table of empty rectangles.
#[derive(Clone, Debug)]
pub struct EmptyRects {
    n: usize,
    bits: Vec<bool>,
}

impl EmptyRects {
    pub fn new(pts: &[Point], succ: &Successors) -> Self {
        let n = pts.len();
        let mut rects = Self {
            n,
            bits: vec![false; n * n.saturating_sub(1) / 2],
        };
        for i in 0..n {
            let origin = pts[i];
            // Nearest terminal strictly above / below origin.y among those
            // strictly between origin.x and the current column.
            let mut top = f64::INFINITY;
            let mut bot = f64::NEG_INFINITY;
            // Same bounds for the column currently being visited; folded in
            // once the sweep moves to a larger x.
            let mut col_top = f64::INFINITY;
            let mut col_bot = f64::NEG_INFINITY;
            let mut col_x = origin.x;
            for j in succ.chain(Dir::East, i) {
                let p = pts[j];
                if p.x > col_x {
                    top = top.min(col_top);
                    bot = bot.max(col_bot);
                    col_top = f64::INFINITY;
                    col_bot = f64::NEG_INFINITY;
                    col_x = p.x;
                }
                let empty = if p.x == origin.x || p.y == origin.y {
                    true
                } else if p.y > origin.y {
                    top >= p.y
                } else {
                    bot <= p.y
                };
                rects.set(i, j, empty);
                if p.x > origin.x {
                    if p.y > origin.y {
                        col_top = col_top.min(p.y);
                    } else if p.y < origin.y {
                        col_bot = col_bot.max(p.y);
                    }
                }
            }
        }
        rects
    }

    #[inline]
    fn slot(i: usize, j: usize) -> usize {
        let (hi, lo) = if i > j { (i, j) } else { (j, i) };
        hi * (hi - 1) / 2 + lo
    }

    fn set(&mut self, i: usize, j: usize, value: bool) {
        if i != j {
            self.bits[Self::slot(i, j)] = value;
        }
    }

    /// True iff no other terminal lies strictly inside the rectangle spanned by
    /// `i` and `j`. A terminal paired with itself is trivially empty.
    #[inline]
    pub fn is_empty(&self, i: usize, j: usize) -> bool {
        debug_assert!(i < self.n && j < self.n);
        i == j || self.bits[Self::slot(i, j)]
    }
}
