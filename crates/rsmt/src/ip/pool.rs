//! Constraint pool: every row the LP may use, with an active/inactive flag.
//!
//! Rows are sparse over FST variables. The pool never forgets a row; the row
//! generation loop only flips `selected`. Identical rows (same coefficients,
//! sense and right-hand side) are stored once.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::fst::FstSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RowSense {
    Eq,
    Ge,
    Le,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowFamily {
    Spanning,
    CutSet,
    TwoSecant,
    Subtour,
}

#[derive(Clone, Debug)]
pub struct PoolRow {
    pub name: String,
    pub family: RowFamily,
    pub coefs: Vec<(usize, f64)>,
    pub sense: RowSense,
    pub rhs: f64,
    pub selected: bool,
}

impl PoolRow {
    pub fn activity(&self, x: &[f64]) -> f64 {
        self.coefs.iter().map(|&(j, c)| c * x[j]).sum()
    }

    /// Signed slack at `x`; negative iff the row is violated.
    pub fn slack(&self, x: &[f64]) -> f64 {
        let a = self.activity(x);
        match self.sense {
            RowSense::Ge => a - self.rhs,
            RowSense::Le => self.rhs - a,
            RowSense::Eq => -(a - self.rhs).abs(),
        }
    }

    fn key(&self) -> RowKey {
        let mut coefs: Vec<(usize, u64)> = self.coefs.iter().map(|&(j, c)| (j, c.to_bits())).collect();
        coefs.sort_unstable();
        (self.sense, self.rhs.to_bits(), coefs)
    }
}

type RowKey = (RowSense, u64, Vec<(usize, u64)>);

#[derive(Clone, Debug, Default)]
pub struct ConstraintPool {
    rows: Vec<PoolRow>,
    keys: HashSet<RowKey>,
}

impl ConstraintPool {
    /// Initial pool: spanning equality, one cut-set row per terminal, and the
    /// 2-secant rows of every terminal pair shared by at least two FSTs.
    pub fn build(set: &FstSet) -> Self {
        let n = set.n_terminals;
        let mut pool = Self::default();

        let spanning = set
            .fsts
            .iter()
            .enumerate()
            .map(|(f, fst)| (f, (fst.size() - 1) as f64))
            .collect();
        pool.add_row(PoolRow {
            name: "spanning".into(),
            family: RowFamily::Spanning,
            coefs: spanning,
            sense: RowSense::Eq,
            rhs: n.saturating_sub(1) as f64,
            selected: true,
        });

        for (t, trees) in set.term_trees().into_iter().enumerate() {
            pool.add_row(PoolRow {
                name: format!("cutset_{t}"),
                family: RowFamily::CutSet,
                coefs: trees.into_iter().map(|f| (f, 1.0)).collect(),
                sense: RowSense::Ge,
                rhs: 1.0,
                selected: true,
            });
        }

        let mut pairs: BTreeMap<(usize, usize), Vec<usize>> = BTreeMap::new();
        for (f, fst) in set.fsts.iter().enumerate() {
            for (a, &i) in fst.terminals.iter().enumerate() {
                for &j in &fst.terminals[a + 1..] {
                    pairs.entry((i, j)).or_default().push(f);
                }
            }
        }
        for ((i, j), trees) in pairs {
            if trees.len() < 2 {
                continue;
            }
            pool.add_row(PoolRow {
                name: format!("secant_{i}_{j}"),
                family: RowFamily::TwoSecant,
                coefs: trees.into_iter().map(|f| (f, 1.0)).collect(),
                sense: RowSense::Le,
                rhs: 1.0,
                selected: false,
            });
        }

        debug!(
            rows = pool.rows.len(),
            selected = pool.selected_count(),
            "constraint pool built"
        );
        pool
    }

    /// Append `row` unless an identical one is already present.
    pub fn add_row(&mut self, row: PoolRow) -> Option<usize> {
        if !self.keys.insert(row.key()) {
            return None;
        }
        self.rows.push(row);
        Some(self.rows.len() - 1)
    }

    /// Subtour elimination over the terminal subset `subset`:
    /// `Σ_F max(|F ∩ S| - 1, 0) x_F <= |S| - 1`. The row starts selected.
    pub fn add_subtour_row(&mut self, set: &FstSet, subset: &[usize]) -> Option<usize> {
        let mut member = vec![false; set.n_terminals];
        for &t in subset {
            member[t] = true;
        }
        let coefs: Vec<(usize, f64)> = set
            .fsts
            .iter()
            .enumerate()
            .filter_map(|(f, fst)| {
                let k = fst.terminals.iter().filter(|&&t| member[t]).count();
                (k >= 2).then(|| (f, (k - 1) as f64))
            })
            .collect();
        let rhs = subset.len().saturating_sub(1) as f64;
        let name = format!("subtour_{}", self.rows.len());
        self.add_row(PoolRow {
            name,
            family: RowFamily::Subtour,
            coefs,
            sense: RowSense::Le,
            rhs,
            selected: true,
        })
    }

    /// Select every inactive row violated by more than `eps` at `x`.
    pub fn activate_violated(&mut self, x: &[f64], eps: f64) -> usize {
        let mut added = 0;
        for row in self.rows.iter_mut().filter(|r| !r.selected) {
            if row.slack(x) < -eps {
                row.selected = true;
                added += 1;
            }
        }
        added
    }

    pub fn rows(&self) -> &[PoolRow] {
        &self.rows
    }

    pub fn selected(&self) -> impl Iterator<Item = &PoolRow> + '_ {
        self.rows.iter().filter(|r| r.selected)
    }

    pub fn selected_count(&self) -> usize {
        self.selected().count()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
