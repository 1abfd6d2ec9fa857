//! LP relaxation: backend-neutral model, the `microlp` backend, and the
//! row-generation loop over the constraint pool.

use good_lp::{
    variable, Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable,
};
use tracing::{debug, trace};

use crate::cfg::RsmtCfg;
use crate::error::{Result, RsmtError};
use crate::fst::FstSet;
use crate::mst::Dsuf;

use super::pool::{ConstraintPool, RowSense};

#[derive(Clone, Debug)]
pub struct LpRow {
    pub coefs: Vec<(usize, f64)>,
    pub sense: RowSense,
    pub rhs: f64,
}

/// `min costs·x` subject to `rows` and `lower <= x <= upper`.
#[derive(Clone, Debug, Default)]
pub struct LpModel {
    pub costs: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    pub rows: Vec<LpRow>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LpOutcome {
    Optimal { objective: f64, values: Vec<f64> },
    Infeasible,
}

/// Seam between the cutting-plane loop and an LP backend.
pub trait LpSolver {
    fn solve(&self, model: &LpModel) -> Result<LpOutcome>;
}

/// Pure-Rust simplex through `good_lp`'s `microlp` backend.
#[derive(Clone, Copy, Debug, Default)]
pub struct MicroLp;

impl LpSolver for MicroLp {
    fn solve(&self, model: &LpModel) -> Result<LpOutcome> {
        let mut vars = ProblemVariables::new();
        let xs: Vec<Variable> = model
            .lower
            .iter()
            .zip(&model.upper)
            .map(|(&lo, &hi)| vars.add(variable().min(lo).max(hi)))
            .collect();

        let mut objective: Expression = 0.into();
        for (&x, &c) in xs.iter().zip(&model.costs) {
            objective += x * c;
        }
        let mut problem = vars
            .minimise(objective)
            .using(good_lp::solvers::microlp::microlp);

        for row in &model.rows {
            if row.coefs.is_empty() {
                let holds = match row.sense {
                    RowSense::Eq => row.rhs == 0.0,
                    RowSense::Ge => row.rhs <= 0.0,
                    RowSense::Le => row.rhs >= 0.0,
                };
                if !holds {
                    return Ok(LpOutcome::Infeasible);
                }
                continue;
            }
            let mut lhs: Expression = 0.into();
            for &(j, c) in &row.coefs {
                lhs += xs[j] * c;
            }
            let constraint = match row.sense {
                RowSense::Eq => lhs.eq(row.rhs),
                RowSense::Ge => lhs.geq(row.rhs),
                RowSense::Le => lhs.leq(row.rhs),
            };
            problem.add_constraint(constraint);
        }

        match problem.solve() {
            Ok(solution) => {
                let values: Vec<f64> = xs.iter().map(|&x| solution.value(x)).collect();
                let objective = model.costs.iter().zip(&values).map(|(c, v)| c * v).sum();
                Ok(LpOutcome::Optimal { objective, values })
            }
            Err(ResolutionError::Infeasible) => Ok(LpOutcome::Infeasible),
            Err(e) => Err(RsmtError::LpStatus {
                status: e.to_string(),
            }),
        }
    }
}

/// Objective, `[0, 1]` bounds narrowed by the branch fixings, and the
/// currently selected pool rows.
pub fn initial_formulation(set: &FstSet, pool: &ConstraintPool, fixed: &[(usize, bool)]) -> LpModel {
    let m = set.len();
    let mut lower = vec![0.0; m];
    let mut upper = vec![1.0; m];
    for &(j, one) in fixed {
        let v = if one { 1.0 } else { 0.0 };
        lower[j] = v;
        upper[j] = v;
    }
    LpModel {
        costs: set.fsts.iter().map(|f| f.length).collect(),
        lower,
        upper,
        rows: pool
            .selected()
            .map(|r| LpRow {
                coefs: r.coefs.clone(),
                sense: r.sense,
                rhs: r.rhs,
            })
            .collect(),
    }
}

/// Add a subtour row for every connected component of the LP support whose
/// row is violated at `x`. Returns the number of new rows.
pub fn separate_subtours(set: &FstSet, pool: &mut ConstraintPool, x: &[f64], eps: f64) -> usize {
    let n = set.n_terminals;
    let mut dsuf = Dsuf::new(n);
    for (fst, &v) in set.fsts.iter().zip(x) {
        if v > eps {
            for w in fst.terminals.windows(2) {
                dsuf.union(w[0], w[1]);
            }
        }
    }
    let mut comps: Vec<Vec<usize>> = vec![Vec::new(); n];
    for t in 0..n {
        comps[dsuf.find(t)].push(t);
    }

    let mut added = 0;
    for comp in comps.iter().filter(|c| c.len() >= 2) {
        let mut member = vec![false; n];
        for &t in comp {
            member[t] = true;
        }
        let lhs: f64 = set
            .fsts
            .iter()
            .zip(x)
            .map(|(fst, &v)| {
                let k = fst.terminals.iter().filter(|&&t| member[t]).count();
                k.saturating_sub(1) as f64 * v
            })
            .sum();
        if lhs > (comp.len() - 1) as f64 + eps && pool.add_subtour_row(set, comp).is_some() {
            added += 1;
        }
    }
    added
}

/// Re-solve until no pool row and no component subtour row is violated, or
/// `cfg.max_cut_rounds` LPs have been solved. A capped run still returns the
/// last optimum, which remains a valid lower bound.
pub fn solve_lp_over_constraint_pool(
    set: &FstSet,
    pool: &mut ConstraintPool,
    fixed: &[(usize, bool)],
    cfg: &RsmtCfg,
    solver: &dyn LpSolver,
) -> Result<LpOutcome> {
    let mut last = LpOutcome::Infeasible;
    for round in 0..cfg.max_cut_rounds.max(1) {
        let model = initial_formulation(set, pool, fixed);
        let outcome = solver.solve(&model)?;
        let LpOutcome::Optimal { objective, values } = &outcome else {
            trace!(round, "LP infeasible");
            return Ok(outcome);
        };
        let mut added = pool.activate_violated(values, cfg.lp_eps);
        if added == 0 {
            added = separate_subtours(set, pool, values, cfg.lp_eps);
        }
        trace!(round, objective, added, rows = model.rows.len(), "LP round");
        if added == 0 {
            return Ok(outcome);
        }
        last = outcome;
    }
    debug!(rounds = cfg.max_cut_rounds, "cut round limit reached");
    Ok(last)
}
