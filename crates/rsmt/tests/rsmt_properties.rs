use proptest::prelude::*;
use rsmt::api::solve_report;
use rsmt::geom::rect_dist;
use rsmt::ip::MicroLp;
use rsmt::mst::{mst_length, Dsuf};
use rsmt::prelude::*;
use rsmt::RsmtError;

fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
    coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

/// Connected, acyclic, axis-aligned, and consistent with its own length.
fn assert_valid_tree(res: &RsmtResult) {
    let n = res.terminals.len();
    let nodes = n + res.steiners.len();
    let node = |ep: Endpoint| match ep {
        Endpoint::Terminal(i) => i,
        Endpoint::Steiner(k) => n + k,
    };
    assert_eq!(res.edges.len(), res.edge_ids.len());
    assert_eq!(res.edges.len(), nodes.saturating_sub(1));

    let mut dsuf = Dsuf::new(nodes);
    let mut total = 0.0;
    for (&[p, q], &(a, b)) in res.edges.iter().zip(&res.edge_ids) {
        assert_eq!(p, res.resolve(a));
        assert_eq!(q, res.resolve(b));
        assert!(p.x == q.x || p.y == q.y, "diagonal edge {p:?} -> {q:?}");
        assert!(dsuf.union(node(a), node(b)), "cycle through {a:?} -> {b:?}");
        total += rect_dist(&p, &q);
    }
    assert!(dsuf.component_count() <= 1);
    assert!((total - res.length).abs() <= 1e-9 * res.length.max(1.0));
}

#[test]
fn empty_and_single_terminal() {
    let none = rsmt(&[]).expect("empty input");
    assert_eq!(none.length, 0.0);
    assert!(none.edges.is_empty() && none.steiners.is_empty());

    let one = rsmt(&pts(&[(4.0, -2.0)])).expect("one terminal");
    assert_eq!(one.terminals.len(), 1);
    assert_eq!(one.length, 0.0);
    assert!(one.edges.is_empty());
}

#[test]
fn two_terminals_bend_through_one_steiner_point() {
    let res = rsmt(&pts(&[(0.0, 0.0), (3.0, 4.0)])).expect("solve");
    assert_eq!(res.length, 7.0);
    assert_eq!(res.steiners.len(), 1);
    assert_eq!(res.edges.len(), 2);
    assert_eq!(res.edge_ids_signed(), vec![[1, 0], [0, 2]]);
    assert_valid_tree(&res);
}

#[test]
fn collinear_terminals_need_no_steiner_points() {
    let res = rsmt(&pts(&[(0.0, 0.0), (5.0, 0.0), (2.0, 0.0), (9.0, 0.0)])).expect("solve");
    assert_eq!(res.length, 9.0);
    assert!(res.steiners.is_empty());
    assert_eq!(res.edges.len(), 3);
    assert_valid_tree(&res);
}

#[test]
fn square_with_center_beats_the_mst() {
    let p = pts(&[(0.0, 0.0), (2.0, 0.0), (0.0, 2.0), (2.0, 2.0), (1.0, 1.0)]);
    let report = solve_report(&p, &RsmtCfg::default(), &MicroLp).expect("solve");
    assert_eq!(report.mst_length, 8.0);
    assert!((report.result.length - 6.0).abs() < 1e-9);
    assert!(report.lower_bound <= report.result.length + 1e-9);
    assert!(report.fsts > 4);
    assert_valid_tree(&report.result);
}

#[test]
fn plus_shape_uses_the_cross() {
    let res = rsmt(&pts(&[(1.0, 0.0), (0.0, 1.0), (2.0, 1.0), (1.0, 2.0)])).expect("solve");
    assert!((res.length - 4.0).abs() < 1e-9);
    assert_eq!(res.steiners, vec![Point::new(1.0, 1.0)]);
    assert_valid_tree(&res);
}

#[test]
fn non_finite_input_is_rejected() {
    let err = rsmt(&pts(&[(0.0, 0.0), (f64::NAN, 1.0)])).unwrap_err();
    assert!(matches!(err, RsmtError::NonFinite { index: 1 }));
    let err = rsmt(&pts(&[(f64::INFINITY, 0.0)])).unwrap_err();
    assert!(matches!(err, RsmtError::NonFinite { index: 0 }));
}

#[test]
fn random_instances_stay_below_the_mst() {
    let cfg = TerminalCfg {
        count: 30,
        grid: 40,
        span: 40.0,
    };
    for index in 0..4 {
        let p = draw_terminals(cfg, ReplayToken { seed: 17, index });
        let res = rsmt(&p).expect("solve");
        assert_valid_tree(&res);
        assert!(res.length <= mst_length(&p) + 1e-9);
    }
}

/// Optimum over Hanan-grid Steiner points: the shortest MST of the terminals
/// plus at most `n - 2` grid points. Only for small instances.
fn hanan_optimum(p: &[Point]) -> f64 {
    let mut xs: Vec<f64> = p.iter().map(|q| q.x).collect();
    let mut ys: Vec<f64> = p.iter().map(|q| q.y).collect();
    for v in [&mut xs, &mut ys] {
        v.sort_by(f64::total_cmp);
        v.dedup();
    }
    let grid: Vec<Point> = xs
        .iter()
        .flat_map(|&x| ys.iter().map(move |&y| Point::new(x, y)))
        .filter(|g| !p.contains(g))
        .collect();

    fn search(grid: &[Point], start: usize, left: usize, nodes: &mut Vec<Point>, best: &mut f64) {
        *best = best.min(mst_length(nodes));
        if left == 0 {
            return;
        }
        for i in start..grid.len() {
            nodes.push(grid[i]);
            search(grid, i + 1, left - 1, nodes, best);
            nodes.pop();
        }
    }

    let mut nodes = p.to_vec();
    let mut best = f64::INFINITY;
    search(&grid, 0, p.len().saturating_sub(2), &mut nodes, &mut best);
    best
}

#[test]
fn shared_leaf_terminal_keeps_its_long_leg() {
    // (5, 6) is a leaf of the 3-terminal FST with a leg of 5 but has a
    // neighbour at distance 4
    let p = pts(&[(6.0, 9.0), (5.0, 6.0), (1.0, 4.0), (2.0, 0.0)]);
    assert_eq!(mst_length(&p), 15.0);
    let res = rsmt_with(&p, &RsmtCfg::exhaustive(), &MicroLp).expect("solve");
    assert_valid_tree(&res);
    assert_eq!(res.length, 14.0);
    assert_eq!(hanan_optimum(&p), 14.0);
}

#[test]
fn exhaustive_matches_hanan_grid_optimum_on_seeded_instances() {
    let cfg = TerminalCfg {
        count: 6,
        grid: 10,
        span: 10.0,
    };
    for index in 0..24 {
        let p = draw_terminals(cfg, ReplayToken { seed: 5, index });
        let res = rsmt_with(&p, &RsmtCfg::exhaustive(), &MicroLp).expect("solve");
        let opt = hanan_optimum(&p);
        assert!((res.length - opt).abs() < 1e-6, "index {index}: {} vs {opt} for {p:?}", res.length);
    }
}

fn grid_terminals(max: usize) -> impl Strategy<Value = Vec<Point>> {
    prop::collection::vec((0i32..12, 0i32..12), 0..max)
        .prop_map(|v| v.into_iter().map(|(x, y)| Point::new(f64::from(x), f64::from(y))).collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn result_is_a_valid_tree_no_longer_than_the_mst(p in grid_terminals(10)) {
        let res = rsmt(&p).expect("solve");
        prop_assert_eq!(res.terminals.len(), p.len());
        assert_valid_tree(&res);
        prop_assert!(res.length <= mst_length(&p) + 1e-9);
    }

    #[test]
    fn exhaustive_length_equals_hanan_grid_optimum(p in grid_terminals(7)) {
        let res = rsmt_with(&p, &RsmtCfg::exhaustive(), &MicroLp).expect("solve");
        let opt = hanan_optimum(&p);
        prop_assert!((res.length - opt).abs() < 1e-6, "{} vs {} for {:?}", res.length, opt, p);
    }

    #[test]
    fn optimal_length_ignores_input_order(p in grid_terminals(8)) {
        let cfg = RsmtCfg::exhaustive();
        let forward = rsmt_with(&p, &cfg, &MicroLp).expect("solve");
        let mut rev = p.clone();
        rev.reverse();
        let backward = rsmt_with(&rev, &cfg, &MicroLp).expect("solve");
        prop_assert!((forward.length - backward.length).abs() < 1e-6,
            "{} vs {}", forward.length, backward.length);
    }
}
