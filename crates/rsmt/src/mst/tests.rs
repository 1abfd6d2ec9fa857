use super::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_points(n: usize, seed: u64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| Point::new(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0)))
        .collect()
}

/// Longest edge on the tree path between `i` and `j` by DFS.
fn path_max(n: usize, tree: &[Edge], i: usize, j: usize) -> f64 {
    let mut adj = vec![Vec::new(); n];
    for e in tree {
        adj[e.p1].push((e.p2, e.len));
        adj[e.p2].push((e.p1, e.len));
    }
    let mut stack = vec![(i, usize::MAX, 0.0f64)];
    while let Some((v, from, worst)) = stack.pop() {
        if v == j {
            return worst;
        }
        for &(w, len) in &adj[v] {
            if w != from {
                stack.push((w, v, worst.max(len)));
            }
        }
    }
    f64::INFINITY
}

#[test]
fn dsuf_tracks_components() {
    let mut d = Dsuf::new(5);
    assert_eq!(d.component_count(), 5);
    assert!(d.union(0, 1));
    assert!(d.union(3, 4));
    assert!(!d.union(1, 0));
    assert!(d.union(1, 4));
    assert_eq!(d.component_count(), 2);
    assert_eq!(d.find(0), d.find(3));
    assert_ne!(d.find(2), d.find(4));
}

#[test]
fn kruskal_on_triangle() {
    let edges = vec![Edge::new(0, 1, 1.0), Edge::new(1, 2, 2.0), Edge::new(0, 2, 3.0)];
    let tree = mst(3, &edges);
    assert_eq!(tree.len(), 2);
    let total: f64 = tree.iter().map(|e| e.len).sum();
    assert!((total - 3.0).abs() < 1e-12);
}

#[test]
fn prim_and_kruskal_agree() {
    for seed in 0..5 {
        let pts = random_points(30, seed);
        let tree = rect_mst(&pts);
        assert_eq!(tree.len(), pts.len() - 1);
        let kruskal: f64 = tree.iter().map(|e| e.len).sum();
        assert!((kruskal - mst_length(&pts)).abs() < 1e-9);
    }
}

#[test]
fn bsd_matches_tree_path_maximum() {
    let pts = random_points(40, 7);
    let tree = rect_mst(&pts);
    let bsd = Bsd::new(pts.len(), &tree);
    for i in 0..pts.len() {
        assert_eq!(bsd.bsd(i, i), 0.0);
        for j in (i + 1)..pts.len() {
            let expected = path_max(pts.len(), &tree, i, j);
            assert_eq!(bsd.bsd(i, j), expected, "pair ({i},{j})");
            assert_eq!(bsd.bsd(j, i), expected);
            // Cycle property: the bottleneck never exceeds the direct edge.
            assert!(bsd.bsd(i, j) <= rect_dist(&pts[i], &pts[j]));
        }
    }
    let longest = tree.iter().map(|e| e.len).fold(0.0, f64::max);
    assert_eq!(bsd.max_edge(), longest);
}

#[test]
fn bsd_on_a_forest_is_infinite_across_components() {
    let forest = vec![Edge::new(0, 1, 2.0), Edge::new(2, 3, 5.0)];
    let bsd = Bsd::new(4, &forest);
    assert_eq!(bsd.bsd(0, 1), 2.0);
    assert_eq!(bsd.bsd(2, 3), 5.0);
    assert!(bsd.bsd(1, 2).is_infinite());
}

#[test]
fn degenerate_sizes() {
    assert!(mst(0, &[]).is_empty());
    assert!(rect_mst(&[Point::new(1.0, 1.0)]).is_empty());
    assert_eq!(mst_length(&[]), 0.0);
    let bsd = Bsd::new(1, &[]);
    assert_eq!(bsd.bsd(0, 0), 0.0);
    assert_eq!(bsd.max_edge(), 0.0);
}
