use super::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn brute_empty(pts: &[Point], i: usize, j: usize) -> bool {
    let (xlo, xhi) = (pts[i].x.min(pts[j].x), pts[i].x.max(pts[j].x));
    let (ylo, yhi) = (pts[i].y.min(pts[j].y), pts[i].y.max(pts[j].y));
    !pts.iter().enumerate().any(|(k, p)| {
        k != i && k != j && p.x > xlo && p.x < xhi && p.y > ylo && p.y < yhi
    })
}

fn grid_points(n: usize, span: i32, seed: u64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            Point::new(
                f64::from(rng.gen_range(0..span)),
                f64::from(rng.gen_range(0..span)),
            )
        })
        .collect()
}

#[test]
fn distance_decomposition_per_direction() {
    let a = Point::new(1.0, 1.0);
    let b = Point::new(4.0, -1.0);
    assert_eq!(rect_dist(&a, &b), 5.0);
    assert_eq!(dist_along(Dir::East, &a, &b), 3.0);
    assert_eq!(dist_along(Dir::West, &a, &b), -3.0);
    assert_eq!(dist_along(Dir::South, &a, &b), 2.0);
    assert_eq!(dist_along(Dir::North, &a, &b), -2.0);
    // Right of east-bound travel, left of south-bound travel.
    assert_eq!(offset_left(Dir::East, &a, &b), -2.0);
    assert_eq!(offset_left(Dir::South, &a, &b), 3.0);
    for dir in Dir::ALL {
        let along = dist_along(dir, &a, &b).abs();
        assert_eq!(along + dist_across(dir, &a, &b), rect_dist(&a, &b));
    }
}

#[test]
fn corner_takes_along_and_across_sources() {
    let leg = Point::new(5.0, 7.0);
    let root = Point::new(0.0, 2.0);
    assert_eq!(corner(Dir::East, &leg, &root), Point::new(5.0, 2.0));
    assert_eq!(corner(Dir::North, &leg, &root), Point::new(0.0, 7.0));
}

#[test]
fn east_chain_is_sorted_by_x_then_y() {
    let pts = grid_points(40, 6, 3);
    let succ = Successors::new(&pts);
    let first = (0..pts.len())
        .min_by(|&a, &b| {
            pts[a]
                .x
                .total_cmp(&pts[b].x)
                .then(pts[a].y.total_cmp(&pts[b].y))
                .then(a.cmp(&b))
        })
        .unwrap();
    let order: Vec<usize> = std::iter::once(first)
        .chain(succ.chain(Dir::East, first))
        .collect();
    assert_eq!(order.len(), pts.len());
    for w in order.windows(2) {
        let (p, q) = (pts[w[0]], pts[w[1]]);
        assert!(p.x < q.x || (p.x == q.x && (p.y < q.y || (p.y == q.y && w[0] < w[1]))));
        assert_eq!(succ.next(Dir::West, w[1]), Some(w[0]));
    }
}

#[test]
fn north_and_south_are_mutual_inverses() {
    let pts = grid_points(25, 10, 11);
    let succ = Successors::new(&pts);
    for i in 0..pts.len() {
        if let Some(j) = succ.next(Dir::North, i) {
            assert_eq!(succ.next(Dir::South, j), Some(i));
            assert!(pts[j].y >= pts[i].y);
        }
    }
}

#[test]
fn empty_rects_match_brute_force() {
    for seed in 0..6 {
        let pts = grid_points(30, 8, seed);
        let succ = Successors::new(&pts);
        let rects = EmptyRects::new(&pts, &succ);
        for i in 0..pts.len() {
            for j in 0..pts.len() {
                if i != j {
                    assert_eq!(
                        rects.is_empty(i, j),
                        brute_empty(&pts, i, j),
                        "seed {seed} pair ({i},{j})"
                    );
                }
            }
        }
    }
}

#[test]
fn empty_rect_boundary_points_do_not_count() {
    // (1,0) and (0,1) sit on the boundary of the rectangle (0,0)-(2,2);
    // (1,1) is strictly inside.
    let pts = vec![
        Point::new(0.0, 0.0),
        Point::new(2.0, 2.0),
        Point::new(1.0, 0.0),
        Point::new(0.0, 1.0),
    ];
    let succ = Successors::new(&pts);
    let rects = EmptyRects::new(&pts, &succ);
    assert!(rects.is_empty(0, 1));
    let mut with_center = pts.clone();
    with_center.push(Point::new(1.0, 1.0));
    let succ = Successors::new(&with_center);
    let rects = EmptyRects::new(&with_center, &succ);
    assert!(!rects.is_empty(0, 1));
    assert!(rects.is_empty(2, 3));
}
