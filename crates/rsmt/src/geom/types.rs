//! Basic rectilinear types: points, compass directions, distances.
//!
//! - `Point`: terminal or Steiner coordinate (nalgebra column vector).
//! - `Dir`: the four canonical growth directions (east, south, west, north).
//! - Distance helpers decompose a displacement relative to a direction.
//!
//! Conventions
//! - North is `+y`. "Left" is the left-hand side when travelling along `dir`.
//! - Every helper is an exact sum/difference of coordinates; no tolerance is
//!   applied in this layer.

use nalgebra::Vector2;

/// Terminal or Steiner coordinate.
pub type Point = Vector2<f64>;

/// Canonical growth direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    East = 0,
    South = 1,
    West = 2,
    North = 3,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::East, Dir::South, Dir::West, Dir::North];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn opposite(self) -> Dir {
        match self {
            Dir::East => Dir::West,
            Dir::South => Dir::North,
            Dir::West => Dir::East,
            Dir::North => Dir::South,
        }
    }

    /// True when travel along `self` changes `x` (east/west).
    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Dir::East | Dir::West)
    }
}

/// Rectilinear (L1) distance.
#[inline]
pub fn rect_dist(a: &Point, b: &Point) -> f64 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Signed displacement of `b` relative to `a` along `dir` (negative when `b`
/// lies behind `a`).
#[inline]
pub fn dist_along(dir: Dir, a: &Point, b: &Point) -> f64 {
    match dir {
        Dir::East => b.x - a.x,
        Dir::South => a.y - b.y,
        Dir::West => a.x - b.x,
        Dir::North => b.y - a.y,
    }
}

/// Signed perpendicular displacement of `b` relative to `a`; positive means
/// `b` lies to the left of the direction of travel.
#[inline]
pub fn offset_left(dir: Dir, a: &Point, b: &Point) -> f64 {
    match dir {
        Dir::East => b.y - a.y,
        Dir::South => b.x - a.x,
        Dir::West => a.y - b.y,
        Dir::North => a.x - b.x,
    }
}

/// Absolute perpendicular displacement of `b` relative to `a`.
#[inline]
pub fn dist_across(dir: Dir, a: &Point, b: &Point) -> f64 {
    offset_left(dir, a, b).abs()
}

/// Point whose along-`dir` coordinate is taken from `along_src` and whose
/// perpendicular coordinate is taken from `across_src`.
///
/// Used to place Steiner points on a backbone (`corner(dir, leg, root)`) and
/// on closing perpendiculars without accumulating floating error.
#[inline]
pub fn corner(dir: Dir, along_src: &Point, across_src: &Point) -> Point {
    if dir.is_horizontal() {
        Point::new(along_src.x, across_src.y)
    } else {
        Point::new(across_src.x, along_src.y)
    }
}
