//! Random terminal sets on an integer grid (replay tokens).
//!
//! Determinism uses a replay token `(seed, index)` mixed into a single RNG,
//! so instance `k` of a stream can be regenerated without drawing `0..k`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geom::Point;

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    pub fn to_std_rng(self) -> StdRng {
        // SplitMix64 finalizer
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Terminal sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct TerminalCfg {
    pub count: usize,
    /// Number of grid lines per axis; coordinates are `0..grid` scaled by
    /// `span / grid`.
    pub grid: u32,
    pub span: f64,
}

impl Default for TerminalCfg {
    fn default() -> Self {
        Self {
            count: 20,
            grid: 1000,
            span: 1000.0,
        }
    }
}

/// Draw `cfg.count` terminals uniformly on the grid. Duplicates are possible.
pub fn draw_terminals(cfg: TerminalCfg, tok: ReplayToken) -> Vec<Point> {
    let mut rng = tok.to_std_rng();
    let grid = cfg.grid.max(1);
    let step = cfg.span / f64::from(grid);
    (0..cfg.count)
        .map(|_| {
            let x = rng.gen_range(0..grid);
            let y = rng.gen_range(0..grid);
            Point::new(f64::from(x) * step, f64::from(y) * step)
        })
        .collect()
}
