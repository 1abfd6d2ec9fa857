//! Solve a few random instances and compare against the MST.
//!
//! Usage:
//!   cargo run -p rsmt --example random_tree -- 30
//!
//! Prints, per instance: terminal count, Steiner points, RSMT and MST length.

use rsmt::api::{mst_length, solve_report};
use rsmt::ip::MicroLp;
use rsmt::prelude::*;

fn main() {
    let count = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(20);
    let cfg = TerminalCfg {
        count,
        grid: 100,
        span: 100.0,
    };
    for index in 0..5 {
        let pts = draw_terminals(cfg, ReplayToken { seed: 7, index });
        match solve_report(&pts, &RsmtCfg::default(), &MicroLp) {
            Ok(rep) => println!(
                "instance {index}: n={}, steiners={}, rsmt={:.1}, mst={:.1}, lb={:.2}",
                pts.len(),
                rep.result.steiners.len(),
                rep.result.length,
                mst_length(&pts),
                rep.lower_bound
            ),
            Err(e) => eprintln!("instance {index}: {e}"),
        }
    }
}
