use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rsmt::api::solve_report;
use rsmt::ip::MicroLp;
use rsmt::rand::{draw_terminals, ReplayToken, TerminalCfg};
use rsmt::{Branching, RsmtCfg};
use std::path::PathBuf;
use tracing_subscriber::fmt::SubscriberBuilder;

mod io;
mod provenance;

use io::{read_terminals, write_solution, write_terminals, SolutionDoc};
use provenance::Sidecar;

#[derive(Parser)]
#[command(name = "rsmt-cli")]
#[command(about = "Rectilinear Steiner minimal trees from terminal files")]
struct Cmd {
    /// Optional run tag; propagated to provenance sidecars and logs
    #[arg(long)]
    tag: Option<String>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BranchingArg {
    RootOnly,
    BestFirst,
}

#[derive(Subcommand)]
enum Action {
    /// Solve a terminal file (.csv with x,y columns, or JSON [[x, y], ...])
    Solve {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, value_enum, default_value_t = BranchingArg::RootOnly)]
        branching: BranchingArg,
        /// Node budget for best-first branching
        #[arg(long)]
        node_limit: Option<usize>,
    },
    /// Write a random integer-grid terminal file
    Random {
        #[arg(long, default_value_t = 20)]
        count: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 0)]
        index: u64,
        #[arg(long, default_value_t = 1000)]
        grid: u32,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Solve {
            input,
            out,
            branching,
            node_limit,
        } => solve(input, out, branching, node_limit, cmd.tag),
        Action::Random {
            count,
            seed,
            index,
            grid,
            out,
        } => random(count, ReplayToken { seed, index }, grid, out, cmd.tag),
        Action::Report => report(cmd.tag),
    }
}

fn solve_cfg(branching: BranchingArg, node_limit: Option<usize>) -> RsmtCfg {
    let branching = match branching {
        BranchingArg::RootOnly => Branching::RootOnly,
        BranchingArg::BestFirst => Branching::BestFirst {
            node_limit: node_limit.unwrap_or(usize::MAX),
        },
    };
    RsmtCfg {
        branching,
        ..RsmtCfg::default()
    }
}

fn solve(
    input: PathBuf,
    out: PathBuf,
    branching: BranchingArg,
    node_limit: Option<usize>,
    tag: Option<String>,
) -> Result<()> {
    tracing::info!(input = %input.display(), out = %out.display(), ?branching, tag = ?tag, "solve");
    let terminals = read_terminals(&input)?;
    let cfg = solve_cfg(branching, node_limit);
    let rep = solve_report(&terminals, &cfg, &MicroLp)
        .with_context(|| format!("solving {}", input.display()))?;
    tracing::info!(
        terminals = terminals.len(),
        length = rep.result.length,
        mst_length = rep.mst_length,
        steiners = rep.result.steiners.len(),
        proven_optimal = rep.proven_optimal,
        "solved"
    );

    write_solution(&out, &SolutionDoc::from_report(&rep))?;
    let params = serde_json::json!({
        "input": input.to_string_lossy(),
        "terminals": terminals.len(),
        "branching": format!("{branching:?}"),
        "node_limit": node_limit,
        "lp_eps": cfg.lp_eps,
        "max_cut_rounds": cfg.max_cut_rounds,
    });
    Sidecar::capture(params, tag)
        .with_input(&input)
        .write_next_to(&out)?;
    Ok(())
}

fn random(count: usize, tok: ReplayToken, grid: u32, out: PathBuf, tag: Option<String>) -> Result<()> {
    tracing::info!(count, seed = tok.seed, index = tok.index, grid, out = %out.display(), "random");
    let cfg = TerminalCfg {
        count,
        grid,
        span: f64::from(grid),
    };
    let terminals = draw_terminals(cfg, tok);
    write_terminals(&out, &terminals)?;
    let params = serde_json::json!({
        "count": count,
        "seed": tok.seed,
        "index": tok.index,
        "grid": grid,
    });
    Sidecar::capture(params, tag).write_next_to(&out)?;
    Ok(())
}

fn report(tag: Option<String>) -> Result<()> {
    let sidecar = Sidecar::capture(serde_json::json!({}), tag);
    println!("{}", serde_json::to_string_pretty(&sidecar)?);
    Ok(())
}
