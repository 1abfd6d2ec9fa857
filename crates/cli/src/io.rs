//! Terminal files in and solution files out.
//!
//! - `.csv`: columns `x` and `y`, read lazily with polars.
//! - anything else: JSON array of `[x, y]` pairs.

use std::fs::{self, File};
use std::path::Path;

use anyhow::{bail, Context, Result};
use polars::prelude::*;
use rsmt::{Point, RsmtResult, SolveReport};
use serde::{Deserialize, Serialize};

fn is_csv(path: &Path) -> bool {
    path.extension().is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

pub fn read_terminals(path: &Path) -> Result<Vec<Point>> {
    if is_csv(path) {
        read_csv(path)
    } else {
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let pairs: Vec<[f64; 2]> =
            serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))?;
        Ok(pairs.into_iter().map(|[x, y]| Point::new(x, y)).collect())
    }
}

fn read_csv(path: &Path) -> Result<Vec<Point>> {
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(100))
        .finish()?
        .select([
            col("x").cast(DataType::Float64),
            col("y").cast(DataType::Float64),
        ])
        .collect()
        .with_context(|| format!("reading x,y columns of {}", path.display()))?;
    let xs = df.column("x")?.f64()?;
    let ys = df.column("y")?.f64()?;
    let mut out = Vec::with_capacity(df.height());
    for (row, (x, y)) in xs.into_iter().zip(ys.into_iter()).enumerate() {
        match (x, y) {
            (Some(x), Some(y)) => out.push(Point::new(x, y)),
            _ => bail!("row {row} of {} has a missing coordinate", path.display()),
        }
    }
    Ok(out)
}

pub fn write_terminals(path: &Path, pts: &[Point]) -> Result<()> {
    create_parent(path)?;
    if is_csv(path) {
        let xs: Vec<f64> = pts.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = pts.iter().map(|p| p.y).collect();
        let mut df = df!("x" => xs, "y" => ys)?;
        let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        CsvWriter::new(&mut file).finish(&mut df)?;
    } else {
        let pairs: Vec<[f64; 2]> = pts.iter().map(|p| [p.x, p.y]).collect();
        fs::write(path, serde_json::to_vec_pretty(&pairs)?)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(())
}

/// JSON shape of a solved instance.
#[derive(Debug, Serialize, Deserialize)]
pub struct SolutionDoc {
    pub terminals: Vec<[f64; 2]>,
    pub steiners: Vec<[f64; 2]>,
    pub edges: Vec<[[f64; 2]; 2]>,
    /// Signed endpoint ids: terminal `i` is `i + 1`, Steiner point `k` is `-k`.
    pub edge_ids: Vec<[i64; 2]>,
    pub length: f64,
    pub mst_length: f64,
    pub lower_bound: f64,
    pub proven_optimal: bool,
    pub fsts: usize,
    pub nodes: usize,
}

impl SolutionDoc {
    pub fn from_report(rep: &SolveReport) -> Self {
        let res: &RsmtResult = &rep.result;
        let xy = |p: &Point| [p.x, p.y];
        Self {
            terminals: res.terminals.iter().map(xy).collect(),
            steiners: res.steiners.iter().map(xy).collect(),
            edges: res.edges.iter().map(|[a, b]| [xy(a), xy(b)]).collect(),
            edge_ids: res.edge_ids_signed(),
            length: res.length,
            mst_length: rep.mst_length,
            lower_bound: rep.lower_bound,
            proven_optimal: rep.proven_optimal,
            fsts: rep.fsts,
            nodes: rep.nodes,
        }
    }
}

pub fn write_solution(path: &Path, doc: &SolutionDoc) -> Result<()> {
    create_parent(path)?;
    fs::write(path, serde_json::to_vec_pretty(doc)?).with_context(|| format!("writing {}", path.display()))
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    Ok(())
}
