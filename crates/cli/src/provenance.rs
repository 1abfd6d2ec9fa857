//! Provenance sidecars for solver runs.
//!
//! Every file the CLI writes (terminal sets, solutions) gets a sibling
//! `<stem>.provenance.json` naming the code revision, the library version, the
//! terminal file it was computed from and the solver parameters.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, Serialize)]
pub struct Callsite {
    pub file: &'static str,
    pub line: u32,
}

/// Contents of one sidecar.
#[derive(Debug, Serialize)]
pub struct Sidecar {
    pub code_rev: String,
    pub rsmt_version: &'static str,
    pub callsite: Callsite,
    pub tag: Option<String>,
    pub inputs: Vec<String>,
    pub params: Value,
    pub outputs: Vec<String>,
}

impl Sidecar {
    /// Record for a run with the given parameters; the callsite is the caller.
    #[track_caller]
    pub fn capture(params: Value, tag: Option<String>) -> Self {
        let loc = Location::caller();
        Self {
            code_rev: current_git_rev(),
            rsmt_version: rsmt::VERSION,
            callsite: Callsite {
                file: loc.file(),
                line: loc.line(),
            },
            tag,
            inputs: Vec::new(),
            params,
            outputs: Vec::new(),
        }
    }

    pub fn with_input(mut self, input: &Path) -> Self {
        self.inputs.push(input.to_string_lossy().into_owned());
        self
    }

    /// Write the sidecar next to `artifact` and return its path.
    pub fn write_next_to(mut self, artifact: &Path) -> Result<PathBuf> {
        self.outputs.push(artifact.to_string_lossy().into_owned());
        let path = sidecar_path(artifact);
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating sidecar dir {}", dir.display()))?;
        }
        fs::write(&path, serde_json::to_vec_pretty(&self)?)
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }
}

fn sidecar_path(artifact: &Path) -> PathBuf {
    let stem = artifact
        .file_stem()
        .map_or_else(|| "solution".into(), |s| s.to_string_lossy().into_owned());
    artifact.with_file_name(format!("{stem}.provenance.json"))
}

/// `GIT_COMMIT` (build time, then run time), else `git rev-parse HEAD`.
pub fn current_git_rev() -> String {
    let from_env = option_env!("GIT_COMMIT")
        .map(str::to_string)
        .or_else(|| std::env::var("GIT_COMMIT").ok())
        .filter(|s| !s.is_empty());
    if let Some(rev) = from_env {
        return rev;
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map_or_else(|| "unknown".to_string(), |s| s.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn sidecar_sits_next_to_the_solution() {
        assert_eq!(
            sidecar_path(Path::new("/tmp/runs/square.json")),
            Path::new("/tmp/runs/square.provenance.json")
        );
    }

    #[test]
    fn sidecar_records_input_params_and_tag() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("terminals.csv");
        let artifact = dir.path().join("tree.json");
        fs::write(&artifact, "{}").unwrap();
        let path = Sidecar::capture(json!({"branching": "root-only"}), Some("nightly".into()))
            .with_input(&input)
            .write_next_to(&artifact)
            .unwrap();
        let parsed: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(parsed["outputs"][0], artifact.to_string_lossy().as_ref());
        assert_eq!(parsed["inputs"][0], input.to_string_lossy().as_ref());
        assert_eq!(parsed["tag"], "nightly");
        assert_eq!(parsed["params"]["branching"], "root-only");
        assert_eq!(parsed["rsmt_version"], rsmt::VERSION);
        assert!(parsed["callsite"]["file"]
            .as_str()
            .is_some_and(|f| f.ends_with("provenance.rs")));
    }
}
