//! Workspace creation with `text2workspace.py`.

use std::path::{Path, PathBuf};

use tc_core::Result;

use crate::tools::{ToolCommand, ToolConfig, ToolRunner, check_artifact, execute};
use crate::topology::AnalysisTopology;

/// Workspace file name inside the output directory.
pub const WORKSPACE_NAME: &str = "workspace.root";

/// `--PO map=.*/<sig>:r_<sig>[init,lo,hi]` for one signal process.
pub fn poi_map(signal: &str, tools: &ToolConfig) -> String {
    let [lo, hi] = tools.poi_range;
    format!("map=.*/{signal}:r_{signal}[{},{lo},{hi}]", tools.poi_init)
}

/// Build the workspace command: one POI per signal process.
pub fn workspace_command(
    datacard: &Path,
    workspace: &Path,
    topology: &AnalysisTopology,
    tools: &ToolConfig,
) -> ToolCommand {
    let mut cmd = ToolCommand::new(&tools.text2workspace)
        .arg("-m")
        .arg(&topology.mass)
        .path_arg(datacard)
        .arg("-o")
        .path_arg(workspace)
        .arg("-P")
        .arg(&tools.physics_model)
        .args(["--PO", "verbose"]);
    for sig in &topology.signals {
        cmd = cmd.arg("--PO").arg(poi_map(sig, tools));
    }
    cmd
}

/// Run `text2workspace.py` on `datacard`, producing `workspace`.
pub fn create_workspace<R: ToolRunner + ?Sized>(
    runner: &mut R,
    datacard: &Path,
    workspace: &Path,
    topology: &AnalysisTopology,
    tools: &ToolConfig,
) -> Result<PathBuf> {
    log::info!("creating workspace {}", workspace.display());
    let cmd = workspace_command(datacard, workspace, topology, tools);
    execute(runner, &cmd)?;
    check_artifact("text2workspace", workspace);
    Ok(workspace.to_path_buf())
}
