//! Multi-signal maximum-likelihood fit with `combineTool.py`.

use std::path::Path;

use tc_core::Result;

use crate::tools::{ToolCommand, ToolConfig, ToolOutput, ToolRunner, execute};
use crate::topology::AnalysisTopology;

/// `r_sig1,r_sig2,...` in signal order.
pub fn signal_pois(topology: &AnalysisTopology) -> Vec<String> {
    topology.signals.iter().map(|s| format!("r_{s}")).collect()
}

/// Build the fit command. Every signal strength starts at the configured
/// initial value and is a POI of the fit.
pub fn fit_command(workspace: &Path, topology: &AnalysisTopology, tools: &ToolConfig) -> ToolCommand {
    let pois = signal_pois(topology);
    let set: Vec<String> = pois.iter().map(|p| format!("{p}={}", tools.poi_init)).collect();
    ToolCommand::new(&tools.combine_tool)
        .arg("-M")
        .arg(&tools.method)
        .arg("-d")
        .path_arg(workspace)
        .arg("--setParameters")
        .arg(set.join(","))
        .arg("--redefineSignalPOIs")
        .arg(pois.join(","))
        .args(tools.extra_fit_args.iter().cloned())
}

/// Run the fit on `workspace` and return the captured tool output.
pub fn multidim_fit<R: ToolRunner + ?Sized>(
    runner: &mut R,
    workspace: &Path,
    topology: &AnalysisTopology,
    tools: &ToolConfig,
) -> Result<ToolOutput> {
    log::info!("fitting {}", workspace.display());
    execute(runner, &fit_command(workspace, topology, tools))
}
