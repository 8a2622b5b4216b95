//! `toycombine` pipeline: toys → plot → container → datacard → workspace → fit.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tc_combine::{AnalysisTopology, ToolConfig, ToolOutput, ToolRunner, WORKSPACE_NAME};
use tc_core::{Error, ToyConfig};
use tc_store::{StoreObject, WriteMode};
use tc_viz_render::config::PlotConfig;

/// Where pipeline files go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory for the plot and the histogram container.
    pub input_dir: PathBuf,
    /// Directory for the datacard, shapes and workspace.
    pub output_dir: PathBuf,
    pub plot_name: String,
    pub hist_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_dir: "input".into(),
            output_dir: "output".into(),
            plot_name: "hists.png".into(),
            hist_file: "hists.root".into(),
        }
    }
}

/// Full pipeline configuration; every field defaults to the built-in toy.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub toys: ToyConfig,
    pub topology: AnalysisTopology,
    pub tools: ToolConfig,
    pub paths: PathsConfig,
    pub plot: PlotConfig,
}

impl PipelineConfig {
    /// Read a JSON (`.json`) or YAML (anything else) configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let is_json = path.extension().is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let cfg = if is_json {
            serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", path.display()))?
        } else {
            serde_yaml_ng::from_str(&text).with_context(|| format!("invalid YAML in {}", path.display()))?
        };
        Ok(cfg)
    }

    /// Check every section, and that the generated histogram names are the
    /// ones the topology refers to.
    pub fn validate(&self) -> tc_core::Result<()> {
        self.toys.validate()?;
        self.topology.validate()?;
        self.tools.validate()?;
        self.plot.validate()?;

        let expected: Vec<String> = (1..=self.toys.signals.len()).map(|k| format!("sig{k}")).collect();
        if self.topology.signals != expected {
            return Err(Error::Config(format!(
                "topology signals {:?} do not match the generated {:?}",
                self.topology.signals, expected
            )));
        }
        if self.topology.backgrounds != [tc_toys::BACKGROUND_NAME] {
            return Err(Error::Config(format!(
                "topology backgrounds {:?} do not match the generated [\"{}\"]",
                self.topology.backgrounds,
                tc_toys::BACKGROUND_NAME
            )));
        }
        if self.topology.observed != tc_toys::OBSERVED_NAME {
            return Err(Error::Config(format!(
                "topology observed '{}' does not match the generated '{}'",
                self.topology.observed,
                tc_toys::OBSERVED_NAME
            )));
        }
        Ok(())
    }

    pub fn plot_path(&self) -> PathBuf {
        self.paths.input_dir.join(&self.paths.plot_name)
    }

    pub fn hist_path(&self) -> PathBuf {
        self.paths.input_dir.join(&self.paths.hist_file)
    }

    pub fn workspace_path(&self) -> PathBuf {
        self.paths.output_dir.join(WORKSPACE_NAME)
    }
}

/// Files produced by one run.
#[derive(Debug)]
pub struct PipelineOutputs {
    pub plot: PathBuf,
    pub hist_file: PathBuf,
    pub datacard: PathBuf,
    pub shapes: PathBuf,
    pub workspace: PathBuf,
    pub fit: ToolOutput,
}

/// Run every stage in order; the first failure aborts the rest.
pub fn run<R: ToolRunner + ?Sized>(cfg: &PipelineConfig, runner: &mut R) -> Result<PipelineOutputs> {
    cfg.validate().context("invalid configuration")?;

    let mut rng = StdRng::seed_from_u64(cfg.toys.seed);
    tracing::debug!(seed = cfg.toys.seed, "random generator seeded");
    let toys = tc_toys::generate(&cfg.toys, &mut rng).context("toy generation failed")?;

    let processes: Vec<_> = toys.processes().cloned().collect();
    let plot = cfg.plot_path();
    let canvas = tc_viz_render::plot_histograms(&toys.observed, &processes, &plot, &cfg.plot)
        .map_err(Error::from)
        .with_context(|| format!("plotting to {} failed", plot.display()))?;

    let mut objects = vec![StoreObject::from(canvas), StoreObject::from(toys.observed.clone())];
    objects.extend(processes.into_iter().map(StoreObject::from));
    let hist_file = tc_store::write_objects(&objects, cfg.topology.bin(), &cfg.hist_path(), WriteMode::Recreate)
        .map_err(Error::from)
        .with_context(|| format!("writing {} failed", cfg.hist_path().display()))?;

    let card = tc_combine::create_datacard(&hist_file, &cfg.paths.output_dir, &cfg.topology)
        .context("datacard creation failed")?;

    let workspace = tc_combine::create_workspace(
        runner,
        &card.datacard,
        &cfg.workspace_path(),
        &cfg.topology,
        &cfg.tools,
    )
    .context("workspace creation failed")?;

    let fit = tc_combine::multidim_fit(runner, &workspace, &cfg.topology, &cfg.tools)
        .context("multi-dimensional fit failed")?;

    Ok(PipelineOutputs { plot, hist_file, datacard: card.datacard, shapes: card.shapes, workspace, fit })
}
