//! `toycombine`: generate toy histograms and run the Combine fit chain on them.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tc_combine::SystemRunner;

mod pipeline;

use pipeline::PipelineConfig;

#[derive(Parser)]
#[command(name = "toycombine")]
#[command(about = "Toy histograms, datacard, workspace and multi-signal fit")]
#[command(version = tc_core::VERSION)]
struct Cli {
    /// Verbosity: 0 info, 1 debug, 2+ trace. A bare flag means 1.
    #[arg(short, long, num_args = 0..=1, default_value_t = 0, default_missing_value = "1")]
    verbose: u8,

    /// JSON or YAML configuration overriding the built-in toy.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).with_target(false).with_writer(std::io::stderr).init();

    let cfg = match &cli.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };

    let out = pipeline::run(&cfg, &mut SystemRunner)?;
    tracing::info!(
        plot = %out.plot.display(),
        hists = %out.hist_file.display(),
        datacard = %out.datacard.display(),
        shapes = %out.shapes.display(),
        workspace = %out.workspace.display(),
        "pipeline finished"
    );
    if !out.fit.stdout.trim().is_empty() {
        println!("{}", out.fit.stdout.trim_end());
    }
    println!("Done.");
    Ok(())
}
