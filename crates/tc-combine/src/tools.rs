//! External tool invocation.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};
use tc_core::{Error, Result};

/// Program names and model options for the Combine tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Workspace builder.
    pub text2workspace: String,
    /// Fit driver.
    pub combine_tool: String,
    /// Physics model passed to `-P`.
    pub physics_model: String,
    /// Initial value of every signal-strength POI.
    pub poi_init: f64,
    /// `[lo, hi]` range of every signal-strength POI.
    pub poi_range: [f64; 2],
    /// Fit method passed to `-M`.
    pub method: String,
    /// Extra arguments appended to the fit command.
    pub extra_fit_args: Vec<String>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            text2workspace: "text2workspace.py".into(),
            combine_tool: "combineTool.py".into(),
            physics_model: "HiggsAnalysis.CombinedLimit.PhysicsModel:multiSignalModel".into(),
            poi_init: 1.0,
            poi_range: [0.0, 20.0],
            method: "MultiDimFit".into(),
            extra_fit_args: Vec::new(),
        }
    }
}

impl ToolConfig {
    /// Reject empty program names and a POI range that does not hold `poi_init`.
    pub fn validate(&self) -> Result<()> {
        if self.text2workspace.trim().is_empty() || self.combine_tool.trim().is_empty() {
            return Err(Error::Config("tool program names must not be empty".into()));
        }
        let [lo, hi] = self.poi_range;
        if !(lo.is_finite() && hi.is_finite() && lo < hi) {
            return Err(Error::Config(format!("POI range must satisfy lo < hi, got [{lo}, {hi}]")));
        }
        if !(lo..=hi).contains(&self.poi_init) {
            return Err(Error::Config(format!(
                "POI initial value {} outside range [{lo}, {hi}]",
                self.poi_init
            )));
        }
        Ok(())
    }
}

/// A fixed argument vector for one external program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    /// Executable, looked up on `PATH`.
    pub program: String,
    /// Arguments, passed without a shell.
    pub args: Vec<String>,
    /// Working directory; inherited when `None`.
    pub cwd: Option<PathBuf>,
}

impl ToolCommand {
    /// Command with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into(), args: Vec::new(), cwd: None }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append a path, lossily converted to UTF-8.
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy().into_owned())
    }

    /// Run inside `dir`.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Shell-style rendering for logs and error messages.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(shell_quote)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

fn shell_quote(s: &str) -> String {
    let plain = !s.is_empty()
        && s.chars().all(|c| c.is_ascii_alphanumeric() || "-_./=:,@%+".contains(c));
    if plain { s.to_string() } else { format!("'{}'", s.replace('\'', r"'\''")) }
}

/// Captured result of one tool run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolOutput {
    /// Exit code (`None` when terminated by a signal).
    pub code: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl ToolOutput {
    /// Exit code zero.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs external commands. Implementations only report what happened; the
/// exit-status contract is enforced by [`execute`].
pub trait ToolRunner {
    /// Run `cmd` to completion and capture its output.
    fn run(&mut self, cmd: &ToolCommand) -> Result<ToolOutput>;
}

/// Runs commands as child processes, blocking until they exit.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&mut self, cmd: &ToolCommand) -> Result<ToolOutput> {
        let mut command = Command::new(&cmd.program);
        command.args(&cmd.args);
        if let Some(dir) = &cmd.cwd {
            command.current_dir(dir);
        }
        let out = command.output().map_err(|e| Error::ExternalTool {
            command: cmd.command_line(),
            code: None,
            stderr: format!("failed to start {}: {e}", cmd.program),
        })?;
        Ok(ToolOutput {
            code: out.status.code(),
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        })
    }
}

/// Run `cmd`, logging the command line and its output; a non-zero exit
/// becomes [`Error::ExternalTool`].
pub fn execute<R: ToolRunner + ?Sized>(runner: &mut R, cmd: &ToolCommand) -> Result<ToolOutput> {
    log::info!("executing {cmd}");
    let out = runner.run(cmd)?;
    if !out.stdout.trim().is_empty() {
        log::debug!("{} stdout:\n{}", cmd.program, out.stdout.trim_end());
    }
    if !out.stderr.trim().is_empty() {
        log::debug!("{} stderr:\n{}", cmd.program, out.stderr.trim_end());
    }
    if !out.success() {
        return Err(Error::ExternalTool { command: cmd.command_line(), code: out.code, stderr: out.stderr });
    }
    Ok(out)
}

/// Warn when a stage succeeded but its expected artifact is absent.
pub(crate) fn check_artifact(stage: &str, path: &Path) -> bool {
    let present = path.exists();
    if !present {
        log::warn!("{stage} exited successfully but {} was not produced", path.display());
    }
    present
}
