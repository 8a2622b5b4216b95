//! # tc-combine
//!
//! Datacard writing and the Combine tool chain for ToyCombine:
//! card creation, `text2workspace.py`, and a `combineTool.py` MultiDimFit.
//!
//! Tools run behind the [`ToolRunner`] trait so the chain can be driven by
//! wrappers or recorded in tests.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod datacard;
pub mod fit;
pub mod tools;
pub mod topology;
pub mod workspace;

pub use datacard::{CardFiles, Datacard, create_datacard};
pub use fit::{fit_command, multidim_fit};
pub use tools::{SystemRunner, ToolCommand, ToolConfig, ToolOutput, ToolRunner, execute};
pub use topology::{AnalysisTopology, Category, LnNSystematic, Process, SystTarget};
pub use workspace::{WORKSPACE_NAME, create_workspace, workspace_command};
