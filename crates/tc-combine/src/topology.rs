//! Analysis topology: the bins, processes and systematics a datacard describes.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tc_core::{Error, Result};

/// Which processes a systematic applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystTarget {
    /// Every signal and background process.
    All,
    /// Signal processes only.
    Signals,
    /// Background processes only.
    Backgrounds,
}

/// Flat log-normal rate uncertainty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LnNSystematic {
    /// Nuisance parameter name.
    pub name: String,
    /// Multiplicative effect on the rate (e.g. 1.02 for 2 %).
    pub value: f64,
    /// Processes affected.
    pub applies_to: SystTarget,
}

impl LnNSystematic {
    /// New systematic with the given effect.
    pub fn new(name: impl Into<String>, value: f64, applies_to: SystTarget) -> Self {
        Self { name: name.into(), value, applies_to }
    }
}

/// Analysis category; its name doubles as the datacard bin and the
/// histogram directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Numeric category id.
    pub id: u32,
    /// Category name.
    pub name: String,
}

/// One process column of the datacard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    /// Process name.
    pub name: String,
    /// Datacard process id: signals `<= 0`, backgrounds `>= 1`.
    pub id: i32,
    /// Whether the process is a signal.
    pub signal: bool,
}

/// One channel, one era, one category, a mass point, and the processes and
/// systematics attached to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisTopology {
    /// Analysis tag.
    pub analysis: String,
    /// Data-taking era.
    pub era: String,
    /// Channel name.
    pub channel: String,
    /// The single category.
    pub category: Category,
    /// Mass hypothesis passed to `text2workspace.py -m`.
    pub mass: String,
    /// Name of the observed histogram.
    pub observed: String,
    /// Signal process names, in datacard order.
    pub signals: Vec<String>,
    /// Background process names, in datacard order.
    pub backgrounds: Vec<String>,
    /// Rate systematics.
    pub systematics: Vec<LnNSystematic>,
    /// Nuisance group name collecting every systematic.
    pub group: String,
}

impl Default for AnalysisTopology {
    fn default() -> Self {
        Self {
            analysis: "toy".into(),
            era: "Run2".into(),
            channel: "mm".into(),
            category: Category { id: 0, name: "cat1".into() },
            mass: "125".into(),
            observed: "data_obs".into(),
            signals: vec!["sig1".into(), "sig2".into(), "sig3".into()],
            backgrounds: vec!["bkg".into()],
            systematics: vec![
                LnNSystematic::new("lumi", 1.02, SystTarget::All),
                LnNSystematic::new("eff_m", 1.02, SystTarget::All),
                LnNSystematic::new("norm_bkg", 1.02, SystTarget::Backgrounds),
            ],
            group: "sys".into(),
        }
    }
}

impl AnalysisTopology {
    /// Datacard bin name.
    pub fn bin(&self) -> &str {
        &self.category.name
    }

    /// Signals followed by backgrounds with datacard ids. Signal ids run
    /// from `-(n-1)` up to `0`; background ids start at `1`.
    pub fn processes(&self) -> Vec<Process> {
        let n_sig = self.signals.len() as i32;
        let signals = self.signals.iter().enumerate().map(|(i, name)| Process {
            name: name.clone(),
            id: i as i32 - (n_sig - 1),
            signal: true,
        });
        let backgrounds = self.backgrounds.iter().enumerate().map(|(i, name)| Process {
            name: name.clone(),
            id: i as i32 + 1,
            signal: false,
        });
        signals.chain(backgrounds).collect()
    }

    /// Whether `syst` acts on `process`.
    pub fn applies(&self, syst: &LnNSystematic, process: &Process) -> bool {
        match syst.applies_to {
            SystTarget::All => true,
            SystTarget::Signals => process.signal,
            SystTarget::Backgrounds => !process.signal,
        }
    }

    /// Reject empty or clashing names and non-positive lnN effects.
    pub fn validate(&self) -> Result<()> {
        if self.category.name.trim().is_empty() {
            return Err(Error::Config("category name must not be empty".into()));
        }
        if self.signals.is_empty() {
            return Err(Error::Config("topology needs at least one signal process".into()));
        }
        if self.mass.trim().is_empty() {
            return Err(Error::Config("mass must not be empty".into()));
        }
        let mut seen = HashSet::new();
        for name in self.signals.iter().chain(&self.backgrounds).chain(std::iter::once(&self.observed)) {
            if name.trim().is_empty() || name.contains(char::is_whitespace) {
                return Err(Error::Config(format!("invalid process name {name:?}")));
            }
            if !seen.insert(name.as_str()) {
                return Err(Error::Config(format!("process name '{name}' used twice")));
            }
        }
        let mut systs = HashSet::new();
        for s in &self.systematics {
            if !(s.value.is_finite() && s.value > 0.0) {
                return Err(Error::Config(format!("systematic '{}' must have a positive effect, got {}", s.name, s.value)));
            }
            if s.name.trim().is_empty() || s.name.contains(char::is_whitespace) {
                return Err(Error::Config(format!("invalid systematic name {:?}", s.name)));
            }
            if !systs.insert(s.name.as_str()) {
                return Err(Error::Config(format!("systematic '{}' defined twice", s.name)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_process_ids() {
        let topo = AnalysisTopology::default();
        let ids: Vec<(String, i32)> = topo.processes().into_iter().map(|p| (p.name, p.id)).collect();
        assert_eq!(
            ids,
            [("sig1".into(), -2), ("sig2".into(), -1), ("sig3".into(), 0), ("bkg".into(), 1)]
        );
        assert_eq!(topo.bin(), "cat1");
        topo.validate().unwrap();
    }

    #[test]
    fn norm_bkg_only_on_backgrounds() {
        let topo = AnalysisTopology::default();
        let procs = topo.processes();
        let norm = topo.systematics.iter().find(|s| s.name == "norm_bkg").unwrap();
        let hits: Vec<&str> = procs.iter().filter(|p| topo.applies(norm, p)).map(|p| p.name.as_str()).collect();
        assert_eq!(hits, ["bkg"]);
        let lumi = &topo.systematics[0];
        assert_eq!(procs.iter().filter(|p| topo.applies(lumi, p)).count(), 4);
    }

    #[test]
    fn rejects_duplicates_and_bad_effects() {
        let mut topo = AnalysisTopology::default();
        topo.backgrounds.push("sig1".into());
        assert!(matches!(topo.validate(), Err(Error::Config(_))));

        let mut topo = AnalysisTopology::default();
        topo.systematics[1].value = 0.0;
        assert!(topo.validate().is_err());

        let topo = AnalysisTopology { signals: vec![], ..Default::default() };
        assert!(topo.validate().is_err());
    }

    #[test]
    fn deserializes_with_defaults() {
        let topo: AnalysisTopology = serde_json::from_str(r#"{"signals": ["a", "b"]}"#).unwrap();
        assert_eq!(topo.signals, ["a", "b"]);
        assert_eq!(topo.processes()[0].id, -1);
        assert_eq!(topo.systematics.len(), 3);
    }
}
