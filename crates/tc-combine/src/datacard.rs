//! Shape datacard creation.
//!
//! Histograms are read from the toy container, copied into a companion
//! shape-input file next to the card, and summarised as a text datacard
//! with one column per process.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use tc_core::{Error, Histogram, Result};
use tc_store::{StoreFile, StoreObject, WriteMode, write_objects};

use crate::topology::{AnalysisTopology, LnNSystematic};

/// Nominal shape location inside a histogram file.
pub const NOMINAL_PATTERN: &str = "$BIN/$PROCESS";
/// Systematic shape location inside a histogram file.
pub const SYSTEMATIC_PATTERN: &str = "$BIN/$PROCESS_$SYSTEMATIC";
/// Datacard file name inside the output directory.
pub const DATACARD_NAME: &str = "datacard.txt";
/// Shape-input file name inside the output directory.
pub const SHAPES_NAME: &str = "datacard.input.root";

const RULE: &str = "----------------------------------------------------------------------------------------------------";

/// Substitute `$BIN`, `$PROCESS` and `$SYSTEMATIC` in a shape pattern.
pub fn expand_pattern(pattern: &str, bin: &str, process: &str, systematic: Option<&str>) -> String {
    let s = pattern.replace("$BIN", bin).replace("$PROCESS", process);
    match systematic {
        Some(sys) => s.replace("$SYSTEMATIC", sys),
        None => s,
    }
}

/// One process column.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessColumn {
    /// Process name as it appears in the shapes file.
    pub name: String,
    /// Datacard process id.
    pub id: i32,
    /// Expected yield: the shape's integral.
    pub rate: f64,
}

/// One nuisance row: `None` where the systematic does not apply.
#[derive(Debug, Clone, PartialEq)]
pub struct SystematicRow {
    /// Nuisance parameter name.
    pub name: String,
    /// One entry per process column.
    pub effects: Vec<Option<f64>>,
}

/// In-memory datacard for a single bin.
#[derive(Debug, Clone, PartialEq)]
pub struct Datacard {
    /// Bin (category) name.
    pub bin: String,
    /// Shape-input file name, relative to the card.
    pub shapes_file: String,
    /// Observed event count.
    pub observation: f64,
    /// Signals first, then backgrounds.
    pub processes: Vec<ProcessColumn>,
    /// lnN rows in name order.
    pub systematics: Vec<SystematicRow>,
    /// Name of the group holding every systematic.
    pub group: String,
}

impl Datacard {
    /// Assemble the card from the topology and the extracted shapes.
    /// `shapes` must hold one histogram per process, in topology order.
    pub fn build(
        topology: &AnalysisTopology,
        observed: &Histogram,
        shapes: &[Histogram],
        shapes_file: &str,
    ) -> Result<Self> {
        let procs = topology.processes();
        if procs.len() != shapes.len() {
            return Err(Error::Validation(format!(
                "{} processes in the topology but {} shapes",
                procs.len(),
                shapes.len()
            )));
        }
        for h in shapes {
            if h.binning() != observed.binning() {
                return Err(Error::Validation(format!(
                    "shape '{}' does not share the binning of '{}'",
                    h.name, observed.name
                )));
            }
        }

        let processes = procs
            .iter()
            .zip(shapes)
            .map(|(p, h)| ProcessColumn { name: p.name.clone(), id: p.id, rate: h.integral() })
            .collect();

        let mut systs: Vec<&LnNSystematic> = topology.systematics.iter().collect();
        systs.sort_by(|a, b| a.name.cmp(&b.name));
        let systematics = systs
            .into_iter()
            .map(|s| SystematicRow {
                name: s.name.clone(),
                effects: procs.iter().map(|p| topology.applies(s, p).then_some(s.value)).collect(),
            })
            .collect();

        Ok(Self {
            bin: topology.bin().to_string(),
            shapes_file: shapes_file.to_string(),
            observation: observed.integral(),
            processes,
            systematics,
            group: topology.group.clone(),
        })
    }

    /// Render the card text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "imax    1 number of bins");
        let _ = writeln!(out, "jmax    {} number of processes minus 1", self.processes.len().saturating_sub(1));
        let _ = writeln!(out, "kmax    {} number of nuisance parameters", self.systematics.len());
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(
            out,
            "shapes *    {bin}  {file} {nom} {sys}",
            bin = self.bin,
            file = self.shapes_file,
            nom = expand_pattern(NOMINAL_PATTERN, &self.bin, "$PROCESS", None),
            sys = expand_pattern(SYSTEMATIC_PATTERN, &self.bin, "$PROCESS", Some("$SYSTEMATIC")),
        );
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(out, "{:<13}{}", "bin", self.bin);
        let _ = writeln!(out, "{:<13}{}", "observation", fmt_number(self.observation));
        let _ = writeln!(out, "{RULE}");

        let label_w = 2 + self
            .systematics
            .iter()
            .map(|s| s.name.len() + 8)
            .chain([13])
            .max()
            .unwrap_or(13);
        let col_w = 2 + self
            .processes
            .iter()
            .flat_map(|p| [p.name.len(), fmt_number(p.rate).len()])
            .chain([self.bin.len(), 6])
            .max()
            .unwrap_or(6);

        let row = |out: &mut String, label: &str, cells: Vec<String>| {
            let _ = write!(out, "{label:<label_w$}");
            for c in cells {
                let _ = write!(out, "{c:<col_w$}");
            }
            let _ = writeln!(out);
        };
        row(&mut out, "bin", self.processes.iter().map(|_| self.bin.clone()).collect());
        row(&mut out, "process", self.processes.iter().map(|p| p.name.clone()).collect());
        row(&mut out, "process", self.processes.iter().map(|p| p.id.to_string()).collect());
        row(&mut out, "rate", self.processes.iter().map(|p| fmt_number(p.rate)).collect());
        let _ = writeln!(out, "{RULE}");
        for s in &self.systematics {
            let label = format!("{:<w$}lnN", s.name, w = label_w - 3 - 2);
            let cells = s.effects.iter().map(|e| e.map_or_else(|| "-".to_string(), fmt_number)).collect();
            row(&mut out, &label, cells);
        }
        if !self.systematics.is_empty() && !self.group.is_empty() {
            let names: Vec<&str> = self.systematics.iter().map(|s| s.name.as_str()).collect();
            let _ = writeln!(out, "{} group = {}", self.group, names.join(" "));
        }
        out
    }

    /// Observation table, as logged at debug level.
    pub fn observation_table(&self) -> String {
        format!("{:<10}{:>12}\n{:<10}{:>12}", "bin", "obs", self.bin, fmt_number(self.observation))
    }

    /// Process table, as logged at debug level.
    pub fn process_table(&self) -> String {
        let mut out = format!("{:<10}{:<12}{:>6}{:>12}", "bin", "process", "id", "rate");
        for p in &self.processes {
            let _ = write!(out, "\n{:<10}{:<12}{:>6}{:>12}", self.bin, p.name, p.id, fmt_number(p.rate));
        }
        out
    }

    /// Systematic table, as logged at debug level.
    pub fn systematic_table(&self) -> String {
        let mut out = format!("{:<10}{:<12}{:<12}{:>8}", "bin", "process", "systematic", "value");
        for s in &self.systematics {
            for (p, e) in self.processes.iter().zip(&s.effects) {
                if let Some(v) = e {
                    let _ = write!(out, "\n{:<10}{:<12}{:<12}{:>8}", self.bin, p.name, s.name, fmt_number(*v));
                }
            }
        }
        out
    }
}

/// Paths written by [`create_datacard`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFiles {
    /// The card text.
    pub datacard: PathBuf,
    /// The shape-input container.
    pub shapes: PathBuf,
}

/// Read the shapes named by `topology` from `hist_file`, write the
/// shape-input file and `datacard.txt` into `out_dir` (created if absent).
pub fn create_datacard(hist_file: &Path, out_dir: &Path, topology: &AnalysisTopology) -> Result<CardFiles> {
    topology.validate()?;
    log::info!("creating datacard from {}", hist_file.display());

    let file = StoreFile::open(hist_file)?;
    let bin = topology.bin();
    let observed = file.get_histogram(&expand_pattern(NOMINAL_PATTERN, bin, &topology.observed, None))?;
    let shapes = topology
        .processes()
        .iter()
        .map(|p| file.get_histogram(&expand_pattern(NOMINAL_PATTERN, bin, &p.name, None)))
        .collect::<tc_store::Result<Vec<_>>>()?;

    let card = Datacard::build(topology, &observed, &shapes, SHAPES_NAME)?;
    log::debug!("observations:\n{}", card.observation_table());
    log::debug!("processes:\n{}", card.process_table());
    log::debug!("systematics:\n{}", card.systematic_table());

    std::fs::create_dir_all(out_dir).map_err(|e| Error::at_path(out_dir, e))?;

    let mut objects = vec![StoreObject::from(observed)];
    objects.extend(shapes.into_iter().map(StoreObject::from));
    let shapes_path = write_objects(&objects, bin, &out_dir.join(SHAPES_NAME), WriteMode::Recreate)?;

    let card_path = out_dir.join(DATACARD_NAME);
    std::fs::write(&card_path, card.render()).map_err(|e| Error::at_path(&card_path, e))?;
    log::info!("wrote {} and {}", card_path.display(), shapes_path.display());

    Ok(CardFiles { datacard: card_path, shapes: shapes_path })
}

/// `%g`-like formatting: integers without decimals, otherwise at most six
/// decimals with trailing zeros removed.
fn fmt_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        return format!("{v:.0}");
    }
    let s = format!("{v:.6}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tc_core::Binning;

    fn hist(name: &str, counts: &[f64]) -> Histogram {
        let mut h = Histogram::new(name, name, Binning::new(counts.len(), 0.0, 100.0).unwrap());
        for (i, &c) in counts.iter().enumerate() {
            h.set_bin_count(i, c);
        }
        h
    }

    fn card() -> Datacard {
        let topo = AnalysisTopology::default();
        let shapes = [
            hist("sig1", &[600.0, 400.0]),
            hist("sig2", &[300.0, 300.0]),
            hist("sig3", &[100.0, 300.0]),
            hist("bkg", &[2000.0, 1000.0]),
        ];
        Datacard::build(&topo, &hist("data_obs", &[3050.0, 1990.0]), &shapes, SHAPES_NAME).unwrap()
    }

    #[test]
    fn patterns_expand() {
        assert_eq!(expand_pattern(NOMINAL_PATTERN, "cat1", "sig2", None), "cat1/sig2");
        assert_eq!(expand_pattern(SYSTEMATIC_PATTERN, "cat1", "bkg", Some("lumiUp")), "cat1/bkg_lumiUp");
    }

    #[test]
    fn rates_and_observation_come_from_integrals() {
        let c = card();
        assert_eq!(c.observation, 5040.0);
        let rates: Vec<f64> = c.processes.iter().map(|p| p.rate).collect();
        assert_eq!(rates, [1000.0, 600.0, 400.0, 3000.0]);
    }

    #[test]
    fn systematics_sorted_with_dashes() {
        let c = card();
        let names: Vec<&str> = c.systematics.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["eff_m", "lumi", "norm_bkg"]);
        assert_eq!(c.systematics[2].effects, [None, None, None, Some(1.02)]);
    }

    #[test]
    fn rendered_card_layout() {
        let text = card().render();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("imax    1"));
        assert!(lines[1].starts_with("jmax    3"));
        assert!(lines[2].starts_with("kmax    3"));
        assert!(text.contains("shapes *    cat1  datacard.input.root cat1/$PROCESS cat1/$PROCESS_$SYSTEMATIC"));
        assert!(text.contains("observation  5040"));

        let ids = lines.iter().find(|l| l.starts_with("process") && l.contains("-2")).unwrap();
        assert_eq!(ids.split_whitespace().collect::<Vec<_>>(), ["process", "-2", "-1", "0", "1"]);

        let norm = lines.iter().find(|l| l.starts_with("norm_bkg")).unwrap();
        assert_eq!(norm.split_whitespace().collect::<Vec<_>>(), ["norm_bkg", "lnN", "-", "-", "-", "1.02"]);
        assert_eq!(*lines.last().unwrap(), "sys group = eff_m lumi norm_bkg");
    }

    #[test]
    fn mismatched_shape_count_is_rejected() {
        let topo = AnalysisTopology::default();
        let err = Datacard::build(&topo, &hist("data_obs", &[1.0]), &[hist("sig1", &[1.0])], SHAPES_NAME);
        assert!(matches!(err, Err(Error::Validation(_))));
    }

    #[test]
    fn number_format() {
        assert_eq!(fmt_number(3000.0), "3000");
        assert_eq!(fmt_number(1.02), "1.02");
        assert_eq!(fmt_number(0.5), "0.5");
    }
}
