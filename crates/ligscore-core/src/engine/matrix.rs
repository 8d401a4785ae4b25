use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Symmetry-corrected ligand RMSD (Angstroms); lower is better.
    Rmsd,
    /// Protein-ligand interface lDDT in `[0, 1]`; higher is better.
    LddtPli,
}

impl Metric {
    #[inline]
    pub fn is_better(&self, candidate: f64, current: f64) -> bool {
        match self {
            Metric::Rmsd => candidate < current,
            Metric::LddtPli => candidate > current,
        }
    }

    fn compare(&self, a: f64, b: f64) -> Ordering {
        match self {
            Metric::Rmsd => a.total_cmp(&b),
            Metric::LddtPli => b.total_cmp(&a),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Metric::Rmsd => "rmsd",
            Metric::LddtPli => "lddt_pli",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The best value found for one (target ligand, model ligand) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct LigandPairScore {
    pub value: f64,
    /// Rank of the representation that produced `value`.
    pub representation_rank: usize,
    /// Binding-site lDDT of that representation.
    pub representation_score: f64,
    /// Target atom name paired with model atom name, in target atom order.
    pub atom_mapping: Vec<(String, String)>,
    /// Number of isomorphisms between the two ligand graphs.
    pub n_symmetries: usize,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("File I/O error for '{path}': {source}")]
    Io { path: String, source: io::Error },
    #[error("CSV writing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
}

#[derive(Serialize)]
struct CsvRow<'a> {
    target_index: usize,
    target_ligand: &'a str,
    model_index: usize,
    model_ligand: &'a str,
    metric: &'static str,
    value: f64,
    representation_rank: usize,
    representation_score: f64,
    n_symmetries: usize,
}

/// Target-by-model grid of pair scores. Cells of incomparable pairs are unset.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMatrix {
    metric: Metric,
    target_labels: Vec<String>,
    model_labels: Vec<String>,
    cells: Vec<Option<LigandPairScore>>,
}

impl ScoreMatrix {
    pub fn new(metric: Metric, target_labels: Vec<String>, model_labels: Vec<String>) -> Self {
        let cells = vec![None; target_labels.len() * model_labels.len()];
        Self {
            metric,
            target_labels,
            model_labels,
            cells,
        }
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// `(target ligands, model ligands)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.target_labels.len(), self.model_labels.len())
    }

    pub fn target_labels(&self) -> &[String] {
        &self.target_labels
    }

    pub fn model_labels(&self) -> &[String] {
        &self.model_labels
    }

    fn index(&self, target: usize, model: usize) -> Option<usize> {
        (target < self.target_labels.len() && model < self.model_labels.len())
            .then(|| target * self.model_labels.len() + model)
    }

    pub fn get(&self, target: usize, model: usize) -> Option<&LigandPairScore> {
        self.index(target, model)
            .and_then(|i| self.cells.get(i))
            .and_then(|cell| cell.as_ref())
    }

    pub fn value(&self, target: usize, model: usize) -> Option<f64> {
        self.get(target, model).map(|score| score.value)
    }

    /// Stores `score` unless the cell already holds an equal or better value.
    pub(crate) fn offer(&mut self, target: usize, model: usize, score: LigandPairScore) -> bool {
        let Some(i) = self.index(target, model) else {
            return false;
        };
        let keep_current = matches!(
            &self.cells[i],
            Some(current) if !self.metric.is_better(score.value, current.value)
        );
        if keep_current {
            return false;
        }
        self.cells[i] = Some(score);
        true
    }

    /// Iterates over set cells as `(target, model, score)`, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &LigandPairScore)> {
        let n_model = self.model_labels.len();
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.as_ref().map(|score| (i / n_model, i % n_model, score))
        })
    }

    /// One-to-one pairing of target and model ligands, best values first.
    ///
    /// The best remaining cell is accepted as long as neither of its ligands is already
    /// assigned. Equal values are resolved by lower target index, then lower model index.
    pub fn greedy_assignment(&self) -> Vec<(usize, usize)> {
        let mut candidates: Vec<(usize, usize, f64)> = self
            .iter()
            .map(|(t, m, score)| (t, m, score.value))
            .collect();
        candidates.sort_by(|a, b| {
            self.metric
                .compare(a.2, b.2)
                .then(a.0.cmp(&b.0))
                .then(a.1.cmp(&b.1))
        });

        let (n_target, n_model) = self.shape();
        let mut target_taken = vec![false; n_target];
        let mut model_taken = vec![false; n_model];
        let mut assignment = Vec::new();
        for (t, m, _) in candidates {
            if target_taken[t] || model_taken[m] {
                continue;
            }
            target_taken[t] = true;
            model_taken[m] = true;
            assignment.push((t, m));
        }
        assignment.sort_unstable();
        assignment
    }

    /// Writes every set cell as one CSV record.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for (t, m, score) in self.iter() {
            csv_writer.serialize(CsvRow {
                target_index: t,
                target_ligand: &self.target_labels[t],
                model_index: m,
                model_ligand: &self.model_labels[m],
                metric: self.metric.name(),
                value: score.value,
                representation_rank: score.representation_rank,
                representation_score: score.representation_score,
                n_symmetries: score.n_symmetries,
            })?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn save_csv(&self, path: &Path) -> Result<(), ExportError> {
        let file = std::fs::File::create(path).map_err(|e| ExportError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        self.write_csv(file).map_err(|e| ExportError::Csv {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }
}
