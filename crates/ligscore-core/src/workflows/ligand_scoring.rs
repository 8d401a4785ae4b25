use crate::core::ligands::extraction::extract_ligands;
use crate::core::ligands::graph::{LigandGraph, NodeMapping};
use crate::core::ligands::normalization::normalize_ligands;
use crate::core::ligands::{LigandError, LigandInput};
use crate::core::models::ids::ResidueId;
use crate::core::models::system::MolecularSystem;
use crate::core::utils::spatial::SpatialIndex;
use crate::engine::binding_site::{BindingSite, locate_binding_site};
use crate::engine::cache::MemoCache;
use crate::engine::chain_mapping::{ChainMapper, Representation, SymmetricChainMapper};
use crate::engine::config::ScoringConfig;
use crate::engine::error::ScoringError;
use crate::engine::matrix::{LigandPairScore, Metric, ScoreMatrix};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::scoring::{BestMapping, best_mapping, graph_positions, prepare_frame};
use nalgebra::Point3;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Target,
    Model,
}

/// Symmetry-aware comparison of the ligands of a model against those of a target.
///
/// Both structures are copied on construction and never touched again by the caller's
/// handles. Binding sites, representations, ligand graphs, isomorphisms and score matrices
/// are computed on first use and cached.
pub struct LigandScorer {
    model: MolecularSystem,
    target: MolecularSystem,
    model_ligands: Vec<ResidueId>,
    target_ligands: Vec<ResidueId>,
    config: ScoringConfig,
    chain_mapper: Option<Box<dyn ChainMapper>>,
    target_index: Option<SpatialIndex>,
    binding_sites: MemoCache<usize, BindingSite>,
    representations: MemoCache<usize, Vec<Representation>>,
    target_graphs: MemoCache<usize, LigandGraph>,
    model_graphs: MemoCache<usize, LigandGraph>,
    symmetries: MemoCache<(usize, usize), Vec<NodeMapping>>,
    matrices: HashMap<Metric, ScoreMatrix>,
}

impl LigandScorer {
    /// Prepares a scorer.
    ///
    /// Without explicit ligands, each structure's ligands are extracted from its non-polymer
    /// chains. Explicit ligands are resolved against the structure they are given for;
    /// ligands from other structures are copied into the working copy.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::Config`] for an invalid configuration and
    /// [`ScoringError::Ligand`] if ligands cannot be extracted or resolved.
    #[instrument(skip_all, name = "ligand_scorer_setup")]
    pub fn new(
        model: &MolecularSystem,
        target: &MolecularSystem,
        model_ligands: Option<LigandInput<'_>>,
        target_ligands: Option<LigandInput<'_>>,
        config: ScoringConfig,
    ) -> Result<Self, ScoringError> {
        config.validate()?;

        let mut model_copy = model.clone();
        let model_ligands = resolve_ligands(&mut model_copy, model, model_ligands)?;
        let mut target_copy = target.clone();
        let target_ligands = resolve_ligands(&mut target_copy, target, target_ligands)?;

        info!(
            target_ligands = target_ligands.len(),
            model_ligands = model_ligands.len(),
            "Prepared ligand scorer."
        );

        Ok(Self {
            model: model_copy,
            target: target_copy,
            model_ligands,
            target_ligands,
            config,
            chain_mapper: None,
            target_index: None,
            binding_sites: MemoCache::new(),
            representations: MemoCache::new(),
            target_graphs: MemoCache::new(),
            model_graphs: MemoCache::new(),
            symmetries: MemoCache::new(),
            matrices: HashMap::new(),
        })
    }

    /// Replaces the default chain mapper.
    pub fn with_chain_mapper(mut self, mapper: Box<dyn ChainMapper>) -> Self {
        self.chain_mapper = Some(mapper);
        self
    }

    pub fn model(&self) -> &MolecularSystem {
        &self.model
    }

    pub fn target(&self) -> &MolecularSystem {
        &self.target
    }

    /// Model ligands, as residues of [`LigandScorer::model`].
    pub fn model_ligands(&self) -> &[ResidueId] {
        &self.model_ligands
    }

    /// Target ligands, as residues of [`LigandScorer::target`].
    pub fn target_ligands(&self) -> &[ResidueId] {
        &self.target_ligands
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn binding_site(&mut self, target_ligand: usize) -> Result<&BindingSite, ScoringError> {
        self.ensure_binding_site(target_ligand)?;
        self.binding_sites
            .get(&target_ligand)
            .ok_or_else(|| self.index_error(target_ligand))
    }

    pub fn representations(
        &mut self,
        target_ligand: usize,
    ) -> Result<&[Representation], ScoringError> {
        self.ensure_representations(target_ligand)?;
        self.representations
            .get(&target_ligand)
            .map(|reps| reps.as_slice())
            .ok_or_else(|| self.index_error(target_ligand))
    }

    pub fn rmsd_matrix(&mut self) -> Result<&ScoreMatrix, ScoringError> {
        self.score_matrix(Metric::Rmsd)
    }

    pub fn lddt_pli_matrix(&mut self) -> Result<&ScoreMatrix, ScoringError> {
        self.score_matrix(Metric::LddtPli)
    }

    pub fn score_matrix(&mut self, metric: Metric) -> Result<&ScoreMatrix, ScoringError> {
        self.score_matrix_with_progress(metric, &ProgressReporter::new())
    }

    /// Computes (once) and returns the matrix of `metric`, reporting progress per target
    /// ligand. A failure leaves no matrix behind.
    #[instrument(skip_all, name = "score_matrix", fields(metric = %metric))]
    pub fn score_matrix_with_progress(
        &mut self,
        metric: Metric,
        reporter: &ProgressReporter,
    ) -> Result<&ScoreMatrix, ScoringError> {
        if !self.matrices.contains_key(&metric) {
            let matrix = self.compute_matrix(metric, reporter)?;
            self.matrices.insert(metric, matrix);
        }
        Ok(&self.matrices[&metric])
    }

    fn index_error(&self, index: usize) -> ScoringError {
        ScoringError::LigandIndexOutOfRange {
            index,
            count: self.target_ligands.len(),
        }
    }

    fn ensure_binding_site(&mut self, target_ligand: usize) -> Result<(), ScoringError> {
        let ligand = *self
            .target_ligands
            .get(target_ligand)
            .ok_or_else(|| self.index_error(target_ligand))?;
        if self.binding_sites.contains(&target_ligand) {
            return Ok(());
        }
        let target = &self.target;
        let index = self
            .target_index
            .get_or_insert_with(|| SpatialIndex::new(target));
        let site = locate_binding_site(target, ligand, self.config.radius, &*index);
        debug!(
            target_ligand,
            residues = site.residues.len(),
            "Binding site resolved."
        );
        self.binding_sites
            .get_or_try_insert_with(target_ligand, || Ok::<_, ScoringError>(site))?;
        Ok(())
    }

    fn ensure_representations(&mut self, target_ligand: usize) -> Result<(), ScoringError> {
        self.ensure_binding_site(target_ligand)?;
        if self.representations.contains(&target_ligand) {
            return Ok(());
        }
        let resnum_alignments = self.config.resnum_alignments;
        let mapper = self.chain_mapper.get_or_insert_with(|| {
            Box::new(SymmetricChainMapper::new(resnum_alignments)) as Box<dyn ChainMapper>
        });
        let site = self
            .binding_sites
            .get(&target_ligand)
            .ok_or(ScoringError::LigandIndexOutOfRange {
                index: target_ligand,
                count: self.target_ligands.len(),
            })?;
        let mut representations = mapper.representations(
            &self.target,
            site,
            &self.model,
            self.config.lddt_bs_radius,
            self.config.topn,
        )?;
        representations.sort_by_key(|rep| rep.rank);
        representations.truncate(self.config.topn);
        debug!(
            target_ligand,
            count = representations.len(),
            "Representations enumerated."
        );
        self.representations
            .get_or_try_insert_with(target_ligand, || Ok::<_, ScoringError>(representations))?;
        Ok(())
    }

    fn ensure_graph(&mut self, side: Side, index: usize) -> Result<(), ScoringError> {
        let (system, ligands, cache) = match side {
            Side::Target => (&self.target, &self.target_ligands, &mut self.target_graphs),
            Side::Model => (&self.model, &self.model_ligands, &mut self.model_graphs),
        };
        let ignore_hydrogens = self.config.ignore_hydrogens;
        cache.get_or_try_insert_with(index, || {
            ligands
                .get(index)
                .and_then(|&residue_id| {
                    LigandGraph::from_residue(system, residue_id, ignore_hydrogens)
                })
                .ok_or_else(|| {
                    ScoringError::from(LigandError::InvalidInputType(format!(
                        "ligand {index} is not a residue of its structure"
                    )))
                })
        })?;
        Ok(())
    }

    fn ensure_symmetries(
        &mut self,
        target_ligand: usize,
        model_ligand: usize,
    ) -> Result<(), ScoringError> {
        let key = (target_ligand, model_ligand);
        if self.symmetries.contains(&key) {
            return Ok(());
        }
        self.ensure_graph(Side::Target, target_ligand)?;
        self.ensure_graph(Side::Model, model_ligand)?;
        let (Some(target_graph), Some(model_graph)) = (
            self.target_graphs.get(&target_ligand),
            self.model_graphs.get(&model_ligand),
        ) else {
            return Err(self.index_error(target_ligand));
        };

        let mappings = target_graph
            .isomorphisms(model_graph, self.config.max_symmetries)
            .map_err(|e| ScoringError::SymmetryExplosion {
                target_ligand: ligand_label(&self.target, self.target_ligands[target_ligand]),
                model_ligand: ligand_label(&self.model, self.model_ligands[model_ligand]),
                limit: e.limit,
            })?;
        if mappings.is_empty() {
            debug!(target_ligand, model_ligand, "Ligands are not isomorphic.");
        }
        self.symmetries
            .get_or_try_insert_with(key, || Ok::<_, ScoringError>(mappings))?;
        Ok(())
    }

    fn compute_matrix(
        &mut self,
        metric: Metric,
        reporter: &ProgressReporter,
    ) -> Result<ScoreMatrix, ScoringError> {
        reporter.report(Progress::PhaseStart {
            name: match metric {
                Metric::Rmsd => "RMSD Matrix",
                Metric::LddtPli => "lDDT-PLI Matrix",
            },
        });
        info!(
            targets = self.target_ligands.len(),
            models = self.model_ligands.len(),
            "Computing score matrix."
        );

        let mut matrix = ScoreMatrix::new(
            metric,
            labels(&self.target, &self.target_ligands),
            labels(&self.model, &self.model_ligands),
        );

        reporter.report(Progress::TaskStart {
            total_steps: self.target_ligands.len() as u64,
        });
        for target_ligand in 0..self.target_ligands.len() {
            self.ensure_representations(target_ligand)?;
            let has_representations = self
                .representations
                .get(&target_ligand)
                .is_some_and(|reps| !reps.is_empty());
            if has_representations {
                self.ensure_graph(Side::Target, target_ligand)?;
                for model_ligand in 0..self.model_ligands.len() {
                    self.ensure_symmetries(target_ligand, model_ligand)?;
                }
                self.score_target_ligand(metric, target_ligand, &mut matrix, reporter);
            } else {
                let label = ligand_label(&self.target, self.target_ligands[target_ligand]);
                debug!(ligand = %label, "No representation; ligand stays unscored.");
                reporter.message(format!("No binding-site representation for {label}"));
            }
            reporter.report(Progress::TaskIncrement);
        }
        reporter.report(Progress::TaskFinish);

        info!(
            scored_pairs = matrix.iter().count(),
            cached_symmetries = self.symmetries.len(),
            "Score matrix complete."
        );
        reporter.report(Progress::PhaseFinish);
        Ok(matrix)
    }

    /// Fills the row of `target_ligand`. All caches for the row must already be populated.
    fn score_target_ligand(
        &self,
        metric: Metric,
        target_ligand: usize,
        matrix: &mut ScoreMatrix,
        reporter: &ProgressReporter,
    ) {
        let (Some(representations), Some(target_graph)) = (
            self.representations.get(&target_ligand),
            self.target_graphs.get(&target_ligand),
        ) else {
            return;
        };
        let target_positions = graph_positions(&self.target, target_graph);

        let candidates: Vec<Candidate<'_>> = (0..self.model_ligands.len())
            .filter_map(|model_ligand| {
                let mappings = self.symmetries.get(&(target_ligand, model_ligand))?;
                if mappings.is_empty() {
                    return None;
                }
                let graph = self.model_graphs.get(&model_ligand)?;
                Some(Candidate {
                    model_ligand,
                    graph,
                    positions: graph_positions(&self.model, graph),
                    mappings,
                })
            })
            .collect();
        if candidates.is_empty() {
            return;
        }

        for representation in representations {
            let Some(frame) = prepare_frame(
                metric,
                &self.target,
                target_graph,
                &self.model,
                representation,
                &self.config,
            ) else {
                continue;
            };

            let evaluate = |(position, candidate): (usize, &Candidate<'_>)| {
                best_mapping(
                    metric,
                    &frame,
                    &target_positions,
                    &candidate.positions,
                    candidate.mappings,
                )
                .map(|best| (position, best))
            };

            #[cfg(feature = "parallel")]
            let outcomes: Vec<(usize, BestMapping)> =
                candidates.par_iter().enumerate().filter_map(evaluate).collect();

            #[cfg(not(feature = "parallel"))]
            let outcomes: Vec<(usize, BestMapping)> =
                candidates.iter().enumerate().filter_map(evaluate).collect();

            for (position, best) in outcomes {
                let candidate = &candidates[position];
                let improves = matrix
                    .value(target_ligand, candidate.model_ligand)
                    .is_none_or(|current| metric.is_better(best.value, current));
                if !improves {
                    continue;
                }
                let score = LigandPairScore {
                    value: best.value,
                    representation_rank: representation.rank,
                    representation_score: representation.score,
                    atom_mapping: atom_name_pairs(
                        target_graph,
                        candidate.graph,
                        &candidate.mappings[best.mapping_index],
                    ),
                    n_symmetries: candidate.mappings.len(),
                };
                if matrix.offer(target_ligand, candidate.model_ligand, score) {
                    reporter.report(Progress::PairScored {
                        target: target_ligand,
                        model: candidate.model_ligand,
                    });
                }
            }
        }
    }
}

struct Candidate<'a> {
    model_ligand: usize,
    graph: &'a LigandGraph,
    positions: Vec<Point3<f64>>,
    mappings: &'a [NodeMapping],
}

fn resolve_ligands(
    working: &mut MolecularSystem,
    source: &MolecularSystem,
    input: Option<LigandInput<'_>>,
) -> Result<Vec<ResidueId>, LigandError> {
    let ligands = match input {
        Some(input) => normalize_ligands(working, source, input)?,
        None => extract_ligands(working)?,
    };
    for &residue_id in &ligands {
        if let Some(residue) = working.residue_mut(residue_id) {
            residue.set_is_ligand(true);
        }
    }
    Ok(ligands)
}

fn ligand_label(system: &MolecularSystem, residue_id: ResidueId) -> String {
    match (system.residue_specifier(residue_id), system.residue(residue_id)) {
        (Some(spec), Some(residue)) => format!("{spec} {}", residue.name),
        _ => "?".to_string(),
    }
}

fn labels(system: &MolecularSystem, ligands: &[ResidueId]) -> Vec<String> {
    ligands.iter().map(|&id| ligand_label(system, id)).collect()
}

fn atom_name_pairs(
    target_graph: &LigandGraph,
    model_graph: &LigandGraph,
    mapping: &[usize],
) -> Vec<(String, String)> {
    mapping
        .iter()
        .enumerate()
        .filter_map(|(target_node, &model_node)| {
            let target_atom = target_graph.atom(target_node)?;
            let model_atom = model_graph.atom(model_node)?;
            Some((target_atom.name.clone(), model_atom.name.clone()))
        })
        .collect()
}
