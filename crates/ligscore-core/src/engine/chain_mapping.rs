use super::binding_site::BindingSite;
use crate::core::models::chain::Chain;
use crate::core::models::ids::{ChainId, ResidueId};
use crate::core::models::system::MolecularSystem;
use crate::core::utils::lddt::{ContactDistance, LDDT_THRESHOLDS, local_distance_test};
use itertools::Itertools;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Upper bound on the chain assignments examined for one binding site.
const MAX_CHAIN_ASSIGNMENTS: usize = 10_000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChainMappingError {
    #[error("Binding site residue {residue:?} is not part of the target structure")]
    UnknownResidue { residue: ResidueId },

    #[error("Chain mapping failed: {0}")]
    Failed(String),
}

/// One way of laying the binding site of a target ligand onto the model.
#[derive(Debug, Clone, PartialEq)]
pub struct Representation {
    /// Target binding-site residue paired with its model counterpart.
    pub residue_pairs: Vec<(ResidueId, ResidueId)>,
    /// Zero-based position in the mapper's ranking; lower is better.
    pub rank: usize,
    pub score: f64,
}

impl Representation {
    pub fn model_residue(&self, target_residue: ResidueId) -> Option<ResidueId> {
        self.residue_pairs
            .iter()
            .find(|(target, _)| *target == target_residue)
            .map(|&(_, model)| model)
    }
}

/// Source of ranked binding-site correspondences between target and model.
pub trait ChainMapper {
    /// Returns at most `topn` representations of `binding_site` in the model, best first.
    ///
    /// `inclusion_radius` bounds the contacts used to assess each candidate.
    fn representations(
        &self,
        target: &MolecularSystem,
        binding_site: &BindingSite,
        model: &MolecularSystem,
        inclusion_radius: f64,
        topn: usize,
    ) -> Result<Vec<Representation>, ChainMappingError>;
}

/// Maps chemically equivalent polymer chains onto each other.
///
/// Two chains are equivalent when they carry the same residue-name sequence, in which case
/// residues are paired by position. With `resnum_alignments`, chains are instead equivalent
/// when their residue names agree at every shared residue number, and residues are paired by
/// number. Every injective assignment of target chains to equivalent model chains becomes a
/// candidate representation, ranked by binding-site lDDT.
#[derive(Debug, Clone, Default)]
pub struct SymmetricChainMapper {
    pub resnum_alignments: bool,
}

impl SymmetricChainMapper {
    pub fn new(resnum_alignments: bool) -> Self {
        Self { resnum_alignments }
    }

    /// Residue correspondence between two chains, or `None` if they are not equivalent.
    fn pair_chains(
        &self,
        target: &MolecularSystem,
        target_chain: &Chain,
        model: &MolecularSystem,
        model_chain: &Chain,
    ) -> Option<Vec<(ResidueId, ResidueId)>> {
        if target_chain.chain_type != model_chain.chain_type || !target_chain.chain_type.is_polymer()
        {
            return None;
        }
        if self.resnum_alignments {
            let model_by_number: HashMap<isize, ResidueId> = model_chain
                .residues()
                .iter()
                .filter_map(|&id| model.residue(id).map(|r| (r.residue_number, id)))
                .collect();
            let mut pairs = Vec::new();
            for &target_id in target_chain.residues() {
                let Some(residue) = target.residue(target_id) else {
                    continue;
                };
                if let Some(&model_id) = model_by_number.get(&residue.residue_number) {
                    if residue_name(model, model_id) != Some(residue.name.as_str()) {
                        return None;
                    }
                    pairs.push((target_id, model_id));
                }
            }
            (!pairs.is_empty()).then_some(pairs)
        } else {
            let target_names: Vec<_> = target_chain
                .residues()
                .iter()
                .map(|&id| residue_name(target, id))
                .collect();
            let model_names: Vec<_> = model_chain
                .residues()
                .iter()
                .map(|&id| residue_name(model, id))
                .collect();
            if target_names.is_empty() || target_names != model_names {
                return None;
            }
            Some(
                target_chain
                    .residues()
                    .iter()
                    .copied()
                    .zip(model_chain.residues().iter().copied())
                    .collect(),
            )
        }
    }
}

impl ChainMapper for SymmetricChainMapper {
    fn representations(
        &self,
        target: &MolecularSystem,
        binding_site: &BindingSite,
        model: &MolecularSystem,
        inclusion_radius: f64,
        topn: usize,
    ) -> Result<Vec<Representation>, ChainMappingError> {
        if binding_site.is_empty() || topn == 0 {
            return Ok(Vec::new());
        }

        let mut site_chains: Vec<ChainId> = Vec::new();
        for &residue_id in &binding_site.residues {
            let chain_id = target
                .residue(residue_id)
                .map(|r| r.chain_id)
                .ok_or(ChainMappingError::UnknownResidue {
                    residue: residue_id,
                })?;
            if !site_chains.contains(&chain_id) {
                site_chains.push(chain_id);
            }
        }

        // Per target chain: equivalent model chains with their residue pairing.
        let mut options: Vec<Vec<(ChainId, Vec<(ResidueId, ResidueId)>)>> = Vec::new();
        for &target_chain_id in &site_chains {
            let Some(target_chain) = target.chain(target_chain_id) else {
                continue;
            };
            let candidates: Vec<_> = model
                .chains_iter()
                .filter_map(|(model_chain_id, model_chain)| {
                    self.pair_chains(target, target_chain, model, model_chain)
                        .map(|pairs| (model_chain_id, pairs))
                })
                .collect();
            if candidates.is_empty() {
                debug!(chain = %target_chain.id, "No equivalent model chain for binding-site chain.");
                continue;
            }
            options.push(candidates);
        }
        if options.is_empty() {
            return Ok(Vec::new());
        }

        // Each target chain may also stay unmapped, e.g. when the model has fewer copies.
        let mut candidates: Vec<(Vec<(ResidueId, ResidueId)>, f64)> = Vec::new();
        let assignments = options
            .iter()
            .map(|choices| choices.iter().map(Some).chain(std::iter::once(None)))
            .multi_cartesian_product()
            .filter(|assignment| {
                let mut mapped = assignment.iter().flatten().map(|(chain_id, _)| *chain_id);
                mapped.clone().next().is_some() && mapped.all_unique()
            });

        for (count, assignment) in assignments.enumerate() {
            if count == MAX_CHAIN_ASSIGNMENTS {
                warn!(
                    limit = MAX_CHAIN_ASSIGNMENTS,
                    "Chain assignment enumeration truncated."
                );
                break;
            }
            let mapping: HashMap<ResidueId, ResidueId> = assignment
                .iter()
                .flatten()
                .flat_map(|(_, pairs)| pairs.iter().copied())
                .collect();
            let site_pairs: Vec<(ResidueId, Option<ResidueId>)> = binding_site
                .residues
                .iter()
                .map(|target_id| (*target_id, mapping.get(target_id).copied()))
                .collect();
            let residue_pairs: Vec<(ResidueId, ResidueId)> = site_pairs
                .iter()
                .filter_map(|&(target_id, model_id)| model_id.map(|m| (target_id, m)))
                .collect();
            if residue_pairs.is_empty() {
                continue;
            }
            let score = binding_site_lddt(target, model, &site_pairs, inclusion_radius);
            candidates.push((residue_pairs, score));
        }

        // Stable: equally scored assignments keep enumeration order.
        candidates.sort_by(|a, b| b.1.total_cmp(&a.1));
        Ok(candidates
            .into_iter()
            .take(topn)
            .enumerate()
            .map(|(rank, (residue_pairs, score))| Representation {
                residue_pairs,
                rank,
                score,
            })
            .collect())
    }
}

fn residue_name(system: &MolecularSystem, id: ResidueId) -> Option<&str> {
    system.residue(id).map(|r| r.name.as_str())
}

/// lDDT over heavy-atom contacts between different binding-site residues.
///
/// Every target residue of `site_pairs` contributes contacts; those of residues without a
/// model counterpart count as lost. Returns 0 when the binding site has no contacts within
/// `inclusion_radius`.
pub fn binding_site_lddt(
    target: &MolecularSystem,
    model: &MolecularSystem,
    site_pairs: &[(ResidueId, Option<ResidueId>)],
    inclusion_radius: f64,
) -> f64 {
    let atoms: Vec<_> = site_pairs
        .iter()
        .flat_map(|&(target_residue, model_residue)| {
            target
                .residue_atoms(target_residue)
                .filter(|(_, atom)| !atom.is_hydrogen())
                .map(move |(_, atom)| {
                    let counterpart = model_residue
                        .and_then(|id| model.residue(id))
                        .and_then(|r| r.get_atom_id_by_name(&atom.name))
                        .and_then(|id| model.atom(id))
                        .map(|a| a.position);
                    (target_residue, atom.position, counterpart)
                })
        })
        .collect();

    let contacts = atoms
        .iter()
        .tuple_combinations()
        .filter(|(a, b)| a.0 != b.0)
        .filter_map(|(a, b)| {
            let reference = nalgebra::distance(&a.1, &b.1);
            (reference < inclusion_radius).then(|| {
                let model_distance = match (a.2, b.2) {
                    (Some(pa), Some(pb)) => Some(nalgebra::distance(&pa, &pb)),
                    _ => None,
                };
                ContactDistance::new(reference, model_distance)
            })
        });

    local_distance_test(contacts, &LDDT_THRESHOLDS).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Element;
    use crate::core::models::chain::ChainType;
    use crate::testing::{add_amino_acid, add_residue};
    use nalgebra::{Point3, Vector3};

    fn dimer(offset_b: Vector3<f64>) -> MolecularSystem {
        let mut system = MolecularSystem::new();
        for (chain, shift) in [('A', Vector3::zeros()), ('B', offset_b)] {
            add_amino_acid(&mut system, chain, 1, "GLY", Point3::new(0.3, 0.1, 0.2) + shift);
            add_amino_acid(&mut system, chain, 2, "SER", Point3::new(3.1, 1.7, -0.6) + shift);
            add_amino_acid(&mut system, chain, 3, "TRP", Point3::new(1.4, 4.2, 1.3) + shift);
        }
        system
    }

    fn site_over_chain(system: &MolecularSystem, chain: char) -> BindingSite {
        let chain_id = system.find_chain_by_id(chain).unwrap();
        BindingSite {
            ligand: ResidueId::default(),
            residues: system.chain(chain_id).unwrap().residues().to_vec(),
        }
    }

    #[test]
    fn identical_chains_yield_one_representation_per_assignment() {
        let target = dimer(Vector3::new(20.0, 0.5, 0.25));
        let model = dimer(Vector3::new(20.0, 0.5, 0.25));
        let site = site_over_chain(&target, 'A');

        let reps = SymmetricChainMapper::new(false)
            .representations(&target, &site, &model, 10.0, 10)
            .unwrap();

        assert_eq!(reps.len(), 2);
        assert_eq!(reps[0].rank, 0);
        assert_eq!(reps[1].rank, 1);
        assert_eq!(reps[0].score, 1.0);
        assert_eq!(reps[1].score, 1.0);
        let model_a = model.find_chain_by_id('A').unwrap();
        assert_eq!(
            model.residue(reps[0].residue_pairs[0].1).unwrap().chain_id,
            model_a
        );
    }

    #[test]
    fn distorted_copy_ranks_below_faithful_copy() {
        let target = dimer(Vector3::new(20.0, 0.5, 0.25));
        let mut model = target.clone();
        // Chain A of the model is distorted, chain B is a faithful copy.
        let chain_a = model.find_chain_by_id('A').unwrap();
        let residue = model.chain(chain_a).unwrap().residues()[1];
        let atoms: Vec<_> = model.residue_atoms(residue).map(|(id, _)| id).collect();
        for id in atoms {
            model.atom_mut(id).unwrap().position += Vector3::new(2.5, -1.5, 3.0);
        }
        let site = site_over_chain(&target, 'A');

        let reps = SymmetricChainMapper::new(false)
            .representations(&target, &site, &model, 10.0, 10)
            .unwrap();

        assert_eq!(reps.len(), 2);
        assert!(reps[0].score > reps[1].score);
        let model_b = model.find_chain_by_id('B').unwrap();
        assert_eq!(
            model.residue(reps[0].residue_pairs[0].1).unwrap().chain_id,
            model_b
        );
    }

    fn site_over_chains(system: &MolecularSystem, chains: &[char]) -> BindingSite {
        let residues = chains
            .iter()
            .flat_map(|&chain| site_over_chain(system, chain).residues)
            .collect();
        BindingSite {
            ligand: ResidueId::default(),
            residues,
        }
    }

    #[test]
    fn monomer_model_maps_part_of_a_dimer_pocket() {
        let target = dimer(Vector3::new(20.0, 0.5, 0.25));
        let mut model = MolecularSystem::new();
        add_amino_acid(&mut model, 'A', 1, "GLY", Point3::new(0.3, 0.1, 0.2));
        add_amino_acid(&mut model, 'A', 2, "SER", Point3::new(3.1, 1.7, -0.6));
        add_amino_acid(&mut model, 'A', 3, "TRP", Point3::new(1.4, 4.2, 1.3));
        let site = site_over_chains(&target, &['A', 'B']);

        let reps = SymmetricChainMapper::new(false)
            .representations(&target, &site, &model, 10.0, 10)
            .unwrap();

        assert_eq!(reps.len(), 2);
        let model_a = model.find_chain_by_id('A').unwrap();
        for rep in &reps {
            assert_eq!(rep.residue_pairs.len(), 3);
            assert!(rep.score < 1.0);
            assert!(
                rep.residue_pairs
                    .iter()
                    .all(|&(_, m)| model.residue(m).unwrap().chain_id == model_a)
            );
        }
    }

    #[test]
    fn complete_mapping_outranks_partial_ones() {
        let target = dimer(Vector3::new(20.0, 0.5, 0.25));
        let site = site_over_chains(&target, &['A', 'B']);

        let reps = SymmetricChainMapper::new(false)
            .representations(&target, &site, &target, 10.0, 10)
            .unwrap();

        // Two complete assignments plus four with one chain left unmapped.
        assert_eq!(reps.len(), 6);
        assert_eq!(reps[0].residue_pairs.len(), 6);
        assert_eq!(reps[0].score, 1.0);
        assert_eq!(reps[1].residue_pairs.len(), 6);
        assert!(reps[2..].iter().all(|rep| rep.residue_pairs.len() == 3));
        assert!(reps[2..].iter().all(|rep| rep.score < reps[0].score));
        let first = reps[0].residue_pairs[0];
        assert_eq!(first.0, first.1);
    }

    #[test]
    fn topn_caps_the_number_of_representations() {
        let target = dimer(Vector3::new(20.0, 0.5, 0.25));
        let site = site_over_chain(&target, 'A');
        let reps = SymmetricChainMapper::new(false)
            .representations(&target, &site, &target, 10.0, 1)
            .unwrap();
        assert_eq!(reps.len(), 1);
    }

    #[test]
    fn empty_binding_site_has_no_representations() {
        let target = dimer(Vector3::new(20.0, 0.5, 0.25));
        let site = BindingSite {
            ligand: ResidueId::default(),
            residues: Vec::new(),
        };
        let reps = SymmetricChainMapper::default()
            .representations(&target, &site, &target, 10.0, 10)
            .unwrap();
        assert!(reps.is_empty());
    }

    #[test]
    fn different_sequences_are_not_mapped() {
        let target = dimer(Vector3::new(20.0, 0.5, 0.25));
        let mut model = MolecularSystem::new();
        add_amino_acid(&mut model, 'A', 1, "ALA", Point3::new(0.3, 0.1, 0.2));
        let site = site_over_chain(&target, 'A');
        let reps = SymmetricChainMapper::new(false)
            .representations(&target, &site, &model, 10.0, 10)
            .unwrap();
        assert!(reps.is_empty());
    }

    #[test]
    fn residue_number_alignment_pairs_shared_numbers() {
        let target = dimer(Vector3::new(20.0, 0.5, 0.25));
        // Model chain lacks residue 1 but agrees on 2 and 3.
        let mut model = MolecularSystem::new();
        add_amino_acid(&mut model, 'X', 2, "SER", Point3::new(3.1, 1.7, -0.6));
        add_amino_acid(&mut model, 'X', 3, "TRP", Point3::new(1.4, 4.2, 1.3));
        let site = site_over_chain(&target, 'A');

        let by_sequence = SymmetricChainMapper::new(false)
            .representations(&target, &site, &model, 10.0, 10)
            .unwrap();
        assert!(by_sequence.is_empty());

        let by_number = SymmetricChainMapper::new(true)
            .representations(&target, &site, &model, 10.0, 10)
            .unwrap();
        assert_eq!(by_number.len(), 1);
        assert_eq!(by_number[0].residue_pairs.len(), 2);
        let first_target = by_number[0].residue_pairs[0].0;
        assert_eq!(target.residue(first_target).unwrap().residue_number, 2);
    }

    #[test]
    fn conflicting_names_at_shared_numbers_break_equivalence() {
        let target = dimer(Vector3::new(20.0, 0.5, 0.25));
        let mut model = MolecularSystem::new();
        add_amino_acid(&mut model, 'X', 2, "ALA", Point3::new(3.1, 1.7, -0.6));
        let site = site_over_chain(&target, 'A');
        let reps = SymmetricChainMapper::new(true)
            .representations(&target, &site, &model, 10.0, 10)
            .unwrap();
        assert!(reps.is_empty());
    }

    #[test]
    fn non_polymer_chains_are_never_mapped() {
        let mut target = MolecularSystem::new();
        let ion = add_residue(
            &mut target,
            'L',
            ChainType::NonPolymer,
            1,
            "ZN",
            &[("ZN", Element::Zn, Point3::new(0.1, 0.2, 0.3))],
        );
        let site = BindingSite {
            ligand: ResidueId::default(),
            residues: vec![ion],
        };
        let reps = SymmetricChainMapper::default()
            .representations(&target, &site, &target, 10.0, 10)
            .unwrap();
        assert!(reps.is_empty());
    }

    #[test]
    fn representation_looks_up_model_residue() {
        let target = dimer(Vector3::new(20.0, 0.5, 0.25));
        let site = site_over_chain(&target, 'B');
        let reps = SymmetricChainMapper::default()
            .representations(&target, &site, &target, 10.0, 10)
            .unwrap();
        let first = site.residues[0];
        assert!(reps[0].model_residue(first).is_some());
        assert!(reps[0].model_residue(ResidueId::default()).is_none());
    }
}
