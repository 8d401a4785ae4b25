use super::chain_mapping::Representation;
use super::config::{ScoringConfig, SuperpositionMode};
use super::matrix::Metric;
use crate::core::ligands::graph::{LigandGraph, NodeMapping};
use crate::core::models::atom::Atom;
use crate::core::models::system::MolecularSystem;
use crate::core::utils::geometry::{calculate_rmsd, calculate_superposed_rmsd, superpose};
use crate::core::utils::lddt::{ContactDistance, LDDT_THRESHOLDS, local_distance_test};
use nalgebra::{Isometry3, Point3};

/// Minimum number of matched binding-site atoms for a binding-site superposition.
const MIN_SUPERPOSITION_ATOMS: usize = 3;

/// Everything about a (target ligand, representation) combination that does not depend on
/// the model ligand being scored.
#[derive(Debug, Clone)]
pub enum Frame {
    /// RMSD after applying a fixed transform to the model.
    FixedRmsd(Isometry3<f64>),
    /// RMSD after superposing each atom mapping of the ligands.
    LigandSuperposedRmsd,
    /// lDDT-PLI over the listed target contacts.
    LddtPli(Vec<InterfaceContact>),
}

/// A contact between a target ligand atom and a target binding-site atom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterfaceContact {
    /// Node of the target ligand graph.
    pub ligand_node: usize,
    pub reference_distance: f64,
    /// Position of the same binding-site atom in the model, if it exists there.
    pub model_partner: Option<Point3<f64>>,
}

/// Best value of one ligand pair under one frame, with the mapping that achieved it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestMapping {
    pub value: f64,
    pub mapping_index: usize,
}

fn is_considered(atom: &Atom, ignore_hydrogens: bool) -> bool {
    !(ignore_hydrogens && atom.is_hydrogen())
}

pub fn graph_positions(system: &MolecularSystem, graph: &LigandGraph) -> Vec<Point3<f64>> {
    graph
        .atom_ids()
        .iter()
        .filter_map(|&id| system.atom(id).map(|atom| atom.position))
        .collect()
}

/// Binding-site atoms of a representation present in both structures, matched by name.
fn matched_site_atoms(
    target: &MolecularSystem,
    model: &MolecularSystem,
    representation: &Representation,
    ignore_hydrogens: bool,
) -> (Vec<Point3<f64>>, Vec<Point3<f64>>) {
    let mut target_points = Vec::new();
    let mut model_points = Vec::new();
    for &(target_residue, model_residue) in &representation.residue_pairs {
        let Some(model_res) = model.residue(model_residue) else {
            continue;
        };
        for (_, atom) in target.residue_atoms(target_residue) {
            if !is_considered(atom, ignore_hydrogens) {
                continue;
            }
            if let Some(model_atom) = model_res
                .get_atom_id_by_name(&atom.name)
                .and_then(|id| model.atom(id))
            {
                target_points.push(atom.position);
                model_points.push(model_atom.position);
            }
        }
    }
    (target_points, model_points)
}

/// Prepares the model-independent part of scoring a target ligand under `representation`.
///
/// Returns `None` when the combination cannot produce a value for any model ligand: too few
/// matched atoms for a binding-site superposition, or no interface contacts for lDDT-PLI.
pub fn prepare_frame(
    metric: Metric,
    target: &MolecularSystem,
    target_graph: &LigandGraph,
    model: &MolecularSystem,
    representation: &Representation,
    config: &ScoringConfig,
) -> Option<Frame> {
    match metric {
        Metric::Rmsd => match config.superposition {
            SuperpositionMode::BindingSite => {
                let (target_points, model_points) =
                    matched_site_atoms(target, model, representation, config.ignore_hydrogens);
                if target_points.len() < MIN_SUPERPOSITION_ATOMS {
                    return None;
                }
                superpose(&model_points, &target_points).map(Frame::FixedRmsd)
            }
            SuperpositionMode::Ligand => Some(Frame::LigandSuperposedRmsd),
            SuperpositionMode::None => Some(Frame::FixedRmsd(Isometry3::identity())),
        },
        Metric::LddtPli => {
            let contacts =
                interface_contacts(target, target_graph, model, representation, config);
            (!contacts.is_empty()).then_some(Frame::LddtPli(contacts))
        }
    }
}

fn interface_contacts(
    target: &MolecularSystem,
    target_graph: &LigandGraph,
    model: &MolecularSystem,
    representation: &Representation,
    config: &ScoringConfig,
) -> Vec<InterfaceContact> {
    let mut site_atoms: Vec<(Point3<f64>, Option<Point3<f64>>)> = Vec::new();
    for &(target_residue, model_residue) in &representation.residue_pairs {
        let model_res = model.residue(model_residue);
        for (_, atom) in target.residue_atoms(target_residue) {
            if !is_considered(atom, config.ignore_hydrogens) {
                continue;
            }
            let partner = model_res
                .and_then(|r| r.get_atom_id_by_name(&atom.name))
                .and_then(|id| model.atom(id))
                .map(|a| a.position);
            site_atoms.push((atom.position, partner));
        }
    }

    let ligand_positions = graph_positions(target, target_graph);
    let mut contacts = Vec::new();
    for (ligand_node, ligand_position) in ligand_positions.iter().enumerate() {
        for &(site_position, model_partner) in &site_atoms {
            let reference_distance = nalgebra::distance(ligand_position, &site_position);
            if reference_distance < config.lddt_pli_radius {
                contacts.push(InterfaceContact {
                    ligand_node,
                    reference_distance,
                    model_partner,
                });
            }
        }
    }
    contacts
}

/// Evaluates every atom mapping and keeps the best one.
///
/// `mappings[k][i]` is the model ligand atom (graph node) matched to target node `i`. The
/// first mapping reaching the best value wins.
pub fn best_mapping(
    metric: Metric,
    frame: &Frame,
    target_positions: &[Point3<f64>],
    model_positions: &[Point3<f64>],
    mappings: &[NodeMapping],
) -> Option<BestMapping> {
    let mut best: Option<BestMapping> = None;
    for (mapping_index, mapping) in mappings.iter().enumerate() {
        let Some(mapped) = mapping
            .iter()
            .map(|&node| model_positions.get(node).copied())
            .collect::<Option<Vec<Point3<f64>>>>()
        else {
            continue;
        };
        let Some(value) = evaluate(frame, target_positions, &mapped) else {
            continue;
        };
        if best.is_none_or(|current| metric.is_better(value, current.value)) {
            best = Some(BestMapping {
                value,
                mapping_index,
            });
        }
    }
    best
}

fn evaluate(frame: &Frame, target_positions: &[Point3<f64>], mapped: &[Point3<f64>]) -> Option<f64> {
    match frame {
        Frame::FixedRmsd(transform) => {
            let moved: Vec<Point3<f64>> = mapped.iter().map(|p| transform * p).collect();
            calculate_rmsd(&moved, target_positions)
        }
        Frame::LigandSuperposedRmsd => calculate_superposed_rmsd(mapped, target_positions),
        Frame::LddtPli(contacts) => {
            let distances = contacts.iter().map(|contact| {
                let model = match (mapped.get(contact.ligand_node), contact.model_partner) {
                    (Some(ligand_atom), Some(partner)) => {
                        Some(nalgebra::distance(ligand_atom, &partner))
                    }
                    _ => None,
                };
                ContactDistance::new(contact.reference_distance, model)
            });
            local_distance_test(distances, &LDDT_THRESHOLDS)
        }
    }
}
