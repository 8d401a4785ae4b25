use crate::core::models::ids::ResidueId;
use crate::core::models::system::MolecularSystem;
use crate::core::utils::spatial::NeighborSearch;
use std::collections::HashSet;
use tracing::trace;

/// The residues surrounding one ligand, in native chain-then-residue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingSite {
    pub ligand: ResidueId,
    pub residues: Vec<ResidueId>,
}

impl BindingSite {
    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn contains(&self, residue_id: ResidueId) -> bool {
        self.residues.contains(&residue_id)
    }
}

/// Collects every residue with at least one atom within `radius` of an atom of `ligand`.
///
/// The ligand itself, other ligand-flagged residues and waters are never part of a binding
/// site. The result does not depend on the order in which `search` reports its hits.
pub fn locate_binding_site<S>(
    system: &MolecularSystem,
    ligand: ResidueId,
    radius: f64,
    search: &S,
) -> BindingSite
where
    S: NeighborSearch + ?Sized,
{
    let mut selected: HashSet<ResidueId> = HashSet::new();

    for (_, atom) in system.residue_atoms(ligand) {
        for neighbor_id in search.atoms_within(&atom.position, radius) {
            let Some(residue_id) = system.atom(neighbor_id).map(|a| a.residue_id) else {
                continue;
            };
            if residue_id == ligand || selected.contains(&residue_id) {
                continue;
            }
            let Some(residue) = system.residue(residue_id) else {
                continue;
            };
            if residue.is_ligand() || residue.is_water() {
                continue;
            }
            selected.insert(residue_id);
        }
    }

    let residues: Vec<ResidueId> = system
        .residues_in_order()
        .filter(|id| selected.contains(id))
        .collect();
    trace!(
        residues = residues.len(),
        radius,
        "Located binding site residues."
    );
    BindingSite { ligand, residues }
}
