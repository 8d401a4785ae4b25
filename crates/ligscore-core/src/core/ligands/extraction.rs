use super::LigandError;
use crate::core::models::chain::ChainType;
use crate::core::models::ids::ResidueId;
use crate::core::models::system::MolecularSystem;
use tracing::debug;

/// Extracts the ligands of a structure from its non-polymer chains.
///
/// Residues are returned in native chain-then-residue order. A non-polymer chain may hold
/// several ligands, but none of them may be linked to its successor by a polymer bond:
/// such a chain is most likely a mislabeled peptide or oligonucleotide.
///
/// # Errors
///
/// Returns [`LigandError::StructuralInconsistency`] naming the first residue found to be
/// sequence-bonded to a neighbor.
pub fn extract_ligands(system: &MolecularSystem) -> Result<Vec<ResidueId>, LigandError> {
    let mut ligands = Vec::new();

    for (_, chain) in system
        .chains_iter()
        .filter(|(_, chain)| chain.chain_type == ChainType::NonPolymer)
    {
        for &residue_id in chain.residues() {
            ensure_not_polymer_linked(system, residue_id)?;
            ligands.push(residue_id);
        }
    }

    debug!(count = ligands.len(), "Extracted ligands from non-polymer chains.");
    Ok(ligands)
}

/// Checks that `residue_id` is not joined to its predecessor or successor by a polymer
/// linkage (peptide C-N or phosphodiester O3'-P bond).
///
/// # Arguments
///
/// * `system` - The structure holding the residue.
/// * `residue_id` - The residue to be treated as a ligand.
///
/// # Errors
///
/// Returns [`LigandError::StructuralInconsistency`] naming `residue_id` if it is
/// sequence-bonded to either neighbor in its chain.
pub fn ensure_not_polymer_linked(
    system: &MolecularSystem,
    residue_id: ResidueId,
) -> Result<(), LigandError> {
    let linked_to_previous = system
        .previous_residue(residue_id)
        .is_some_and(|previous| system.in_sequence(previous, residue_id));
    let linked_to_next = system
        .next_residue(residue_id)
        .is_some_and(|next| system.in_sequence(residue_id, next));
    if !(linked_to_previous || linked_to_next) {
        return Ok(());
    }

    let (chain_id, residue_number) = system
        .residue_specifier(residue_id)
        .map(|spec| (spec.chain_id, spec.residue_number))
        .unwrap_or_default();
    Err(LigandError::StructuralInconsistency {
        chain_id,
        residue_number,
    })
}
