use super::extraction::ensure_not_polymer_linked;
use super::{LigandError, LigandInput, ResidueRef};
use crate::core::models::atom::Atom;
use crate::core::models::chain::ChainType;
use crate::core::models::ids::{AtomId, ResidueId, ResidueSpecifier};
use crate::core::models::system::MolecularSystem;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Stages deep copies of external ligand residues into a target structure.
///
/// Copies are validated when staged and only written by [`LigandCopier::commit`], so a
/// failing input leaves the target structure untouched.
pub struct LigandCopier<'t, 'a> {
    target: &'t mut MolecularSystem,
    staged: Vec<(ResidueSpecifier, ResidueRef<'a>)>,
    reserved: HashSet<ResidueSpecifier>,
}

impl<'t, 'a> LigandCopier<'t, 'a> {
    pub fn new(target: &'t mut MolecularSystem) -> Self {
        Self {
            target,
            staged: Vec::new(),
            reserved: HashSet::new(),
        }
    }

    /// Looks up a residue that already belongs to the target structure.
    pub fn find_existing(&self, spec: ResidueSpecifier) -> Option<ResidueId> {
        self.target.find_residue(spec)
    }

    /// Schedules `residue` to be copied, returning its position among the staged copies.
    ///
    /// # Errors
    ///
    /// - [`LigandError::InvalidInputType`] if the handle does not resolve in its structure.
    /// - [`LigandError::DuplicateResidue`] if the target already holds a residue with the
    ///   same chain and number, or another staged copy claims that slot.
    pub fn stage(&mut self, residue: ResidueRef<'a>) -> Result<usize, LigandError> {
        let spec = residue
            .system
            .residue_specifier(residue.residue_id)
            .ok_or_else(|| {
                LigandError::InvalidInputType(
                    "residue handle does not belong to its structure".to_string(),
                )
            })?;

        if self.target.find_residue(spec).is_some() || !self.reserved.insert(spec) {
            return Err(LigandError::DuplicateResidue { spec });
        }

        self.staged.push((spec, residue));
        Ok(self.staged.len() - 1)
    }

    pub fn staged_count(&self) -> usize {
        self.staged.len()
    }

    /// Writes all staged copies into the target structure, in staging order.
    pub fn commit(self) -> Result<Vec<ResidueId>, LigandError> {
        let LigandCopier { target, staged, .. } = self;
        let mut copies = Vec::with_capacity(staged.len());
        for (spec, source) in staged {
            copies.push(copy_residue(target, spec, source)?);
        }
        if !copies.is_empty() {
            debug!(count = copies.len(), "Copied external ligands into structure.");
        }
        Ok(copies)
    }
}

fn copy_residue(
    target: &mut MolecularSystem,
    spec: ResidueSpecifier,
    source: ResidueRef<'_>,
) -> Result<ResidueId, LigandError> {
    let unresolved = || {
        LigandError::InvalidInputType(format!("ligand residue {spec} could not be copied"))
    };
    let source_residue = source.system.residue(source.residue_id).ok_or_else(unresolved)?;

    let chain_id = target.add_chain(spec.chain_id, ChainType::NonPolymer);
    let new_residue_id = target
        .add_residue(
            chain_id,
            spec.residue_number,
            &source_residue.name,
            source_residue.chem_type,
        )
        .ok_or_else(unresolved)?;
    if let Some(residue) = target.residue_mut(new_residue_id) {
        residue.set_is_ligand(true);
    }

    let mut atom_map: HashMap<AtomId, AtomId> = HashMap::new();
    for (source_atom_id, atom) in source.system.residue_atoms(source.residue_id) {
        let copy = Atom::new(&atom.name, atom.element, new_residue_id, atom.position);
        let new_atom_id = target
            .add_atom_to_residue(new_residue_id, copy)
            .ok_or_else(unresolved)?;
        atom_map.insert(source_atom_id, new_atom_id);
    }

    for bond in source.system.bonds() {
        if let (Some(&a), Some(&b)) = (atom_map.get(&bond.atom1_id), atom_map.get(&bond.atom2_id)) {
            target.add_bond(a, b, bond.order).ok_or_else(unresolved)?;
        }
    }

    Ok(new_residue_id)
}

enum Slot {
    Existing(ResidueId),
    Copied(usize),
}

/// Resolves caller-supplied ligands into residues of `structure`.
///
/// `structure` is the working copy of `source_structure`. Ligands that belong to
/// `source_structure` are fetched from the copy by chain and residue number; all other
/// ligands are deep-copied into `structure` (atoms, positions and intra-residue bonds)
/// under their original chain identifier and residue number, and flagged as ligands.
/// The output preserves the input order, one entry per ligand residue.
///
/// # Errors
///
/// - [`LigandError::InvalidInputType`] for unresolvable handles or empty ligand structures.
/// - [`LigandError::StructuralInconsistency`] if a ligand is joined to a neighboring residue
///   of its own structure by a peptide or phosphodiester bond.
/// - [`LigandError::DuplicateResidue`] if a copy would collide with an existing residue.
///
/// All errors are detected before anything is written to `structure`.
pub fn normalize_ligands<'a>(
    structure: &mut MolecularSystem,
    source_structure: &MolecularSystem,
    input: LigandInput<'a>,
) -> Result<Vec<ResidueId>, LigandError> {
    let residues: Vec<ResidueRef<'a>> = match input {
        LigandInput::Structures(structures) => {
            let mut residues = Vec::new();
            for system in structures {
                let before = residues.len();
                residues.extend(
                    system
                        .residues_in_order()
                        .map(|residue_id| ResidueRef::new(system, residue_id)),
                );
                if residues.len() == before {
                    return Err(LigandError::InvalidInputType(
                        "ligand structure contains no residues".to_string(),
                    ));
                }
            }
            residues
        }
        LigandInput::Residues(residues) => residues,
    };

    let mut copier = LigandCopier::new(structure);
    let mut slots = Vec::with_capacity(residues.len());

    for residue in residues {
        ensure_not_polymer_linked(residue.system, residue.residue_id)?;
        if std::ptr::eq(residue.system, source_structure) {
            let existing = source_structure
                .residue_specifier(residue.residue_id)
                .and_then(|spec| copier.find_existing(spec))
                .ok_or_else(|| {
                    LigandError::InvalidInputType(
                        "residue handle does not belong to its structure".to_string(),
                    )
                })?;
            slots.push(Slot::Existing(existing));
        } else {
            slots.push(Slot::Copied(copier.stage(residue)?));
        }
    }

    let copies = copier.commit()?;
    Ok(slots
        .into_iter()
        .map(|slot| match slot {
            Slot::Existing(id) => id,
            Slot::Copied(index) => copies[index],
        })
        .collect())
}
