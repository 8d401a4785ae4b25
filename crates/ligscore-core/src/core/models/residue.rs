use super::ids::{AtomId, ChainId};
use crate::core::utils::identifiers::{is_amino_acid_name, is_nucleotide_name, is_water_name};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Chemical classification of a residue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChemType {
    AminoAcid,
    Nucleotide,
    Water,
    /// A small molecule that is not part of a polymer.
    Ligand,
    #[default]
    Unknown,
}

impl ChemType {
    /// Classifies a residue from its three-letter (or shorter) component name.
    ///
    /// Standard amino acids, nucleotides and common water names are recognized; every
    /// other name is treated as a ligand.
    ///
    /// # Arguments
    ///
    /// * `name` - The residue component name (e.g. `"ALA"`, `"HOH"`, `"ATP"`).
    ///
    /// # Return
    ///
    /// The inferred `ChemType`.
    pub fn from_residue_name(name: &str) -> Self {
        let name = name.trim();
        if is_water_name(name) {
            ChemType::Water
        } else if is_amino_acid_name(name) {
            ChemType::AminoAcid
        } else if is_nucleotide_name(name) {
            ChemType::Nucleotide
        } else {
            ChemType::Ligand
        }
    }
}

#[derive(Debug, Error)]
#[error("Invalid chemical type string")]
pub struct ParseChemTypeError;

impl FromStr for ChemType {
    type Err = ParseChemTypeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "aminoacid" | "amino-acid" | "amino_acid" => Ok(ChemType::AminoAcid),
            "nucleotide" => Ok(ChemType::Nucleotide),
            "water" | "waters" => Ok(ChemType::Water),
            "ligand" | "non-polymer" => Ok(ChemType::Ligand),
            "unknown" => Ok(ChemType::Unknown),
            _ => Err(ParseChemTypeError),
        }
    }
}

impl fmt::Display for ChemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChemType::AminoAcid => "AminoAcid",
            ChemType::Nucleotide => "Nucleotide",
            ChemType::Water => "Water",
            ChemType::Ligand => "Ligand",
            ChemType::Unknown => "Unknown",
        })
    }
}

/// A residue of a molecular structure: an amino acid, nucleotide, water or ligand.
///
/// Residues are owned by a [`MolecularSystem`](super::system::MolecularSystem) and
/// identified within it by their chain and residue number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    pub residue_number: isize,              // Residue sequence number from source file
    pub name: String,                       // Component name (e.g., "ALA", "ATP")
    pub chem_type: ChemType,                // Chemical classification
    pub chain_id: ChainId,                  // ID of the parent chain
    is_ligand: bool,                        // Ligand flag, defaults from `chem_type`
    pub(crate) atoms: Vec<AtomId>,          // Atoms in insertion order
    atom_name_map: HashMap<String, AtomId>, // Map from atom name to its stable ID
}

impl Residue {
    pub(crate) fn new(
        residue_number: isize,
        name: &str,
        chem_type: ChemType,
        chain_id: ChainId,
    ) -> Self {
        Self {
            residue_number,
            name: name.to_string(),
            chem_type,
            chain_id,
            is_ligand: chem_type == ChemType::Ligand,
            atoms: Vec::new(),
            atom_name_map: HashMap::new(),
        }
    }

    pub(crate) fn add_atom(&mut self, atom_name: &str, atom_id: AtomId) {
        self.atoms.push(atom_id);
        self.atom_name_map.insert(atom_name.to_string(), atom_id);
    }

    /// Returns the IDs of the atoms in this residue.
    ///
    /// # Return
    ///
    /// A slice of atom IDs in insertion order.
    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    /// Retrieves the ID of an atom by its name.
    ///
    /// # Arguments
    ///
    /// * `name` - The atom name (e.g. `"CA"`).
    ///
    /// # Return
    ///
    /// Returns `Some(AtomId)` if the residue has an atom of that name, otherwise `None`.
    pub fn get_atom_id_by_name(&self, name: &str) -> Option<AtomId> {
        self.atom_name_map.get(name).copied()
    }

    /// Checks whether this residue is treated as a ligand.
    ///
    /// # Return
    ///
    /// Returns `true` if the residue is flagged as a ligand. The flag defaults to
    /// `chem_type == ChemType::Ligand` and is set explicitly for resolved ligands.
    pub fn is_ligand(&self) -> bool {
        self.is_ligand
    }

    /// Sets the ligand flag of this residue.
    ///
    /// # Arguments
    ///
    /// * `is_ligand` - The new flag value.
    pub fn set_is_ligand(&mut self, is_ligand: bool) {
        self.is_ligand = is_ligand;
    }

    /// Checks whether this residue is a water molecule.
    ///
    /// # Return
    ///
    /// Returns `true` if the residue's chemical type is [`ChemType::Water`].
    pub fn is_water(&self) -> bool {
        self.chem_type == ChemType::Water
    }
}
