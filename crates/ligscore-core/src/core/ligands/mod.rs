//! # Ligands Module
//!
//! Everything that turns residues of a structure into scorable ligands.
//!
//! - [`extraction`] - Collects ligands from non-polymer chains and validates that none of
//!   them is covalently linked into a polymer.
//! - [`normalization`] - Resolves caller-supplied ligands ([`LigandInput`]) against a working
//!   copy of a structure, deep-copying external ligands into it.
//! - [`graph`] - Molecular graphs of ligands and the enumeration of their label-preserving
//!   isomorphisms, which is what makes scoring symmetry-aware.

pub mod extraction;
pub mod graph;
pub mod normalization;

use crate::core::models::ids::{ResidueId, ResidueSpecifier};
use crate::core::models::system::MolecularSystem;
use thiserror::Error;

/// A handle to one residue of some structure.
#[derive(Debug, Clone, Copy)]
pub struct ResidueRef<'a> {
    pub system: &'a MolecularSystem,
    pub residue_id: ResidueId,
}

impl<'a> ResidueRef<'a> {
    pub fn new(system: &'a MolecularSystem, residue_id: ResidueId) -> Self {
        Self { system, residue_id }
    }
}

/// Caller-supplied ligands.
///
/// Each variant may reference the structure the ligands are meant for, or an unrelated
/// structure (e.g. ligands loaded from separate SDF/mmCIF files), in which case they are
/// copied into the working structure.
#[derive(Debug, Clone)]
pub enum LigandInput<'a> {
    /// Whole structures; every residue of every structure is a separate ligand.
    Structures(Vec<&'a MolecularSystem>),
    /// Individual residues.
    Residues(Vec<ResidueRef<'a>>),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LigandError {
    #[error("Invalid ligand input: {0}")]
    InvalidInputType(String),

    #[error("Connected residues in non-polymer chain {chain_id} (residue {residue_number})")]
    StructuralInconsistency { chain_id: char, residue_number: isize },

    #[error("A residue number {} already exists in chain {}", .spec.residue_number, .spec.chain_id)]
    DuplicateResidue { spec: ResidueSpecifier },
}
