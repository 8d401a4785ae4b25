//! # ligscore
//!
//! Symmetry-aware scoring of predicted small-molecule ligand poses against a reference
//! (target) structure.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless structure models (`MolecularSystem`), ligand
//!   extraction and normalization, ligand molecular graphs with isomorphism enumeration, and
//!   geometric primitives (superposition, RMSD, lDDT, radius search).
//!
//! - **[`engine`]: The Logic Core.** Binding-site detection, chain mapping into binding-site
//!   representations, per-pair scoring under a representation, score matrices, configuration,
//!   progress reporting and errors.
//!
//! - **[`workflows`]: The Public API.** [`workflows::ligand_scoring::LigandScorer`] ties the
//!   layers together: it takes a model and a target, finds their ligands and lazily computes
//!   the symmetry-corrected RMSD and lDDT-PLI matrices between them.

pub mod core;
pub mod engine;
pub mod workflows;

#[cfg(test)]
pub(crate) mod testing;
