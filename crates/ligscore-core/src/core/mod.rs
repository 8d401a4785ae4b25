//! # Core Module
//!
//! The foundation layer: how structures are represented and what can be computed from a
//! single structure without any scoring state.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Atoms, residues, chains, bonds and the
//!   `MolecularSystem` arena that owns them.
//! - **Ligands** ([`ligands`]) - Ligand extraction, normalization of caller-supplied ligands
//!   and ligand graphs.
//! - **Utilities** ([`utils`]) - Superposition, RMSD, lDDT, spatial indexing and name tables.

pub mod ligands;
pub mod models;
pub mod utils;
