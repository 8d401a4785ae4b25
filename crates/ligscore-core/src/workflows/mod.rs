//! # Workflows Module
//!
//! High-level entry points.
//!
//! - **Ligand Scoring** ([`ligand_scoring`]) - Compares the ligands of a model with those of
//!   a target and produces symmetry-corrected RMSD and lDDT-PLI matrices.

pub mod ligand_scoring;
