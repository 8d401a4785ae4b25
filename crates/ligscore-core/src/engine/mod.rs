//! # Engine Module
//!
//! The stateful scoring layer between the structure models and the public workflow.
//!
//! ## Overview
//!
//! Scoring a model ligand against a target ligand needs more than the two ligands: the
//! model must be placed in the target's frame, and that placement comes from the protein
//! around the ligand. The engine finds that protein environment ([`binding_site`]), maps it
//! onto the model in one or more ranked ways ([`chain_mapping`]), and scores ligand pairs
//! under each mapping ([`scoring`]), collecting the best values in a [`matrix`].
//!
//! ## Architecture
//!
//! - **Binding Sites** ([`binding_site`]) - Target residues within a radius of a ligand
//! - **Chain Mapping** ([`chain_mapping`]) - The `ChainMapper` seam and its default
//!   implementation producing ranked binding-site representations
//! - **Pair Scoring** ([`scoring`]) - RMSD and lDDT-PLI over all atom mappings of a pair
//! - **Score Matrices** ([`matrix`]) - Target-by-model results, greedy assignment, CSV export
//! - **Configuration** ([`config`]) - Radii, limits and modes, from a builder or TOML
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - `ScoringError`, wrapping the lower layers' errors

pub mod binding_site;
pub(crate) mod cache;
pub mod chain_mapping;
pub mod config;
pub mod error;
pub mod matrix;
pub mod progress;
pub mod scoring;
