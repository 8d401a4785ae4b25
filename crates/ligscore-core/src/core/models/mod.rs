//! # Core Models Module
//!
//! Data structures describing a macromolecular structure.
//!
//! ## Key Components
//!
//! - [`atom`] - Atom name, element and position
//! - [`residue`] - Residues with their chemical classification and ligand flag
//! - [`chain`] - Chains and their polymer type
//! - [`system`] - The `MolecularSystem` arena owning all of the above
//! - [`topology`] - Bonds and bond orders
//! - [`ids`] - Arena keys and the human-readable `ResidueSpecifier`
//!
//! ## Usage
//!
//! ```ignore
//! use ligscore::core::models::{atom::{Atom, Element}, chain::ChainType, residue::ChemType};
//! use ligscore::core::models::system::MolecularSystem;
//!
//! let mut system = MolecularSystem::new();
//! let chain_id = system.add_chain('L', ChainType::NonPolymer);
//! let residue_id = system.add_residue(chain_id, 1, "ATP", ChemType::Ligand)?;
//! system.add_atom_to_residue(residue_id, Atom::new("PG", Element::P, residue_id, Point3::origin()))?;
//! ```

pub mod atom;
pub mod chain;
pub mod ids;
pub mod residue;
pub mod system;
pub mod topology;
