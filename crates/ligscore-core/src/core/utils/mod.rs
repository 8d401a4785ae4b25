//! Geometric and chemical primitives shared by the ligand and scoring layers: rigid-body
//! superposition and RMSD ([`geometry`]), the local distance difference test ([`lddt`]),
//! radius queries ([`spatial`]) and static residue/atom name tables ([`identifiers`]).

pub mod geometry;
pub mod identifiers;
pub mod lddt;
pub mod spatial;
