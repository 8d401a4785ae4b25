use slotmap::new_key_type;
use std::fmt;

new_key_type! {
    pub struct AtomId;
    pub struct ResidueId;
    pub struct ChainId;
}

/// Structure-independent address of a residue: chain identifier plus residue number.
///
/// Slot-map keys are only meaningful inside the system that issued them, so whenever a
/// residue has to be located in a *different* structure (a deep copy, an external ligand
/// source) it is addressed through this specifier instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResidueSpecifier {
    pub chain_id: char,
    pub residue_number: isize,
}

impl ResidueSpecifier {
    /// Creates a specifier from a chain identifier and residue number.
    ///
    /// # Arguments
    ///
    /// * `chain_id` - The single-character chain identifier.
    /// * `residue_number` - The residue number within the chain.
    pub fn new(chain_id: char, residue_number: isize) -> Self {
        Self {
            chain_id,
            residue_number,
        }
    }
}

impl fmt::Display for ResidueSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.chain_id, self.residue_number)
    }
}
