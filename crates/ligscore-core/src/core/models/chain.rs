use super::ids::ResidueId;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Entity type of a chain.
///
/// Ligands are extracted from [`ChainType::NonPolymer`] chains, and only polymer chains
/// take part in binding-site chain mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainType {
    Protein,
    DNA,
    RNA,
    NonPolymer,
    Water,
    Other,
}

impl ChainType {
    /// Checks whether chains of this type are polymers.
    ///
    /// # Return
    ///
    /// Returns `true` for protein, DNA and RNA chains.
    pub fn is_polymer(&self) -> bool {
        matches!(self, ChainType::Protein | ChainType::DNA | ChainType::RNA)
    }
}

#[derive(Debug, Error)]
#[error("Invalid chain type string")]
pub struct ParseChainTypeError;

impl FromStr for ChainType {
    type Err = ParseChainTypeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "protein" | "polypeptide" => Ok(ChainType::Protein),
            "dna" => Ok(ChainType::DNA),
            "rna" => Ok(ChainType::RNA),
            "non-polymer" | "non_polymer" | "nonpolymer" | "ligand" => Ok(ChainType::NonPolymer),
            "water" => Ok(ChainType::Water),
            "other" => Ok(ChainType::Other),
            _ => Err(ParseChainTypeError),
        }
    }
}

impl fmt::Display for ChainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ChainType::Protein => "Protein",
                ChainType::DNA => "DNA",
                ChainType::RNA => "RNA",
                ChainType::NonPolymer => "NonPolymer",
                ChainType::Water => "Water",
                ChainType::Other => "Other",
            }
        )
    }
}

/// A chain of a molecular structure, holding its residues in native order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub id: char,                        // Chain identifier (e.g., 'A', 'B')
    pub chain_type: ChainType,           // Polymer / non-polymer classification
    pub(crate) residues: Vec<ResidueId>, // Residues in native (source) order
}

impl Chain {
    pub(crate) fn new(id: char, chain_type: ChainType) -> Self {
        Self {
            id,
            chain_type,
            residues: Vec::new(),
        }
    }

    /// Returns the IDs of the residues in this chain.
    ///
    /// # Return
    ///
    /// A slice of residue IDs in native (source) order.
    pub fn residues(&self) -> &[ResidueId] {
        &self.residues
    }
}
