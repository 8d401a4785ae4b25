use super::ids::AtomId;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum BondOrder {
    #[default]
    Single,
    Double,
    Triple,
    Aromatic,
}

#[derive(Debug, Error)]
#[error("Invalid bond order string")]
pub struct ParseBondOrderError;

impl FromStr for BondOrder {
    type Err = ParseBondOrderError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1" | "s" | "sing" | "single" => Ok(Self::Single),
            "2" | "d" | "doub" | "double" => Ok(Self::Double),
            "3" | "t" | "trip" | "triple" => Ok(Self::Triple),
            "ar" | "arom" | "aromatic" => Ok(Self::Aromatic),
            _ => Err(ParseBondOrderError),
        }
    }
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Single => "Single",
            Self::Double => "Double",
            Self::Triple => "Triple",
            Self::Aromatic => "Aromatic",
        })
    }
}

/// An undirected covalent bond.
///
/// Endpoints are stored in canonical (sorted) order so that the records `a-b` and `b-a`
/// compare and hash equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub atom1_id: AtomId,
    pub atom2_id: AtomId,
    pub order: BondOrder,
}

impl Bond {
    /// Creates a bond between two atoms, storing the endpoints in canonical order.
    ///
    /// # Arguments
    ///
    /// * `a` - The ID of one endpoint.
    /// * `b` - The ID of the other endpoint.
    /// * `order` - The bond order.
    pub fn new(a: AtomId, b: AtomId, order: BondOrder) -> Self {
        let (atom1_id, atom2_id) = if a <= b { (a, b) } else { (b, a) };
        Self {
            atom1_id,
            atom2_id,
            order,
        }
    }

    /// Checks whether `atom_id` is an endpoint of this bond.
    pub fn contains(&self, atom_id: AtomId) -> bool {
        self.atom1_id == atom_id || self.atom2_id == atom_id
    }

    /// Returns the atom on the other end of the bond, or `None` if `atom_id` is not an
    /// endpoint.
    pub fn partner(&self, atom_id: AtomId) -> Option<AtomId> {
        if self.atom1_id == atom_id {
            Some(self.atom2_id)
        } else if self.atom2_id == atom_id {
            Some(self.atom1_id)
        } else {
            None
        }
    }

    /// Checks whether this bond joins `a` and `b`, in either direction.
    pub fn connects(&self, a: AtomId, b: AtomId) -> bool {
        self.partner(a) == Some(b)
    }
}
