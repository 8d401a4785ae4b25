use super::ids::ResidueId;
use nalgebra::Point3;
use std::fmt;
use std::str::FromStr;

/// Chemical element of an atom.
///
/// Elements are used as node labels when matching ligand graphs, so two atoms can only be
/// placed in correspondence when their elements compare equal. Symbols outside the covered
/// set parse to [`Element::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Element {
    // --- Core Bio-organic ---
    H,
    C,
    N,
    O,
    P,
    S,

    // --- Halogens ---
    F,
    Cl,
    Br,
    I,

    // --- Common Ions & Metals ---
    Na,
    K,
    Mg,
    Ca,
    Mn,
    Fe,
    Co,
    Ni,
    Cu,
    Zn,
    Cd,
    Hg,
    Pt,

    // --- Metalloids & Others ---
    B,
    Si,
    Se,
    As,

    #[default]
    Unknown,
}

impl Element {
    /// Returns `true` for hydrogen (including deuterium and tritium, which parse to `H`).
    pub fn is_hydrogen(&self) -> bool {
        matches!(self, Element::H)
    }

    /// Returns the canonical element symbol.
    ///
    /// # Return
    ///
    /// The symbol with standard capitalization (e.g. `"Cl"`), or `"X"` for
    /// [`Element::Unknown`].
    pub fn symbol(&self) -> &'static str {
        match self {
            Element::H => "H",
            Element::C => "C",
            Element::N => "N",
            Element::O => "O",
            Element::P => "P",
            Element::S => "S",
            Element::F => "F",
            Element::Cl => "Cl",
            Element::Br => "Br",
            Element::I => "I",
            Element::Na => "Na",
            Element::K => "K",
            Element::Mg => "Mg",
            Element::Ca => "Ca",
            Element::Mn => "Mn",
            Element::Fe => "Fe",
            Element::Co => "Co",
            Element::Ni => "Ni",
            Element::Cu => "Cu",
            Element::Zn => "Zn",
            Element::Cd => "Cd",
            Element::Hg => "Hg",
            Element::Pt => "Pt",
            Element::B => "B",
            Element::Si => "Si",
            Element::Se => "Se",
            Element::As => "As",
            Element::Unknown => "X",
        }
    }
}

impl FromStr for Element {
    type Err = std::convert::Infallible;

    /// Parses an element symbol, case-insensitively. Never fails: unrecognized symbols map
    /// to [`Element::Unknown`].
    fn from_str(symbol: &str) -> Result<Self, Self::Err> {
        Ok(match symbol.trim().to_ascii_uppercase().as_str() {
            "H" | "D" | "T" => Element::H,
            "C" => Element::C,
            "N" => Element::N,
            "O" => Element::O,
            "P" => Element::P,
            "S" => Element::S,
            "F" => Element::F,
            "CL" => Element::Cl,
            "BR" => Element::Br,
            "I" => Element::I,
            "NA" => Element::Na,
            "K" => Element::K,
            "MG" => Element::Mg,
            "CA" => Element::Ca,
            "MN" => Element::Mn,
            "FE" => Element::Fe,
            "CO" => Element::Co,
            "NI" => Element::Ni,
            "CU" => Element::Cu,
            "ZN" => Element::Zn,
            "CD" => Element::Cd,
            "HG" => Element::Hg,
            "PT" => Element::Pt,
            "B" => Element::B,
            "SI" => Element::Si,
            "SE" => Element::Se,
            "AS" => Element::As,
            _ => Element::Unknown,
        })
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// An atom of a molecular structure.
///
/// Covalent connectivity is not stored on the atom itself; bonds are owned by the
/// enclosing [`MolecularSystem`](super::system::MolecularSystem) and may cross residue
/// boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The name of the atom, unique within its residue (e.g. "CA", "O1G").
    pub name: String,
    /// The ID of the parent residue this atom belongs to.
    pub residue_id: ResidueId,
    /// The chemical element.
    pub element: Element,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
}

impl Atom {
    /// Creates a new atom.
    ///
    /// # Arguments
    ///
    /// * `name` - The atom name, unique within its residue.
    /// * `element` - The chemical element.
    /// * `residue_id` - The ID of the parent residue.
    /// * `position` - The Cartesian coordinates in Angstroms.
    ///
    /// # Return
    ///
    /// A new `Atom`. The parent residue ID is overwritten when the atom is added through
    /// [`MolecularSystem::add_atom_to_residue`](super::system::MolecularSystem::add_atom_to_residue).
    pub fn new(name: &str, element: Element, residue_id: ResidueId, position: Point3<f64>) -> Self {
        Self {
            name: name.to_string(),
            residue_id,
            element,
            position,
        }
    }

    /// Checks whether this atom is a hydrogen.
    ///
    /// # Return
    ///
    /// Returns `true` if the element is hydrogen, deuterium or tritium.
    pub fn is_hydrogen(&self) -> bool {
        self.element.is_hydrogen()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_atom_stores_all_fields() {
        let residue_id = ResidueId::default();
        let atom = Atom::new("C1'", Element::C, residue_id, Point3::new(1.0, 2.0, 3.0));

        assert_eq!(atom.name, "C1'");
        assert_eq!(atom.element, Element::C);
        assert_eq!(atom.residue_id, residue_id);
        assert_eq!(atom.position, Point3::new(1.0, 2.0, 3.0));
        assert!(!atom.is_hydrogen());
    }

    #[test]
    fn element_from_str_is_case_insensitive() {
        assert_eq!("cl".parse::<Element>().unwrap(), Element::Cl);
        assert_eq!("Zn".parse::<Element>().unwrap(), Element::Zn);
        assert_eq!(" O ".parse::<Element>().unwrap(), Element::O);
    }

    #[test]
    fn element_from_str_maps_hydrogen_isotopes_to_hydrogen() {
        for symbol in ["H", "D", "T"] {
            assert!(symbol.parse::<Element>().unwrap().is_hydrogen());
        }
    }

    #[test]
    fn element_from_str_falls_back_to_unknown() {
        assert_eq!("Xx".parse::<Element>().unwrap(), Element::Unknown);
        assert_eq!("".parse::<Element>().unwrap(), Element::Unknown);
    }

    #[test]
    fn element_display_round_trips_through_from_str() {
        for element in [Element::C, Element::Cl, Element::Mg, Element::Se] {
            assert_eq!(element.to_string().parse::<Element>().unwrap(), element);
        }
    }
}
