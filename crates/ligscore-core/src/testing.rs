//! Structure fixtures shared by unit tests.

use crate::core::models::atom::{Atom, Element};
use crate::core::models::chain::ChainType;
use crate::core::models::ids::ResidueId;
use crate::core::models::residue::ChemType;
use crate::core::models::system::MolecularSystem;
use crate::core::models::topology::BondOrder;
use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};

pub(crate) fn add_residue(
    system: &mut MolecularSystem,
    chain: char,
    chain_type: ChainType,
    number: isize,
    name: &str,
    atoms: &[(&str, Element, Point3<f64>)],
) -> ResidueId {
    let chain_id = system.add_chain(chain, chain_type);
    let residue_id = system
        .add_residue(chain_id, number, name, ChemType::from_residue_name(name))
        .unwrap();
    for (atom_name, element, position) in atoms {
        system
            .add_atom_to_residue(residue_id, Atom::new(atom_name, *element, residue_id, *position))
            .unwrap();
    }
    residue_id
}

pub(crate) fn bond(system: &mut MolecularSystem, residue_id: ResidueId, a: &str, b: &str) {
    let residue = system.residue(residue_id).unwrap();
    let a = residue.get_atom_id_by_name(a).unwrap();
    let b = residue.get_atom_id_by_name(b).unwrap();
    system.add_bond(a, b, BondOrder::Single).unwrap();
}

/// Adds a four-atom amino-acid residue whose atoms sit at fixed offsets from `anchor`.
pub(crate) fn add_amino_acid(
    system: &mut MolecularSystem,
    chain: char,
    number: isize,
    name: &str,
    anchor: Point3<f64>,
) -> ResidueId {
    let atoms = [
        ("N", Element::N, anchor + Vector3::new(0.00, 0.00, 0.00)),
        ("CA", Element::C, anchor + Vector3::new(1.21, 0.43, -0.17)),
        ("C", Element::C, anchor + Vector3::new(1.87, -0.91, 0.38)),
        ("O", Element::O, anchor + Vector3::new(1.33, -1.62, 1.19)),
    ];
    let residue_id = add_residue(system, chain, ChainType::Protein, number, name, &atoms);
    bond(system, residue_id, "N", "CA");
    bond(system, residue_id, "CA", "C");
    bond(system, residue_id, "C", "O");
    residue_id
}

pub(crate) const ATP_ATOMS: [(&str, Element); 31] = [
    ("PG", Element::P),
    ("O1G", Element::O),
    ("O2G", Element::O),
    ("O3G", Element::O),
    ("PB", Element::P),
    ("O1B", Element::O),
    ("O2B", Element::O),
    ("O3B", Element::O),
    ("PA", Element::P),
    ("O1A", Element::O),
    ("O2A", Element::O),
    ("O3A", Element::O),
    ("O5'", Element::O),
    ("C5'", Element::C),
    ("C4'", Element::C),
    ("O4'", Element::O),
    ("C3'", Element::C),
    ("O3'", Element::O),
    ("C2'", Element::C),
    ("O2'", Element::O),
    ("C1'", Element::C),
    ("N9", Element::N),
    ("C8", Element::C),
    ("N7", Element::N),
    ("C5", Element::C),
    ("C6", Element::C),
    ("N6", Element::N),
    ("N1", Element::N),
    ("C2", Element::C),
    ("N3", Element::N),
    ("C4", Element::C),
];

pub(crate) const ATP_BONDS: [(&str, &str); 33] = [
    ("PG", "O1G"),
    ("PG", "O2G"),
    ("PG", "O3G"),
    ("PG", "O3B"),
    ("PB", "O1B"),
    ("PB", "O2B"),
    ("PB", "O3B"),
    ("PB", "O3A"),
    ("PA", "O1A"),
    ("PA", "O2A"),
    ("PA", "O3A"),
    ("PA", "O5'"),
    ("O5'", "C5'"),
    ("C5'", "C4'"),
    ("C4'", "O4'"),
    ("C4'", "C3'"),
    ("C3'", "O3'"),
    ("C3'", "C2'"),
    ("C2'", "O2'"),
    ("C2'", "C1'"),
    ("C1'", "O4'"),
    ("C1'", "N9"),
    ("N9", "C8"),
    ("C8", "N7"),
    ("N7", "C5"),
    ("C5", "C6"),
    ("C6", "N6"),
    ("C6", "N1"),
    ("N1", "C2"),
    ("C2", "N3"),
    ("N3", "C4"),
    ("C4", "C5"),
    ("C4", "N9"),
];

/// Deterministic, irregular coordinates: no two atoms share a coordinate on any axis.
pub(crate) fn spiral_position(index: usize) -> Point3<f64> {
    let t = index as f64;
    Point3::new(
        2.0 * (0.7 * t).cos() + 0.113 * t,
        2.0 * (0.7 * t).sin() + 0.071 * t,
        0.37 * t - 5.0,
    )
}

/// Adds an ATP residue. Atom `i` of [`ATP_ATOMS`] is placed at `spiral_position(i)`;
/// `rename` may relabel atoms, e.g. to permute equivalent oxygens.
pub(crate) fn add_atp(
    system: &mut MolecularSystem,
    chain: char,
    number: isize,
    rename: &dyn Fn(&str) -> String,
) -> ResidueId {
    let names: Vec<String> = ATP_ATOMS.iter().map(|(name, _)| rename(name)).collect();
    let atoms: Vec<(&str, Element, Point3<f64>)> = ATP_ATOMS
        .iter()
        .enumerate()
        .map(|(i, (_, element))| (names[i].as_str(), *element, spiral_position(i)))
        .collect();
    let residue_id = add_residue(system, chain, ChainType::NonPolymer, number, "ATP", &atoms);
    for (a, b) in ATP_BONDS {
        bond(system, residue_id, &rename(a), &rename(b));
    }
    residue_id
}

/// Adds protein chain `chain` with residues 10 and 11 lining the ATP pocket (shifted by
/// `offset`) and residue 40 far from it.
pub(crate) fn add_pocket_chain(system: &mut MolecularSystem, chain: char, offset: Vector3<f64>) {
    let lys = spiral_position(0) + Vector3::new(2.1, 0.4, 0.3) + offset;
    let ser = spiral_position(16) + Vector3::new(-0.3, 2.2, 0.6) + offset;
    add_amino_acid(system, chain, 10, "LYS", lys);
    add_amino_acid(system, chain, 11, "SER", ser);
    add_amino_acid(system, chain, 40, "GLY", Point3::new(60.0, 61.0, 62.0) + offset);
}

/// Pocket chain `A` with an ATP in chain `L`.
pub(crate) fn atp_complex(rename: &dyn Fn(&str) -> String) -> MolecularSystem {
    let mut system = MolecularSystem::new();
    add_pocket_chain(&mut system, 'A', Vector3::zeros());
    add_atp(&mut system, 'L', 1, rename);
    system
}

pub(crate) fn identity_name(name: &str) -> String {
    name.to_string()
}

pub(crate) fn rigid_motion() -> Isometry3<f64> {
    Isometry3::from_parts(
        Translation3::new(12.5, -3.25, 7.75),
        UnitQuaternion::from_euler_angles(0.4, -1.1, 2.3),
    )
}

/// Returns a copy of `system` with every atom moved by `motion`.
pub(crate) fn transformed(system: &MolecularSystem, motion: &Isometry3<f64>) -> MolecularSystem {
    let mut moved = system.clone();
    let ids: Vec<_> = moved.atoms_iter().map(|(id, _)| id).collect();
    for id in ids {
        let atom = moved.atom_mut(id).unwrap();
        atom.position = motion * atom.position;
    }
    moved
}
