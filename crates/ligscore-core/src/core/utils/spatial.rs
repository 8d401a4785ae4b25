use crate::core::models::ids::AtomId;
use crate::core::models::system::MolecularSystem;
use kiddo::{KdTree, SquaredEuclidean};
use nalgebra::Point3;

/// Radius query over the atoms of one structure.
///
/// Callers must not rely on the order of the returned atoms.
pub trait NeighborSearch {
    fn atoms_within(&self, point: &Point3<f64>, radius: f64) -> Vec<AtomId>;
}

/// k-d tree index over every atom of a [`MolecularSystem`].
pub struct SpatialIndex {
    tree: KdTree<f64, 3>,
    atom_ids: Vec<AtomId>,
}

impl SpatialIndex {
    pub fn new(system: &MolecularSystem) -> Self {
        let (atom_ids, positions): (Vec<AtomId>, Vec<[f64; 3]>) = system
            .atoms_iter()
            .map(|(id, atom)| (id, [atom.position.x, atom.position.y, atom.position.z]))
            .unzip();
        let tree: KdTree<f64, 3> = (&positions).into();
        Self { tree, atom_ids }
    }

    pub fn len(&self) -> usize {
        self.atom_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atom_ids.is_empty()
    }
}

impl NeighborSearch for SpatialIndex {
    fn atoms_within(&self, point: &Point3<f64>, radius: f64) -> Vec<AtomId> {
        if self.atom_ids.is_empty() {
            return Vec::new();
        }
        let query = [point.x, point.y, point.z];
        self.tree
            .within_unsorted::<SquaredEuclidean>(&query, radius * radius)
            .into_iter()
            .filter_map(|neighbour| self.atom_ids.get(neighbour.item as usize).copied())
            .collect()
    }
}
