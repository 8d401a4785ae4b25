use super::atom::Atom;
use super::chain::{Chain, ChainType};
use super::ids::{AtomId, ChainId, ResidueId, ResidueSpecifier};
use super::residue::{ChemType, Residue};
use super::topology::{Bond, BondOrder};
use crate::core::utils::identifiers::polymer_link_partner;
use slotmap::{SecondaryMap, SlotMap};
use std::collections::HashMap;

/// Represents a complete molecular system with atoms, residues, chains, and bonds.
///
/// This struct serves as the central data structure for all scoring operations. Atoms,
/// residues and chains live in slot maps and are addressed by stable keys; the native
/// chain order and the per-chain residue order of the source structure are preserved so
/// that any derived residue selection can be reported in a deterministic order.
///
/// Cloning a system produces a deep, fully owned copy in which every key of the original
/// remains valid.
#[derive(Debug, Clone, Default)]
pub struct MolecularSystem {
    /// Primary storage for atoms.
    atoms: SlotMap<AtomId, Atom>,
    /// Primary storage for residues.
    residues: SlotMap<ResidueId, Residue>,
    /// Primary storage for chains.
    chains: SlotMap<ChainId, Chain>,
    /// Chains in the order they were first added.
    chain_order: Vec<ChainId>,
    /// List of all bonds in the system.
    bonds: Vec<Bond>,
    /// Lookup map for finding residues by chain ID and residue number.
    residue_id_map: HashMap<(ChainId, isize), ResidueId>,
    /// Lookup map for finding chains by their single-character identifier.
    chain_id_map: HashMap<char, ChainId>,
    /// Cached adjacency list for bond connectivity, indexed by atom ID.
    bond_adjacency: SecondaryMap<AtomId, Vec<AtomId>>,
}

impl MolecularSystem {
    /// Creates a new, empty molecular system.
    ///
    /// This constructor initializes all internal data structures
    /// and is ready for adding chains, residues, and atoms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieves an immutable reference to an atom by its ID.
    ///
    /// # Arguments
    ///
    /// * `id` - The atom ID to look up.
    ///
    /// # Return
    ///
    /// Returns `Some(&Atom)` if the atom exists, otherwise `None`.
    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    /// Retrieves a mutable reference to an atom by its ID.
    ///
    /// # Arguments
    ///
    /// * `id` - The atom ID to look up.
    ///
    /// # Return
    ///
    /// Returns `Some(&mut Atom)` if the atom exists, otherwise `None`.
    pub fn atom_mut(&mut self, id: AtomId) -> Option<&mut Atom> {
        self.atoms.get_mut(id)
    }

    /// Returns an iterator over all atoms in the system.
    ///
    /// # Return
    ///
    /// An iterator yielding `(AtomId, &Atom)` pairs in storage order.
    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atoms.iter()
    }

    /// Returns the number of atoms in the system.
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Retrieves an immutable reference to a residue by its ID.
    ///
    /// # Arguments
    ///
    /// * `id` - The residue ID to look up.
    ///
    /// # Return
    ///
    /// Returns `Some(&Residue)` if the residue exists, otherwise `None`.
    pub fn residue(&self, id: ResidueId) -> Option<&Residue> {
        self.residues.get(id)
    }

    /// Retrieves a mutable reference to a residue by its ID.
    ///
    /// # Arguments
    ///
    /// * `id` - The residue ID to look up.
    ///
    /// # Return
    ///
    /// Returns `Some(&mut Residue)` if the residue exists, otherwise `None`.
    pub fn residue_mut(&mut self, id: ResidueId) -> Option<&mut Residue> {
        self.residues.get_mut(id)
    }

    /// Returns an iterator over all residues in the system.
    ///
    /// Use [`MolecularSystem::residues_in_order`] when the native order matters.
    ///
    /// # Return
    ///
    /// An iterator yielding `(ResidueId, &Residue)` pairs in storage order.
    pub fn residues_iter(&self) -> impl Iterator<Item = (ResidueId, &Residue)> {
        self.residues.iter()
    }

    /// Retrieves an immutable reference to a chain by its ID.
    ///
    /// # Arguments
    ///
    /// * `id` - The chain ID to look up.
    ///
    /// # Return
    ///
    /// Returns `Some(&Chain)` if the chain exists, otherwise `None`.
    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id)
    }

    /// Returns an iterator over chains in their native order.
    ///
    /// # Return
    ///
    /// An iterator yielding `(ChainId, &Chain)` pairs in the order the chains were first added.
    pub fn chains_iter(&self) -> impl Iterator<Item = (ChainId, &Chain)> {
        self.chain_order
            .iter()
            .filter_map(|&id| self.chains.get(id).map(|chain| (id, chain)))
    }

    /// Returns all residue IDs in native chain-then-residue order.
    ///
    /// # Return
    ///
    /// An iterator over every residue of every chain, walking chains in native order and the
    /// residues of each chain in the order they were added.
    pub fn residues_in_order(&self) -> impl Iterator<Item = ResidueId> + '_ {
        self.chains_iter()
            .flat_map(|(_, chain)| chain.residues().iter().copied())
    }

    /// Returns all bonds in the system.
    ///
    /// # Return
    ///
    /// A slice of every bond, in the order the bonds were added.
    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// Finds a chain by its single-character identifier.
    ///
    /// # Arguments
    ///
    /// * `id` - The chain identifier (e.g. `'A'`).
    ///
    /// # Return
    ///
    /// Returns `Some(ChainId)` if a chain with that identifier exists, otherwise `None`.
    pub fn find_chain_by_id(&self, id: char) -> Option<ChainId> {
        self.chain_id_map.get(&id).copied()
    }

    /// Finds a residue by chain ID and residue number.
    ///
    /// # Arguments
    ///
    /// * `chain_id` - The ID of the chain holding the residue.
    /// * `residue_number` - The residue number within the chain.
    ///
    /// # Return
    ///
    /// Returns `Some(ResidueId)` if the residue exists, otherwise `None`.
    pub fn find_residue_by_id(
        &self,
        chain_id: ChainId,
        residue_number: isize,
    ) -> Option<ResidueId> {
        self.residue_id_map
            .get(&(chain_id, residue_number))
            .copied()
    }

    /// Finds a residue by its structure-independent specifier.
    ///
    /// # Arguments
    ///
    /// * `spec` - The chain identifier and residue number to look up.
    ///
    /// # Return
    ///
    /// Returns `Some(ResidueId)` if this system holds a matching residue, otherwise `None`.
    pub fn find_residue(&self, spec: ResidueSpecifier) -> Option<ResidueId> {
        let chain_id = self.find_chain_by_id(spec.chain_id)?;
        self.find_residue_by_id(chain_id, spec.residue_number)
    }

    /// Returns the chain identifier and residue number of a residue.
    ///
    /// # Arguments
    ///
    /// * `id` - The residue ID to describe.
    ///
    /// # Return
    ///
    /// Returns `Some(ResidueSpecifier)` if the residue and its chain exist, otherwise `None`.
    pub fn residue_specifier(&self, id: ResidueId) -> Option<ResidueSpecifier> {
        let residue = self.residues.get(id)?;
        let chain = self.chains.get(residue.chain_id)?;
        Some(ResidueSpecifier::new(chain.id, residue.residue_number))
    }

    /// Returns the atoms of a residue together with their IDs.
    ///
    /// # Arguments
    ///
    /// * `id` - The residue whose atoms are listed.
    ///
    /// # Return
    ///
    /// An iterator yielding `(AtomId, &Atom)` pairs in insertion order. The iterator is empty
    /// if the residue does not exist.
    pub fn residue_atoms(&self, id: ResidueId) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.residues
            .get(id)
            .map(|residue| residue.atoms())
            .unwrap_or_default()
            .iter()
            .filter_map(|&atom_id| self.atoms.get(atom_id).map(|atom| (atom_id, atom)))
    }

    /// Adds a new chain to the system or returns the existing one.
    ///
    /// This method is idempotent; if a chain with the given ID already exists,
    /// it returns the existing chain ID without creating a duplicate.
    ///
    /// # Arguments
    ///
    /// * `id` - The single-character chain identifier.
    /// * `chain_type` - The type of the chain. Ignored if the chain already exists.
    ///
    /// # Return
    ///
    /// The ID of the new or existing chain.
    pub fn add_chain(&mut self, id: char, chain_type: ChainType) -> ChainId {
        if let Some(&existing) = self.chain_id_map.get(&id) {
            return existing;
        }
        let chain_id = self.chains.insert(Chain::new(id, chain_type));
        self.chain_id_map.insert(id, chain_id);
        self.chain_order.push(chain_id);
        chain_id
    }

    /// Adds a new residue to the system or returns the existing one.
    ///
    /// A residue is identified by its chain and number; a second call with the same pair
    /// returns the existing residue unchanged.
    ///
    /// # Arguments
    ///
    /// * `chain_id` - The ID of the chain to add the residue to.
    /// * `residue_number` - The residue number within the chain.
    /// * `name` - The residue name (e.g. `"ALA"`).
    /// * `chem_type` - The chemical class of the residue.
    ///
    /// # Return
    ///
    /// Returns `Some(ResidueId)` on success, or `None` if the chain does not exist.
    pub fn add_residue(
        &mut self,
        chain_id: ChainId,
        residue_number: isize,
        name: &str,
        chem_type: ChemType,
    ) -> Option<ResidueId> {
        let chain = self.chains.get_mut(chain_id)?;
        let key = (chain_id, residue_number);

        let residue_id = *self.residue_id_map.entry(key).or_insert_with(|| {
            let residue = Residue::new(residue_number, name, chem_type, chain_id);
            self.residues.insert(residue)
        });

        if !chain.residues.contains(&residue_id) {
            chain.residues.push(residue_id);
        }

        Some(residue_id)
    }

    /// Adds an atom to a specific residue.
    ///
    /// The atom's `residue_id` is overwritten with `residue_id`.
    ///
    /// # Arguments
    ///
    /// * `residue_id` - The ID of the residue to add the atom to.
    /// * `atom` - The atom to add.
    ///
    /// # Return
    ///
    /// Returns `Some(AtomId)` for the new atom, or `None` if the residue does not exist.
    pub fn add_atom_to_residue(&mut self, residue_id: ResidueId, mut atom: Atom) -> Option<AtomId> {
        if !self.residues.contains_key(residue_id) {
            return None;
        }

        atom.residue_id = residue_id;
        let name = atom.name.clone();

        let atom_id = self.atoms.insert(atom);
        self.bond_adjacency.insert(atom_id, Vec::new());
        self.residues[residue_id].add_atom(&name, atom_id);

        Some(atom_id)
    }

    /// Adds a bond between two atoms.
    ///
    /// Idempotent: adding an existing bond (in either direction) succeeds without creating
    /// a duplicate.
    ///
    /// # Arguments
    ///
    /// * `atom1_id` - The ID of the first atom.
    /// * `atom2_id` - The ID of the second atom.
    /// * `order` - The bond order.
    ///
    /// # Return
    ///
    /// Returns `Some(())` on success, or `None` if either atom does not exist.
    pub fn add_bond(&mut self, atom1_id: AtomId, atom2_id: AtomId, order: BondOrder) -> Option<()> {
        if !self.atoms.contains_key(atom1_id) || !self.atoms.contains_key(atom2_id) {
            return None;
        }

        if self
            .bond_adjacency
            .get(atom1_id)
            .is_some_and(|neighbors| neighbors.contains(&atom2_id))
        {
            return Some(());
        }

        self.bonds.push(Bond::new(atom1_id, atom2_id, order));
        self.bond_adjacency[atom1_id].push(atom2_id);
        self.bond_adjacency[atom2_id].push(atom1_id);
        Some(())
    }

    /// Returns the atoms directly bonded to an atom.
    ///
    /// # Arguments
    ///
    /// * `atom_id` - The atom whose neighbors are requested.
    ///
    /// # Return
    ///
    /// Returns `Some(&[AtomId])` if the atom exists, otherwise `None`.
    pub fn get_bonded_neighbors(&self, atom_id: AtomId) -> Option<&[AtomId]> {
        self.bond_adjacency.get(atom_id).map(|v| v.as_slice())
    }

    /// Returns the residue following `residue_id` in its chain.
    ///
    /// # Arguments
    ///
    /// * `residue_id` - The residue whose successor is requested.
    ///
    /// # Return
    ///
    /// Returns `Some(ResidueId)` for the next residue, or `None` at the chain end or if the
    /// residue does not exist.
    pub fn next_residue(&self, residue_id: ResidueId) -> Option<ResidueId> {
        let residue = self.residues.get(residue_id)?;
        let chain = self.chains.get(residue.chain_id)?;
        let position = chain.residues.iter().position(|&id| id == residue_id)?;
        chain.residues.get(position + 1).copied()
    }

    /// Returns the residue preceding `residue_id` in its chain.
    ///
    /// # Arguments
    ///
    /// * `residue_id` - The residue whose predecessor is requested.
    ///
    /// # Return
    ///
    /// Returns `Some(ResidueId)` for the previous residue, or `None` at the chain start or if
    /// the residue does not exist.
    pub fn previous_residue(&self, residue_id: ResidueId) -> Option<ResidueId> {
        let residue = self.residues.get(residue_id)?;
        let chain = self.chains.get(residue.chain_id)?;
        let position = chain.residues.iter().position(|&id| id == residue_id)?;
        position
            .checked_sub(1)
            .and_then(|previous| chain.residues.get(previous).copied())
    }

    /// Checks whether two residues are consecutive members of a polymer.
    ///
    /// # Arguments
    ///
    /// * `first` - The residue expected to come first.
    /// * `second` - The residue expected to follow `first`.
    ///
    /// # Return
    ///
    /// Returns `true` if `second` directly follows `first` in the same chain and the two are
    /// joined by a polymer linkage (peptide C-N or phosphodiester O3'-P bond).
    pub fn in_sequence(&self, first: ResidueId, second: ResidueId) -> bool {
        if self.next_residue(first) != Some(second) {
            return false;
        }
        let (Some(res_a), Some(res_b)) = (self.residues.get(first), self.residues.get(second))
        else {
            return false;
        };

        res_a.atoms().iter().any(|&atom_id| {
            let Some(partner_name) = self
                .atoms
                .get(atom_id)
                .and_then(|atom| polymer_link_partner(&atom.name))
            else {
                return false;
            };
            let Some(partner_id) = res_b.get_atom_id_by_name(partner_name) else {
                return false;
            };
            self.get_bonded_neighbors(atom_id)
                .is_some_and(|neighbors| neighbors.contains(&partner_id))
        })
    }
}
