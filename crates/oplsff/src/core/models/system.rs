use super::atom::Atom;
use super::ids::AtomId;
use super::topology::Bond;
use slotmap::{SecondaryMap, SlotMap};

/// A molecular topology: atoms keyed by [`AtomId`] plus the bonds between them.
///
/// This is the structure the annotator walks. It carries no residue or compound
/// hierarchy; atoms are addressed only by id.
#[derive(Debug, Clone, Default)]
pub struct MolecularSystem {
    /// Primary storage for atoms using a slot map for efficient ID management.
    atoms: SlotMap<AtomId, Atom>,
    /// List of all bonds in the system.
    bonds: Vec<Bond>,
    /// Cached adjacency list for bond connectivity, indexed by atom ID.
    bond_adjacency: SecondaryMap<AtomId, Vec<AtomId>>,
}

impl MolecularSystem {
    /// Creates a new, empty molecular system.
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

    /// Returns an iterator over all atoms in the system.
    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atoms.iter()
    }

    /// Returns a mutable iterator over all atoms in the system.
    pub fn atoms_iter_mut(&mut self) -> impl Iterator<Item = (AtomId, &mut Atom)> {
        self.atoms.iter_mut()
    }

    /// Returns the number of atoms in the system.
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Returns a slice of all bonds in the system.
    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// Adds an atom to the system and returns its new ID.
    ///
    /// # Arguments
    ///
    /// * `atom` - The atom to add. Its `kind` is not checked against any force field.
    ///
    /// # Return
    ///
    /// Returns the [`AtomId`] under which the atom is stored.
    pub fn add_atom(&mut self, atom: Atom) -> AtomId {
        let atom_id = self.atoms.insert(atom);
        self.bond_adjacency.insert(atom_id, Vec::new());
        atom_id
    }

    /// Adds a bond between two atoms.
    ///
    /// # Arguments
    ///
    /// * `atom1_id` - The first atom of the bond.
    /// * `atom2_id` - The second atom of the bond.
    ///
    /// Adding an existing bond succeeds without creating a duplicate.
    ///
    /// # Return
    ///
    /// Returns `None` if either atom does not exist or both ids are the same atom.
    pub fn add_bond(&mut self, atom1_id: AtomId, atom2_id: AtomId) -> Option<()> {
        if atom1_id == atom2_id
            || !self.atoms.contains_key(atom1_id)
            || !self.atoms.contains_key(atom2_id)
        {
            return None;
        }

        if self.bond_adjacency[atom1_id].contains(&atom2_id) {
            return Some(());
        }

        self.bonds.push(Bond::new(atom1_id, atom2_id));
        self.bond_adjacency[atom1_id].push(atom2_id);
        self.bond_adjacency[atom2_id].push(atom1_id);
        Some(())
    }

    /// Retrieves the bonded neighbors of an atom, in the order the bonds were added.
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
}
