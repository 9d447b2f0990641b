use crate::core::units::Quantity;
use nalgebra::Point3;

/// Physical parameters resolved from the force-field database for one atom kind.
///
/// All quantities are stored in the database's canonical units: amu for mass,
/// elementary charge for charge, Angstroms for sigma, and kJ/mol for epsilon.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomParameters {
    /// The bond-type alias used for bonded parameter lookups (e.g. "CT").
    pub bond_type: String,
    pub atomic_number: u32,
    pub mass: Quantity,
    pub charge: Quantity,
    /// Lennard-Jones sigma.
    pub sigma: Quantity,
    /// Lennard-Jones well depth.
    pub epsilon: Quantity,
}

/// An atom in a molecular topology.
///
/// `kind` references an atom-type key in the force-field database (e.g. "opls_135").
/// `parameters` stays `None` until the atom is annotated with a matching atom type.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The name of the atom (e.g. "C1", "H3").
    pub name: String,
    /// The declared force-field kind.
    pub kind: String,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    pub parameters: Option<AtomParameters>,
}

impl Atom {
    pub fn new(name: &str, kind: &str, position: Point3<f64>) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
            position,
            parameters: None,
        }
    }

    pub fn is_annotated(&self) -> bool {
        self.parameters.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::units::{AMU, ANGSTROM, ELEMENTARY_CHARGE, KILOJOULE_PER_MOLE};

    #[test]
    fn new_atom_has_no_parameters() {
        let atom = Atom::new("C1", "opls_135", Point3::new(1.0, 2.0, 3.0));
        assert_eq!(atom.name, "C1");
        assert_eq!(atom.kind, "opls_135");
        assert_eq!(atom.position, Point3::new(1.0, 2.0, 3.0));
        assert!(atom.parameters.is_none());
        assert!(!atom.is_annotated());
    }

    #[test]
    fn atom_equality_and_clone_works() {
        let mut atom1 = Atom::new("H1", "opls_140", Point3::origin());
        atom1.parameters = Some(AtomParameters {
            bond_type: "HC".to_string(),
            atomic_number: 1,
            mass: 1.008 * AMU,
            charge: 0.06 * ELEMENTARY_CHARGE,
            sigma: 2.5 * ANGSTROM,
            epsilon: 0.12552 * KILOJOULE_PER_MOLE,
        });
        let atom2 = atom1.clone();
        assert_eq!(atom1, atom2);
        assert!(atom2.is_annotated());
    }
}
