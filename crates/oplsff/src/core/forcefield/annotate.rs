use super::database::ForceFieldDatabase;
use super::types::{AngleKey, AngleType, AtomType, BondType};
use crate::core::models::atom::AtomParameters;
use crate::core::models::ids::AtomId;
use crate::core::models::system::MolecularSystem;
use crate::core::models::topology::Bond;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, instrument, warn};

/// Resolved parameters shared by every atom of the same kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrototypeTable {
    prototypes: HashMap<String, AtomParameters>,
}

impl PrototypeTable {
    pub fn get(&self, kind: &str) -> Option<&AtomParameters> {
        self.prototypes.get(kind)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.prototypes.contains_key(kind)
    }

    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AtomParameters)> {
        self.prototypes.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationReport {
    pub prototypes: PrototypeTable,
    pub annotated: usize,
    /// Atoms whose kind has no entry in the atom-type registry.
    pub unresolved: Vec<AtomId>,
    pub unresolved_kinds: BTreeSet<String>,
}

impl AnnotationReport {
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Bond and angle parameters resolved for the connectivity of a system.
///
/// Angles are enumerated as `[outer, center, outer]` triplets from each atom's bonded
/// neighbors. Terms whose atoms have unknown kinds, or whose alias tuple has no entry
/// in either order, land in the `unresolved_*` lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BondedAssignment<'a> {
    pub bonds: Vec<(Bond, &'a BondType)>,
    pub angles: Vec<([AtomId; 3], &'a AngleType)>,
    pub unresolved_bonds: Vec<Bond>,
    pub unresolved_angles: Vec<[AtomId; 3]>,
}

impl BondedAssignment<'_> {
    pub fn is_complete(&self) -> bool {
        self.unresolved_bonds.is_empty() && self.unresolved_angles.is_empty()
    }
}

/// Attaches atom-type parameters to the atoms of a [`MolecularSystem`].
///
/// Only exact kind lookups are used; wildcard resolution is a separate query
/// ([`ForceFieldDatabase::find_atom_types`]).
pub struct Annotator<'a> {
    database: &'a ForceFieldDatabase,
}

impl<'a> Annotator<'a> {
    pub fn new(database: &'a ForceFieldDatabase) -> Self {
        Self { database }
    }

    /// Annotates every atom whose kind is registered. Atoms with unknown kinds are
    /// left untouched and reported; this never fails.
    #[instrument(skip_all, name = "annotate_system")]
    pub fn annotate(&self, system: &mut MolecularSystem) -> AnnotationReport {
        let mut report = AnnotationReport::default();

        for (atom_id, atom) in system.atoms_iter_mut() {
            match self.database.atom_type(&atom.kind) {
                Some(atom_type) => {
                    let params = report
                        .prototypes
                        .prototypes
                        .entry(atom.kind.clone())
                        .or_insert_with(|| AtomParameters::from(atom_type));
                    atom.parameters = Some(params.clone());
                    report.annotated += 1;
                }
                None => {
                    report.unresolved.push(atom_id);
                    report.unresolved_kinds.insert(atom.kind.clone());
                }
            }
        }

        for kind in &report.unresolved_kinds {
            warn!(
                "Atom kind '{}' has no entry in the atom-type registry; atoms of this kind are left unannotated.",
                kind
            );
        }
        debug!(
            "Annotated {} atom(s) using {} prototype(s); {} unresolved.",
            report.annotated,
            report.prototypes.len(),
            report.unresolved.len()
        );
        report
    }

    /// Resolves a bond type for every bond and an angle type for every bonded triplet.
    ///
    /// Lookups go through the atom types' aliases, as [`ForceFieldDatabase::bond_type_between`]
    /// does. The system is not modified and need not be annotated first.
    #[instrument(skip_all, name = "resolve_bonded_terms")]
    pub fn resolve_bonded(&self, system: &MolecularSystem) -> BondedAssignment<'a> {
        let mut assignment = BondedAssignment::default();

        for bond in system.bonds() {
            let resolved = self
                .atom_type_of(system, bond.atom1_id)
                .zip(self.atom_type_of(system, bond.atom2_id))
                .and_then(|(a, b)| self.database.bond_type_between(a, b));
            match resolved {
                Some(bond_type) => assignment.bonds.push((*bond, bond_type)),
                None => assignment.unresolved_bonds.push(*bond),
            }
        }

        for (center, _) in system.atoms_iter() {
            let neighbors = system.get_bonded_neighbors(center).unwrap_or(&[]);
            for (i, &first) in neighbors.iter().enumerate() {
                for &last in &neighbors[i + 1..] {
                    let triplet = [first, center, last];
                    match self.angle_type_of(system, triplet) {
                        Some(angle_type) => assignment.angles.push((triplet, angle_type)),
                        None => assignment.unresolved_angles.push(triplet),
                    }
                }
            }
        }

        debug!(
            "Resolved {} bond(s) and {} angle(s); {} bond(s) and {} angle(s) unresolved.",
            assignment.bonds.len(),
            assignment.angles.len(),
            assignment.unresolved_bonds.len(),
            assignment.unresolved_angles.len()
        );
        assignment
    }

    fn atom_type_of(&self, system: &MolecularSystem, atom_id: AtomId) -> Option<&'a AtomType> {
        system
            .atom(atom_id)
            .and_then(|atom| self.database.atom_type(&atom.kind))
    }

    fn angle_type_of(&self, system: &MolecularSystem, triplet: [AtomId; 3]) -> Option<&'a AngleType> {
        let [a, b, c] = triplet;
        let a = self.atom_type_of(system, a)?;
        let b = self.atom_type_of(system, b)?;
        let c = self.atom_type_of(system, c)?;
        self.database
            .angle_type(&AngleKey::new(&a.alias, &b.alias, &c.alias))
    }
}

impl From<&AtomType> for AtomParameters {
    fn from(atom_type: &AtomType) -> Self {
        AtomParameters {
            bond_type: atom_type.alias.clone(),
            atomic_number: atom_type.atomic_number,
            mass: atom_type.mass.clone(),
            charge: atom_type.charge.clone(),
            sigma: atom_type.sigma.clone(),
            epsilon: atom_type.epsilon.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forcefield::types::BondKey;
    use crate::core::models::atom::Atom;
    use crate::core::units::{
        AMU, ANGSTROM, ELEMENTARY_CHARGE, KILOJOULE_PER_MOLE, kj_per_mol_per_nm2,
    };
    use nalgebra::Point3;

    fn database() -> ForceFieldDatabase {
        let mut db = ForceFieldDatabase::new();
        db.add_atom_type(
            "opls_135",
            "CT",
            6,
            12.011 * AMU,
            -0.18 * ELEMENTARY_CHARGE,
            3.5 * ANGSTROM,
            0.276144 * KILOJOULE_PER_MOLE,
        )
        .unwrap();
        db.add_atom_type(
            "opls_140",
            "HC",
            1,
            1.008 * AMU,
            0.06 * ELEMENTARY_CHARGE,
            2.5 * ANGSTROM,
            0.12552 * KILOJOULE_PER_MOLE,
        )
        .unwrap();
        db
    }

    fn methane() -> MolecularSystem {
        let mut system = MolecularSystem::new();
        let c = system.add_atom(Atom::new("C", "opls_135", Point3::origin()));
        for i in 0..4 {
            let h = system.add_atom(Atom::new(
                &format!("H{}", i + 1),
                "opls_140",
                Point3::new(1.09, 0.0, 0.0),
            ));
            system.add_bond(c, h);
        }
        system
    }

    #[test]
    fn annotates_every_registered_atom() {
        let db = database();
        let mut system = methane();
        let report = Annotator::new(&db).annotate(&mut system);

        assert!(report.is_complete());
        assert_eq!(report.annotated, 5);
        assert_eq!(report.prototypes.len(), 2);
        for (_, atom) in system.atoms_iter() {
            let params = atom.parameters.as_ref().unwrap();
            let expected = db.atom_type(&atom.kind).unwrap();
            assert_eq!(params.bond_type, expected.alias);
            assert_eq!(params.atomic_number, expected.atomic_number);
            assert_eq!(params.mass, expected.mass);
            assert_eq!(params.charge, expected.charge);
            assert_eq!(params.sigma, expected.sigma);
            assert_eq!(params.epsilon, expected.epsilon);
        }
    }

    #[test]
    fn prototypes_are_keyed_by_kind() {
        let db = database();
        let mut system = methane();
        let report = Annotator::new(&db).annotate(&mut system);
        let hc = report.prototypes.get("opls_140").unwrap();
        assert_eq!(hc.bond_type, "HC");
        assert!(report.prototypes.contains("opls_135"));
        assert!(!report.prototypes.contains("opls_999"));
        assert_eq!(report.prototypes.iter().count(), 2);
    }

    #[test]
    fn unknown_kinds_are_left_unannotated() {
        let db = database();
        let mut system = methane();
        let stray = system.add_atom(Atom::new("X", "opls_999", Point3::origin()));
        // Wildcard-looking kinds are not resolved by the annotator.
        let wild = system.add_atom(Atom::new("Y", "CT*", Point3::origin()));

        let report = Annotator::new(&db).annotate(&mut system);
        assert!(!report.is_complete());
        assert_eq!(report.annotated, 5);
        assert_eq!(report.unresolved, vec![stray, wild]);
        assert_eq!(
            report.unresolved_kinds.iter().collect::<Vec<_>>(),
            vec!["CT*", "opls_999"]
        );
        assert!(system.atom(stray).unwrap().parameters.is_none());
        assert!(system.atom(wild).unwrap().parameters.is_none());
    }

    #[test]
    fn empty_system_yields_empty_report() {
        let db = database();
        let mut system = MolecularSystem::new();
        let report = Annotator::new(&db).annotate(&mut system);
        assert_eq!(report, AnnotationReport::default());
        assert!(report.prototypes.is_empty());
    }

    #[test]
    fn resolves_bond_and_angle_terms_through_aliases() {
        let mut db = database();
        db.add_bond_type(
            BondKey::new("CT", "HC"),
            1.09 * ANGSTROM,
            284512.0 * kj_per_mol_per_nm2(),
        )
        .unwrap();
        db.add_angle_type(AngleKey::new("HC", "CT", "HC"), vec![107.8, 276.144]);
        let system = methane();

        let assignment = Annotator::new(&db).resolve_bonded(&system);
        assert!(assignment.is_complete());
        assert_eq!(assignment.bonds.len(), 4);
        // C(4, 2) pairs of hydrogens around the carbon; hydrogens have one neighbor.
        assert_eq!(assignment.angles.len(), 6);
        for ([first, center, last], angle) in &assignment.angles {
            assert_eq!(system.atom(*center).unwrap().kind, "opls_135");
            assert_eq!(system.atom(*first).unwrap().kind, "opls_140");
            assert_eq!(system.atom(*last).unwrap().kind, "opls_140");
            assert_eq!(angle.params, vec![107.8, 276.144]);
        }
    }

    #[test]
    fn missing_bonded_terms_are_reported() {
        let db = database();
        let mut system = methane();
        let (carbon, _) = system
            .atoms_iter()
            .find(|(_, atom)| atom.kind == "opls_135")
            .unwrap();
        let stray = system.add_atom(Atom::new("X", "opls_999", Point3::origin()));
        system.add_bond(carbon, stray);

        let assignment = Annotator::new(&db).resolve_bonded(&system);
        assert!(!assignment.is_complete());
        assert!(assignment.bonds.is_empty());
        assert_eq!(assignment.unresolved_bonds.len(), 5);
        assert!(assignment.angles.is_empty());
        assert_eq!(assignment.unresolved_angles.len(), 10);
    }
}
