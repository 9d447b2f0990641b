use nalgebra::Point3;
use oplsff::core::forcefield::annotate::Annotator;
use oplsff::core::forcefield::config::LoaderOptions;
use oplsff::core::forcefield::database::ForceFieldDatabase;
use oplsff::core::forcefield::error::ForceFieldError;
use oplsff::core::forcefield::types::{AngleKey, BondKey, DihedralKey};
use oplsff::core::io::itp::NonBondedFile;
use oplsff::core::io::traits::ParameterFile;
use oplsff::core::models::atom::Atom;
use oplsff::core::models::system::MolecularSystem;
use oplsff::core::units::{
    AMU, ANGSTROM, ELEMENTARY_CHARGE, KILOJOULE_PER_MOLE, NANOMETER,
};

const NONBONDED: &str = include_str!("../data/ffnonbonded.itp");
const BONDED: &str = include_str!("../data/ffbonded.itp");

fn load(nonbonded: &str, bonded: &str) -> Result<ForceFieldDatabase, ForceFieldError> {
    ForceFieldDatabase::from_readers(
        &mut nonbonded.as_bytes(),
        &mut bonded.as_bytes(),
        &LoaderOptions::default(),
    )
}

#[test]
fn nonbonded_quantities_survive_unit_round_trips() {
    let records = NonBondedFile::read_from(&mut NONBONDED.as_bytes()).unwrap();
    let db = load(NONBONDED, BONDED).unwrap();
    assert_eq!(records.len(), db.atom_types().len());

    for record in &records {
        let stored = db.atom_type(&record.kind).unwrap();
        let pairs = [
            (&record.mass, &stored.mass, &AMU),
            (&record.charge, &stored.charge, &ELEMENTARY_CHARGE),
            (&record.sigma, &stored.sigma, &NANOMETER),
            (&record.epsilon, &stored.epsilon, &KILOJOULE_PER_MOLE),
        ];
        for (original, canonical, source_unit) in pairs {
            let back = canonical.value_in(source_unit).unwrap();
            assert!(
                (back - original.value()).abs() < 1e-9,
                "{}: {} != {}",
                record.kind,
                back,
                original.value()
            );
        }
    }
}

#[test]
fn every_registered_kind_resolves_to_itself() {
    let db = ForceFieldDatabase::bundled();
    for atom_type in db.atom_types().iter() {
        assert_eq!(db.find_atom_types(&atom_type.kind), vec![atom_type.kind.clone()]);
    }
}

#[test]
fn bundled_wildcard_and_alias_queries() {
    let db = ForceFieldDatabase::bundled();

    let ct = db.find_atom_types("CT");
    assert_eq!(
        ct,
        vec!["opls_135", "opls_136", "opls_137", "opls_138", "opls_139", "opls_157", "opls_180"]
    );

    let wildcard = db.find_atom_types("C*");
    assert!(ct.iter().all(|k| wildcard.contains(k)));
    assert!(wildcard.contains(&"opls_145".to_string()));
    assert!(!wildcard.contains(&"opls_140".to_string()));

    let opls_15 = db.find_atom_types("opls_15*");
    assert_eq!(opls_15, vec!["opls_154", "opls_155", "opls_157"]);

    assert!(db.find_atom_types("nonexistent").is_empty());
}

#[test]
fn bond_section_followed_by_angle_header_is_not_conflated() {
    let bonded = "\
[ bondtypes ]
  CT  CT  1  0.15290  224262.4

[ bondtypes ]
  CT  HC  1  0.10900  284512.0
[ angletypes ]
  HC  CT  HC  1  107.800  276.144
";
    let db = load(NONBONDED, bonded).unwrap();
    assert_eq!(db.bond_types().len(), 2);
    assert!(db.bond_type(&BondKey::new("CT", "HC")).is_some());
    assert_eq!(db.angle_types().len(), 1);
    assert!(db.angle_type(&AngleKey::new("HC", "CT", "HC")).is_some());

    let bonded = "\
[ bondtypes ]
  CT  CT  1  0.15290  224262.4
  CT  HC  1  0.10900  284512.0

[ angletypes ]
  HC  CT  HC  1  107.800  276.144
";
    let db = load(NONBONDED, bonded).unwrap();
    assert_eq!(db.bond_types().len(), 2);
    assert_eq!(db.angle_types().len(), 1);
    assert_eq!(
        db.angle_type(&AngleKey::new("HC", "CT", "HC")).unwrap().params,
        vec![107.8, 276.144]
    );
}

#[test]
fn dihedral_rows_drop_trailing_comments() {
    let db = load(NONBONDED, "[ dihedraltypes ]\na b c d 3 0.0 1.0 2.0 ; comment text\n").unwrap();
    let dihedral = db
        .dihedral_type(&DihedralKey::new("a", "b", "c", "d"))
        .unwrap();
    assert_eq!(dihedral.coefficients, vec!["0.0", "1.0", "2.0"]);
}

#[test]
fn length_tagged_as_energy_is_rejected_without_mutation() {
    let mut db = load(NONBONDED, BONDED).unwrap();
    let before = db.atom_types().len();
    let err = db
        .add_atom_type(
            "opls_new",
            "CT",
            6,
            12.011 * AMU,
            0.0 * ELEMENTARY_CHARGE,
            0.35 * KILOJOULE_PER_MOLE,
            0.276144 * KILOJOULE_PER_MOLE,
        )
        .unwrap_err();
    assert!(matches!(err, ForceFieldError::UnitMismatch { .. }));
    assert_eq!(db.atom_types().len(), before);
    assert!(db.atom_type("opls_new").is_none());
}

#[test]
fn annotated_methanol_resolves_bonded_parameters() {
    let db = ForceFieldDatabase::bundled();
    let mut system = MolecularSystem::new();
    let c = system.add_atom(Atom::new("C", "opls_157", Point3::origin()));
    let o = system.add_atom(Atom::new("O", "opls_154", Point3::new(1.41, 0.0, 0.0)));
    let h = system.add_atom(Atom::new("HO", "opls_155", Point3::new(1.73, 0.9, 0.0)));
    system.add_bond(c, o);
    system.add_bond(o, h);

    let report = Annotator::new(db).annotate(&mut system);
    assert!(report.is_complete());

    for bond in system.bonds() {
        let a = db.atom_type(&system.atom(bond.atom1_id).unwrap().kind).unwrap();
        let b = db.atom_type(&system.atom(bond.atom2_id).unwrap().kind).unwrap();
        let bond_type = db.bond_type_between(a, b).unwrap();
        assert_eq!(bond_type.length.unit(), &ANGSTROM);
    }

    let oh = db.bond_type(&BondKey::new("OH", "HO")).unwrap();
    assert!((oh.length.value() - 0.945).abs() < 1e-9);

    let assignment = Annotator::new(db).resolve_bonded(&system);
    assert!(assignment.is_complete());
    assert_eq!(assignment.bonds.len(), 2);
    assert_eq!(assignment.angles.len(), 1);
    let ([first, center, last], angle) = &assignment.angles[0];
    assert_eq!(*center, o);
    assert!([*first, *last].contains(&c) && [*first, *last].contains(&h));
    assert_eq!(angle.params, vec![108.5, 460.24]);
}

#[test]
fn manifest_workflow_uses_force_constant_column_when_configured() {
    use oplsff::workflows::config::{ForceFieldSource, ParameterizeConfigBuilder};
    use oplsff::workflows::parameterize::run;
    use std::fs;

    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("ffnonbonded.itp"), NONBONDED).unwrap();
    fs::write(dir.path().join("ffbonded.itp"), BONDED).unwrap();
    let manifest = dir.path().join("forcefield.toml");
    fs::write(
        &manifest,
        r#"
name = "oplsaa-subset"
nonbonded = "ffnonbonded.itp"
bonded = "ffbonded.itp"

[loader]
bond-force-constant = "force-constant-column"
"#,
    )
    .unwrap();

    let config = ParameterizeConfigBuilder::new()
        .forcefield(ForceFieldSource::Manifest(manifest))
        .require_full_coverage(true)
        .build()
        .unwrap();
    let mut system = MolecularSystem::new();
    let c = system.add_atom(Atom::new("C", "opls_135", Point3::origin()));
    let h = system.add_atom(Atom::new("H", "opls_140", Point3::new(1.09, 0.0, 0.0)));
    system.add_bond(c, h);

    let result = run(&mut system, &config).unwrap();
    assert_eq!(result.report.annotated, 2);

    let ct_hc = result.database.bond_type(&BondKey::new("CT", "HC")).unwrap();
    assert!((ct_hc.force_constant.value() - 284512.0).abs() < 1e-6);
    assert!((ct_hc.length.value() - 1.09).abs() < 1e-9);
}
