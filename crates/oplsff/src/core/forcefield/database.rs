use super::config::{BondForceConstantSource, ForceFieldManifest, LoaderOptions};
use super::error::ForceFieldError;
use super::types::{
    AngleKey, AngleType, AtomType, BondKey, BondType, DihedralKey, DihedralType,
};
use crate::core::io::itp::{BondRecord, BondedFile, BondedRecord, NonBondedFile};
use crate::core::io::traits::ParameterFile;
use crate::core::units::{
    AMU, ANGSTROM, ELEMENTARY_CHARGE, KILOJOULE_PER_MOLE, NANOMETER, Quantity, Unit,
    kj_per_mol_per_nm2,
};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, info, instrument};

const BUNDLED_NONBONDED: &str = include_str!("../../../data/ffnonbonded.itp");
const BUNDLED_BONDED: &str = include_str!("../../../data/ffbonded.itp");

static BUNDLED: OnceLock<ForceFieldDatabase> = OnceLock::new();

/// Atom types keyed by kind, iterated in insertion order.
#[derive(Debug, Clone, Default)]
pub struct AtomTypeRegistry {
    entries: Vec<AtomType>,
    index: HashMap<String, usize>,
}

impl AtomTypeRegistry {
    /// Inserts `atom_type`, replacing an existing entry of the same kind in place.
    fn insert(&mut self, atom_type: AtomType) {
        match self.index.get(&atom_type.kind) {
            Some(&position) => self.entries[position] = atom_type,
            None => {
                self.index
                    .insert(atom_type.kind.clone(), self.entries.len());
                self.entries.push(atom_type);
            }
        }
    }

    pub fn get(&self, kind: &str) -> Option<&AtomType> {
        self.index.get(kind).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.index.contains_key(kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AtomType> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The four parameter registries of an OPLS force field.
///
/// Build it once with one of the loading constructors (or with explicit `add_*`
/// calls); afterwards it is only queried.
#[derive(Debug, Clone, Default)]
pub struct ForceFieldDatabase {
    atom_types: AtomTypeRegistry,
    bond_types: BTreeMap<BondKey, BondType>,
    angle_types: BTreeMap<AngleKey, AngleType>,
    dihedral_types: BTreeMap<DihedralKey, DihedralType>,
}

fn canonicalize(
    key: &str,
    slot: &'static str,
    quantity: &Quantity,
    target: &Unit,
) -> Result<Quantity, ForceFieldError> {
    quantity
        .convert_to(target)
        .map_err(|source| ForceFieldError::UnitMismatch {
            key: key.to_string(),
            slot,
            source,
        })
}

impl ForceFieldDatabase {
    /// Creates an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the database built from the OPLS-AA subset embedded in the crate.
    pub fn bundled() -> &'static ForceFieldDatabase {
        BUNDLED.get_or_init(|| {
            Self::from_readers(
                &mut BUNDLED_NONBONDED.as_bytes(),
                &mut BUNDLED_BONDED.as_bytes(),
                &LoaderOptions::default(),
            )
            .expect("Failed to parse embedded force-field parameters. This is a library bug.")
        })
    }

    /// Loads the force field described by a TOML manifest.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the manifest. Relative parameter-file paths inside it are
    ///   resolved against the manifest's directory.
    ///
    /// # Errors
    ///
    /// Returns [`ForceFieldError::Io`] or [`ForceFieldError::Toml`] if the manifest
    /// cannot be read, and any error of [`load`](Self::load) for the files it names.
    pub fn from_manifest(path: &Path) -> Result<Self, ForceFieldError> {
        let manifest = ForceFieldManifest::load(path)?;
        info!("Loading force field '{}'.", manifest.name);
        Self::load(&manifest.nonbonded, &manifest.bonded, &manifest.loader)
    }

    /// Loads a database from a non-bonded and a bonded `.itp` file on disk.
    ///
    /// # Arguments
    ///
    /// * `nonbonded_path` - The `[ atomtypes ]` file.
    /// * `bonded_path` - The file holding the bond, angle, and dihedral sections.
    /// * `options` - Loader behavior, such as which column feeds bond force constants.
    ///
    /// # Errors
    ///
    /// Returns [`ForceFieldError::Io`] if either file cannot be opened,
    /// [`ForceFieldError::Parse`] on the first malformed row, and
    /// [`ForceFieldError::UnitMismatch`] if a row yields an incompatible quantity.
    pub fn load(
        nonbonded_path: &Path,
        bonded_path: &Path,
        options: &LoaderOptions,
    ) -> Result<Self, ForceFieldError> {
        let open = |path: &Path| {
            File::open(path)
                .map(BufReader::new)
                .map_err(|e| ForceFieldError::Io {
                    path: path.to_string_lossy().to_string(),
                    source: e,
                })
        };
        let mut nonbonded = open(nonbonded_path)?;
        let mut bonded = open(bonded_path)?;
        let nonbonded_label = nonbonded_path.to_string_lossy();
        let bonded_label = bonded_path.to_string_lossy();
        Self::from_labeled_readers(
            (&mut nonbonded, nonbonded_label.as_ref()),
            (&mut bonded, bonded_label.as_ref()),
            options,
        )
    }

    /// Builds a database by draining a non-bonded and a bonded reader.
    ///
    /// # Errors
    ///
    /// Fails on the first malformed row or unit mismatch; no partially loaded
    /// database is returned.
    pub fn from_readers(
        nonbonded: &mut impl BufRead,
        bonded: &mut impl BufRead,
        options: &LoaderOptions,
    ) -> Result<Self, ForceFieldError> {
        Self::from_labeled_readers((nonbonded, "non-bonded"), (bonded, "bonded"), options)
    }

    #[instrument(skip_all, name = "forcefield_load")]
    fn from_labeled_readers(
        nonbonded: (&mut impl BufRead, &str),
        bonded: (&mut impl BufRead, &str),
        options: &LoaderOptions,
    ) -> Result<Self, ForceFieldError> {
        let mut database = Self::new();

        let (reader, label) = nonbonded;
        let records = NonBondedFile::read_from(reader).map_err(|source| ForceFieldError::Parse {
            file: label.to_string(),
            source,
        })?;
        for r in records {
            database.add_atom_type(
                &r.kind,
                &r.alias,
                r.atomic_number,
                r.mass,
                r.charge,
                r.sigma,
                r.epsilon,
            )?;
        }

        let (reader, label) = bonded;
        let records = BondedFile::read_from(reader).map_err(|source| ForceFieldError::Parse {
            file: label.to_string(),
            source,
        })?;
        for record in records {
            database.apply_bonded_record(record, options)?;
        }

        info!(
            "Loaded {} atom types, {} bond types, {} angle types, {} dihedral types.",
            database.atom_types.len(),
            database.bond_types.len(),
            database.angle_types.len(),
            database.dihedral_types.len()
        );
        Ok(database)
    }

    fn apply_bonded_record(
        &mut self,
        record: BondedRecord,
        options: &LoaderOptions,
    ) -> Result<(), ForceFieldError> {
        match record {
            BondedRecord::Bond(bond) => self.apply_bond_record(bond, options),
            BondedRecord::Angle(angle) => {
                self.add_angle_type(angle.key, angle.params);
                Ok(())
            }
            BondedRecord::Dihedral(dihedral) => {
                self.add_dihedral_type(dihedral.key, dihedral.coefficients);
                Ok(())
            }
        }
    }

    fn apply_bond_record(
        &mut self,
        bond: BondRecord,
        options: &LoaderOptions,
    ) -> Result<(), ForceFieldError> {
        let force_constant = match options.bond_force_constant {
            BondForceConstantSource::LengthColumn => bond.length,
            BondForceConstantSource::ForceConstantColumn => bond.force_constant,
        };
        self.add_bond_type(
            bond.key,
            bond.length * NANOMETER,
            force_constant * kj_per_mol_per_nm2(),
        )
    }

    /// Registers an atom type after checking every quantity against its slot's unit.
    ///
    /// Quantities are stored converted to amu, e, Angstroms, and kJ/mol. Re-adding an
    /// existing kind replaces it without changing its position in iteration order.
    ///
    /// # Errors
    ///
    /// Returns [`ForceFieldError::UnitMismatch`] if any quantity has the wrong
    /// dimension. The registry is left untouched in that case.
    #[allow(clippy::too_many_arguments)]
    pub fn add_atom_type(
        &mut self,
        kind: &str,
        alias: &str,
        atomic_number: u32,
        mass: Quantity,
        charge: Quantity,
        sigma: Quantity,
        epsilon: Quantity,
    ) -> Result<(), ForceFieldError> {
        let atom_type = AtomType {
            kind: kind.to_string(),
            alias: alias.to_string(),
            atomic_number,
            mass: canonicalize(kind, "mass", &mass, &AMU)?,
            charge: canonicalize(kind, "charge", &charge, &ELEMENTARY_CHARGE)?,
            sigma: canonicalize(kind, "sigma", &sigma, &ANGSTROM)?,
            epsilon: canonicalize(kind, "epsilon", &epsilon, &KILOJOULE_PER_MOLE)?,
        };
        self.atom_types.insert(atom_type);
        Ok(())
    }

    /// Registers a harmonic bond type; length is stored in Angstroms.
    ///
    /// # Errors
    ///
    /// Returns [`ForceFieldError::UnitMismatch`] if `length` is not a length or
    /// `force_constant` is not an energy per squared length.
    pub fn add_bond_type(
        &mut self,
        key: BondKey,
        length: Quantity,
        force_constant: Quantity,
    ) -> Result<(), ForceFieldError> {
        let label = key.to_string();
        let bond_type = BondType {
            length: canonicalize(&label, "length", &length, &ANGSTROM)?,
            force_constant: canonicalize(
                &label,
                "force constant",
                &force_constant,
                &kj_per_mol_per_nm2(),
            )?,
        };
        self.bond_types.insert(key, bond_type);
        Ok(())
    }

    /// Registers an angle type keyed by `(outer, center, outer)` aliases.
    ///
    /// `params` are stored as read; their units are left to the consumer. An existing
    /// entry under the same key is replaced.
    pub fn add_angle_type(&mut self, key: AngleKey, params: Vec<f64>) {
        self.angle_types.insert(key, AngleType { params });
    }

    /// Registers a dihedral type with its coefficients kept as raw tokens.
    pub fn add_dihedral_type(&mut self, key: DihedralKey, coefficients: Vec<String>) {
        self.dihedral_types
            .insert(key, DihedralType { coefficients });
    }

    /// Looks up an atom type by its exact kind. Aliases and wildcards are not
    /// considered here; see [`find_atom_types`](Self::find_atom_types).
    ///
    /// # Return
    ///
    /// Returns `None` if no atom type with this kind is registered.
    pub fn atom_type(&self, kind: &str) -> Option<&AtomType> {
        self.atom_types.get(kind)
    }

    /// Returns the atom-type registry, iterable in insertion order.
    pub fn atom_types(&self) -> &AtomTypeRegistry {
        &self.atom_types
    }

    pub fn bond_types(&self) -> &BTreeMap<BondKey, BondType> {
        &self.bond_types
    }

    pub fn angle_types(&self) -> &BTreeMap<AngleKey, AngleType> {
        &self.angle_types
    }

    pub fn dihedral_types(&self) -> &BTreeMap<DihedralKey, DihedralType> {
        &self.dihedral_types
    }

    /// Looks up a bond type, falling back to the reversed pair.
    pub fn bond_type(&self, key: &BondKey) -> Option<&BondType> {
        self.bond_types
            .get(key)
            .or_else(|| self.bond_types.get(&key.reversed()))
    }

    /// Looks up an angle type, falling back to the reversed triplet.
    pub fn angle_type(&self, key: &AngleKey) -> Option<&AngleType> {
        self.angle_types
            .get(key)
            .or_else(|| self.angle_types.get(&key.reversed()))
    }

    /// Looks up a dihedral type, falling back to the reversed quartet.
    pub fn dihedral_type(&self, key: &DihedralKey) -> Option<&DihedralType> {
        self.dihedral_types
            .get(key)
            .or_else(|| self.dihedral_types.get(&key.reversed()))
    }

    /// Resolves the bond type between two atom types through their aliases.
    pub fn bond_type_between(&self, a: &AtomType, b: &AtomType) -> Option<&BondType> {
        let key = BondKey::new(&a.alias, &b.alias);
        let found = self.bond_type(&key);
        if found.is_none() {
            debug!("No bond type for {} ({} / {}).", key, a.kind, b.kind);
        }
        found
    }
}
