use super::error::ForceFieldError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Which column of a `[ bondtypes ]` row feeds the harmonic force constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BondForceConstantSource {
    /// Reuse the equilibrium length column (column 4). Matches the legacy OPLS loader.
    #[default]
    LengthColumn,
    /// Read the force constant column (column 5).
    ForceConstantColumn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoaderOptions {
    #[serde(rename = "bond-force-constant", default)]
    pub bond_force_constant: BondForceConstantSource,
}

/// Describes a force field on disk: the two `.itp` files plus loader options.
///
/// Relative file paths are resolved against the directory containing the manifest.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForceFieldManifest {
    pub name: String,
    pub nonbonded: PathBuf,
    pub bonded: PathBuf,
    #[serde(default)]
    pub loader: LoaderOptions,
}

impl ForceFieldManifest {
    pub fn load(path: &Path) -> Result<Self, ForceFieldError> {
        let content = std::fs::read_to_string(path).map_err(|e| ForceFieldError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        let manifest = Self::from_toml_str(&content, base_dir).map_err(|e| {
            ForceFieldError::Toml {
                path: path.to_string_lossy().to_string(),
                source: e,
            }
        })?;
        debug!(
            "Loaded force-field manifest '{}' from '{}'.",
            manifest.name,
            path.display()
        );
        Ok(manifest)
    }

    pub fn from_toml_str(content: &str, base_dir: &Path) -> Result<Self, toml::de::Error> {
        let mut manifest: Self = toml::from_str(content)?;
        if manifest.nonbonded.is_relative() {
            manifest.nonbonded = base_dir.join(&manifest.nonbonded);
        }
        if manifest.bonded.is_relative() {
            manifest.bonded = base_dir.join(&manifest.bonded);
        }
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn manifest_resolves_relative_paths_against_its_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("oplsaa.toml");
        fs::write(
            &path,
            r#"
            name = "oplsaa"
            nonbonded = "ffnonbonded.itp"
            bonded = "/abs/ffbonded.itp"
            "#,
        )
        .unwrap();

        let manifest = ForceFieldManifest::load(&path).unwrap();
        assert_eq!(manifest.name, "oplsaa");
        assert_eq!(manifest.nonbonded, dir.path().join("ffnonbonded.itp"));
        assert_eq!(manifest.bonded, PathBuf::from("/abs/ffbonded.itp"));
        assert_eq!(
            manifest.loader.bond_force_constant,
            BondForceConstantSource::LengthColumn
        );
    }

    #[test]
    fn manifest_reads_loader_options() {
        let manifest = ForceFieldManifest::from_toml_str(
            r#"
            name = "oplsaa"
            nonbonded = "a.itp"
            bonded = "b.itp"

            [loader]
            bond-force-constant = "force-constant-column"
            "#,
            Path::new("/data"),
        )
        .unwrap();
        assert_eq!(
            manifest.loader.bond_force_constant,
            BondForceConstantSource::ForceConstantColumn
        );
        assert_eq!(manifest.bonded, PathBuf::from("/data/b.itp"));
    }

    #[test]
    fn manifest_rejects_unknown_fields() {
        let result = ForceFieldManifest::from_toml_str(
            r#"
            name = "oplsaa"
            nonbonded = "a.itp"
            bonded = "b.itp"
            units = "gromacs"
            "#,
            Path::new(""),
        );
        assert!(result.is_err());
    }

    #[test]
    fn manifest_load_fails_for_missing_file() {
        let dir = tempdir().unwrap();
        let result = ForceFieldManifest::load(&dir.path().join("missing.toml"));
        assert!(matches!(result, Err(ForceFieldError::Io { .. })));
    }

    #[test]
    fn manifest_load_fails_for_malformed_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "this is not toml").unwrap();
        let result = ForceFieldManifest::load(&path);
        assert!(matches!(result, Err(ForceFieldError::Toml { .. })));
    }
}
