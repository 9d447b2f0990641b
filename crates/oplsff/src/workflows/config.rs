use crate::core::forcefield::config::LoaderOptions;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
}

/// Where the force-field database comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ForceFieldSource {
    /// The OPLS-AA subset embedded in the crate.
    Bundled,
    /// A TOML manifest naming the two parameter files.
    Manifest(PathBuf),
    Files {
        nonbonded: PathBuf,
        bonded: PathBuf,
        options: LoaderOptions,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterizeConfig {
    pub forcefield: ForceFieldSource,
    /// Treat any unannotated atom as a hard failure.
    pub require_full_coverage: bool,
}

#[derive(Default)]
pub struct ParameterizeConfigBuilder {
    forcefield: Option<ForceFieldSource>,
    require_full_coverage: Option<bool>,
}

impl ParameterizeConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn forcefield(mut self, source: ForceFieldSource) -> Self {
        self.forcefield = Some(source);
        self
    }

    pub fn require_full_coverage(mut self, required: bool) -> Self {
        self.require_full_coverage = Some(required);
        self
    }

    pub fn build(self) -> Result<ParameterizeConfig, ConfigError> {
        Ok(ParameterizeConfig {
            forcefield: self
                .forcefield
                .ok_or(ConfigError::MissingParameter("forcefield"))?,
            require_full_coverage: self.require_full_coverage.unwrap_or(false),
        })
    }
}
