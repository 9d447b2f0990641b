use super::config::ConfigError;
use crate::core::forcefield::error::ForceFieldError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    ForceField(#[from] ForceFieldError),

    #[error("{count} atom(s) have no force-field parameters (unknown kinds: {kinds:?})")]
    UnresolvedTypes { count: usize, kinds: Vec<String> },
}
