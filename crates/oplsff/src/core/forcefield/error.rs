use crate::core::io::error::ItpError;
use crate::core::units::UnitError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForceFieldError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Malformed record in {file}: {source}")]
    Parse { file: String, source: ItpError },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Unit mismatch for {slot} of '{key}': {source}")]
    UnitMismatch {
        key: String,
        slot: &'static str,
        source: UnitError,
    },
}
