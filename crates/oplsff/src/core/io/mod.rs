//! Readers for GROMACS-style `.itp` force-field parameter files.
//!
//! The non-bonded file yields one atom-type record per data row. The bonded file is a
//! sequence of `[ bondtypes ]`, `[ angletypes ]` and `[ dihedraltypes ]` sections, each
//! closed by a blank line (or the end of the file).

pub mod error;
pub mod itp;
pub mod traits;
