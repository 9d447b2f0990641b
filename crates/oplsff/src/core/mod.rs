//! # Core Module
//!
//! The building blocks of the parameter resolution engine.
//!
//! - **Units** ([`units`]) - Dimensioned quantities and the compatibility checks guarding every parameter slot
//! - **File I/O** ([`io`]) - Readers for the non-bonded and bonded `.itp` parameter files
//! - **Force Field** ([`forcefield`]) - The parameter database, type matching, and topology annotation
//! - **Molecular Representation** ([`models`]) - Atoms and bonds of the topology being annotated

pub mod forcefield;
pub mod io;
pub mod models;
pub mod units;
