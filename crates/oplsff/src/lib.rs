//! # OPLS Force-Field Parameter Resolution
//!
//! Loads a typed database of OPLS-AA atom, bond, angle, and dihedral parameters from
//! GROMACS-style `.itp` files and resolves which parameters apply to the atoms of a
//! molecular topology, including wildcard matching on atom-type labels.
//!
//! - [`core`]: units, file readers, the parameter database, the type matcher, and the
//!   topology annotator.
//! - [`workflows`]: the high-level entry point that loads a database from configuration
//!   and annotates a system, optionally requiring full coverage.

pub mod core;
pub mod workflows;
