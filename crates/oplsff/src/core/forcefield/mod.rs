//! # Force Field Module
//!
//! Loads an OPLS-AA parameter database and resolves parameters for atoms in a
//! molecular topology.
//!
//! ## Key Components
//!
//! - [`database`] - The four parameter registries and the unit-checked `add_*` constructors
//! - [`matcher`] - Exact, alias, and wildcard resolution of atom-type identifiers
//! - [`annotate`] - Attaches resolved atom-type parameters to the atoms of a system and resolves its bond and angle terms
//! - [`types`] - Parameter record types and registry keys
//! - [`config`] - Manifest and loader options
//!
//! ## Usage
//!
//! ```ignore
//! use oplsff::core::forcefield::{annotate::Annotator, database::ForceFieldDatabase};
//!
//! let db = ForceFieldDatabase::bundled();
//! let carbons = db.find_atom_types("CT*");
//! let report = Annotator::new(db).annotate(&mut system);
//! ```

pub mod annotate;
pub mod config;
pub mod database;
pub mod error;
pub mod matcher;
pub mod types;
