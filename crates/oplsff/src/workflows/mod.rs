//! # Workflows Module
//!
//! High-level entry points that tie the parameter database and the annotator together.
//!
//! - **Parameterization Workflow** ([`parameterize`]) - Load a force field from its
//!   configured source, annotate a system, and optionally require full coverage.

pub mod config;
pub mod error;
pub mod parameterize;
