//! # Models Module
//!
//! Minimal molecular topology used by the annotator: atoms that declare a force-field
//! kind, the bonds between them, and the slot-map ids that address them.
//!
//! - [`atom`] - Atoms and the parameters resolved for them
//! - [`system`] - The atom/bond container walked during annotation
//! - [`topology`] - Bond connectivity
//! - [`ids`] - Unique identifier types

pub mod atom;
pub mod ids;
pub mod system;
pub mod topology;
