//! Resolution of atom-type queries against the atom-type registry.
//!
//! A query is either an exact identifier (a kind such as `opls_135`, or an alias such
//! as `CT`) or a wildcard ending in `*` (such as `CT*`). An exact kind always wins;
//! otherwise every registered type whose alias (or, for wildcards, whose alias or kind
//! prefix) matches is returned, in registry order.

use super::database::{AtomTypeRegistry, ForceFieldDatabase};
use super::types::AtomType;
use std::collections::HashSet;

const WILDCARD: char = '*';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeQuery<'a> {
    Exact(&'a str),
    Wildcard { prefix: &'a str },
}

impl<'a> TypeQuery<'a> {
    pub fn parse(atom_id: &'a str) -> Self {
        match atom_id.strip_suffix(WILDCARD) {
            Some(prefix) => TypeQuery::Wildcard { prefix },
            None => TypeQuery::Exact(atom_id),
        }
    }

    fn matches(&self, atom_type: &AtomType) -> bool {
        match *self {
            TypeQuery::Exact(id) => atom_type.alias == id,
            TypeQuery::Wildcard { prefix } => {
                atom_type.alias.starts_with(prefix) || atom_type.kind.starts_with(prefix)
            }
        }
    }
}

/// Collects every atom type that satisfies `atom_id`, without duplicates.
pub fn find_matching<'r>(registry: &'r AtomTypeRegistry, atom_id: &str) -> Vec<&'r AtomType> {
    if let Some(exact) = registry.get(atom_id) {
        return vec![exact];
    }

    let query = TypeQuery::parse(atom_id);
    let mut seen = HashSet::new();
    registry
        .iter()
        .filter(|t| query.matches(t))
        .filter(|t| seen.insert(t.kind.as_str()))
        .collect()
}

impl ForceFieldDatabase {
    /// Returns the keys of every atom type that matches `atom_id`.
    ///
    /// An exact kind short-circuits to a single-element result. An empty result means
    /// the identifier is unresolved; this is never an error.
    pub fn find_atom_types(&self, atom_id: &str) -> Vec<String> {
        find_matching(self.atom_types(), atom_id)
            .into_iter()
            .map(|t| t.kind.clone())
            .collect()
    }

    /// Like [`find_atom_types`](Self::find_atom_types), but returns the records.
    pub fn find_atom_type_records(&self, atom_id: &str) -> Vec<&AtomType> {
        find_matching(self.atom_types(), atom_id)
    }
}
