use crate::core::units::Quantity;
use std::fmt;
use std::num::ParseFloatError;

/// One parameterized atom type from the non-bonded file.
///
/// `kind` is the primary key (e.g. "opls_135"); `alias` is the coarser bond-type label
/// (e.g. "CT") shared by chemically equivalent kinds and used for bonded lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomType {
    pub kind: String,
    pub alias: String,
    pub atomic_number: u32,
    pub mass: Quantity,
    pub charge: Quantity,
    pub sigma: Quantity,
    pub epsilon: Quantity,
}

/// Harmonic bond parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct BondType {
    /// Equilibrium length, stored in Angstroms.
    pub length: Quantity,
    /// Force constant, stored in kJ mol^-1 nm^-2.
    pub force_constant: Quantity,
}

/// Angle parameters as read from the file; interpreting their units is left to the consumer.
#[derive(Debug, Clone, PartialEq)]
pub struct AngleType {
    pub params: Vec<f64>,
}

/// Dihedral coefficients, kept as the raw tokens from the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DihedralType {
    pub coefficients: Vec<String>,
}

impl DihedralType {
    pub fn numeric_coefficients(&self) -> Result<Vec<f64>, ParseFloatError> {
        self.coefficients.iter().map(|c| c.parse::<f64>()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BondKey(pub String, pub String);

impl BondKey {
    pub fn new(a: &str, b: &str) -> Self {
        Self(a.to_string(), b.to_string())
    }

    pub fn reversed(&self) -> Self {
        Self(self.1.clone(), self.0.clone())
    }
}

/// Angle key; the second label is the central atom.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AngleKey(pub String, pub String, pub String);

impl AngleKey {
    pub fn new(a: &str, b: &str, c: &str) -> Self {
        Self(a.to_string(), b.to_string(), c.to_string())
    }

    pub fn reversed(&self) -> Self {
        Self(self.2.clone(), self.1.clone(), self.0.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DihedralKey(pub String, pub String, pub String, pub String);

impl DihedralKey {
    pub fn new(a: &str, b: &str, c: &str, d: &str) -> Self {
        Self(a.to_string(), b.to_string(), c.to_string(), d.to_string())
    }

    pub fn reversed(&self) -> Self {
        Self(
            self.3.clone(),
            self.2.clone(),
            self.1.clone(),
            self.0.clone(),
        )
    }
}

impl fmt::Display for BondKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.0, self.1)
    }
}

impl fmt::Display for AngleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.0, self.1, self.2)
    }
}

impl fmt::Display for DihedralKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}-{}", self.0, self.1, self.2, self.3)
    }
}
