//! Physical units and dimensioned quantities.
//!
//! Every parameter slot in the force-field database is tagged with a [`Unit`]. A
//! [`Quantity`] can only be converted into a unit of the same [`Dimension`]; anything
//! else is rejected with [`UnitError::Incompatible`]. Scale factors are expressed
//! relative to SI base units (kg, m, s, C, mol).

use std::borrow::Cow;
use std::f64::consts::PI;
use std::fmt;
use std::ops::{Div, Mul};
use thiserror::Error;

/// Integer exponents over the base dimensions used by force-field parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dimension {
    pub mass: i8,
    pub length: i8,
    pub time: i8,
    pub charge: i8,
    pub amount: i8,
}

impl Dimension {
    pub const NONE: Self = Self::new(0, 0, 0, 0, 0);
    pub const MASS: Self = Self::new(1, 0, 0, 0, 0);
    pub const LENGTH: Self = Self::new(0, 1, 0, 0, 0);
    pub const CHARGE: Self = Self::new(0, 0, 0, 1, 0);
    /// Molar energy, e.g. kJ/mol.
    pub const MOLAR_ENERGY: Self = Self::new(1, 2, -2, 0, -1);

    pub const fn new(mass: i8, length: i8, time: i8, charge: i8, amount: i8) -> Self {
        Self {
            mass,
            length,
            time,
            charge,
            amount,
        }
    }

    const fn combine(self, other: Self, sign: i8) -> Self {
        Self::new(
            self.mass + sign * other.mass,
            self.length + sign * other.length,
            self.time + sign * other.time,
            self.charge + sign * other.charge,
            self.amount + sign * other.amount,
        )
    }

    pub const fn powi(self, n: i8) -> Self {
        Self::new(
            self.mass * n,
            self.length * n,
            self.time * n,
            self.charge * n,
            self.amount * n,
        )
    }

    pub fn is_dimensionless(&self) -> bool {
        *self == Self::NONE
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dimensionless() {
            return write!(f, "[dimensionless]");
        }
        let parts: Vec<String> = [
            ("M", self.mass),
            ("L", self.length),
            ("T", self.time),
            ("Q", self.charge),
            ("N", self.amount),
        ]
        .into_iter()
        .filter(|(_, exp)| *exp != 0)
        .map(|(sym, exp)| match exp {
            1 => sym.to_string(),
            _ => format!("{}^{}", sym, exp),
        })
        .collect();
        write!(f, "[{}]", parts.join(" "))
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum UnitError {
    #[error("cannot convert '{from}' {from_dimension} into '{to}' {to_dimension}")]
    Incompatible {
        from: String,
        from_dimension: Dimension,
        to: String,
        to_dimension: Dimension,
    },
}

/// A named unit: a scale factor to SI base units plus its dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    symbol: Cow<'static, str>,
    scale: f64,
    dimension: Dimension,
}

impl Unit {
    pub const fn new(symbol: &'static str, scale: f64, dimension: Dimension) -> Self {
        Self {
            symbol: Cow::Borrowed(symbol),
            scale,
            dimension,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Two units are compatible when they measure the same dimension.
    pub fn is_compatible(&self, other: &Unit) -> bool {
        self.dimension == other.dimension
    }

    pub fn powi(&self, n: i8) -> Unit {
        Unit {
            symbol: Cow::Owned(format!("{}^{}", self.symbol, n)),
            scale: self.scale.powi(n as i32),
            dimension: self.dimension.powi(n),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol)
    }
}

impl Mul<&Unit> for &Unit {
    type Output = Unit;

    fn mul(self, rhs: &Unit) -> Unit {
        Unit {
            symbol: Cow::Owned(format!("{}*{}", self.symbol, rhs.symbol)),
            scale: self.scale * rhs.scale,
            dimension: self.dimension.combine(rhs.dimension, 1),
        }
    }
}

impl Div<&Unit> for &Unit {
    type Output = Unit;

    fn div(self, rhs: &Unit) -> Unit {
        Unit {
            symbol: Cow::Owned(format!("{}/{}", self.symbol, rhs.symbol)),
            scale: self.scale / rhs.scale,
            dimension: self.dimension.combine(rhs.dimension, -1),
        }
    }
}

pub const AMU: Unit = Unit::new("amu", 1.660_539_066_60e-27, Dimension::MASS);
pub const ELEMENTARY_CHARGE: Unit = Unit::new("e", 1.602_176_634e-19, Dimension::CHARGE);
pub const NANOMETER: Unit = Unit::new("nm", 1.0e-9, Dimension::LENGTH);
pub const ANGSTROM: Unit = Unit::new("Å", 1.0e-10, Dimension::LENGTH);
pub const KILOJOULE_PER_MOLE: Unit = Unit::new("kJ/mol", 1.0e3, Dimension::MOLAR_ENERGY);
pub const KILOCALORIE_PER_MOLE: Unit = Unit::new("kcal/mol", 4.184e3, Dimension::MOLAR_ENERGY);
pub const RADIAN: Unit = Unit::new("rad", 1.0, Dimension::NONE);
pub const DEGREE: Unit = Unit::new("deg", PI / 180.0, Dimension::NONE);

/// Harmonic bond force constant unit used by GROMACS topologies.
pub fn kj_per_mol_per_nm2() -> Unit {
    &KILOJOULE_PER_MOLE / &NANOMETER.powi(2)
}

pub fn kj_per_mol_per_angstrom2() -> Unit {
    &KILOJOULE_PER_MOLE / &ANGSTROM.powi(2)
}

/// A numeric value tagged with a unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    value: f64,
    unit: Unit,
}

impl Quantity {
    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn ensure_compatible(&self, target: &Unit) -> Result<(), UnitError> {
        if self.unit.is_compatible(target) {
            Ok(())
        } else {
            Err(UnitError::Incompatible {
                from: self.unit.symbol().to_string(),
                from_dimension: self.unit.dimension(),
                to: target.symbol().to_string(),
                to_dimension: target.dimension(),
            })
        }
    }

    pub fn convert_to(&self, target: &Unit) -> Result<Quantity, UnitError> {
        self.ensure_compatible(target)?;
        Ok(Quantity {
            value: self.value * self.unit.scale / target.scale,
            unit: target.clone(),
        })
    }

    pub fn value_in(&self, target: &Unit) -> Result<f64, UnitError> {
        self.convert_to(target).map(|q| q.value)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

impl Mul<Unit> for f64 {
    type Output = Quantity;

    fn mul(self, unit: Unit) -> Quantity {
        Quantity::new(self, unit)
    }
}

impl Mul<&Unit> for f64 {
    type Output = Quantity;

    fn mul(self, unit: &Unit) -> Quantity {
        Quantity::new(self, unit.clone())
    }
}
