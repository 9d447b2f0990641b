use super::error::{ItpError, ItpParseErrorKind};
use super::traits::ParameterFile;
use crate::core::forcefield::types::{AngleKey, BondKey, DihedralKey};
use crate::core::units::{AMU, ELEMENTARY_CHARGE, KILOJOULE_PER_MOLE, NANOMETER, Quantity};
use phf::phf_map;
use std::io::BufRead;
use std::str::FromStr;
use tracing::{debug, warn};

const NONBONDED_COLUMNS: usize = 8;
/// Columns needed to read a bond row's function code.
const BOND_HEADER_COLUMNS: usize = 3;
/// Harmonic rows always carry both b0 and kb, whichever one feeds the force constant.
const HARMONIC_BOND_COLUMNS: usize = 5;
const ANGLE_COLUMNS: usize = 6;
const DIHEDRAL_COLUMNS: usize = 5;

/// Token that starts a trailing comment on a dihedral row.
const COMMENT_TOKEN: &str = ";";

/// GROMACS function code for a harmonic bond.
const HARMONIC_BOND_FUNCTION: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    BondTypes,
    AngleTypes,
    DihedralTypes,
}

static SECTION_HEADERS: phf::Map<&'static str, Section> = phf_map! {
    "[ bondtypes ]" => Section::BondTypes,
    "[ angletypes ]" => Section::AngleTypes,
    "[ dihedraltypes ]" => Section::DihedralTypes,
};

impl Section {
    /// Recognizes one of the literal, case-sensitive section headers.
    pub fn from_header(line: &str) -> Option<Self> {
        SECTION_HEADERS.get(line.trim()).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    Outside,
    Inside(Section),
}

/// One data row of the non-bonded file, tagged with GROMACS units.
#[derive(Debug, Clone, PartialEq)]
pub struct NonBondedRecord {
    pub line: usize,
    pub kind: String,
    pub alias: String,
    pub atomic_number: u32,
    pub mass: Quantity,
    pub charge: Quantity,
    pub sigma: Quantity,
    pub epsilon: Quantity,
}

/// A harmonic (function 1) bond row. Rows with other function codes are skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct BondRecord {
    pub line: usize,
    pub key: BondKey,
    /// Column 4, in nm.
    pub length: f64,
    /// Column 5, in kJ mol^-1 nm^-2.
    pub force_constant: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AngleRecord {
    pub line: usize,
    pub key: AngleKey,
    pub function: i32,
    pub params: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DihedralRecord {
    pub line: usize,
    pub key: DihedralKey,
    pub function: i32,
    pub coefficients: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BondedRecord {
    Bond(BondRecord),
    Angle(AngleRecord),
    Dihedral(DihedralRecord),
}

pub struct NonBondedFile;

pub struct BondedFile;

fn starts_with_any(token: &str, markers: &[char]) -> bool {
    token.chars().next().is_some_and(|c| markers.contains(&c))
}

fn require_columns(fields: &[&str], expected: usize, line: usize) -> Result<(), ItpError> {
    if fields.len() < expected {
        return Err(ItpError::parse(
            line,
            ItpParseErrorKind::MissingColumns {
                expected,
                found: fields.len(),
            },
        ));
    }
    Ok(())
}

fn parse_int<T: FromStr>(fields: &[&str], index: usize, line: usize) -> Result<T, ItpError> {
    fields[index].parse().map_err(|_| {
        ItpError::parse(
            line,
            ItpParseErrorKind::InvalidInt {
                column: index + 1,
                value: fields[index].to_string(),
            },
        )
    })
}

fn parse_float(fields: &[&str], index: usize, line: usize) -> Result<f64, ItpError> {
    fields[index].parse().map_err(|_| {
        ItpError::parse(
            line,
            ItpParseErrorKind::InvalidFloat {
                column: index + 1,
                value: fields[index].to_string(),
            },
        )
    })
}

impl ParameterFile for NonBondedFile {
    type Record = NonBondedRecord;
    type Error = ItpError;

    fn read_from(reader: &mut impl BufRead) -> Result<Vec<NonBondedRecord>, ItpError> {
        let mut records = Vec::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            let fields: Vec<&str> = line.split_whitespace().collect();
            let Some(first) = fields.first() else {
                continue;
            };
            if starts_with_any(first, &[';', '[', '#']) {
                continue;
            }

            require_columns(&fields, NONBONDED_COLUMNS, line_num)?;
            // Column 6 is the particle type and is not used.
            records.push(NonBondedRecord {
                line: line_num,
                kind: fields[0].to_string(),
                alias: fields[1].to_string(),
                atomic_number: parse_int(&fields, 2, line_num)?,
                mass: parse_float(&fields, 3, line_num)? * AMU,
                charge: parse_float(&fields, 4, line_num)? * ELEMENTARY_CHARGE,
                sigma: parse_float(&fields, 6, line_num)? * NANOMETER,
                epsilon: parse_float(&fields, 7, line_num)? * KILOJOULE_PER_MOLE,
            });
        }

        Ok(records)
    }
}

impl ParameterFile for BondedFile {
    type Record = BondedRecord;
    type Error = ItpError;

    /// Runs the section state machine over the bonded file.
    ///
    /// A section ends at the first blank line, at the next `[` header line, or at the
    /// end of input. Lines outside a recognized section are ignored.
    fn read_from(reader: &mut impl BufRead) -> Result<Vec<BondedRecord>, ItpError> {
        let mut records = Vec::new();
        let mut state = ParserState::Outside;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            let trimmed = line.trim();

            match state {
                ParserState::Outside => {
                    if let Some(section) = Section::from_header(trimmed) {
                        debug!("Entering {:?} section at line {}.", section, line_num);
                        state = ParserState::Inside(section);
                    }
                }
                ParserState::Inside(section) => {
                    if trimmed.is_empty() {
                        debug!("Leaving {:?} section at line {}.", section, line_num);
                        state = ParserState::Outside;
                        continue;
                    }
                    if starts_with_any(trimmed, &[';', '#']) {
                        continue;
                    }
                    if trimmed.starts_with('[') {
                        state = match Section::from_header(trimmed) {
                            Some(next) => ParserState::Inside(next),
                            None => ParserState::Outside,
                        };
                        debug!(
                            "Section {:?} closed by header at line {}; now {:?}.",
                            section, line_num, state
                        );
                        continue;
                    }

                    let fields: Vec<&str> = trimmed.split_whitespace().collect();
                    let record = match section {
                        Section::BondTypes => match parse_bond_row(&fields, line_num)? {
                            Some(bond) => BondedRecord::Bond(bond),
                            None => continue,
                        },
                        Section::AngleTypes => {
                            BondedRecord::Angle(parse_angle_row(&fields, line_num)?)
                        }
                        Section::DihedralTypes => {
                            BondedRecord::Dihedral(parse_dihedral_row(&fields, line_num)?)
                        }
                    };
                    records.push(record);
                }
            }
        }

        Ok(records)
    }
}

fn parse_bond_row(fields: &[&str], line: usize) -> Result<Option<BondRecord>, ItpError> {
    require_columns(fields, BOND_HEADER_COLUMNS, line)?;
    let key = BondKey::new(fields[0], fields[1]);
    let function: i32 = parse_int(fields, 2, line)?;
    if function != HARMONIC_BOND_FUNCTION {
        warn!(
            "Skipping bond type {} on line {}: unsupported function code {}.",
            key, line, function
        );
        return Ok(None);
    }

    require_columns(fields, HARMONIC_BOND_COLUMNS, line)?;
    Ok(Some(BondRecord {
        line,
        key,
        length: parse_float(fields, 3, line)?,
        force_constant: parse_float(fields, 4, line)?,
    }))
}

fn parse_angle_row(fields: &[&str], line: usize) -> Result<AngleRecord, ItpError> {
    require_columns(fields, ANGLE_COLUMNS, line)?;
    Ok(AngleRecord {
        line,
        key: AngleKey::new(fields[0], fields[1], fields[2]),
        function: parse_int(fields, 3, line)?,
        params: vec![parse_float(fields, 4, line)?, parse_float(fields, 5, line)?],
    })
}

fn parse_dihedral_row(fields: &[&str], line: usize) -> Result<DihedralRecord, ItpError> {
    require_columns(fields, DIHEDRAL_COLUMNS, line)?;
    let end = fields
        .iter()
        .position(|f| *f == COMMENT_TOKEN)
        .unwrap_or(fields.len())
        .max(DIHEDRAL_COLUMNS);
    Ok(DihedralRecord {
        line,
        key: DihedralKey::new(fields[0], fields[1], fields[2], fields[3]),
        function: parse_int(fields, 4, line)?,
        coefficients: fields[DIHEDRAL_COLUMNS..end]
            .iter()
            .map(|f| f.to_string())
            .collect(),
    })
}
