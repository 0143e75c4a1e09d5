use crate::core::io::traits::StructureFile;
use crate::core::models::atom::{Atom, AtomKind};
use crate::core::models::element::ElementTable;
use crate::core::models::structure::Structure;
use nalgebra::Point3;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

const ATOM_RECORD: &str = "ATOM";

/// How the reader reacts to a qualifying record it cannot parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordPolicy {
    /// Abort the whole read at the first bad record.
    #[default]
    Strict,
    /// Log the record, note it in the report and keep reading.
    Skip,
}

impl FromStr for RecordPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(RecordPolicy::Strict),
            "skip" => Ok(RecordPolicy::Skip),
            _ => Err(format!(
                "Invalid record policy '{}'. Expected 'strict' or 'skip'.",
                s
            )),
        }
    }
}

impl fmt::Display for RecordPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordPolicy::Strict => write!(f, "strict"),
            RecordPolicy::Skip => write!(f, "skip"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdbReadOptions {
    pub elements: ElementTable,
    pub policy: RecordPolicy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    pub line: usize,
    pub kind: PdbParseErrorKind,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseReport {
    pub lines_scanned: usize,
    pub atom_records: usize,
    pub atoms_retained: usize,
    pub skipped: Vec<SkippedRecord>,
}

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: PdbParseErrorKind,
    },
    #[error("Atom {serial} cannot be written: value '{value}' does not fit in columns {columns}")]
    FieldOutOfRange {
        serial: usize,
        columns: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: &'static str, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: &'static str, value: String },
    #[error("Unknown element for atom name '{atom_name}'")]
    UnknownElement { atom_name: String },
    #[error("Record is not valid UTF-8")]
    InvalidEncoding,
}

/// Residue numbers the three-column field `24-26` can hold.
const RESIDUE_NUMBER_RANGE: std::ops::RangeInclusive<isize> = -99..=999;

fn strip_line_ending(mut bytes: &[u8]) -> &[u8] {
    if let Some(rest) = bytes.strip_suffix(b"\n") {
        bytes = rest;
    }
    bytes.strip_suffix(b"\r").unwrap_or(bytes)
}

/// Whether the raw name columns of a record hold a retained marker.
fn has_retained_name(record: &[u8]) -> bool {
    record
        .get(13..15)
        .or_else(|| record.get(13..))
        .and_then(|bytes| std::str::from_utf8(bytes).ok())
        .and_then(|name| AtomKind::from_atom_name(name.trim()))
        .is_some()
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end)
        .or_else(|| line.get(start..))
        .unwrap_or("")
        .trim()
}

fn parse_int(line: &str, start: usize, end: usize, columns: &'static str) -> Result<isize, PdbParseErrorKind> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbParseErrorKind::InvalidInt {
        columns,
        value: value.into(),
    })
}

fn parse_float(line: &str, start: usize, end: usize, columns: &'static str) -> Result<f64, PdbParseErrorKind> {
    let value = slice_and_trim(line, start, end);
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(PdbParseErrorKind::InvalidFloat {
            columns,
            value: value.into(),
        }),
    }
}

/// Parses one record. `Ok(None)` means the record is not part of the coarse-grained
/// representation and is skipped silently.
fn parse_atom_record(
    line: &str,
    line_num: usize,
    elements: &ElementTable,
) -> Result<Option<Atom>, PdbParseErrorKind> {
    let name = slice_and_trim(line, 13, 15);
    let Some(kind) = AtomKind::from_atom_name(name) else {
        return Ok(None);
    };

    let residue_name = slice_and_trim(line, 17, 20);
    let chain_id = line
        .get(21..22)
        .and_then(|s| s.chars().next())
        .unwrap_or(' ');
    let residue_number = parse_int(line, 23, 26, "24-26")?;
    let x = parse_float(line, 30, 38, "31-38")?;
    let y = parse_float(line, 38, 46, "39-46")?;
    let z = parse_float(line, 46, 54, "47-54")?;

    let element = elements
        .classify(name)
        .ok_or_else(|| PdbParseErrorKind::UnknownElement {
            atom_name: name.to_string(),
        })?;

    let mut atom = Atom::new(kind, element, residue_number, residue_name, Point3::new(x, y, z))
        .with_chain(chain_id);
    atom.line = line_num;
    Ok(Some(atom))
}

fn format_coordinate(serial: usize, value: f64, columns: &'static str) -> Result<String, PdbError> {
    let field = format!("{:>8.3}", value);
    if field.len() > 8 {
        return Err(PdbError::FieldOutOfRange {
            serial,
            columns,
            value: field.trim().to_string(),
        });
    }
    Ok(field)
}

/// Formats an atom as a fixed-column `ATOM` record.
///
/// Fails when a value would spill out of its columns, since the reader could not
/// recover it: residue numbers outside `-99..=999` and coordinates that need more
/// than eight characters.
pub fn format_atom_record(serial: usize, atom: &Atom) -> Result<String, PdbError> {
    if !RESIDUE_NUMBER_RANGE.contains(&atom.residue_number) {
        return Err(PdbError::FieldOutOfRange {
            serial,
            columns: "24-26",
            value: atom.residue_number.to_string(),
        });
    }
    Ok(format!(
        "{:<6}{:>5} {:<4} {:>3} {}{:>4}    {}{}{}{:>6.2}{:>6.2}          {:>2}",
        ATOM_RECORD,
        serial,
        format!(" {}", atom.name),
        atom.residue_name,
        atom.chain_id,
        atom.residue_number,
        format_coordinate(serial, atom.position.x, "31-38")?,
        format_coordinate(serial, atom.position.y, "39-46")?,
        format_coordinate(serial, atom.position.z, "47-54")?,
        1.0,
        0.0,
        atom.element.symbol()
    ))
}

pub struct PdbFile;

impl PdbFile {
    /// Reads a structure from an in-memory PDB text blob.
    pub fn read_str(
        text: &str,
        options: &PdbReadOptions,
    ) -> Result<(Structure, ParseReport), PdbError> {
        Self::read_with(&mut text.as_bytes(), options)
    }
}

impl StructureFile for PdbFile {
    type Options = PdbReadOptions;
    type Report = ParseReport;
    type Error = PdbError;

    fn read_with(
        reader: &mut impl BufRead,
        options: &Self::Options,
    ) -> Result<(Structure, Self::Report), Self::Error> {
        let mut atoms = Vec::new();
        let mut report = ParseReport::default();

        // Raw bytes: only qualifying records need to be text.
        let mut buffer = Vec::new();
        let mut line_num = 0;
        loop {
            buffer.clear();
            if reader.read_until(b'\n', &mut buffer)? == 0 {
                break;
            }
            line_num += 1;
            report.lines_scanned += 1;

            let record = strip_line_ending(&buffer);
            if !record.starts_with(ATOM_RECORD.as_bytes()) {
                continue;
            }
            report.atom_records += 1;

            let parsed = match std::str::from_utf8(record) {
                Ok(line) => parse_atom_record(line, line_num, &options.elements),
                Err(_) if has_retained_name(record) => Err(PdbParseErrorKind::InvalidEncoding),
                Err(_) => Ok(None),
            };

            match parsed {
                Ok(Some(atom)) => atoms.push(atom),
                Ok(None) => {}
                Err(kind) => match options.policy {
                    RecordPolicy::Strict => {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind,
                        });
                    }
                    RecordPolicy::Skip => {
                        warn!(line = line_num, "Skipping ATOM record: {}", kind);
                        report.skipped.push(SkippedRecord {
                            line: line_num,
                            kind,
                        });
                    }
                },
            }
        }

        report.atoms_retained = atoms.len();
        debug!(
            lines = report.lines_scanned,
            atom_records = report.atom_records,
            retained = report.atoms_retained,
            skipped = report.skipped.len(),
            "Finished reading PDB records."
        );
        Ok((Structure::new(atoms), report))
    }

    fn write_to(structure: &Structure, writer: &mut impl Write) -> Result<(), Self::Error> {
        writeln!(writer, "REMARK   1 COARSE-GRAINED MODEL GENERATED BY CGMOL")?;
        for (index, atom) in structure.iter().enumerate() {
            writeln!(writer, "{}", format_atom_record(index + 1, atom)?)?;
        }
        writeln!(writer, "END")?;
        Ok(())
    }
}
