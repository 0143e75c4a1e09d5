use crate::core::models::structure::Structure;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading and writing coarse-grained structure files.
///
/// Implementors handle format-specific parsing and serialization; the path-based
/// helpers are shared.
pub trait StructureFile {
    /// Options controlling how records are read.
    type Options: Default;

    /// Summary information gathered while reading.
    type Report;

    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads a structure from a buffered reader with explicit options.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails under the chosen options or the reader fails.
    fn read_with(
        reader: &mut impl BufRead,
        options: &Self::Options,
    ) -> Result<(Structure, Self::Report), Self::Error>;

    /// Writes a structure to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(structure: &Structure, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Reads a structure with default options.
    fn read_from(reader: &mut impl BufRead) -> Result<(Structure, Self::Report), Self::Error> {
        Self::read_with(reader, &Self::Options::default())
    }

    /// Reads a structure from a file path with explicit options.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_path_with<P: AsRef<Path>>(
        path: P,
        options: &Self::Options,
    ) -> Result<(Structure, Self::Report), Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_with(&mut reader, options)
    }

    /// Reads a structure from a file path with default options.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<(Structure, Self::Report), Self::Error> {
        Self::read_path_with(path, &Self::Options::default())
    }

    /// Writes a structure to a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(structure: &Structure, path: P) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(structure, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
