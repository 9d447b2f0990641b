use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Defines the interface for reading a force-field parameter file.
///
/// Implementors parse one text format into a sequence of typed records. Interpreting
/// those records (unit tagging, registry insertion) is left to the caller.
pub trait ParameterFile {
    /// The record type produced for each data row.
    type Record;

    /// The error type for parse and I/O failures.
    type Error: Error + From<io::Error>;

    /// Reads every record from a buffered reader, draining it.
    ///
    /// # Errors
    ///
    /// Returns an error on the first malformed row or I/O failure.
    fn read_from(reader: &mut impl BufRead) -> Result<Vec<Self::Record>, Self::Error>;

    /// Reads every record from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Self::Record>, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}
