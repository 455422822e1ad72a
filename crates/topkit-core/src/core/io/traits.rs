use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Cursor, Write};
use std::path::Path;

/// Defines the interface for reading and writing topology files without preprocessing.
///
/// Implementors handle one physical layout (a single `.itp`, a multi-molecule `.itp`, a
/// `.top`). Includes are recorded but never followed and conditionals are kept as plain
/// lines; the preprocessing path is [`TopologyParser`](crate::parser::TopologyParser).
pub trait TopologyFile {
    /// What a read produces.
    type Output;

    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails.
    fn read_from(reader: &mut impl BufRead) -> Result<Self::Output, Self::Error>;

    /// Writes `value` in topology text form.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(value: &Self::Output, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Reads from in-memory text.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails.
    fn read_from_str(text: &str) -> Result<Self::Output, Self::Error> {
        let mut reader = Cursor::new(text.as_bytes());
        Self::read_from(&mut reader)
    }

    /// Reads from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self::Output, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Writes `value` to a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(value: &Self::Output, path: P) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(value, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
