use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Read};
use std::path::PathBuf;

/// Describes where the lines of a topology file come from.
///
/// Exactly one variant is active; [`open`](Self::open) matches on it to build a
/// [`LineSource`].
pub enum InputSource {
    /// A filesystem path, opened lazily.
    Path(PathBuf),
    /// Any byte stream.
    Reader(Box<dyn Read>),
    /// Literal text content.
    Content(String),
    /// Raw bytes held in memory, decoded as UTF-8.
    Blob(Vec<u8>),
    /// Nothing to read. For an include this means "skip silently".
    None,
}

impl InputSource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        InputSource::Path(path.into())
    }

    pub fn content(content: impl Into<String>) -> Self {
        InputSource::Content(content.into())
    }

    pub fn reader(reader: impl Read + 'static) -> Self {
        InputSource::Reader(Box::new(reader))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, InputSource::None)
    }

    /// Name used for this input in diagnostics.
    pub fn display_name(&self) -> String {
        match self {
            InputSource::Path(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            InputSource::Reader(_) => "<stream>".to_string(),
            InputSource::Content(_) => "<content>".to_string(),
            InputSource::Blob(_) => "<blob>".to_string(),
            InputSource::None => "<none>".to_string(),
        }
    }

    /// Opens the input. Returns `Ok(None)` for [`InputSource::None`].
    ///
    /// # Errors
    ///
    /// Returns an error if a path cannot be opened.
    pub fn open(self) -> io::Result<Option<LineSource>> {
        let name = self.display_name();
        let reader: Box<dyn BufRead> = match self {
            InputSource::Path(path) => Box::new(BufReader::new(File::open(path)?)),
            InputSource::Reader(reader) => Box::new(BufReader::new(reader)),
            InputSource::Content(content) => Box::new(Cursor::new(content)),
            InputSource::Blob(bytes) => Box::new(Cursor::new(bytes)),
            InputSource::None => return Ok(None),
        };
        Ok(Some(LineSource::new(name, reader)))
    }
}

impl fmt::Debug for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Path(path) => f.debug_tuple("Path").field(path).finish(),
            InputSource::Reader(_) => f.write_str("Reader(..)"),
            InputSource::Content(content) => {
                f.debug_struct("Content").field("len", &content.len()).finish()
            }
            InputSource::Blob(bytes) => f.debug_struct("Blob").field("len", &bytes.len()).finish(),
            InputSource::None => f.write_str("None"),
        }
    }
}

impl From<PathBuf> for InputSource {
    fn from(path: PathBuf) -> Self {
        InputSource::Path(path)
    }
}

impl From<&std::path::Path> for InputSource {
    fn from(path: &std::path::Path) -> Self {
        InputSource::Path(path.to_path_buf())
    }
}

/// A lazy, single-pass sequence of text lines with line endings (`\n` or `\r\n`) removed.
pub struct LineSource {
    name: String,
    lines: io::Lines<Box<dyn BufRead>>,
}

impl LineSource {
    pub fn new(name: impl Into<String>, reader: Box<dyn BufRead>) -> Self {
        Self {
            name: name.into(),
            lines: reader.lines(),
        }
    }

    /// Replaces the diagnostic name of this source.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Iterator for LineSource {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.lines.next()
    }
}

impl fmt::Debug for LineSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineSource").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn collect(source: InputSource) -> Vec<String> {
        source
            .open()
            .unwrap()
            .unwrap()
            .collect::<io::Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn content_lines_drop_crlf() {
        let lines = collect(InputSource::content("[ atoms ]\r\n1 C\n\n2 H"));
        assert_eq!(lines, ["[ atoms ]", "1 C", "", "2 H"]);
    }

    #[test]
    fn reader_and_blob_yield_same_lines() {
        let text = "a\nb\n";
        let from_reader = collect(InputSource::reader(Cursor::new(text.as_bytes().to_vec())));
        let from_blob = collect(InputSource::Blob(text.as_bytes().to_vec()));
        assert_eq!(from_reader, ["a", "b"]);
        assert_eq!(from_reader, from_blob);
    }

    #[test]
    fn path_source_reads_file_and_is_named_after_it() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("water.itp");
        fs::write(&path, "[ moleculetype ]\nSOL 2\n").unwrap();

        let source = InputSource::path(&path).open().unwrap().unwrap();
        assert_eq!(source.name(), "water.itp");
        assert_eq!(source.count(), 2);
    }

    #[test]
    fn missing_path_is_an_io_error() {
        let dir = tempdir().unwrap();
        let result = InputSource::path(dir.path().join("missing.top")).open();
        assert!(result.is_err());
    }

    #[test]
    fn none_opens_to_nothing() {
        assert!(InputSource::None.open().unwrap().is_none());
    }

    #[test]
    fn invalid_utf8_blob_surfaces_as_error() {
        let mut source = InputSource::Blob(vec![0xff, 0xfe, b'\n'])
            .open()
            .unwrap()
            .unwrap();
        assert!(source.next().unwrap().is_err());
    }
}
