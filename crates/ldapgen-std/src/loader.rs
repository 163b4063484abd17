//! Filesystem loading of schema files and descriptor lists.
//!
//! Schema files are joined, in the order given, into one source text
//! separated by newlines. [`SchemaSources::locate`] maps a byte offset in
//! the joined text back to a file, line and column.

use ldapgen_core::{Diagnostic, ObjectDescriptor, Span};
use std::fmt;
use std::fs;
use std::io;
use std::ops::Range;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Loader error.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A file could not be read.
    #[error("{}: {source}", path.display())]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// A descriptor list is not valid JSON of the expected shape.
    #[error("{}: {source}", path.display())]
    Json {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone)]
struct SourceFile {
    path: PathBuf,
    range: Range<usize>,
}

/// A position in one of the loaded files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location<'a> {
    /// File the position falls in.
    pub path: &'a Path,
    /// 1-based line.
    pub line: usize,
    /// 1-based byte column.
    pub column: usize,
}

impl fmt::Display for Location<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path.display(), self.line, self.column)
    }
}

/// Schema files joined into one source text.
#[derive(Debug, Clone, Default)]
pub struct SchemaSources {
    source: String,
    files: Vec<SourceFile>,
}

impl SchemaSources {
    /// Create an empty set of sources.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read schema files in order.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] for the first file that cannot be read as
    /// UTF-8 text.
    pub fn read<P: AsRef<Path>>(paths: &[P]) -> Result<Self, LoadError> {
        let mut sources = Self::new();
        for path in paths {
            let path = path.as_ref();
            let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            log::debug!("read {} ({} bytes)", path.display(), text.len());
            sources.add(path, &text);
        }
        Ok(sources)
    }

    /// Append one file's text.
    pub fn add(&mut self, path: impl Into<PathBuf>, text: &str) {
        if !self.files.is_empty() {
            self.source.push('\n');
        }
        let start = self.source.len();
        self.source.push_str(text);
        self.files.push(SourceFile {
            path: path.into(),
            range: start..self.source.len(),
        });
    }

    /// The joined source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if no files were added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterate over `(path, text)` in the order added.
    pub fn files(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.files
            .iter()
            .map(|f| (f.path.as_path(), &self.source[f.range.clone()]))
    }

    /// Map a byte offset in the joined text to a file position.
    ///
    /// An offset on a separator newline belongs to the preceding file.
    #[must_use]
    pub fn locate(&self, offset: usize) -> Option<Location<'_>> {
        let file = self
            .files
            .iter()
            .rev()
            .find(|f| f.range.start <= offset)?;
        let text = &self.source[file.range.clone()];
        let relative = (offset - file.range.start).min(text.len());
        let relative = u32::try_from(relative).ok()?;
        let (line, column) = Span::new(relative, relative).line_col(text);
        Some(Location {
            path: &file.path,
            line,
            column,
        })
    }

    /// Render a diagnostic with its file position.
    #[must_use]
    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        match self.locate(diagnostic.span.start as usize) {
            Some(location) => format!("{location}: {diagnostic}"),
            None => diagnostic.to_string(),
        }
    }
}

/// Parse a JSON descriptor list.
///
/// # Errors
///
/// Returns the JSON error if the text is not an array of descriptors.
pub fn parse_descriptors(json: &str) -> Result<Vec<ObjectDescriptor>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Read a JSON descriptor list from a file.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be read or parsed.
pub fn load_descriptors(path: &Path) -> Result<Vec<ObjectDescriptor>, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let descriptors = parse_descriptors(&text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("loaded {} descriptors from {}", descriptors.len(), path.display());
    Ok(descriptors)
}
