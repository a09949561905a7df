use std::fmt;
use std::path::PathBuf;

use crate::lexer::Location;

/// Result type alias for the document pipeline
pub type Result<T> = std::result::Result<T, Error>;

/// The category of a failed lex, parse or validation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A tag header looked like `@api…` but was not a valid tag name
    LexError,
    /// A type token could not be parsed by the type grammar
    InvalidType,
    /// A response status was not numeric or outside the HTTP range
    InvalidStatus,
    /// A required field was absent or empty
    MissingRequiredField,
    /// A field was present but malformed (version string, URL, method…)
    InvalidFormat,
    /// Two entities share a name that must be unique
    DuplicateReference,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::LexError => write!(f, "malformed tag"),
            ErrorKind::InvalidType => write!(f, "invalid type"),
            ErrorKind::InvalidStatus => write!(f, "invalid status"),
            ErrorKind::MissingRequiredField => write!(f, "missing required field"),
            ErrorKind::InvalidFormat => write!(f, "invalid format"),
            ErrorKind::DuplicateReference => write!(f, "duplicate reference"),
        }
    }
}

/// One step of a [`FieldPath`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A named field, rendered as `.name`
    Field(String),
    /// A list position, rendered as `[0]`
    Index(usize),
    /// A map key, rendered as `[key]`
    Key(String),
}

/// Structured location of a field inside a document, e.g. `responses[0].headers[1].name`.
///
/// Validators build the path from the inside out: the failing check creates the
/// leaf and every enclosing level prepends its own segments while the error
/// travels back up. It is rendered to a dotted string only for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// Create an empty path
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a path holding a single field name
    pub fn field(name: &str) -> Self {
        let mut path = Self::new();
        if !name.is_empty() {
            path.segments.push(PathSegment::Field(name.to_string()));
        }
        path
    }

    /// Prepend segments, outermost first
    pub fn prepend(&mut self, segments: impl IntoIterator<Item = PathSegment>) {
        let mut prefixed: Vec<PathSegment> = segments.into_iter().collect();
        prefixed.append(&mut self.segments);
        self.segments = prefixed;
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl From<&str> for FieldPath {
    fn from(name: &str) -> Self {
        FieldPath::field(name)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) if i == 0 => write!(f, "{}", name)?,
                PathSegment::Field(name) => write!(f, ".{}", name)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
                PathSegment::Key(key) => write!(f, "[{}]", key)?,
            }
        }
        Ok(())
    }
}

/// The single error value surfaced by the lexer, tag parsers, sanitizer and exporter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    /// Source file the offending annotation came from, when known
    pub file: Option<PathBuf>,
    /// 1-based line, 0 when the error is not tied to a tag
    pub line: usize,
    /// 1-based column, 0 when the error is not tied to a tag
    pub column: usize,
    /// Dotted path of the offending field
    pub field: FieldPath,
    pub kind: ErrorKind,
}

impl Error {
    pub fn new(kind: ErrorKind, field: impl Into<FieldPath>) -> Self {
        Self {
            file: None,
            line: 0,
            column: 0,
            field: field.into(),
            kind,
        }
    }

    /// Attach the position of the tag that produced the error
    pub fn at(mut self, location: Location) -> Self {
        self.line = location.line;
        self.column = location.column;
        self
    }

    /// Attach the source file, keeping one that is already set
    pub fn in_file(mut self, file: impl Into<PathBuf>) -> Self {
        if self.file.is_none() {
            self.file = Some(file.into());
        }
        self
    }

    /// Prefix the field path with an enclosing field name
    pub fn within(mut self, field: &str) -> Self {
        self.field.prepend([PathSegment::Field(field.to_string())]);
        self
    }

    /// Prefix the field path with an enclosing list element, e.g. `apis[2]`
    pub fn within_index(mut self, field: &str, index: usize) -> Self {
        self.field.prepend([
            PathSegment::Field(field.to_string()),
            PathSegment::Index(index),
        ]);
        self
    }

    /// Prefix the field path with an enclosing map entry, e.g. `responses[404]`
    pub fn within_key(mut self, field: &str, key: &str) -> Self {
        self.field.prepend([
            PathSegment::Field(field.to_string()),
            PathSegment::Key(key.to_string()),
        ]);
        self
    }

    /// The rendered dotted field path
    pub fn field_path(&self) -> String {
        self.field.to_string()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}:", file.display())?;
        }
        if self.line > 0 {
            write!(f, "{}:{}:", self.line, self.column)?;
        }
        if self.file.is_some() || self.line > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", self.kind)?;
        if !self.field.is_empty() {
            write!(f, " at `{}`", self.field)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}
