//! Comment block extraction for annotated source files.
//!
//! Each comment syntax has its own extractor that knows where comments start
//! and end and which markers to strip. The extractors do not parse the host
//! language: they only isolate raw annotation text and remember where it came
//! from, so later stages can report errors against the original file.
//!
//! # Supported Comment Styles
//!
//! - **C style** (`//`, `/* */`): See [`cstyle::CStyleExtractor`]
//! - **Hash** (`#`): See [`hash::HashExtractor`]
//!
//! # Example
//!
//! ```
//! use openapi_from_comments::extractor::{BlockExtractor, cstyle::CStyleExtractor};
//! use std::path::Path;
//!
//! let source = "// @api GET /users list users\nfunc list() {}\n";
//! let blocks = CStyleExtractor.extract_blocks(Path::new("users.go"), source);
//! assert_eq!(blocks.len(), 1);
//! assert_eq!(blocks[0].location.column, 4);
//! ```

pub mod cstyle;
pub mod hash;

use crate::lexer::Location;
use std::path::{Path, PathBuf};

/// Trait for isolating annotation blocks from a source file.
pub trait BlockExtractor {
    /// Extracts every comment block that may carry annotations.
    ///
    /// # Arguments
    ///
    /// * `path` - Path of the file, recorded on each block
    /// * `content` - Full text of the file
    ///
    /// # Returns
    ///
    /// Returns the blocks in file order, comment markers stripped. Blocks that
    /// cannot contain an `@api` tag are left out.
    fn extract_blocks(&self, path: &Path, content: &str) -> Vec<RawBlock>;
}

/// The text of one comment region, ready for the lexer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    pub file: PathBuf,
    /// Position of the first character of `text` in `file`
    pub location: Location,
    pub text: String,
}

/// A comment region being accumulated line by line
pub(crate) struct PendingBlock {
    location: Location,
    lines: Vec<String>,
}

impl PendingBlock {
    pub(crate) fn new(line: usize, column: usize) -> Self {
        Self {
            location: Location::new(line, column),
            lines: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }

    /// Close the region, dropping it when it holds no annotation
    pub(crate) fn finish(self, path: &Path, blocks: &mut Vec<RawBlock>) {
        let text = self.lines.join("\n");
        if text.contains("@api") {
            blocks.push(RawBlock {
                file: path.to_path_buf(),
                location: self.location,
                text,
            });
        }
    }
}

/// 1-based column at which `suffix`, a tail of `line`, starts
pub(crate) fn column_of(line: &str, suffix: &str) -> usize {
    line[..line.len() - suffix.len()].chars().count() + 1
}
