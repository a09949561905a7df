use crate::doc::{Api, Doc};
use crate::error;
use crate::extractor::RawBlock;
use crate::lang::CommentStyle;
use crate::lexer::Lexer;
use crate::scanner::SourceFile;
use crate::tags::{parse_block, Block};
use anyhow::{Context, Result};
use log::{debug, warn};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Annotation parser for source files.
///
/// The `SourceParser` pulls the comment blocks out of a file, lexes each one
/// into tags and turns the tags into document fragments. Files are
/// independent of each other, so [`SourceParser::parse_files`] handles them in
/// parallel.
///
/// # Example
///
/// ```
/// use openapi_from_comments::lang::CommentStyle;
/// use openapi_from_comments::parser::SourceParser;
/// use std::path::Path;
///
/// let source = "// @api GET /users list users\n// @apiResponse 200 array.object application/json\n";
/// let parsed = SourceParser::parse_source(Path::new("users.go"), source, CommentStyle::CStyle).unwrap();
/// assert_eq!(parsed.apis.len(), 1);
/// ```
pub struct SourceParser;

/// Document fragments declared by one file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFile {
    /// Path to the source file
    pub path: PathBuf,
    /// The first `@apidoc` block of the file, if any
    pub doc: Option<Doc>,
    /// `@api` blocks in declaration order
    pub apis: Vec<Api>,
}

impl SourceParser {
    /// Parses annotation blocks that were already isolated from `path`.
    ///
    /// # Errors
    ///
    /// Returns the first lex or parse error, tagged with `path` and the
    /// position of the offending tag.
    pub fn parse_blocks(path: &Path, blocks: &[RawBlock]) -> error::Result<ParsedFile> {
        let mut parsed = ParsedFile {
            path: path.to_path_buf(),
            ..ParsedFile::default()
        };

        for raw in blocks {
            let tags = Lexer::new(&raw.text, raw.location)
                .tokenize()
                .map_err(|e| e.in_file(path))?;

            match parse_block(&tags).map_err(|e| e.in_file(path))? {
                Block::Doc(doc) => {
                    if parsed.doc.is_some() {
                        warn!(
                            "Ignoring extra @apidoc block at {}:{}",
                            path.display(),
                            raw.location.line
                        );
                    } else {
                        parsed.doc = Some(doc);
                    }
                }
                Block::Api(mut api) => {
                    api.file = Some(path.to_path_buf());
                    parsed.apis.push(api);
                }
                Block::Empty => {}
            }
        }

        debug!(
            "Parsed {}: {} APIs, doc block: {}",
            path.display(),
            parsed.apis.len(),
            parsed.doc.is_some()
        );
        Ok(parsed)
    }

    /// Parses the annotations in the text of one source file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path recorded on the result and on errors
    /// * `content` - Text of the file
    /// * `style` - Comment syntax of the file's language
    pub fn parse_source(path: &Path, content: &str, style: CommentStyle) -> error::Result<ParsedFile> {
        let blocks = style.extractor().extract_blocks(path, content);
        Self::parse_blocks(path, &blocks)
    }

    /// Reads and parses a single source file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - An annotation in the file is malformed
    pub fn parse_file(source: &SourceFile) -> Result<ParsedFile> {
        let path = &source.path;
        debug!("Parsing file: {} ({})", path.display(), source.language);

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let parsed = Self::parse_source(path, &content, source.style)?;
        Ok(parsed)
    }

    /// Parses multiple source files in parallel.
    ///
    /// # Arguments
    ///
    /// * `sources` - Files to parse
    ///
    /// # Returns
    ///
    /// Returns one result per input file, in input order regardless of which
    /// worker finished first.
    pub fn parse_files(sources: &[SourceFile]) -> Vec<Result<ParsedFile>> {
        debug!("Parsing {} files", sources.len());

        let results: Vec<Result<ParsedFile>> = sources
            .par_iter()
            .map(|source| {
                Self::parse_file(source).map_err(|e| {
                    warn!("Failed to parse {}: {}", source.path.display(), e);
                    e
                })
            })
            .collect();

        let success_count = results.iter().filter(|r| r.is_ok()).count();
        debug!(
            "Parsing complete: {} succeeded, {} failed",
            success_count,
            results.len() - success_count
        );

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::lexer::Location;
    use std::fs;
    use std::io::Write;
    use tempfile::TempDir;

    /// Helper function to create a temporary file with content
    fn create_temp_file(dir: &TempDir, name: &str, content: &str) -> SourceFile {
        let file_path = dir.path().join(name);
        let mut file = fs::File::create(&file_path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        SourceFile {
            path: file_path,
            language: "go".to_string(),
            style: CommentStyle::CStyle,
        }
    }

    const USERS: &str = r#"package users

// @apidoc Users API
// @apiVersion 1.2.0

// @api GET /users list users
// @apiTags users
// @apiResponse 200 array.object application/json
// @apiParam id int required user id
func list() {}

/*
 * @api POST /users create user
 * @apiRequest object application/json
 * @apiParam name string required name
 * @apiResponse 201 none *
 */
func create() {}
"#;

    #[test]
    fn test_parse_source_collects_doc_and_apis() {
        let parsed =
            SourceParser::parse_source(Path::new("users.go"), USERS, CommentStyle::CStyle).unwrap();

        let doc = parsed.doc.unwrap();
        assert_eq!(doc.title, "Users API");
        assert_eq!(doc.version, "1.2.0");

        let paths: Vec<(&str, &str)> = parsed
            .apis
            .iter()
            .map(|a| (a.method.as_str(), a.path.as_str()))
            .collect();
        assert_eq!(paths, vec![("GET", "/users"), ("POST", "/users")]);
        assert_eq!(parsed.apis[0].file, Some(PathBuf::from("users.go")));
        assert_eq!(parsed.apis[0].location, Location::new(6, 4));
        // The block comment opens on line 12, its @api tag sits on line 13
        assert_eq!(parsed.apis[1].location.line, 13);
    }

    #[test]
    fn test_parse_source_error_location() {
        let source = "package x\n\n// @api GET /x\n// @apiResponse 200 array.map json\n";
        let err =
            SourceParser::parse_source(Path::new("x.go"), source, CommentStyle::CStyle).unwrap_err();

        assert_eq!(err.kind, ErrorKind::InvalidType);
        assert_eq!(err.file, Some(PathBuf::from("x.go")));
        assert_eq!(err.line, 4);
        assert!(err.to_string().starts_with("x.go:4:"));
    }

    #[test]
    fn test_parse_source_lex_error() {
        let source = "# @api GET /x\n#   @api-param id\n";
        let err = SourceParser::parse_source(Path::new("x.py"), source, CommentStyle::Hash)
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::LexError);
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_parse_source_without_annotations() {
        let parsed =
            SourceParser::parse_source(Path::new("x.go"), "package x\n// plain\n", CommentStyle::CStyle)
                .unwrap();

        assert!(parsed.doc.is_none());
        assert!(parsed.apis.is_empty());
    }

    #[test]
    fn test_second_doc_block_ignored() {
        let source = "// @apidoc First\n\nfunc a() {}\n\n// @apidoc Second\n";
        let parsed =
            SourceParser::parse_source(Path::new("x.go"), source, CommentStyle::CStyle).unwrap();

        assert_eq!(parsed.doc.unwrap().title, "First");
    }

    #[test]
    fn test_parse_nonexistent_file() {
        let source = SourceFile {
            path: PathBuf::from("/nonexistent/file.go"),
            language: "go".to_string(),
            style: CommentStyle::CStyle,
        };
        let err_msg = SourceParser::parse_file(&source).unwrap_err().to_string();

        assert!(err_msg.contains("Failed to read file"));
    }

    #[test]
    fn test_parse_files_keeps_input_order() {
        let temp_dir = TempDir::new().unwrap();
        let sources: Vec<SourceFile> = (0..8)
            .map(|i| {
                create_temp_file(
                    &temp_dir,
                    &format!("f{}.go", i),
                    &format!("// @api GET /item{}\n// @apiResponse 200 string text/plain\n", i),
                )
            })
            .collect();

        let results = SourceParser::parse_files(&sources);

        assert_eq!(results.len(), 8);
        for (i, result) in results.iter().enumerate() {
            let parsed = result.as_ref().unwrap();
            assert_eq!(parsed.path, sources[i].path);
            assert_eq!(parsed.apis[0].path, format!("/item{}", i));
        }
    }

    #[test]
    fn test_parse_files_reports_failures() {
        let temp_dir = TempDir::new().unwrap();
        let good = create_temp_file(&temp_dir, "good.go", "// @api GET /ok\n");
        let bad = create_temp_file(&temp_dir, "bad.go", "// @api FETCH /bad\n");

        let results = SourceParser::parse_files(&[good, bad]);

        assert!(results[0].is_ok());
        let err_msg = results[1].as_ref().unwrap_err().to_string();
        assert!(err_msg.contains("invalid format"));
        assert!(err_msg.contains("bad.go:1:4"));
    }

    #[test]
    fn test_parse_files_empty_list() {
        assert!(SourceParser::parse_files(&[]).is_empty());
    }
}
