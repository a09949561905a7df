use crate::lang::{CommentStyle, LanguageRegistry};
use anyhow::{bail, Result};
use log::{debug, warn};
use std::path::PathBuf;
use walkdir::WalkDir;

/// Directory names never descended into
const SKIPPED_DIRS: &[&str] = &["target", "node_modules", "vendor"];

/// File scanner for traversing project directories.
///
/// The `FileScanner` walks a source directory and collects every file whose
/// extension belongs to a language of the registry it was given. It skips
/// hidden entries (names starting with `.`) and the `target`, `node_modules`
/// and `vendor` directories.
///
/// # Example
///
/// ```no_run
/// use openapi_from_comments::lang::LanguageRegistry;
/// use openapi_from_comments::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let registry = LanguageRegistry::default();
/// let scanner = FileScanner::new(PathBuf::from("./my-project"), &registry);
/// let result = scanner.scan().unwrap();
/// println!("Found {} source files", result.source_files.len());
/// ```
pub struct FileScanner<'a> {
    root_path: PathBuf,
    registry: &'a LanguageRegistry,
    recursive: bool,
}

/// A source file together with the language it was detected as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Name of the language in the registry
    pub language: String,
    pub style: CommentStyle,
}

/// Result of directory scanning operation.
///
/// Contains the discovered files, sorted by path, and any warnings
/// encountered during scanning.
pub struct ScanResult {
    pub source_files: Vec<SourceFile>,
    /// Warning messages for any issues encountered (e.g., inaccessible directories)
    pub warnings: Vec<String>,
}

impl<'a> FileScanner<'a> {
    /// Creates a new recursive `FileScanner` for the specified root directory.
    ///
    /// # Arguments
    ///
    /// * `root_path` - The root directory to scan
    /// * `registry` - Languages whose files are collected
    pub fn new(root_path: PathBuf, registry: &'a LanguageRegistry) -> Self {
        Self {
            root_path,
            registry,
            recursive: true,
        }
    }

    /// Only look at files directly inside the root when `recursive` is false
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Scans the directory tree and collects all known source files.
    ///
    /// If any directories or files cannot be accessed, warnings are logged and
    /// added to the result, but scanning continues.
    ///
    /// # Returns
    ///
    /// Returns a `ScanResult` whose files are sorted by path, so the result
    /// does not depend on directory iteration order.
    ///
    /// # Errors
    ///
    /// Returns an error if the root is not a directory.
    pub fn scan(&self) -> Result<ScanResult> {
        if !self.root_path.is_dir() {
            bail!("Not a directory: {}", self.root_path.display());
        }

        let mut source_files = Vec::new();
        let mut warnings = Vec::new();

        let mut walker = WalkDir::new(&self.root_path);
        if !self.recursive {
            walker = walker.max_depth(1);
        }

        for entry in walker.into_iter().filter_entry(|e| {
            // Don't filter the root directory itself
            if e.depth() == 0 {
                return true;
            }

            let file_name = e.file_name().to_string_lossy();
            let is_hidden = file_name.starts_with('.');
            let is_skipped =
                e.file_type().is_dir() && SKIPPED_DIRS.iter().any(|dir| *dir == file_name);

            !is_hidden && !is_skipped
        }) {
            match entry {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        continue;
                    }
                    if let Some(lang) = self.registry.detect(entry.path()) {
                        source_files.push(SourceFile {
                            path: entry.path().to_path_buf(),
                            language: lang.name.clone(),
                            style: lang.style,
                        });
                    }
                }
                Err(e) => {
                    // Record warning for inaccessible directories/files
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        source_files.sort_by(|a, b| a.path.cmp(&b.path));
        debug!(
            "Scanned {}: {} source files",
            self.root_path.display(),
            source_files.len()
        );

        Ok(ScanResult {
            source_files,
            warnings,
        })
    }
}
