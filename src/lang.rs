use crate::extractor::cstyle::CStyleExtractor;
use crate::extractor::hash::HashExtractor;
use crate::extractor::BlockExtractor;
use log::debug;
use std::path::Path;

/// Comment syntax a language uses for annotation blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentStyle {
    /// `// line` runs and `/* block */` comments
    CStyle,
    /// `# line` runs
    Hash,
}

impl CommentStyle {
    /// Create the block extractor for this comment syntax
    pub fn extractor(&self) -> Box<dyn BlockExtractor> {
        match self {
            CommentStyle::CStyle => Box::new(CStyleExtractor),
            CommentStyle::Hash => Box::new(HashExtractor),
        }
    }
}

/// A source language the scanner understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    pub name: String,
    /// File extensions including the leading dot, e.g. `.go`
    pub extensions: Vec<String>,
    pub style: CommentStyle,
}

impl Language {
    pub fn new(name: &str, extensions: &[&str], style: CommentStyle) -> Self {
        Self {
            name: name.to_string(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
            style,
        }
    }

    /// Whether `path` carries one of this language's extensions
    pub fn matches(&self, path: &Path) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => self
                .extensions
                .iter()
                .any(|known| known.trim_start_matches('.').eq_ignore_ascii_case(ext)),
            None => false,
        }
    }
}

/// Languages known to the scanner.
///
/// Built once at startup and passed to whoever needs it. Lookup by extension
/// returns the first language that claims it, so `.h` and `.c` resolve to `c`
/// rather than `cpp`.
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    languages: Vec<Language>,
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        use CommentStyle::{CStyle, Hash};

        Self::new(vec![
            Language::new("go", &[".go"], CStyle),
            Language::new("rust", &[".rs"], CStyle),
            Language::new("c", &[".h", ".c"], CStyle),
            Language::new("cpp", &[".h", ".cpp", ".cxx", ".hpp", ".c"], CStyle),
            Language::new("php", &[".php"], CStyle),
            Language::new("js", &[".js", ".mjs"], CStyle),
            Language::new("ts", &[".ts"], CStyle),
            Language::new("java", &[".java"], CStyle),
            Language::new("python", &[".py"], Hash),
            Language::new("ruby", &[".rb"], Hash),
        ])
    }
}

impl LanguageRegistry {
    pub fn new(languages: Vec<Language>) -> Self {
        Self { languages }
    }

    /// Look up a language by name, case-insensitively
    pub fn get(&self, name: &str) -> Option<&Language> {
        self.languages
            .iter()
            .find(|lang| lang.name.eq_ignore_ascii_case(name))
    }

    /// The language of a file, judged by its extension
    pub fn detect(&self, path: &Path) -> Option<&Language> {
        let lang = self.languages.iter().find(|lang| lang.matches(path));
        debug!(
            "Detected language for {}: {:?}",
            path.display(),
            lang.map(|l| l.name.as_str())
        );
        lang
    }

    /// Restrict the registry to the named languages, keeping registry order
    pub fn only(&self, names: &[String]) -> Self {
        let languages = self
            .languages
            .iter()
            .filter(|lang| names.iter().any(|n| lang.name.eq_ignore_ascii_case(n)))
            .cloned()
            .collect();
        Self { languages }
    }

    pub fn names(&self) -> Vec<&str> {
        self.languages.iter().map(|l| l.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}
