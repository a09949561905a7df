//! The document model assembled from parsed tags.
//!
//! Ownership is a plain tree: a [`Doc`] owns its [`Api`]s, an API owns its
//! request and responses, a [`Body`] owns its headers, examples and type.
//! Nothing here points back up; reuse between entities only appears at export
//! time, as `$ref`s into the OpenAPI components table.

use crate::lexer::Location;
use crate::parser::ParsedFile;
use crate::type_grammar::Type;
use log::{debug, warn};
use std::path::PathBuf;

/// Document version assumed when no `@apiVersion` is declared
pub const DEFAULT_VERSION: &str = "1.0.0";

/// HTTP methods an `@api` tag can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method
    Get,
    /// HTTP POST method
    Post,
    /// HTTP PUT method
    Put,
    /// HTTP DELETE method
    Delete,
    /// HTTP PATCH method
    Patch,
    /// HTTP OPTIONS method
    Options,
    /// HTTP HEAD method
    Head,
}

impl HttpMethod {
    /// Parse a method name, case-insensitively
    pub fn parse(name: &str) -> Option<Self> {
        let method = match name.to_ascii_uppercase().as_str() {
            "GET" => HttpMethod::Get,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "DELETE" => HttpMethod::Delete,
            "PATCH" => HttpMethod::Patch,
            "OPTIONS" => HttpMethod::Options,
            "HEAD" => HttpMethod::Head,
            _ => return None,
        };
        Some(method)
    }

    /// Get the HTTP method as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
        }
    }
}

/// A named, typed value: a path/query parameter or an object member
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: Type,
    pub optional: bool,
    pub description: String,
}

impl Param {
    pub fn new(name: &str, ty: Type, optional: bool, description: &str) -> Self {
        Self {
            name: name.to_string(),
            ty,
            optional,
            description: description.to_string(),
        }
    }
}

/// An HTTP header declared by `@apiHeader`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Header name, case preserved
    pub name: String,
    pub summary: String,
    pub optional: bool,
}

/// A sample payload declared by `@apiExample`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    pub mimetype: String,
    pub summary: String,
    /// The payload, verbatim including internal newlines
    pub value: String,
}

/// Shape shared by requests and responses
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Body {
    pub headers: Vec<Header>,
    pub examples: Vec<Example>,
    pub ty: Option<Type>,
}

/// A request body declared by `@apiRequest`
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// Mimetype, `*` for any
    pub mimetype: String,
    pub body: Body,
}

/// A response declared by `@apiResponse`.
///
/// Statuses are not unique: an API may declare several responses with the
/// same status, e.g. one per mimetype.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    /// Mimetype, `*` for any
    pub mimetype: String,
    pub body: Body,
}

/// One endpoint, declared by an `@api` block
#[derive(Debug, Clone, PartialEq)]
pub struct Api {
    pub method: HttpMethod,
    pub path: String,
    pub summary: String,
    pub description: String,
    /// Names of the groups (`@apiTag`) this endpoint belongs to
    pub tags: Vec<String>,
    /// Request headers declared at API level
    pub headers: Vec<Header>,
    /// Path parameters
    pub params: Vec<Param>,
    /// Query parameters
    pub queries: Vec<Param>,
    pub request: Option<Request>,
    pub responses: Vec<Response>,
    /// File the block came from
    pub file: Option<PathBuf>,
    /// Position of the `@api` tag
    pub location: Location,
}

impl Api {
    pub fn new(method: HttpMethod, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            summary: String::new(),
            description: String::new(),
            tags: Vec::new(),
            headers: Vec::new(),
            params: Vec::new(),
            queries: Vec::new(),
            request: None,
            responses: Vec::new(),
            file: None,
            location: Location::default(),
        }
    }
}

/// A server the API is reachable on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Server {
    pub url: String,
    pub description: String,
}

impl Server {
    /// The synthetic server used when none is declared
    pub fn root() -> Self {
        Self {
            url: "/".to_string(),
            description: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct License {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalDocs {
    pub url: String,
    pub description: String,
}

/// A named grouping of APIs declared by `@apiTag`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    pub description: String,
}

/// Root of the document model
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Doc {
    pub title: String,
    pub description: String,
    pub version: String,
    pub servers: Vec<Server>,
    pub license: Option<License>,
    pub groups: Vec<Group>,
    pub external_docs: Option<ExternalDocs>,
    /// Responses shared by every API, declared in the `@apidoc` block
    pub responses: Vec<Response>,
    pub apis: Vec<Api>,
}

impl Doc {
    /// Merge per-file parse results into one document.
    ///
    /// Files are ordered by path and APIs keep their declaration order within a
    /// file, so the result does not depend on the order the files were parsed
    /// in. The first `@apidoc` block wins; later ones are reported and skipped.
    pub fn merge(mut files: Vec<ParsedFile>) -> Doc {
        files.sort_by(|a, b| a.path.cmp(&b.path));

        let mut doc: Option<Doc> = None;
        let mut apis = Vec::new();
        for file in files {
            if let Some(file_doc) = file.doc {
                if doc.is_some() {
                    warn!(
                        "Ignoring extra @apidoc block in {}",
                        file.path.display()
                    );
                } else {
                    debug!("Using @apidoc block from {}", file.path.display());
                    doc = Some(file_doc);
                }
            }
            apis.extend(file.apis);
        }

        let mut doc = doc.unwrap_or_default();
        doc.apis.extend(apis);
        debug!("Merged document with {} APIs", doc.apis.len());
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(path: &str, doc: Option<Doc>, api_paths: &[&str]) -> ParsedFile {
        ParsedFile {
            path: PathBuf::from(path),
            doc,
            apis: api_paths
                .iter()
                .map(|p| Api::new(HttpMethod::Get, p))
                .collect(),
        }
    }

    fn titled(title: &str) -> Doc {
        Doc {
            title: title.to_string(),
            ..Doc::default()
        }
    }

    #[test]
    fn test_http_method_parse() {
        assert_eq!(HttpMethod::parse("get"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::parse("DELETE"), Some(HttpMethod::Delete));
        assert_eq!(HttpMethod::parse("Patch"), Some(HttpMethod::Patch));
        assert_eq!(HttpMethod::parse("FETCH"), None);
        assert_eq!(HttpMethod::Options.as_str(), "OPTIONS");
    }

    #[test]
    fn test_merge_orders_by_path() {
        let files = vec![
            parsed("src/z.go", None, &["/z1", "/z2"]),
            parsed("src/a.go", None, &["/a1"]),
            parsed("src/m.go", Some(titled("API")), &["/m1"]),
        ];

        let doc = Doc::merge(files);
        let paths: Vec<&str> = doc.apis.iter().map(|a| a.path.as_str()).collect();

        assert_eq!(doc.title, "API");
        assert_eq!(paths, vec!["/a1", "/m1", "/z1", "/z2"]);
    }

    #[test]
    fn test_merge_first_doc_block_wins() {
        let files = vec![
            parsed("b.js", Some(titled("second")), &[]),
            parsed("a.js", Some(titled("first")), &[]),
        ];

        let doc = Doc::merge(files);
        assert_eq!(doc.title, "first");
    }

    #[test]
    fn test_merge_without_doc_block() {
        let doc = Doc::merge(vec![parsed("a.js", None, &["/x"])]);

        assert!(doc.title.is_empty());
        assert_eq!(doc.apis.len(), 1);
    }

    #[test]
    fn test_server_root() {
        assert_eq!(Server::root().url, "/");
    }
}
