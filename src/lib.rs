//! OpenAPI from comments - OpenAPI 3 documents built from `@api` annotations.
//!
//! Handlers are documented with tagged comment blocks in whatever language
//! they are written in. This library collects those blocks, parses them into
//! a document model, validates it and exports an OpenAPI document.
//!
//! ```text
//! // @api GET /users/{id} get a user
//! // @apiParam id int required user ID
//! // @apiResponse 200 object application/json the user
//! // @apiParam name string required user name
//! ```
//!
//! # Architecture
//!
//! 1. [`lang`] - Language registry: extensions and comment syntax
//! 2. [`scanner`] - Recursively collects source files of known languages
//! 3. [`extractor`] - Isolates annotation blocks from comments
//! 4. [`lexer`] - Splits a block into `@tag body` units
//! 5. [`tags`] - Turns tags into document model entities, using [`type_grammar`]
//! 6. [`parser`] - Drives the steps above per file, in parallel
//! 7. [`doc`] - Document model and the merge of per-file fragments
//! 8. [`sanitizer`] - Validation with structured field paths ([`error`])
//! 9. [`openapi_builder`] - Export to OpenAPI, with [`schema_generator`]
//! 10. [`serializer`] - YAML/JSON output
//!
//! # Example Usage
//!
//! ```no_run
//! use openapi_from_comments::{
//!     doc::Doc,
//!     lang::LanguageRegistry,
//!     openapi_builder::OpenApiBuilder,
//!     parser::SourceParser,
//!     sanitizer::Sanitize,
//!     scanner::FileScanner,
//!     serializer::serialize_yaml,
//! };
//! use std::path::PathBuf;
//!
//! let registry = LanguageRegistry::default();
//! let scan_result = FileScanner::new(PathBuf::from("./my-project"), &registry)
//!     .scan()
//!     .unwrap();
//!
//! let parsed: Vec<_> = SourceParser::parse_files(&scan_result.source_files)
//!     .into_iter()
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//!
//! let mut doc = Doc::merge(parsed);
//! doc.sanitize().unwrap();
//!
//! let document = OpenApiBuilder::from_doc(&doc).unwrap();
//! println!("{}", serialize_yaml(&document).unwrap());
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module and [`config`] for the
//! YAML config file.

pub mod cli;
pub mod config;
pub mod doc;
pub mod error;
pub mod extractor;
pub mod lang;
pub mod lexer;
pub mod openapi_builder;
pub mod parser;
pub mod sanitizer;
pub mod scanner;
pub mod schema_generator;
pub mod serializer;
pub mod tags;
pub mod type_grammar;
