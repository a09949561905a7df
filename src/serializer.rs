//! Serialization of exported documents to YAML or JSON.
//!
//! Both formats go through serde, so a document written here reads back into
//! an equal [`OpenApiDocument`].

use crate::cli::OutputFormat;
use crate::openapi_builder::OpenApiDocument;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes an OpenAPI document in the requested format.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize(doc: &OpenApiDocument, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => serialize_yaml(doc),
        OutputFormat::Json => serialize_json(doc),
    }
}

/// Serializes an OpenAPI document to YAML format.
pub fn serialize_yaml(doc: &OpenApiDocument) -> Result<String> {
    debug!("Serializing OpenAPI document to YAML");
    serde_yaml::to_string(doc).context("Failed to serialize OpenAPI document to YAML")
}

/// Serializes an OpenAPI document to JSON format with pretty printing.
pub fn serialize_json(doc: &OpenApiDocument) -> Result<String> {
    debug!("Serializing OpenAPI document to JSON");
    serde_json::to_string_pretty(doc).context("Failed to serialize OpenAPI document to JSON")
}

/// Parses a document previously written by [`serialize`].
///
/// # Errors
///
/// Returns an error if `content` is not a document in `format`.
pub fn deserialize(content: &str, format: OutputFormat) -> Result<OpenApiDocument> {
    match format {
        OutputFormat::Yaml => {
            serde_yaml::from_str(content).context("Failed to parse OpenAPI document as YAML")
        }
        OutputFormat::Json => {
            serde_json::from_str(content).context("Failed to parse OpenAPI document as JSON")
        }
    }
}

/// Guess the format of a document file from its extension; YAML unless `.json`
pub fn format_of(path: &Path) -> OutputFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => OutputFormat::Json,
        _ => OutputFormat::Yaml,
    }
}

/// Reads a document file, choosing the format by extension.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn read_from_file(path: &Path) -> Result<OpenApiDocument> {
    debug!("Reading OpenAPI document: {}", path.display());

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    deserialize(&content, format_of(path))
        .with_context(|| format!("Invalid OpenAPI document: {}", path.display()))
}

/// Writes string content to a file.
///
/// Creates the file and any missing parent directories, or overwrites an
/// existing file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::{Api, Body, HttpMethod, Response};
    use crate::openapi_builder::OpenApiBuilder;
    use crate::type_grammar::Type;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Helper function to create a small OpenAPI document for testing
    fn create_test_document() -> OpenApiDocument {
        let mut api = Api::new(HttpMethod::Get, "/users/:id");
        api.summary = "get a user".to_string();
        api.responses.push(Response {
            status: 200,
            mimetype: "application/json".to_string(),
            body: Body {
                ty: Some(Type::parse("object").unwrap()),
                ..Body::default()
            },
        });

        let mut builder = OpenApiBuilder::new().with_info(
            "Test API".to_string(),
            "1.0.0".to_string(),
            Some("A test API".to_string()),
        );
        builder.add_api(&api).unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_serialize_yaml() {
        let yaml = serialize(&create_test_document(), OutputFormat::Yaml).unwrap();

        assert!(yaml.contains("openapi: 3.0.1"));
        assert!(yaml.contains("title: Test API"));
        assert!(yaml.contains("description: A test API"));
        assert!(yaml.contains("/users/{id}"));
        assert!(yaml.contains("get:"));
    }

    #[test]
    fn test_serialize_json() {
        let json = serialize(&create_test_document(), OutputFormat::Json).unwrap();

        // Verify it's valid, pretty-printed JSON
        assert!(json.lines().count() > 5);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["openapi"], "3.0.1");
        assert_eq!(parsed["info"]["title"], "Test API");
        assert_eq!(parsed["servers"][0]["url"], "/");
        assert!(parsed["paths"]["/users/{id}"]["get"].is_object());
    }

    #[test]
    fn test_key_order_follows_document() {
        let json = serialize_json(&create_test_document()).unwrap();

        let openapi = json.find("\"openapi\"").unwrap();
        let info = json.find("\"info\"").unwrap();
        let paths = json.find("\"paths\"").unwrap();
        assert!(openapi < info && info < paths);
    }

    #[test]
    fn test_roundtrip_both_formats() {
        let doc = create_test_document();

        for format in [OutputFormat::Yaml, OutputFormat::Json] {
            let content = serialize(&doc, format).unwrap();
            assert_eq!(deserialize(&content, format).unwrap(), doc, "{:?}", format);
        }
    }

    #[test]
    fn test_deserialize_invalid() {
        assert!(deserialize("{ not json", OutputFormat::Json).is_err());
        assert!(deserialize("openapi: [", OutputFormat::Yaml).is_err());
    }

    #[test]
    fn test_format_of() {
        assert_eq!(format_of(Path::new("openapi.json")), OutputFormat::Json);
        assert_eq!(format_of(Path::new("openapi.JSON")), OutputFormat::Json);
        assert_eq!(format_of(Path::new("openapi.yaml")), OutputFormat::Yaml);
        assert_eq!(format_of(Path::new("openapi")), OutputFormat::Yaml);
    }

    #[test]
    fn test_write_to_file_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("subdir").join("nested").join("test.yaml");

        write_to_file("test content", &file_path).unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "test content");
    }

    #[test]
    fn test_write_to_file_overwrites_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.yaml");

        write_to_file("initial content", &file_path).unwrap();
        write_to_file("new content", &file_path).unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "new content");
    }

    #[test]
    fn test_write_and_read_back() {
        let temp_dir = TempDir::new().unwrap();
        let doc = create_test_document();

        for name in ["openapi.yaml", "openapi.json"] {
            let file_path = temp_dir.path().join(name);
            let content = serialize(&doc, format_of(&file_path)).unwrap();
            write_to_file(&content, &file_path).unwrap();

            assert_eq!(read_from_file(&file_path).unwrap(), doc);
        }
    }

    #[test]
    fn test_read_missing_file() {
        let err_msg = read_from_file(&PathBuf::from("/nonexistent/openapi.yaml"))
            .unwrap_err()
            .to_string();
        assert!(err_msg.contains("Failed to read file"));
    }
}
