//! Run configuration.
//!
//! A run can be described by a YAML file instead of command-line flags:
//!
//! ```yaml
//! version: 0.1.0
//! inputs:
//!   - dir: ./src
//!     langs: [go, python]
//!     recursive: true
//! output:
//!   path: openapi.yaml
//!   format: yaml
//! ```
//!
//! The configuration is checked by [`Config::sanitize`] before anything is
//! scanned, and violations are reported with the same field paths the
//! document validators use (`inputs[0].langs[1]`).

use crate::cli::{CliArgs, OutputFormat};
use crate::error::{Error, ErrorKind, Result};
use crate::lang::LanguageRegistry;
use crate::sanitizer::is_valid_version;
use anyhow::Context;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Everything one generation run needs to know
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Version of the tool the file was written for
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub inputs: Vec<InputOptions>,
    pub output: Option<OutputOptions>,
}

/// One source tree to scan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputOptions {
    #[serde(default)]
    pub dir: PathBuf,
    /// Languages to collect; empty means every known language
    #[serde(default)]
    pub langs: Vec<String>,
    #[serde(default = "default_recursive")]
    pub recursive: bool,
}

/// Where and how the document is written
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputOptions {
    /// Output file; stdout when absent
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_recursive() -> bool {
    true
}

impl Config {
    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML for
    /// this structure. Semantic checks are left to [`Config::sanitize`].
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        debug!("Loading config file: {}", path.display());

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Build a single-input configuration from command-line arguments
    pub fn from_args(args: &CliArgs, source_path: &Path) -> Config {
        Config {
            version: env!("CARGO_PKG_VERSION").to_string(),
            inputs: vec![InputOptions {
                dir: source_path.to_path_buf(),
                langs: args.langs.clone(),
                recursive: true,
            }],
            output: Some(OutputOptions {
                path: args.output_path.clone(),
                format: args.output_format,
            }),
        }
    }

    /// Check the configuration against the known languages.
    ///
    /// Checks run in a fixed order and stop at the first failure: `version`,
    /// `inputs`, `output`, then each input.
    pub fn sanitize(&self, registry: &LanguageRegistry) -> Result<()> {
        if self.version.trim().is_empty() {
            return Err(Error::new(ErrorKind::MissingRequiredField, "version"));
        }
        if !is_valid_version(&self.version) {
            return Err(Error::new(ErrorKind::InvalidFormat, "version"));
        }
        if self.inputs.is_empty() {
            return Err(Error::new(ErrorKind::MissingRequiredField, "inputs"));
        }
        if self.output.is_none() {
            return Err(Error::new(ErrorKind::MissingRequiredField, "output"));
        }

        for (i, input) in self.inputs.iter().enumerate() {
            input
                .sanitize(registry)
                .map_err(|e| e.within_index("inputs", i))?;
        }
        Ok(())
    }
}

impl InputOptions {
    fn sanitize(&self, registry: &LanguageRegistry) -> Result<()> {
        if self.dir.as_os_str().is_empty() {
            return Err(Error::new(ErrorKind::MissingRequiredField, "dir"));
        }
        for (i, lang) in self.langs.iter().enumerate() {
            if registry.get(lang).is_none() {
                return Err(Error::new(ErrorKind::InvalidFormat, "").within_index("langs", i));
            }
        }
        Ok(())
    }

    /// The part of `registry` this input collects files for
    pub fn registry(&self, registry: &LanguageRegistry) -> LanguageRegistry {
        if self.langs.is_empty() {
            registry.clone()
        } else {
            registry.only(&self.langs)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    /// Helper function to build a config that passes every check
    fn valid_config() -> Config {
        Config {
            version: "0.1.0".to_string(),
            inputs: vec![InputOptions {
                dir: PathBuf::from("./src"),
                langs: vec!["go".to_string()],
                recursive: true,
            }],
            output: Some(OutputOptions::default()),
        }
    }

    #[test]
    fn test_sanitize_valid() {
        assert!(valid_config().sanitize(&LanguageRegistry::default()).is_ok());
    }

    #[test]
    fn test_sanitize_order() {
        let registry = LanguageRegistry::default();
        let mut conf = Config::default();

        let err = conf.sanitize(&registry).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingRequiredField);
        assert_eq!(err.field_path(), "version");

        conf.version = "4.0".to_string();
        let err = conf.sanitize(&registry).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidFormat);
        assert_eq!(err.field_path(), "version");

        conf.version = "4.0.1".to_string();
        assert_eq!(conf.sanitize(&registry).unwrap_err().field_path(), "inputs");

        conf.inputs = vec![InputOptions::default()];
        assert_eq!(conf.sanitize(&registry).unwrap_err().field_path(), "output");

        // Verify the first failing input is the one reported
        conf.output = Some(OutputOptions::default());
        conf.inputs.push(InputOptions {
            dir: PathBuf::from("."),
            langs: vec!["123".to_string()],
            recursive: true,
        });
        let err = conf.sanitize(&registry).unwrap_err();
        assert!(err.field_path().starts_with("inputs[0]"));
        assert_eq!(err.field_path(), "inputs[0].dir");
    }

    #[test]
    fn test_sanitize_unknown_language() {
        let mut conf = valid_config();
        conf.inputs[0].langs = vec!["go".to_string(), "cobol".to_string()];

        let err = conf.sanitize(&LanguageRegistry::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidFormat);
        assert_eq!(err.field_path(), "inputs[0].langs[1]");
    }

    #[test]
    fn test_load_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("apidoc.yaml");
        fs::write(
            &path,
            "version: 0.1.0\ninputs:\n  - dir: ./api\n    langs: [go, python]\noutput:\n  path: out/openapi.json\n  format: json\n",
        )
        .unwrap();

        let conf = Config::load(&path).unwrap();

        assert_eq!(conf.version, "0.1.0");
        assert_eq!(conf.inputs[0].dir, PathBuf::from("./api"));
        assert_eq!(conf.inputs[0].langs, vec!["go", "python"]);
        assert!(conf.inputs[0].recursive);
        let output = conf.output.unwrap();
        assert_eq!(output.path, Some(PathBuf::from("out/openapi.json")));
        assert_eq!(output.format, OutputFormat::Json);
    }

    #[test]
    fn test_load_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("apidoc.yaml");
        fs::write(&path, "version: 0.1.0\ninputs:\n  - dir: .\noutput: {}\n").unwrap();

        let conf = Config::load(&path).unwrap();

        assert!(conf.inputs[0].langs.is_empty());
        assert_eq!(conf.output.unwrap().format, OutputFormat::Yaml);
    }

    #[test]
    fn test_load_missing_file() {
        let err_msg = Config::load(Path::new("/nonexistent/apidoc.yaml"))
            .unwrap_err()
            .to_string();
        assert!(err_msg.contains("Failed to read config file"));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("apidoc.yaml");
        fs::write(&path, "inputs: not-a-list\n").unwrap();

        let err_msg = Config::load(&path).unwrap_err().to_string();
        assert!(err_msg.contains("Failed to parse config file"));
    }

    #[test]
    fn test_input_registry() {
        let registry = LanguageRegistry::default();
        let all = InputOptions::default();
        let some = InputOptions {
            langs: vec!["python".to_string()],
            ..InputOptions::default()
        };

        assert_eq!(all.registry(&registry).names(), registry.names());
        assert_eq!(some.registry(&registry).names(), vec!["python"]);
    }
}
