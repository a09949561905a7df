use crate::config::Config;
use crate::doc::Doc;
use crate::lang::LanguageRegistry;
use crate::openapi_builder::{OpenApiBuilder, OpenApiDocument};
use crate::parser::{ParsedFile, SourceParser};
use crate::sanitizer::Sanitize;
use crate::scanner::FileScanner;
use crate::serializer::{serialize, write_to_file};
use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Generate an OpenAPI document from @api annotations in source code comments
#[derive(Parser, Debug)]
#[command(name = "openapi-from-comments")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Directory holding the annotated sources
    #[arg(value_name = "SOURCE_PATH")]
    pub source_path: Option<PathBuf>,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Only scan files of these languages (e.g. go,python; default: all known)
    #[arg(short = 'l', long = "lang", value_delimiter = ',')]
    pub langs: Vec<String>,

    /// Read inputs and output from a YAML config file instead
    #[arg(short = 'c', long = "config", value_name = "FILE", conflicts_with = "source_path")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// YAML format
    #[default]
    Yaml,
    /// JSON format
    Json,
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if let Some(ref config) = args.config {
        if !config.is_file() {
            bail!("Config file does not exist: {}", config.display());
        }
        info!("Config file: {}", config.display());
        return Ok(args);
    }

    let Some(ref source_path) = args.source_path else {
        bail!("Either SOURCE_PATH or --config must be given");
    };
    if !source_path.exists() {
        bail!("Source path does not exist: {}", source_path.display());
    }
    if !source_path.is_dir() {
        bail!("Source path is not a directory: {}", source_path.display());
    }

    info!("Source path: {}", source_path.display());
    info!("Output format: {:?}", args.output_format);
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }
    if args.langs.is_empty() {
        info!("Languages: all");
    } else {
        info!("Languages: {}", args.langs.join(", "));
    }

    Ok(args)
}

/// The configuration a run uses: the config file when given, the flags otherwise
pub fn load_config(args: &CliArgs) -> Result<Config> {
    match (&args.config, &args.source_path) {
        (Some(path), _) => Config::load(path),
        (None, Some(source_path)) => Ok(Config::from_args(args, source_path)),
        (None, None) => bail!("Either SOURCE_PATH or --config must be given"),
    }
}

/// Scan, parse and merge every input of `config` into one document model.
///
/// # Errors
///
/// Returns the first scan, read or annotation error. Files are reported in
/// path order, so the same tree always yields the same error.
pub fn collect_doc(config: &Config, registry: &LanguageRegistry) -> Result<Doc> {
    let mut parsed_files: Vec<ParsedFile> = Vec::new();

    for input in &config.inputs {
        info!("Scanning {}...", input.dir.display());
        let input_registry = input.registry(registry);
        let scan_result = FileScanner::new(input.dir.clone(), &input_registry)
            .with_recursive(input.recursive)
            .scan()?;

        info!("Found {} source files", scan_result.source_files.len());
        for warning in &scan_result.warnings {
            warn!("{}", warning);
        }

        for result in SourceParser::parse_files(&scan_result.source_files) {
            parsed_files.push(result?);
        }
    }

    if parsed_files.is_empty() {
        warn!("No source files found");
    }

    Ok(Doc::merge(parsed_files))
}

/// Run the pipeline up to the exported document.
///
/// # Errors
///
/// Returns the first error of any stage; document errors keep their file,
/// line and field path.
pub fn generate(config: &Config, registry: &LanguageRegistry) -> Result<OpenApiDocument> {
    config.sanitize(registry)?;

    let mut doc = collect_doc(config, registry)?;
    info!("Collected {} APIs", doc.apis.len());

    doc.sanitize()?;
    let document = OpenApiBuilder::from_doc(&doc)?;
    info!("OpenAPI document built with {} paths", document.paths.len());

    Ok(document)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    info!("Starting OpenAPI document generation...");

    let registry = LanguageRegistry::default();
    let config = load_config(&args)?;
    let document = generate(&config, &registry)?;

    let output = config.output.unwrap_or_default();
    info!("Serializing to {:?} format...", output.format);
    let content = serialize(&document, output.format)?;

    if let Some(output_path) = &output.path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
        info!("Successfully wrote OpenAPI document to {}", output_path.display());
    } else {
        println!("{}", content);
    }

    info!("Generation complete!");
    info!("Summary:");
    info!("  - Inputs: {}", config.inputs.len());
    info!("  - Paths: {}", document.paths.len());
    info!(
        "  - Operations: {}",
        document
            .paths
            .values()
            .map(|item| item.operations().len())
            .sum::<usize>()
    );

    Ok(())
}
