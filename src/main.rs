//! OpenAPI from comments - command-line tool.
//!
//! Scans a source tree for `@api` annotation comments and writes the OpenAPI
//! document they describe.
//!
//! # Usage
//!
//! ```bash
//! openapi-from-comments [OPTIONS] [SOURCE_PATH]
//! ```
//!
//! # Examples
//!
//! Generate YAML documentation:
//! ```bash
//! openapi-from-comments ./server -o openapi.yaml
//! ```
//!
//! Only scan Go and Python files, write JSON:
//! ```bash
//! openapi-from-comments ./server -l go,python -f json -o openapi.json
//! ```
//!
//! Use a config file:
//! ```bash
//! openapi-from-comments -c apidoc.yaml -v
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use openapi_from_comments::cli;

fn main() -> Result<()> {
    // Parse once up front so the verbose flag can configure the logger
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("OpenAPI from comments starting...");

    let args = cli::parse_args_from_parsed(args)?;
    cli::run(args)?;

    info!("OpenAPI document generation completed successfully");

    Ok(())
}
