//! Print the OpenAPI document as pretty JSON for client generators.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use saveablood::ApiDoc;
use utoipa::OpenApi;

/// `openapi-dump` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "openapi-dump",
    about = "Write the SaveABlood OpenAPI document as JSON",
    version
)]
struct CliArgs {
    /// Write to this file instead of stdout.
    #[arg(long, short, value_name = "path")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let document = ApiDoc::openapi().to_pretty_json()?;
    match args.output {
        Some(path) => fs::write(&path, document)
            .wrap_err_with(|| format!("write OpenAPI document to {}", path.display()))?,
        None => println!("{document}"),
    }
    Ok(())
}
