//! services/api/src/bin/openapi.rs
//!
//! Writes the OpenAPI document for the travel nutrition API.
//!
//! Usage: `openapi [--output <path>]` (defaults to `openapi.json`).

use api_lib::web::rest::ApiDoc;
use std::path::PathBuf;
use utoipa::OpenApi;

const DEFAULT_OUTPUT: &str = "openapi.json";

/// Picks the output path from `--output <path>` or `--output=<path>`.
fn output_path<I>(args: I) -> Result<PathBuf, String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut output = PathBuf::from(DEFAULT_OUTPUT);
    while let Some(arg) = args.next() {
        if let Some(path) = arg.strip_prefix("--output=") {
            output = PathBuf::from(path);
        } else if arg == "--output" || arg == "-o" {
            let path = args
                .next()
                .ok_or_else(|| format!("{} expects a path", arg))?;
            output = PathBuf::from(path);
        } else {
            return Err(format!("unrecognized argument '{}'", arg));
        }
    }
    Ok(output)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output = output_path(std::env::args().skip(1))?;
    let doc = ApiDoc::openapi();
    std::fs::write(&output, doc.to_pretty_json()?)?;
    println!("Wrote {} paths to {}", doc.paths.paths.len(), output.display());
    Ok(())
}
