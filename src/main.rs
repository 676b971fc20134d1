//! blasgen — join OpenBLAS header prototypes with the reference BLAS/LAPACK
//! documentation and emit binding records.
//!
//! ```text
//! blasgen lapacke.h -d lapack-netlib/SRC -f rust -o src/lapack.rs
//! blasgen cblas.h -d blas-src -f check
//! ```
//!
//! One status line per function goes to stderr (`<name> ... OK`); the
//! rendered output goes to stdout or `--output`.

mod error;
mod model;
mod parser;
mod pipeline;
mod render;
mod types;

use anyhow::{Context, Result};
use clap::Parser;
use model::Family;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "blasgen",
    version,
    about = "Generate documented bindings from cblas.h / lapacke.h and the reference sources"
)]
struct Cli {
    /// Header file to parse (cblas.h or lapacke.h)
    header: PathBuf,

    /// Directory holding one documentation source per function
    #[arg(short = 'd', long)]
    doc_dir: Option<PathBuf>,

    /// Function family. Inferred from the header file name when omitted.
    #[arg(long, value_enum)]
    family: Option<Family>,

    /// Documentation file extension (default: c for blas, f for lapack)
    #[arg(long)]
    doc_ext: Option<String>,

    /// Output format: report (default), check, json, rust
    #[arg(short = 'f', long, default_value = "report")]
    format: String,

    /// Write output to this file instead of stdout
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Keep only functions matching this glob. Can be specified multiple times.
    #[arg(long)]
    filter: Vec<String>,

    /// Do not print per-function status lines
    #[arg(short, long)]
    quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "blasgen=debug" } else { "blasgen=info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let config = build_config(&cli)?;
    // Fail on a bad --format before doing any work
    let renderer = render::create_renderer(&cli.format)?;

    let generation = pipeline::generate(&config)?;
    if !cli.quiet {
        for entry in &generation.entries {
            eprintln!("{}", entry.status_line());
        }
    }

    let output = renderer.render(&generation)?;
    match cli.output {
        Some(ref path) => fs::write(path, &output)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{}", output),
    }

    Ok(())
}

fn build_config(cli: &Cli) -> Result<pipeline::Config> {
    let family = match cli.family {
        Some(family) => family,
        None => infer_family(&cli.header)?,
    };

    let filters = cli
        .filter
        .iter()
        .map(|f| glob::Pattern::new(f).with_context(|| format!("invalid filter pattern: {}", f)))
        .collect::<Result<Vec<_>>>()?;

    Ok(pipeline::Config {
        header: cli.header.clone(),
        doc_dir: cli.doc_dir.clone(),
        family,
        doc_ext: cli
            .doc_ext
            .as_deref()
            .map(|ext| ext.trim_start_matches('.').to_string()),
        filters,
    })
}

/// "include/cblas.h" → Blas, "lapacke.h" → Lapack
fn infer_family(header: &Path) -> Result<Family> {
    let name = header
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    Family::from_header_name(&name).with_context(|| {
        format!(
            "cannot infer the function family from {}; pass --family",
            header.display()
        )
    })
}
